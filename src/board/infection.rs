//! Infection and outbreak resolution.
//!
//! An outbreak spreads one cube of the outbreaking color to every neighbor,
//! depth first. Each city outbreaks at most once per external [`Board::infect`]
//! call; the visited set lives for the whole cascade. Players do not get to
//! choose the resolution order, which in rare cases changes how many
//! outbreaks a cascade produces.

use rustc_hash::FxHashSet;
use std::ops::AddAssign;

use super::state::{Board, MAX_CUBES_PER_CITY, MAX_OUTBREAKS};
use crate::core::map::{CityId, Color};
use crate::core::player::Role;

/// What one infection did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InfectionReport {
    /// Outbreaks triggered, including cascades.
    pub outbreaks: u32,
    /// Outbreaks prevented by the Quarantine Specialist.
    pub blocked: u32,
}

impl AddAssign for InfectionReport {
    fn add_assign(&mut self, rhs: Self) {
        self.outbreaks += rhs.outbreaks;
        self.blocked += rhs.blocked;
    }
}

impl Board {
    /// Add `amount` cubes of `color` to `city`, resolving any outbreaks.
    pub fn infect(&mut self, city: CityId, color: Color, amount: u8) -> InfectionReport {
        let mut visited = FxHashSet::default();
        let report = self.infect_city(city, color, amount, &mut visited);
        if report.outbreaks > 0 {
            log::trace!(
                "infecting {city} with {amount} {color} caused {} outbreak(s), {} blocked",
                report.outbreaks,
                report.blocked
            );
        }
        report
    }

    /// Whether the Quarantine Specialist protects `city`: they stand on it
    /// or next to it. Never applies before setup completes.
    #[must_use]
    pub fn quarantine_blocks(&self, city: CityId) -> bool {
        self.is_setup
            && self
                .find_role(Role::QuarantineSpecialist)
                .is_some_and(|qs| qs.position() == city || qs.position().is_adjacent(city))
    }

    fn infect_city(
        &mut self,
        city: CityId,
        color: Color,
        amount: u8,
        visited: &mut FxHashSet<CityId>,
    ) -> InfectionReport {
        let current = self.cubes(city, color);
        let overflow = current + amount > MAX_CUBES_PER_CITY;

        if self.quarantine_blocks(city) {
            return InfectionReport { outbreaks: 0, blocked: u32::from(overflow) };
        }
        if visited.contains(&city) {
            return InfectionReport::default();
        }
        if overflow {
            self.set_cubes(city, color, MAX_CUBES_PER_CITY);
            self.outbreak(city, color, visited)
        } else {
            self.set_cubes(city, color, current + amount);
            InfectionReport::default()
        }
    }

    fn outbreak(&mut self, city: CityId, color: Color, visited: &mut FxHashSet<CityId>) -> InfectionReport {
        self.outbreak_count = self.outbreak_count.saturating_add(1);
        if self.outbreak_count > MAX_OUTBREAKS {
            self.mark_lost("more than 7 outbreaks");
            return InfectionReport { outbreaks: 1, blocked: 0 };
        }

        let mut report = InfectionReport { outbreaks: 1, blocked: 0 };
        visited.insert(city);
        for &neighbor in city.neighbors() {
            report += self.infect_city(neighbor, color, 1, visited);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::map::ATLANTA;
    use crate::core::rng::GameRng;

    fn set_up_board(roles: &[Role]) -> Board {
        let mut board = Board::new(roles, 4);
        board.setup(&mut GameRng::new(0)).unwrap();
        for city in CityId::all() {
            for color in Color::ALL {
                board.set_cubes(city, color, 0);
            }
        }
        board
    }

    #[test]
    fn test_simple_infection() {
        let mut board = set_up_board(&[Role::Medic, Role::Scientist]);
        let report = board.infect(CityId(20), Color::Yellow, 2);
        assert_eq!(report, InfectionReport::default());
        assert_eq!(board.cubes(CityId(20), Color::Yellow), 2);
        assert_eq!(board.total_cubes(Color::Yellow), 2);
    }

    #[test]
    fn test_outbreak_spreads_outbreak_color() {
        let mut board = set_up_board(&[Role::Medic, Role::Scientist]);
        // Istanbul is black; its neighbors include blue Milan and St. Petersburg.
        board.set_cubes(CityId(25), Color::Black, 3);
        let report = board.infect(CityId(25), Color::Black, 1);

        assert_eq!(report.outbreaks, 1);
        assert_eq!(board.outbreak_count(), 1);
        assert_eq!(board.cubes(CityId(25), Color::Black), 3);
        for &n in CityId(25).neighbors() {
            assert_eq!(board.cubes(n, Color::Black), 1, "{n}");
            assert_eq!(board.cubes(n, n.color()), 0);
        }
        assert_eq!(board.total_cubes(Color::Black), 3 + 6);
    }

    #[test]
    fn test_chain_reaction_visits_each_city_once() {
        let mut board = set_up_board(&[Role::Medic, Role::Scientist]);
        // Two adjacent saturated cities outbreak into each other only once.
        board.set_cubes(CityId(44), Color::Red, 3);
        board.set_cubes(CityId(47), Color::Red, 3);
        let report = board.infect(CityId(44), Color::Red, 1);

        assert_eq!(report.outbreaks, 2);
        assert_eq!(board.outbreak_count(), 2);
        assert_eq!(board.cubes(CityId(44), Color::Red), 3);
        assert_eq!(board.cubes(CityId(47), Color::Red), 3);
        // Taipei neighbors Osaka only, Seoul/Shanghai/SF neighbor Tokyo.
        assert_eq!(board.cubes(CityId(42), Color::Red), 1);
        assert_eq!(board.cubes(CityId(43), Color::Red), 1);
        assert_eq!(board.cubes(CityId(46), Color::Red), 1);
        assert_eq!(board.cubes(CityId(0), Color::Red), 1);
    }

    #[test]
    fn test_eighth_outbreak_loses() {
        let mut board = set_up_board(&[Role::Medic, Role::Scientist]);
        board.set_outbreak_count(7);
        board.set_cubes(CityId(30), Color::Black, 3);
        board.infect(CityId(30), Color::Black, 1);
        assert!(board.lost());
        assert_eq!(board.cubes(CityId(27), Color::Black), 0);
        assert!(board.is_terminal());
    }

    #[test]
    fn test_quarantine_specialist_blocks() {
        let mut board = set_up_board(&[Role::QuarantineSpecialist, Role::Scientist]);
        // Specialist stays in Atlanta.
        board.infect(ATLANTA, Color::Blue, 1);
        board.infect(CityId(14), Color::Yellow, 1);
        assert_eq!(board.cubes(ATLANTA, Color::Blue), 0);
        assert_eq!(board.cubes(CityId(14), Color::Yellow), 0);

        board.set_cubes(CityId(13), Color::Yellow, 3);
        let report = board.infect(CityId(13), Color::Yellow, 1);
        assert_eq!(report, InfectionReport { outbreaks: 1, blocked: 0 });
        // Miami is protected from the spread.
        assert_eq!(board.cubes(CityId(14), Color::Yellow), 0);
        assert_eq!(board.cubes(CityId(15), Color::Yellow), 1);

        board.set_cubes(CityId(14), Color::Yellow, 3);
        let report = board.infect(CityId(14), Color::Yellow, 1);
        assert_eq!(report, InfectionReport { outbreaks: 0, blocked: 1 });
    }
}
