//! Internal consistency checks.
//!
//! The checks collect every violation rather than stopping at the first,
//! and each one is latched into the board's broken reasons. They are
//! opt-in per call because the duplicate-card scan is comparatively slow.

use rustc_hash::FxHashSet;

use super::state::{Board, MAX_CUBES_PER_CITY, MAX_STATIONS};
use crate::core::map::{CityId, Color, N_CITIES};
use crate::core::player::HAND_LIMIT;

impl Board {
    /// Run every consistency check. Returns `true` if the board is sound.
    pub fn sanity_check(&mut self) -> bool {
        let violations = self.find_violations();
        let clean = violations.is_empty();
        for reason in violations {
            self.mark_broken(reason);
        }
        clean
    }

    /// Describe every violated invariant without touching the board.
    #[must_use]
    pub fn find_violations(&self) -> Vec<String> {
        let mut out = Vec::new();

        for color in Color::ALL {
            let mut sum = 0u32;
            for city in CityId::all() {
                let n = self.cubes(city, color);
                if n > MAX_CUBES_PER_CITY {
                    out.push(format!("{city} has {n} {color} cubes"));
                }
                sum += u32::from(n);
            }
            if sum != u32::from(self.total_cubes(color)) {
                out.push(format!(
                    "{color} total is {} but the map holds {sum}",
                    self.total_cubes(color)
                ));
            }
        }

        if !self.stage.is_consistent(self.infection_rate()) {
            out.push(format!("turn stage {:?} is out of range", self.stage));
        }

        let mut seen_cities = FxHashSet::default();
        let mut seen_events = FxHashSet::default();
        for player in &self.players {
            for &card in player.hand() {
                if !seen_cities.insert(card) {
                    out.push(format!("{card} city card is held twice ({} has one)", player.role()));
                }
            }
            for &event in player.events() {
                if !seen_events.insert(event) {
                    out.push(format!("{} event card is held twice", event.name()));
                }
            }
            if player.hand_size() > HAND_LIMIT + 1 {
                out.push(format!(
                    "{} has {} cards ({} city cards and {} event cards)",
                    player.role(),
                    player.hand_size(),
                    player.hand().len(),
                    player.events().len()
                ));
            }
            if player.position().index() >= N_CITIES {
                out.push(format!("{} is off the map at {:?}", player.role(), player.position()));
            }
        }

        if self.epidemics_drawn() > self.difficulty() {
            out.push(format!(
                "difficulty is {} but {} epidemics have been drawn",
                self.difficulty(),
                self.epidemics_drawn()
            ));
        }

        if self.stations.len() > MAX_STATIONS {
            out.push(format!("{} research stations on the map", self.stations.len()));
        }
        let unique: FxHashSet<_> = self.stations.iter().collect();
        if unique.len() != self.stations.len() {
            out.push("a city holds two research stations".to_string());
        }

        if self.turn.index() >= self.players.len() {
            out.push(format!("{} is not seated", self.turn));
        }

        out
    }
}
