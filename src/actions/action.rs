//! Player and event actions.
//!
//! An `Action` carries only the parameters of one transition. It is applied
//! to whatever board is handed to [`Action::execute`], so actions stay valid
//! across board copies.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use std::fmt;

use crate::board::Board;
use crate::core::card::{EventCard, PlayerCard};
use crate::core::error::GameError;
use crate::core::map::{CityId, Color, N_CITIES};
use crate::core::player::{PlayerId, Role};

/// One atomic game transition chosen by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Drive to a neighboring city.
    Move { to: CityId },
    /// Discard a city card to fly there.
    DirectFlight { to: CityId },
    /// Discard the current city's card to fly anywhere.
    CharterFlight { to: CityId },
    /// Fly between two research stations.
    ShuttleFlight { to: CityId },
    /// Operations Expert: from a station, discard any city card to fly anywhere.
    OperationsExpertFlight { to: CityId, discard: CityId },
    /// Build a station in the current city, removing one first if all six are placed.
    Build { remove_station: Option<CityId> },
    Treat { color: Color },
    Cure { color: Color },
    Give { to: PlayerId, card: CityId },
    Take { from: PlayerId, card: CityId },
    DoNothing,
    Airlift { user: PlayerId, target: PlayerId, to: CityId },
    GovernmentGrant { user: PlayerId, city: CityId, remove_station: Option<CityId> },
    QuietNight { user: PlayerId },
    /// Discard a city card while over the hand limit.
    ForcedDiscard { player: PlayerId, card: CityId },
}

impl Action {
    /// Short upper-case kind tag, stable across runs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Action::Move { .. } => "MOVE",
            Action::DirectFlight { .. } => "DIRECTFLIGHT",
            Action::CharterFlight { .. } => "CHARTERFLIGHT",
            Action::ShuttleFlight { .. } => "SHUTTLEFLIGHT",
            Action::OperationsExpertFlight { .. } => "OPERATIONSEXPERTFLIGHT",
            Action::Build { .. } => "BUILD",
            Action::Treat { .. } => "TREAT",
            Action::Cure { .. } => "CURE",
            Action::Give { .. } => "GIVE",
            Action::Take { .. } => "TAKE",
            Action::DoNothing => "DONOTHING",
            Action::Airlift { .. } => "AIRLIFT",
            Action::GovernmentGrant { .. } => "GOVERNMENTGRANT",
            Action::QuietNight { .. } => "QUIETNIGHT",
            Action::ForcedDiscard { .. } => "FORCEDDISCARD",
        }
    }

    /// Event card plays, which never use up a player action.
    #[must_use]
    pub const fn is_event(&self) -> bool {
        matches!(
            self,
            Action::Airlift { .. } | Action::GovernmentGrant { .. } | Action::QuietNight { .. }
        )
    }

    /// Apply the action, then refresh the board's status.
    ///
    /// A contract violation (missing card, wrong place) latches the board
    /// as broken instead of returning, so a search walk ends at a terminal
    /// node rather than unwinding.
    pub fn execute(&self, board: &mut Board) {
        if let Err(err) = self.apply(board) {
            board.mark_broken(format!("{} failed: {err}", self.kind()));
        }
        board.update_status();
    }

    /// Apply the action, reporting the first violated precondition.
    ///
    /// Seats and cities are checked before anything changes, so a rejected
    /// action never leaves the board half applied.
    pub fn apply(&self, board: &mut Board) -> Result<(), GameError> {
        self.check_references(board)?;
        let active = board.turn();
        let here = board.active_player().position();

        match *self {
            Action::Move { to } => {
                if !here.is_adjacent(to) {
                    return Err(GameError::IllegalAction(format!("{here} is not adjacent to {to}")));
                }
                board.active_player_mut().set_position(to);
                board.advance_player_action();
            }
            Action::DirectFlight { to } => {
                board.active_player_mut().remove_city(to)?;
                board.active_player_mut().set_position(to);
                board.advance_player_action();
            }
            Action::CharterFlight { to } => {
                board.active_player_mut().remove_city(here)?;
                board.active_player_mut().set_position(to);
                board.advance_player_action();
            }
            Action::ShuttleFlight { to } => {
                if !board.has_station(here) || !board.has_station(to) {
                    return Err(GameError::IllegalAction(format!(
                        "no shuttle between {here} and {to}"
                    )));
                }
                board.active_player_mut().set_position(to);
                board.advance_player_action();
            }
            Action::OperationsExpertFlight { to, discard } => {
                let player = board.active_player();
                if player.role() != Role::OperationsExpert || player.used_operations_expert_flight {
                    return Err(GameError::IllegalAction(format!(
                        "{active} cannot make an Operations Expert flight"
                    )));
                }
                let player = board.active_player_mut();
                player.remove_city(discard)?;
                player.used_operations_expert_flight = true;
                player.set_position(to);
                board.advance_player_action();
            }
            Action::Build { remove_station } => {
                if board.active_player().role() != Role::OperationsExpert {
                    board.active_player_mut().remove_city(here)?;
                }
                board.add_station(here, remove_station)?;
                board.advance_player_action();
            }
            Action::Treat { color } => {
                let current = board.cubes(here, color);
                if current == 0 {
                    return Err(GameError::IllegalAction(format!("no {color} cubes in {here}")));
                }
                let remaining = if board.active_player().role() == Role::Medic || board.is_cured(color) {
                    0
                } else {
                    current - 1
                };
                board.set_cubes(here, color, remaining);
                board.check_eradicated(color);
                board.advance_player_action();
            }
            Action::Cure { color } => {
                if !board.has_station(here) {
                    return Err(GameError::IllegalAction(format!("no research station in {here}")));
                }
                board.active_player_mut().remove_cure_cards(color)?;
                board.cure(color);
                board.advance_player_action();
            }
            Action::Give { to, card } => {
                check_share(board, active, to, card)?;
                board.active_player_mut().remove_city(card)?;
                board.player_mut(to)?.add_card(PlayerCard::City(card))?;
                board.advance_player_action();
            }
            Action::Take { from, card } => {
                check_share(board, from, active, card)?;
                board.player_mut(from)?.remove_city(card)?;
                board.active_player_mut().add_card(PlayerCard::City(card))?;
                board.advance_player_action();
            }
            Action::DoNothing => board.advance_player_action(),
            Action::Airlift { user, target, to } => {
                board.player_mut(user)?.remove_event(EventCard::Airlift)?;
                board.player_mut(target)?.set_position(to);
            }
            Action::GovernmentGrant { user, city, remove_station } => {
                board.player_mut(user)?.remove_event(EventCard::GovernmentGrant)?;
                board.add_station(city, remove_station)?;
            }
            Action::QuietNight { user } => {
                board.player_mut(user)?.remove_event(EventCard::QuietNight)?;
                board.set_quiet_night(true);
            }
            Action::ForcedDiscard { player, card } => {
                board.player_mut(player)?.remove_city(card)?;
            }
        }
        Ok(())
    }

    /// Every seat named by the action is occupied and every city is on the map.
    fn check_references(&self, board: &Board) -> Result<(), GameError> {
        let (seats, cities): (SmallVec<[PlayerId; 2]>, SmallVec<[CityId; 2]>) = match *self {
            Action::Move { to }
            | Action::DirectFlight { to }
            | Action::CharterFlight { to }
            | Action::ShuttleFlight { to } => (smallvec![], smallvec![to]),
            Action::OperationsExpertFlight { to, discard } => (smallvec![], smallvec![to, discard]),
            Action::Build { remove_station } => (smallvec![], remove_station.into_iter().collect()),
            Action::Treat { .. } | Action::Cure { .. } | Action::DoNothing => (smallvec![], smallvec![]),
            Action::Give { to: seat, card } | Action::Take { from: seat, card } => {
                (smallvec![seat], smallvec![card])
            }
            Action::Airlift { user, target, to } => (smallvec![user, target], smallvec![to]),
            Action::GovernmentGrant { user, city, remove_station } => {
                (smallvec![user], std::iter::once(city).chain(remove_station).collect())
            }
            Action::QuietNight { user } => (smallvec![user], smallvec![]),
            Action::ForcedDiscard { player, card } => (smallvec![player], smallvec![card]),
        };

        for seat in seats {
            board.player(seat)?;
        }
        match cities.into_iter().find(|city| city.index() >= N_CITIES) {
            Some(city) => Err(GameError::IllegalAction(format!("{city} is not on the map"))),
            None => Ok(()),
        }
    }
}

/// A card passes between two different players standing in the same city.
/// It must be that city's card unless the giver is the Researcher.
fn check_share(board: &Board, giver: PlayerId, receiver: PlayerId, card: CityId) -> Result<(), GameError> {
    if giver == receiver {
        return Err(GameError::IllegalAction(format!("{giver} cannot share a card with themselves")));
    }
    let giving = board.player(giver)?;
    let place = giving.position();
    if board.player(receiver)?.position() != place {
        return Err(GameError::IllegalAction(format!("{giver} and {receiver} are not both in {place}")));
    }
    if giving.role() != Role::Researcher && card != place {
        return Err(GameError::IllegalAction(format!("{giver} may only share the {place} card")));
    }
    if !giving.has_city(card) {
        return Err(GameError::CardNotHeld { player: giver, card });
    }
    Ok(())
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind();
        match self {
            Action::Move { to }
            | Action::DirectFlight { to }
            | Action::CharterFlight { to }
            | Action::ShuttleFlight { to } => write!(f, "{kind} to {to}"),
            Action::OperationsExpertFlight { to, discard } => {
                write!(f, "{kind} to {to} (discarding {discard})")
            }
            Action::Build { remove_station: Some(old) } => write!(f, "{kind} (removing {old})"),
            Action::Build { remove_station: None } => f.write_str(kind),
            Action::Treat { color } | Action::Cure { color } => write!(f, "{kind} {color}"),
            Action::Give { to, card } => write!(f, "{kind} {card} to {to}"),
            Action::Take { from, card } => write!(f, "{kind} {card} from {from}"),
            Action::DoNothing => f.write_str(kind),
            Action::Airlift { user, target, to } => write!(f, "{kind} by {user}: {target} to {to}"),
            Action::GovernmentGrant { user, city, remove_station } => {
                write!(f, "{kind} by {user}: station at {city}")?;
                if let Some(old) = remove_station {
                    write!(f, " (removed {old})")?;
                }
                Ok(())
            }
            Action::QuietNight { user } => write!(f, "{kind} by {user}"),
            Action::ForcedDiscard { player, card } => write!(f, "{kind} {player} discarded {card}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TurnStage;
    use crate::core::map::ATLANTA;
    use crate::core::rng::GameRng;

    fn board(roles: &[Role]) -> Board {
        let mut board = Board::new(roles, 4);
        board.setup(&mut GameRng::new(3)).unwrap();
        board.set_turn(PlayerId(0)).unwrap();
        for player in &mut board.players {
            player.reset();
        }
        board
    }

    fn give_city(board: &mut Board, player: PlayerId, city: CityId) {
        board.player_mut(player).unwrap().add_card(PlayerCard::City(city)).unwrap();
    }

    #[test]
    fn test_move_advances_stage() {
        let mut board = board(&[Role::Scientist, Role::Medic]);
        Action::Move { to: CityId(1) }.execute(&mut board);
        assert_eq!(board.active_player().position(), CityId(1));
        assert_eq!(board.stage(), TurnStage::PlayerAction(1));
        assert!(!board.broken());
    }

    #[test]
    fn test_move_to_non_neighbor_breaks() {
        let mut board = board(&[Role::Scientist, Role::Medic]);
        Action::Move { to: CityId(40) }.execute(&mut board);
        assert!(board.broken());
        assert!(board.broken_reasons()[0].starts_with("MOVE failed"));
    }

    #[test]
    fn test_direct_flight_discards() {
        let mut board = board(&[Role::Scientist, Role::Medic]);
        give_city(&mut board, PlayerId(0), CityId(30));
        Action::DirectFlight { to: CityId(30) }.execute(&mut board);
        assert_eq!(board.active_player().position(), CityId(30));
        assert!(board.active_player().hand().is_empty());
    }

    #[test]
    fn test_build_replaces_station_when_full() {
        let mut board = board(&[Role::OperationsExpert, Role::Medic]);
        for c in [10, 20, 30, 40, 44] {
            board.add_station(CityId(c), None).unwrap();
        }
        board.active_player_mut().set_position(CityId(5));
        Action::Build { remove_station: Some(CityId(10)) }.execute(&mut board);
        assert!(!board.broken());
        assert!(board.has_station(CityId(5)));
        assert!(!board.has_station(CityId(10)));
        assert_eq!(board.stations().len(), 6);
    }

    #[test]
    fn test_treat_medic_and_cured() {
        let mut board = board(&[Role::Medic, Role::Scientist]);
        board.set_cubes(ATLANTA, Color::Blue, 3);
        Action::Treat { color: Color::Blue }.execute(&mut board);
        assert_eq!(board.cubes(ATLANTA, Color::Blue), 0);

        board.set_turn(PlayerId(1)).unwrap();
        board.set_cubes(ATLANTA, Color::Red, 2);
        Action::Treat { color: Color::Red }.execute(&mut board);
        assert_eq!(board.cubes(ATLANTA, Color::Red), 1);
    }

    #[test]
    fn test_cure_marks_eradicated_only_without_cubes() {
        let mut board = board(&[Role::Scientist, Role::Medic]);
        for c in 24..28 {
            give_city(&mut board, PlayerId(0), CityId(c));
        }
        Action::Cure { color: Color::Black }.execute(&mut board);
        assert!(board.is_cured(Color::Black));
        assert_eq!(board.is_eradicated(Color::Black), board.total_cubes(Color::Black) == 0);
        assert!(board.active_player().hand().is_empty());
    }

    #[test]
    fn test_give_and_take() {
        let mut board = board(&[Role::Scientist, Role::Researcher]);
        give_city(&mut board, PlayerId(0), ATLANTA);
        Action::Give { to: PlayerId(1), card: ATLANTA }.execute(&mut board);
        assert!(board.player(PlayerId(1)).unwrap().has_city(ATLANTA));
        Action::Take { from: PlayerId(1), card: ATLANTA }.execute(&mut board);
        assert!(board.player(PlayerId(0)).unwrap().has_city(ATLANTA));
        assert_eq!(board.stage(), TurnStage::PlayerAction(2));
    }

    #[test]
    fn test_give_to_missing_seat_keeps_the_card() {
        let mut board = board(&[Role::Scientist, Role::Researcher]);
        give_city(&mut board, PlayerId(0), ATLANTA);
        Action::Give { to: PlayerId(9), card: ATLANTA }.execute(&mut board);
        assert!(board.broken());
        assert!(board.active_player().has_city(ATLANTA));
        assert_eq!(board.stage(), TurnStage::PlayerAction(0));
    }

    #[test]
    fn test_take_from_elsewhere_breaks() {
        let mut board = board(&[Role::Scientist, Role::Medic]);
        give_city(&mut board, PlayerId(1), ATLANTA);
        board.player_mut(PlayerId(1)).unwrap().set_position(CityId(1));
        Action::Take { from: PlayerId(1), card: ATLANTA }.execute(&mut board);
        assert!(board.broken());
        assert!(board.player(PlayerId(1)).unwrap().has_city(ATLANTA));
        assert!(board.active_player().hand().is_empty());
    }

    #[test]
    fn test_charter_flight_off_map_breaks() {
        let mut board = board(&[Role::Scientist, Role::Medic]);
        give_city(&mut board, PlayerId(0), ATLANTA);
        Action::CharterFlight { to: CityId(48) }.execute(&mut board);
        assert!(board.broken());
        assert_eq!(board.active_player().position(), ATLANTA);
        assert!(board.active_player().has_city(ATLANTA));
    }

    #[test]
    fn test_events_do_not_advance_stage() {
        let mut board = board(&[Role::Scientist, Role::Researcher]);
        for event in EventCard::ALL {
            board.player_mut(PlayerId(1)).unwrap().add_card(PlayerCard::Event(event)).unwrap();
        }
        Action::Airlift { user: PlayerId(1), target: PlayerId(0), to: CityId(47) }.execute(&mut board);
        Action::GovernmentGrant { user: PlayerId(1), city: CityId(47), remove_station: None }.execute(&mut board);
        Action::QuietNight { user: PlayerId(1) }.execute(&mut board);

        assert!(!board.broken());
        assert_eq!(board.stage(), TurnStage::PlayerAction(0));
        assert_eq!(board.player(PlayerId(0)).unwrap().position(), CityId(47));
        assert!(board.has_station(CityId(47)));
        assert!(board.quiet_night());
        assert!(board.player(PlayerId(1)).unwrap().events().is_empty());
    }

    #[test]
    fn test_operations_expert_flight_once_per_turn() {
        let mut board = board(&[Role::OperationsExpert, Role::Medic]);
        give_city(&mut board, PlayerId(0), CityId(7));
        give_city(&mut board, PlayerId(0), CityId(8));
        Action::OperationsExpertFlight { to: CityId(40), discard: CityId(7) }.execute(&mut board);
        assert!(!board.broken());
        board.active_player_mut().set_position(ATLANTA);
        Action::OperationsExpertFlight { to: CityId(41), discard: CityId(8) }.execute(&mut board);
        assert!(board.broken());
    }

    #[test]
    fn test_display() {
        let action = Action::Give { to: PlayerId(2), card: ATLANTA };
        assert_eq!(action.to_string(), "GIVE Atlanta to Player 2");
        assert_eq!(Action::DoNothing.to_string(), "DONOTHING");
    }
}
