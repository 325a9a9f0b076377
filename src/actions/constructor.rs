//! Action constructors: the single authority on legality.
//!
//! Each constructor answers four questions about one action kind on a live
//! board: is any instance legal, how many instances exist, draw one
//! uniformly, and list them all. `n_actions` always equals the length of
//! `all_actions`, which is what makes the global uniform sampler exact.

use std::fmt;

use super::action::Action;
use crate::board::{Board, MAX_STATIONS};
use crate::core::card::EventCard;
use crate::core::map::{CityId, Color, N_CITIES};
use crate::core::player::{Player, PlayerId, Role};
use crate::core::rng::GameRng;

/// One generator per player-action kind, in sampling order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionConstructor {
    Move,
    DirectFlight,
    CharterFlight,
    ShuttleFlight,
    OperationsExpertFlight,
    Build,
    Treat,
    Cure,
    Give,
    Take,
    DoNothing,
    Airlift,
    GovernmentGrant,
    QuietNight,
}

impl ActionConstructor {
    /// Walk order for uniform sampling and enumeration.
    pub const ALL: [ActionConstructor; 14] = [
        ActionConstructor::Move,
        ActionConstructor::DirectFlight,
        ActionConstructor::CharterFlight,
        ActionConstructor::ShuttleFlight,
        ActionConstructor::OperationsExpertFlight,
        ActionConstructor::Build,
        ActionConstructor::Treat,
        ActionConstructor::Cure,
        ActionConstructor::Give,
        ActionConstructor::Take,
        ActionConstructor::DoNothing,
        ActionConstructor::Airlift,
        ActionConstructor::GovernmentGrant,
        ActionConstructor::QuietNight,
    ];

    #[must_use]
    pub fn legal(self, board: &Board) -> bool {
        let player_turn = board.stage().is_player_action();
        let active = board.active_player();
        let here = active.position();

        match self {
            ActionConstructor::Move => player_turn,
            ActionConstructor::DirectFlight => player_turn && !active.hand().is_empty(),
            ActionConstructor::CharterFlight => player_turn && active.has_city(here),
            ActionConstructor::ShuttleFlight => {
                player_turn && board.has_station(here) && board.stations().len() > 1
            }
            ActionConstructor::OperationsExpertFlight => {
                player_turn
                    && active.role() == Role::OperationsExpert
                    && !active.used_operations_expert_flight
                    && board.has_station(here)
                    && !active.hand().is_empty()
            }
            ActionConstructor::Build => {
                player_turn
                    && !board.has_station(here)
                    && (active.role() == Role::OperationsExpert || active.has_city(here))
            }
            ActionConstructor::Treat => player_turn && board.colors_present(here).next().is_some(),
            ActionConstructor::Cure => player_turn && board.has_station(here) && curable_color(board).is_some(),
            ActionConstructor::Give => {
                player_turn
                    && board.colocated_players().next().is_some()
                    && if active.role() == Role::Researcher {
                        !active.hand().is_empty()
                    } else {
                        active.has_city(here)
                    }
            }
            ActionConstructor::Take => {
                player_turn && board.colocated_players().any(|other| takeable(other, here) > 0)
            }
            ActionConstructor::DoNothing => player_turn,
            ActionConstructor::Airlift => event_holder(board, EventCard::Airlift).is_some(),
            ActionConstructor::GovernmentGrant => event_holder(board, EventCard::GovernmentGrant).is_some(),
            ActionConstructor::QuietNight => {
                !board.stage().is_infect_phase() && event_holder(board, EventCard::QuietNight).is_some()
            }
        }
    }

    /// Number of distinct instances; zero when not legal.
    #[must_use]
    pub fn n_actions(self, board: &Board) -> usize {
        if !self.legal(board) {
            return 0;
        }
        let active = board.active_player();
        let here = active.position();

        match self {
            ActionConstructor::Move => here.neighbors().len(),
            ActionConstructor::DirectFlight => active.hand().len(),
            ActionConstructor::CharterFlight => N_CITIES,
            ActionConstructor::ShuttleFlight => board.stations().len() - 1,
            ActionConstructor::OperationsExpertFlight => N_CITIES * active.hand().len(),
            ActionConstructor::Build => station_choices(board),
            ActionConstructor::Treat => board.colors_present(here).count(),
            ActionConstructor::Cure => 1,
            ActionConstructor::Give => {
                let others = board.colocated_players().count();
                if active.role() == Role::Researcher {
                    others * active.hand().len()
                } else {
                    others
                }
            }
            ActionConstructor::Take => board.colocated_players().map(|other| takeable(other, here)).sum(),
            ActionConstructor::DoNothing | ActionConstructor::QuietNight => 1,
            ActionConstructor::Airlift => board.player_count() * N_CITIES,
            ActionConstructor::GovernmentGrant => grant_targets(board) * station_choices(board),
        }
    }

    /// Draw one instance uniformly. `None` when the kind is not legal.
    pub fn random_action(self, board: &Board, rng: &mut GameRng) -> Option<Action> {
        if !self.legal(board) {
            return None;
        }
        let active = board.active_player();
        let here = active.position();

        let action = match self {
            ActionConstructor::Move => Action::Move { to: *rng.choose(here.neighbors())? },
            ActionConstructor::DirectFlight => Action::DirectFlight { to: *rng.choose(active.hand())? },
            ActionConstructor::CharterFlight => Action::CharterFlight { to: random_city(rng) },
            ActionConstructor::ShuttleFlight => {
                let others: Vec<CityId> = board.stations().iter().copied().filter(|&s| s != here).collect();
                Action::ShuttleFlight { to: *rng.choose(&others)? }
            }
            ActionConstructor::OperationsExpertFlight => Action::OperationsExpertFlight {
                to: random_city(rng),
                discard: *rng.choose(active.hand())?,
            },
            ActionConstructor::Build => Action::Build { remove_station: random_removal(board, rng) },
            ActionConstructor::Treat => {
                let colors: Vec<Color> = board.colors_present(here).collect();
                Action::Treat { color: *rng.choose(&colors)? }
            }
            ActionConstructor::Cure => Action::Cure { color: curable_color(board)? },
            ActionConstructor::Give | ActionConstructor::Take => {
                let all = self.all_actions(board);
                *rng.choose(&all)?
            }
            ActionConstructor::DoNothing => Action::DoNothing,
            ActionConstructor::Airlift => Action::Airlift {
                user: event_holder(board, EventCard::Airlift)?,
                target: PlayerId(rng.gen_index(board.player_count()) as u8),
                to: random_city(rng),
            },
            ActionConstructor::GovernmentGrant => {
                let targets: Vec<CityId> = CityId::all().filter(|&c| !board.has_station(c)).collect();
                Action::GovernmentGrant {
                    user: event_holder(board, EventCard::GovernmentGrant)?,
                    city: *rng.choose(&targets)?,
                    remove_station: random_removal(board, rng),
                }
            }
            ActionConstructor::QuietNight => Action::QuietNight {
                user: event_holder(board, EventCard::QuietNight)?,
            },
        };
        Some(action)
    }

    /// Every legal instance, in a stable order.
    #[must_use]
    pub fn all_actions(self, board: &Board) -> Vec<Action> {
        if !self.legal(board) {
            return Vec::new();
        }
        let active = board.active_player();
        let here = active.position();

        match self {
            ActionConstructor::Move => here.neighbors().iter().map(|&to| Action::Move { to }).collect(),
            ActionConstructor::DirectFlight => active.hand().iter().map(|&to| Action::DirectFlight { to }).collect(),
            ActionConstructor::CharterFlight => CityId::all().map(|to| Action::CharterFlight { to }).collect(),
            ActionConstructor::ShuttleFlight => board
                .stations()
                .iter()
                .filter(|&&s| s != here)
                .map(|&to| Action::ShuttleFlight { to })
                .collect(),
            ActionConstructor::OperationsExpertFlight => active
                .hand()
                .iter()
                .flat_map(|&discard| CityId::all().map(move |to| Action::OperationsExpertFlight { to, discard }))
                .collect(),
            ActionConstructor::Build => removal_options(board)
                .into_iter()
                .map(|remove_station| Action::Build { remove_station })
                .collect(),
            ActionConstructor::Treat => board.colors_present(here).map(|color| Action::Treat { color }).collect(),
            ActionConstructor::Cure => curable_color(board).map(|color| Action::Cure { color }).into_iter().collect(),
            ActionConstructor::Give => {
                let cards: Vec<CityId> = if active.role() == Role::Researcher {
                    active.hand().to_vec()
                } else {
                    vec![here]
                };
                board
                    .colocated_players()
                    .flat_map(|other| cards.iter().map(move |&card| Action::Give { to: other.id(), card }))
                    .collect()
            }
            ActionConstructor::Take => board
                .colocated_players()
                .flat_map(|other| {
                    let cards: Vec<CityId> = if other.role() == Role::Researcher {
                        other.hand().to_vec()
                    } else if other.has_city(here) {
                        vec![here]
                    } else {
                        Vec::new()
                    };
                    cards.into_iter().map(move |card| Action::Take { from: other.id(), card })
                })
                .collect(),
            ActionConstructor::DoNothing => vec![Action::DoNothing],
            ActionConstructor::Airlift => {
                let Some(user) = event_holder(board, EventCard::Airlift) else {
                    return Vec::new();
                };
                airlifts(board, user)
            }
            ActionConstructor::GovernmentGrant => {
                let Some(user) = event_holder(board, EventCard::GovernmentGrant) else {
                    return Vec::new();
                };
                grants(board, user)
            }
            ActionConstructor::QuietNight => event_holder(board, EventCard::QuietNight)
                .map(|user| Action::QuietNight { user })
                .into_iter()
                .collect(),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ActionConstructor::Move => "MOVE",
            ActionConstructor::DirectFlight => "DIRECTFLIGHT",
            ActionConstructor::CharterFlight => "CHARTERFLIGHT",
            ActionConstructor::ShuttleFlight => "SHUTTLEFLIGHT",
            ActionConstructor::OperationsExpertFlight => "OPERATIONSEXPERTFLIGHT",
            ActionConstructor::Build => "BUILD",
            ActionConstructor::Treat => "TREAT",
            ActionConstructor::Cure => "CURE",
            ActionConstructor::Give => "GIVE",
            ActionConstructor::Take => "TAKE",
            ActionConstructor::DoNothing => "DONOTHING",
            ActionConstructor::Airlift => "AIRLIFT",
            ActionConstructor::GovernmentGrant => "GOVERNMENTGRANT",
            ActionConstructor::QuietNight => "QUIETNIGHT",
        }
    }
}

impl fmt::Display for ActionConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Forced discard
// =============================================================================

/// Hand-limit resolution. Pre-empts every other constructor while any
/// player holds more than seven cards.
pub struct ForcedDiscard;

impl ForcedDiscard {
    #[must_use]
    pub fn legal(board: &Board) -> bool {
        board.over_limit_player().is_some()
    }

    /// Discards of each city card plus every use of the player's events.
    #[must_use]
    pub fn n_actions(board: &Board) -> usize {
        Self::all_actions(board).len()
    }

    #[must_use]
    pub fn all_actions(board: &Board) -> Vec<Action> {
        let Some(id) = board.over_limit_player() else {
            return Vec::new();
        };
        let Ok(player) = board.player(id) else {
            return Vec::new();
        };
        let mut out: Vec<Action> = player
            .hand()
            .iter()
            .map(|&card| Action::ForcedDiscard { player: id, card })
            .collect();
        for &event in player.events() {
            match event {
                EventCard::QuietNight => out.push(Action::QuietNight { user: id }),
                EventCard::GovernmentGrant => out.extend(grants(board, id)),
                EventCard::Airlift => out.extend(airlifts(board, id)),
            }
        }
        out
    }

    /// Uniform over every forced action.
    pub fn random_action(board: &Board, rng: &mut GameRng) -> Option<Action> {
        let all = Self::all_actions(board);
        rng.choose(&all).copied()
    }

    /// Pick one of the over-limit player's cards uniformly, then a way of
    /// getting rid of it: discard a city card, or play the event.
    pub fn random_action_bygroup(board: &Board, rng: &mut GameRng) -> Option<Action> {
        let id = board.over_limit_player()?;
        let player = board.player(id).ok()?;
        let pick = rng.gen_index(player.hand_size());
        if let Some(&card) = player.hand().get(pick) {
            return Some(Action::ForcedDiscard { player: id, card });
        }
        let event = player.events()[pick - player.hand().len()];
        match event {
            EventCard::QuietNight => Some(Action::QuietNight { user: id }),
            EventCard::GovernmentGrant => rng.choose(&grants(board, id)).copied(),
            EventCard::Airlift => rng.choose(&airlifts(board, id)).copied(),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn random_city(rng: &mut GameRng) -> CityId {
    CityId(rng.gen_index(N_CITIES) as u8)
}

/// First uncured color the active player can cure.
fn curable_color(board: &Board) -> Option<Color> {
    let active = board.active_player();
    Color::ALL.into_iter().find(|&c| !board.is_cured(c) && active.can_cure(c))
}

/// Cards the active player could take from `other` standing in `here`.
fn takeable(other: &Player, here: CityId) -> usize {
    if other.role() == Role::Researcher {
        other.hand().len()
    } else {
        usize::from(other.has_city(here))
    }
}

/// The first player holding `event`.
fn event_holder(board: &Board, event: EventCard) -> Option<PlayerId> {
    board.players().iter().find(|p| p.has_event(event)).map(Player::id)
}

/// Building somewhere new: one choice, or one per station when all are placed.
fn station_choices(board: &Board) -> usize {
    if board.stations().len() >= MAX_STATIONS {
        board.stations().len()
    } else {
        1
    }
}

fn removal_options(board: &Board) -> Vec<Option<CityId>> {
    if board.stations().len() >= MAX_STATIONS {
        board.stations().iter().copied().map(Some).collect()
    } else {
        vec![None]
    }
}

fn random_removal(board: &Board, rng: &mut GameRng) -> Option<CityId> {
    if board.stations().len() >= MAX_STATIONS {
        rng.choose(board.stations()).copied()
    } else {
        None
    }
}

fn grant_targets(board: &Board) -> usize {
    N_CITIES - board.stations().len()
}

fn grants(board: &Board, user: PlayerId) -> Vec<Action> {
    let removals = removal_options(board);
    CityId::all()
        .filter(|&city| !board.has_station(city))
        .flat_map(|city| {
            removals
                .iter()
                .map(move |&remove_station| Action::GovernmentGrant { user, city, remove_station })
        })
        .collect()
}

fn airlifts(board: &Board, user: PlayerId) -> Vec<Action> {
    CityId::all()
        .flat_map(|to| PlayerId::all(board.player_count()).map(move |target| Action::Airlift { user, target, to }))
        .collect()
}
