//! Error types.
//!
//! Game-rule losses are not errors; they are terminal outcomes. These types
//! cover invalid configuration and contract violations. Violations raised
//! while executing an action are latched onto the board's `broken` reasons
//! through their `Display` text rather than propagated.

use thiserror::Error;

use super::card::{EventCard, PlayerCard};
use super::map::CityId;
use super::player::{PlayerId, Role};

/// Invalid game or search configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("a game needs 2 to 4 players, got {0}")]
    PlayerCount(usize),

    #[error("role {0} appears more than once")]
    DuplicateRole(Role),

    #[error("difficulty must be between 1 and 6 epidemics, got {0}")]
    Difficulty(u8),

    #[error("invalid search config: {msg}")]
    InvalidSearch { msg: &'static str },
}

/// Contract violations and terminal-state misuse.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error("reward() requested on a non-terminal board")]
    NotTerminal,

    #[error("board is broken: {}", .0.join("; "))]
    Broken(Vec<String>),

    #[error("setup() called after initial setup()")]
    AlreadySetUp,

    #[error("{player} does not hold the {card} city card")]
    CardNotHeld { player: PlayerId, card: CityId },

    #[error("{player} does not hold the {} event card", .event.name())]
    EventNotHeld { player: PlayerId, event: EventCard },

    #[error("{0} is not in the deck")]
    CardNotInDeck(PlayerCard),

    #[error("infection card {0} is not in the expected chunk")]
    InfectCardMissing(CityId),

    #[error("the {0} deck is empty")]
    EmptyDeck(&'static str),

    #[error("illegal action: {0}")]
    IllegalAction(String),
}
