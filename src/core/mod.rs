//! Core types: map, cards, players and roles, RNG, configuration, errors.
//!
//! Everything here is static data or small value types shared by the
//! board, the action layer and the search.

pub mod card;
pub mod config;
pub mod error;
pub mod map;
pub mod player;
pub mod rng;

pub use card::{EventCard, PlayerCard, FIRST_EPIDEMIC_INDEX};
pub use config::{GameConfig, MAX_DIFFICULTY};
pub use error::{ConfigError, GameError};
pub use map::{City, CityId, Color, ATLANTA, CITIES, N_CITIES, N_COLORS};
pub use player::{Player, PlayerId, Role, HAND_LIMIT};
pub use rng::{GameRng, GameRngState};
