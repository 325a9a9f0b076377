//! Board state and the rules that act on it directly.
//!
//! ## Key Types
//!
//! - `Board`: cubes, stations, players, decks, counters and terminal flags
//! - `TurnStage`: where the active player is within their turn
//! - `InfectionReport`: outbreaks caused and blocked by one infection
//!
//! ## Mutation
//!
//! Boards change only through actions (see [`crate::actions`]) and through
//! infection resolution. Whether an action is legal is never decided here;
//! that belongs to the action constructors.
//!
//! ## Terminal flags
//!
//! `won` and `lost` are game outcomes. `broken` marks a consistency
//! failure or a misuse of the API; it is latched until [`Board::clear`].

pub mod infection;
pub mod sanity;
pub mod stage;
pub mod state;

pub use infection::InfectionReport;
pub use stage::{infection_rate, TurnStage, ACTIONS_PER_TURN, INFECTION_RATE, PLAYER_DRAWS_PER_TURN};
pub use state::{Board, MAX_CUBES_PER_CITY, MAX_CUBES_PER_COLOR, MAX_OUTBREAKS, MAX_STATIONS};
