//! Rules engine abstraction.
//!
//! The search in [`crate::mcts`] is written against `RulesEngine` and never
//! touches game types directly. [`crate::game::PandemicRules`] is the
//! implementation for the board in this crate.

pub mod engine;

pub use engine::{GameResult, RulesEngine};
