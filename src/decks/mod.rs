//! Card decks.
//!
//! Both decks are cheap-to-clone value types (`im::Vector` storage) so a
//! board copy inside search shares structure with its parent until it
//! draws. Both expose a sampling `peek` separated from a committing
//! `update`, which is how stochastic actions are sampled on one board and
//! replayed on another.

pub mod infect_deck;
pub mod player_deck;

pub use infect_deck::{DeckEnd, InfectDeck};
pub use player_deck::PlayerDeck;
