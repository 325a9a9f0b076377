//! Actions, their constructors and action sampling.
//!
//! ## Key Types
//!
//! - `Action`: a player or event-card transition, applied with `execute(&mut Board)`
//! - `ActionConstructor`: legality, counting, sampling and enumeration per kind
//! - `ForcedDiscard`: hand-limit resolution, checked before anything else
//! - `StochasticAction`: card draws, sampled by peeking and committed on execute
//!
//! ## Sampling modes
//!
//! [`random_action_uniform`] is uniform over every legal action: it draws a
//! single index below the global count and walks the constructors in
//! [`ActionConstructor::ALL`] order. [`random_action_bygroup`] first picks a
//! legal constructor uniformly, then an action within it, which favors
//! kinds with few instances.

pub mod action;
pub mod constructor;
pub mod stochastic;

pub use action::Action;
pub use constructor::{ActionConstructor, ForcedDiscard};
pub use stochastic::{is_stochastic, resolve_nonplayer, StochasticAction};

use crate::board::Board;
use crate::core::rng::GameRng;

/// Every legal action. A pending forced discard replaces the whole list.
#[must_use]
pub fn list_actions(board: &Board) -> Vec<Action> {
    if ForcedDiscard::legal(board) {
        return ForcedDiscard::all_actions(board);
    }
    ActionConstructor::ALL
        .iter()
        .flat_map(|con| con.all_actions(board))
        .collect()
}

/// Length of [`list_actions`] without building it.
#[must_use]
pub fn n_available_actions(board: &Board) -> usize {
    if ForcedDiscard::legal(board) {
        return ForcedDiscard::n_actions(board);
    }
    ActionConstructor::ALL.iter().map(|con| con.n_actions(board)).sum()
}

/// Uniform draw over every legal action.
pub fn random_action_uniform(board: &Board, rng: &mut GameRng) -> Option<Action> {
    if ForcedDiscard::legal(board) {
        return ForcedDiscard::random_action(board, rng);
    }
    let total = n_available_actions(board);
    if total == 0 {
        return None;
    }
    let mut index = rng.gen_index(total);
    for con in ActionConstructor::ALL {
        let n = con.n_actions(board);
        if index < n {
            return con.random_action(board, rng);
        }
        index -= n;
    }
    None
}

/// Uniform over legal constructors, then uniform within the chosen one.
pub fn random_action_bygroup(board: &Board, rng: &mut GameRng) -> Option<Action> {
    if ForcedDiscard::legal(board) {
        return ForcedDiscard::random_action_bygroup(board, rng);
    }
    let legal: Vec<ActionConstructor> = ActionConstructor::ALL
        .into_iter()
        .filter(|con| con.legal(board))
        .collect();
    let con = *rng.choose(&legal)?;
    con.random_action(board, rng)
}
