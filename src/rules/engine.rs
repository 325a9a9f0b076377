//! Rules engine trait the search is generic over.
//!
//! An engine answers, for an opaque state:
//! - which player actions are legal
//! - how actions and chance outcomes modify the state
//! - whether the state needs a chance transition before anyone can act
//! - whether the game is over, and what it was worth
//!
//! The search never inspects the state itself. It clones it, hands it to
//! the engine, and keeps the actions and chance outcomes the engine gives
//! back so it can replay them.

use std::fmt;

use crate::core::rng::GameRng;

/// Outcome of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameResult {
    /// All diseases cured.
    Won,
    /// A loss condition was reached.
    Lost,
    /// An internal consistency check failed; the state is unusable.
    Broken,
}

impl GameResult {
    /// Reward for a valid outcome. `Broken` has none.
    #[must_use]
    pub const fn reward(self) -> Option<u8> {
        match self {
            GameResult::Won => Some(1),
            GameResult::Lost => Some(0),
            GameResult::Broken => None,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameResult::Won => "won",
            GameResult::Lost => "lost",
            GameResult::Broken => "broken",
        })
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `apply_action` and `apply_chance` must be deterministic: replaying the
///   same sequence on equal states must produce equal states.
/// - All randomness goes through `sample_chance` and `rollout`, which take
///   the caller's generator.
/// - `is_terminal` takes `&mut` so implementations may latch consistency
///   failures into the state.
pub trait RulesEngine {
    /// Full game state. Cloned once per simulation.
    type State: Clone;
    /// A player decision.
    type Action: Clone + fmt::Debug + fmt::Display;
    /// A sampled chance outcome (a card draw).
    type Chance: Clone + fmt::Debug;

    /// Every legal player action, in a stable order.
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Apply a player action.
    fn apply_action(&self, state: &mut Self::State, action: &Self::Action);

    /// Whether a chance outcome must be resolved before the next decision.
    fn is_stochastic(&self, state: &Self::State) -> bool;

    /// Sample the next chance outcome without applying it.
    ///
    /// `None` means no outcome could be sampled; implementations latch
    /// that into the state so that `is_terminal` reports it.
    fn sample_chance(&self, state: &mut Self::State, rng: &mut GameRng) -> Option<Self::Chance>;

    /// Apply a previously sampled chance outcome.
    fn apply_chance(&self, state: &mut Self::State, chance: &Self::Chance);

    /// Check whether the game is over.
    fn is_terminal(&self, state: &mut Self::State) -> bool;

    /// Reward of a terminal state in `[0, 1]`.
    fn reward(&self, state: &mut Self::State) -> f64;

    /// Play random moves and chance outcomes until the game ends.
    fn rollout(&self, state: &mut Self::State, rng: &mut GameRng);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_result_reward() {
        assert_eq!(GameResult::Won.reward(), Some(1));
        assert_eq!(GameResult::Lost.reward(), Some(0));
        assert_eq!(GameResult::Broken.reward(), None);
        assert_eq!(GameResult::Lost.to_string(), "lost");
    }
}
