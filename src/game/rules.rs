//! `RulesEngine` implementation for the board.

use super::game::{board_reward, rollout};
use crate::actions::{self, Action, StochasticAction};
use crate::board::Board;
use crate::core::rng::GameRng;
use crate::rules::RulesEngine;

/// Pandemic rules as seen by the search.
#[derive(Clone, Copy, Debug, Default)]
pub struct PandemicRules {
    /// Run the consistency battery on every terminal check.
    pub sanity_check: bool,
}

impl PandemicRules {
    #[must_use]
    pub const fn new(sanity_check: bool) -> Self {
        Self { sanity_check }
    }
}

impl RulesEngine for PandemicRules {
    type State = Board;
    type Action = Action;
    type Chance = StochasticAction;

    fn legal_actions(&self, state: &Board) -> Vec<Action> {
        actions::list_actions(state)
    }

    fn apply_action(&self, state: &mut Board, action: &Action) {
        action.execute(state);
    }

    fn is_stochastic(&self, state: &Board) -> bool {
        actions::is_stochastic(state)
    }

    fn sample_chance(&self, state: &mut Board, rng: &mut GameRng) -> Option<StochasticAction> {
        match StochasticAction::sample(state, rng) {
            Ok(chance) => Some(chance),
            Err(err) => {
                state.mark_broken(format!("sampling a chance outcome failed: {err}"));
                None
            }
        }
    }

    fn apply_chance(&self, state: &mut Board, chance: &StochasticAction) {
        chance.execute(state);
    }

    fn is_terminal(&self, state: &mut Board) -> bool {
        if self.sanity_check {
            state.sanity_check();
        }
        state.is_terminal()
    }

    fn reward(&self, state: &mut Board) -> f64 {
        board_reward(state).map_or(0.0, f64::from)
    }

    fn rollout(&self, state: &mut Board, rng: &mut GameRng) {
        rollout(state, rng, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GameConfig;
    use crate::game::Game;

    #[test]
    fn test_chance_replay_is_deterministic() {
        let rules = PandemicRules::default();
        let game = Game::new(GameConfig::default().with_seed(6)).unwrap();
        let mut board = game.board_copy();
        let mut rng = GameRng::new(1);
        for _ in 0..4 {
            let action = rules.legal_actions(&board)[0];
            rules.apply_action(&mut board, &action);
        }
        assert!(rules.is_stochastic(&board));

        let mut a = board.clone();
        let mut outcomes = Vec::new();
        while rules.is_stochastic(&a) {
            let chance = rules.sample_chance(&mut a, &mut rng).unwrap();
            rules.apply_chance(&mut a, &chance);
            outcomes.push(chance);
        }
        let mut b = board.clone();
        for chance in &outcomes {
            rules.apply_chance(&mut b, chance);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_reward_of_broken_board_is_zero() {
        let rules = PandemicRules::new(true);
        let game = Game::new(GameConfig::default()).unwrap();
        let mut board = game.board_copy();
        board.mark_broken("test");
        assert!(rules.is_terminal(&mut board));
        assert_eq!(rules.reward(&mut board), 0.0);
    }
}
