//! Agents that play a [`Game`] and the loop that drives them.
//!
//! - `UniformRandomAgent`, `ByGroupRandomAgent`, `ListActionRandomAgent`:
//!   baselines built on the facade's samplers
//! - `UctAgent`: one K-determinized search per decision

pub mod random;
pub mod uct;

pub use random::{ByGroupRandomAgent, ListActionRandomAgent, UniformRandomAgent};
pub use uct::{Evaluation, UctAgent};

use crate::actions::Action;
use crate::core::error::GameError;
use crate::game::Game;

/// Something that picks actions for the current player.
pub trait Agent {
    /// Name used in logs and measurement output.
    fn name(&self) -> &str;

    /// Choose an action for the current player without applying it.
    fn generate_action(&mut self, game: &mut Game) -> Option<Action>;

    /// Choose an action and apply it. An agent that cannot choose breaks
    /// the board.
    fn take_step(&mut self, game: &mut Game) {
        match self.generate_action(game) {
            Some(action) => {
                log::debug!("[{}] {}: {action}", self.name(), game.board().turn());
                game.apply_action(&action);
            }
            None => {
                if !game.board().broken() {
                    let reason = format!("{} produced no action", self.name());
                    game.board_mut().mark_broken(reason);
                }
            }
        }
    }

    /// Named numbers collected since the last reset.
    fn measurements(&self) -> Vec<(String, f64)> {
        Vec::new()
    }

    /// Forget everything collected about previous games.
    fn reset(&mut self) {}
}

/// Play `game` to the end with `agent` making every player decision.
///
/// Games that need more than `max_steps` decisions are broken off and
/// reported as broken.
pub fn play_game(game: &mut Game, agent: &mut dyn Agent, max_steps: usize) -> Result<u8, GameError> {
    let mut steps = 0;
    loop {
        game.nonplayer_actions(false);
        if game.is_terminal(false, false) {
            break;
        }
        if steps >= max_steps {
            game.board_mut()
                .mark_broken(format!("{} did not finish within {max_steps} steps", agent.name()));
            break;
        }
        agent.take_step(game);
        steps += 1;
    }
    game.is_terminal(false, true);
    log::debug!("{} finished after {steps} steps", agent.name());
    game.reward()
}
