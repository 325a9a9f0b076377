//! Random baseline agents.

use super::Agent;
use crate::actions::Action;
use crate::game::Game;

/// Uniform over every legal action, sampled without listing them.
#[derive(Clone, Debug, Default)]
pub struct UniformRandomAgent;

impl UniformRandomAgent {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Agent for UniformRandomAgent {
    fn name(&self) -> &str {
        "UniformRandomAgent"
    }

    fn generate_action(&mut self, game: &mut Game) -> Option<Action> {
        game.nonplayer_actions(false);
        game.random_action_uniform(false)
    }
}

/// Picks a legal action kind uniformly, then an action of that kind.
#[derive(Clone, Debug, Default)]
pub struct ByGroupRandomAgent;

impl ByGroupRandomAgent {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Agent for ByGroupRandomAgent {
    fn name(&self) -> &str {
        "ByGroupRandomAgent"
    }

    fn generate_action(&mut self, game: &mut Game) -> Option<Action> {
        game.nonplayer_actions(false);
        game.random_action_bygroup(false)
    }
}

/// Lists every legal action and picks one uniformly. Same distribution as
/// [`UniformRandomAgent`], at the cost of the full enumeration.
#[derive(Clone, Debug, Default)]
pub struct ListActionRandomAgent;

impl ListActionRandomAgent {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Agent for ListActionRandomAgent {
    fn name(&self) -> &str {
        "ListActionRandomAgent"
    }

    fn generate_action(&mut self, game: &mut Game) -> Option<Action> {
        let actions = game.list_actions(false);
        game.rng_mut().choose(&actions).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::play_game;
    use crate::core::config::GameConfig;

    fn finishes(agent: &mut dyn Agent, seed: u64) {
        let mut game = Game::new(GameConfig::default().with_seed(seed).with_sanity_check(true)).unwrap();
        let reward = play_game(&mut game, agent, 5_000);
        assert!(matches!(reward, Ok(0) | Ok(1)), "{:?}", game.terminal_reasons());
        assert!(!game.board().broken());
    }

    #[test]
    fn test_uniform_agent_finishes() {
        finishes(&mut UniformRandomAgent::new(), 1);
    }

    #[test]
    fn test_bygroup_agent_finishes() {
        finishes(&mut ByGroupRandomAgent::new(), 2);
    }

    #[test]
    fn test_list_agent_picks_listed_action() {
        let mut game = Game::new(GameConfig::default().with_seed(3)).unwrap();
        let listed = game.list_actions(false);
        let chosen = ListActionRandomAgent::new().generate_action(&mut game).unwrap();
        assert!(listed.contains(&chosen));
        finishes(&mut ListActionRandomAgent::new(), 3);
    }
}
