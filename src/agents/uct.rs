//! UCT agent: a fresh K-determinized search for every decision.

use super::Agent;
use crate::actions::Action;
use crate::core::error::ConfigError;
use crate::game::{Game, Heuristic, PandemicRules};
use crate::mcts::{HeuristicEvaluation, MCTSConfig, MCTSSearch, RandomRollout, RootPolicy};

/// How the search values a frontier board.
#[derive(Clone, Copy, Debug)]
pub enum Evaluation {
    /// Random rollout to the end, scored by the heuristic if given and by
    /// the win/loss reward otherwise.
    Rollout(Option<Heuristic>),
    /// The heuristic applied to the frontier board itself.
    Heuristic(Heuristic),
}

/// Runs one search per decision and plays the action it returns.
#[derive(Clone, Debug)]
pub struct UctAgent {
    name: String,
    config: MCTSConfig,
    evaluation: Evaluation,

    decisions: u32,
    searched: u32,
    depth_sum: u64,
    depth_max: u16,
    reward_sum: f64,
    confidence_sum: f64,
    visit_excess_sum: f64,
}

impl UctAgent {
    pub fn new(config: MCTSConfig, evaluation: Evaluation) -> Result<Self, ConfigError> {
        config.validate()?;
        let name = format!(
            "{}Sample{}UCTAgent",
            config.determinizations,
            match config.root_policy {
                RootPolicy::Ucb => "",
                RootPolicy::MaxChild => "MaxChild",
            }
        );
        Ok(Self {
            name,
            config,
            evaluation,
            decisions: 0,
            searched: 0,
            depth_sum: 0,
            depth_max: 0,
            reward_sum: 0.0,
            confidence_sum: 0.0,
            visit_excess_sum: 0.0,
        })
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub const fn config(&self) -> &MCTSConfig {
        &self.config
    }

    fn search(&self, game: &mut Game) -> MCTSSearch<PandemicRules> {
        let rules = PandemicRules::new(self.config.sanity_check);
        let rng = game.rng_mut().fork();
        let search = MCTSSearch::new(rules, self.config.clone()).with_rng(rng);
        match self.evaluation {
            Evaluation::Rollout(heuristic) => search.with_simulation(RandomRollout::new(heuristic)),
            Evaluation::Heuristic(heuristic) => search.with_simulation(HeuristicEvaluation::new(heuristic)),
        }
    }
}

impl Agent for UctAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_action(&mut self, game: &mut Game) -> Option<Action> {
        game.nonplayer_actions(false);
        if game.is_terminal(false, false) {
            return None;
        }

        let mut search = self.search(game);
        let action = search.search(game.board());
        self.decisions += 1;

        let stats = search.stats();
        if let (Some(chosen), Some(excess)) = (stats.chosen, stats.visit_excess()) {
            self.searched += 1;
            self.depth_sum += u64::from(stats.max_depth);
            self.depth_max = self.depth_max.max(stats.max_depth);
            self.reward_sum += chosen.reward;
            self.confidence_sum += chosen.confidence;
            self.visit_excess_sum += excess;
        }
        action
    }

    /// Averages are over decisions that ran a search. Decisions with a
    /// single legal action are counted but not searched.
    fn measurements(&self) -> Vec<(String, f64)> {
        let n = f64::from(self.searched.max(1));
        vec![
            ("decisions".to_string(), f64::from(self.decisions)),
            ("average_depth".to_string(), self.depth_sum as f64 / n),
            ("max_depth".to_string(), f64::from(self.depth_max)),
            ("average_reward".to_string(), self.reward_sum / n),
            ("average_confidence".to_string(), self.confidence_sum / n),
            ("average_visit_excess".to_string(), self.visit_excess_sum / n),
        ]
    }

    fn reset(&mut self) {
        self.decisions = 0;
        self.searched = 0;
        self.depth_sum = 0;
        self.depth_max = 0;
        self.reward_sum = 0.0;
        self.confidence_sum = 0.0;
        self.visit_excess_sum = 0.0;
    }
}
