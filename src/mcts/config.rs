//! MCTS configuration parameters.

use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;

/// How the final decision is taken at the root once the budget is spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RootPolicy {
    /// Highest UCB1 score among the root's children.
    Ucb,
    /// Highest achievable average reward, pulled up from converged
    /// descendants (max over decisions, visit-weighted mean over chance).
    MaxChild,
}

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MCTSConfig {
    /// Simulations (selection walk + evaluation + backprop) per decision.
    pub simulations: u32,

    /// Determinizations kept per chance node (K).
    /// K = 1 replays a single sampled outcome on every visit.
    pub determinizations: usize,

    /// Multiplier inside the UCB1 square root (default: 2.0).
    /// Higher values favor exploration over exploitation.
    pub exploration: f64,

    /// Final action selection at the root.
    pub root_policy: RootPolicy,

    /// Visits after which a node counts as converged for `MaxChild`.
    pub convergence_visits: u32,

    /// Run the consistency battery on every node's state.
    pub sanity_check: bool,

    /// Seed for determinization sampling and rollouts.
    /// Same seed produces deterministic searches.
    pub seed: u64,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            simulations: 1000,
            determinizations: 1,
            exploration: 2.0,
            root_policy: RootPolicy::Ucb,
            convergence_visits: 100,
            sanity_check: false,
            seed: 42,
        }
    }
}

impl MCTSConfig {
    /// A small budget for tests and quick experiments.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            simulations: 200,
            ..Self::default()
        }
    }

    /// Many simulations over three determinizations, max-child selection.
    #[must_use]
    pub fn strong() -> Self {
        Self {
            simulations: 50_000,
            determinizations: 3,
            root_policy: RootPolicy::MaxChild,
            convergence_visits: 500,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_simulations(mut self, simulations: u32) -> Self {
        self.simulations = simulations;
        self
    }

    #[must_use]
    pub fn with_determinizations(mut self, k: usize) -> Self {
        self.determinizations = k;
        self
    }

    #[must_use]
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    #[must_use]
    pub fn with_root_policy(mut self, policy: RootPolicy) -> Self {
        self.root_policy = policy;
        self
    }

    #[must_use]
    pub fn with_convergence_visits(mut self, visits: u32) -> Self {
        self.convergence_visits = visits;
        self
    }

    #[must_use]
    pub fn with_sanity_check(mut self, enabled: bool) -> Self {
        self.sanity_check = enabled;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulations == 0 {
            return Err(ConfigError::InvalidSearch { msg: "simulations must be positive" });
        }
        if self.determinizations == 0 {
            return Err(ConfigError::InvalidSearch { msg: "at least one determinization is required" });
        }
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(ConfigError::InvalidSearch { msg: "exploration must be finite and non-negative" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MCTSConfig::default();
        assert_eq!(config.exploration, 2.0);
        assert_eq!(config.determinizations, 1);
        assert_eq!(config.root_policy, RootPolicy::Ucb);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MCTSConfig::fast()
            .with_determinizations(5)
            .with_root_policy(RootPolicy::MaxChild)
            .with_seed(123);

        assert_eq!(config.simulations, 200);
        assert_eq!(config.determinizations, 5);
        assert_eq!(config.root_policy, RootPolicy::MaxChild);
        assert_eq!(config.seed, 123);
    }

    #[test]
    fn test_validate() {
        assert!(MCTSConfig::default().with_determinizations(0).validate().is_err());
        assert!(MCTSConfig::default().with_simulations(0).validate().is_err());
        assert!(MCTSConfig::default().with_exploration(f64::NAN).validate().is_err());
        assert!(MCTSConfig::strong().validate().is_ok());
    }

    #[test]
    fn test_serialization() {
        let config = MCTSConfig::strong();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: MCTSConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
