//! Game configuration.
//!
//! A game is configured by its roles (seat order is the order given),
//! the number of epidemics shuffled into the player deck, and the seed
//! of the game's random stream.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::player::Role;

/// Largest supported difficulty; the infection-rate track has seven steps.
pub const MAX_DIFFICULTY: u8 = 6;

/// Configuration for one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Roles in seat order (2-4 players).
    pub roles: Vec<Role>,

    /// Epidemic cards in the player deck.
    pub difficulty: u8,

    /// Seed for setup deals, draws and random action selection.
    pub seed: u64,

    /// Run the full consistency battery on every terminal check.
    pub sanity_check: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            roles: vec![Role::QuarantineSpecialist, Role::Scientist, Role::Researcher],
            difficulty: 4,
            seed: 0,
            sanity_check: false,
        }
    }
}

impl GameConfig {
    /// Create a configuration for the given roles and difficulty.
    pub fn new(roles: impl Into<Vec<Role>>, difficulty: u8) -> Self {
        Self {
            roles: roles.into(),
            difficulty,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub fn with_sanity_check(mut self, enabled: bool) -> Self {
        self.sanity_check = enabled;
        self
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.roles.len()
    }

    /// Check player count, role uniqueness and difficulty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=4).contains(&self.roles.len()) {
            return Err(ConfigError::PlayerCount(self.roles.len()));
        }
        let mut seen = FxHashSet::default();
        for &role in &self.roles {
            if !seen.insert(role) {
                return Err(ConfigError::DuplicateRole(role));
            }
        }
        if !(1..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(ConfigError::Difficulty(self.difficulty));
        }
        Ok(())
    }
}
