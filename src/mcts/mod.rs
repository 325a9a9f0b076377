//! Monte Carlo Tree Search over a K-determinized game tree.
//!
//! ## Overview
//!
//! - **UCT**: children scored with UCB1, `mean + sqrt(c * ln(N) / n)`
//! - **K-determinization**: each chance node samples at most K resolutions
//!   of its card draws and replays them afterwards, so statistics gathered
//!   under one resolution are revisited instead of re-randomized
//! - **Pluggable evaluation**: random rollouts (optionally scored by a
//!   heuristic) or direct heuristic evaluation of the frontier
//! - **Root policies**: UCB-best child or max-child over converged subtrees
//!
//! ## Usage
//!
//! ```rust
//! use pandemic_search::core::config::GameConfig;
//! use pandemic_search::game::{Game, PandemicRules};
//! use pandemic_search::mcts::{MCTSConfig, MCTSSearch};
//!
//! let mut game = Game::new(GameConfig::default()).unwrap();
//! game.nonplayer_actions(false);
//!
//! let config = MCTSConfig::fast().with_simulations(50);
//! let mut search = MCTSSearch::new(PandemicRules::default(), config);
//! if let Some(action) = search.search(game.board()) {
//!     game.apply_action(&action);
//! }
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

pub use config::{MCTSConfig, RootPolicy};
pub use node::{Determinization, MCTSNode, NodeId, NodeKind};
pub use policy::{max_avg_reward, HeuristicEvaluation, RandomRollout, SelectionPolicy, SimulationPolicy, UCB1};
pub use search::MCTSSearch;
pub use stats::{RootChoice, SearchStats};
pub use tree::{MCTSTree, TreeStats};
