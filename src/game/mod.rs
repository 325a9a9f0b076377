//! The game facade, rollouts, heuristics and the search adapter.
//!
//! - `Game`: one live board plus its random stream and config
//! - `rollout`: random play to the end of the game
//! - `heuristics`: board evaluations usable by rollouts and the search
//! - `PandemicRules`: the board seen through [`crate::rules::RulesEngine`]

#[allow(clippy::module_inception)]
pub mod game;
pub mod heuristics;
pub mod rules;

pub use game::{board_reward, rollout, Game, MAX_ROLLOUT_STEPS};
pub use heuristics::{
    compound_loss_win, cure_goal, cure_goal_conditions, cure_goal_conditions_with_station, loss_proximity,
    pure_game_reward, Heuristic,
};
pub use rules::PandemicRules;
