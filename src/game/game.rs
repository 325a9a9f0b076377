//! The game facade: one live board, its random stream and its config.
//!
//! Agents and experiment drivers talk to the game through this type. It
//! resolves non-player phases, lists and samples player actions, applies
//! them, and reports terminal status and reward.

use std::fmt;

use log::Level;

use super::heuristics::{pure_game_reward, Heuristic};
use crate::actions::{self, Action, StochasticAction};
use crate::board::Board;
use crate::core::config::GameConfig;
use crate::core::error::{ConfigError, GameError};
use crate::core::rng::GameRng;
use crate::rules::GameResult;

/// Steps after which a rollout is abandoned as broken. A game cannot last
/// this long: the player deck runs out first.
pub const MAX_ROLLOUT_STEPS: usize = 10_000;

fn log_at(verbose: bool, args: fmt::Arguments<'_>) {
    let level = if verbose { Level::Info } else { Level::Debug };
    log::log!(level, "{args}");
}

/// Reward of a finished board: 1 won, 0 lost.
///
/// Asking for the reward of a board that is still in play, or one that
/// is only broken, is a contract violation. The error is returned and the
/// board is latched broken, so a search that ignores the error still sees
/// a terminal state.
pub fn board_reward(board: &mut Board) -> Result<u8, GameError> {
    board.update_status();
    if let Some(reward) = board.outcome().and_then(GameResult::reward) {
        return Ok(reward);
    }
    let err = if board.broken() {
        GameError::Broken(board.broken_reasons().to_vec())
    } else {
        GameError::NotTerminal
    };
    board.mark_broken(err.to_string());
    Err(err)
}

/// Play uniformly random actions and chance outcomes to the end of the game.
///
/// Returns `heuristic` evaluated on the final board, or the win/loss reward
/// when none is given.
pub fn rollout(board: &mut Board, rng: &mut GameRng, heuristic: Option<Heuristic>) -> f64 {
    let mut steps = 0;
    loop {
        actions::resolve_nonplayer(board, rng);
        if board.is_terminal() {
            break;
        }
        if steps >= MAX_ROLLOUT_STEPS {
            board.mark_broken(format!("rollout did not finish within {MAX_ROLLOUT_STEPS} steps"));
            break;
        }
        match actions::random_action_uniform(board, rng) {
            Some(action) => action.execute(board),
            None => {
                board.mark_broken("rollout found no legal action");
                break;
            }
        }
        steps += 1;
    }
    heuristic.unwrap_or(pure_game_reward)(board)
}

/// A live game.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    rng: GameRng,
    config: GameConfig,
}

impl Game {
    /// Validate the config, build the board and set it up.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = GameRng::new(config.seed);
        let mut board = Board::from_config(&config);
        if let Err(err) = board.setup(&mut rng) {
            board.mark_broken(format!("setup failed: {err}"));
        }
        Ok(Self { board, rng, config })
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// An independent copy of the live board.
    #[must_use]
    pub fn board_copy(&self) -> Board {
        self.board.clone()
    }

    /// Swap in another board, such as a prepared scenario.
    pub fn reset_board(&mut self, board: Board) {
        self.board = board;
    }

    /// Clear the board and deal a new game from the continuing random stream.
    pub fn reset(&mut self) {
        self.board.clear();
        if let Err(err) = self.board.setup(&mut self.rng) {
            self.board.mark_broken(format!("setup failed: {err}"));
        }
    }

    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Whether the game is over. With `sanity_check` (or the config's
    /// `sanity_check`) every consistency check runs first and any failure
    /// breaks the board.
    pub fn is_terminal(&mut self, sanity_check: bool, verbose: bool) -> bool {
        if sanity_check || self.config.sanity_check {
            self.board.sanity_check();
        }
        let terminal = self.board.is_terminal();
        if terminal && verbose {
            log::info!(
                "game over ({}): {}",
                self.board.outcome().map_or_else(|| "?".to_string(), |o| o.to_string()),
                self.board.terminal_reasons().join("; ")
            );
        }
        terminal
    }

    /// 1 for a win, 0 for a loss. See [`board_reward`].
    pub fn reward(&mut self) -> Result<u8, GameError> {
        board_reward(&mut self.board)
    }

    #[must_use]
    pub fn terminal_reasons(&self) -> Vec<String> {
        self.board.terminal_reasons()
    }

    #[must_use]
    pub fn is_stochastic(&self) -> bool {
        actions::is_stochastic(&self.board)
    }

    /// Resolve the pending non-player phase, if any.
    pub fn nonplayer_actions(&mut self, verbose: bool) -> Vec<StochasticAction> {
        let applied = actions::resolve_nonplayer(&mut self.board, &mut self.rng);
        for action in &applied {
            log_at(verbose, format_args!("{action}"));
        }
        applied
    }

    /// Every legal action, after resolving any pending non-player phase.
    pub fn list_actions(&mut self, verbose: bool) -> Vec<Action> {
        self.nonplayer_actions(verbose);
        let list = actions::list_actions(&self.board);
        log_at(verbose, format_args!("{} legal actions", list.len()));
        list
    }

    #[must_use]
    pub fn n_available_actions(&self) -> usize {
        actions::n_available_actions(&self.board)
    }

    /// A uniformly random legal action. `None` breaks the board.
    pub fn random_action_uniform(&mut self, verbose: bool) -> Option<Action> {
        let action = actions::random_action_uniform(&self.board, &mut self.rng);
        self.check_sampled(action, verbose)
    }

    /// A random action from a uniformly chosen legal kind. `None` breaks
    /// the board.
    pub fn random_action_bygroup(&mut self, verbose: bool) -> Option<Action> {
        let action = actions::random_action_bygroup(&self.board, &mut self.rng);
        self.check_sampled(action, verbose)
    }

    fn check_sampled(&mut self, action: Option<Action>, verbose: bool) -> Option<Action> {
        match action {
            Some(action) => log_at(verbose, format_args!("sampled {action}")),
            None => self
                .board
                .mark_broken(format!("no legal action to sample at {}", self.board.stage())),
        }
        action
    }

    /// Apply a player action to the live board.
    pub fn apply_action(&mut self, action: &Action) {
        log::debug!("{} plays {action}", self.board.turn());
        action.execute(&mut self.board);
    }

    /// Random rollout of `board` using the game's random stream.
    pub fn rollout(&mut self, board: &mut Board, heuristic: Option<Heuristic>) -> f64 {
        rollout(board, &mut self.rng, heuristic)
    }
}
