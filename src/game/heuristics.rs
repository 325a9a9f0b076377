//! Board evaluation functions.
//!
//! Every heuristic has the same shape, [`Heuristic`], so the same function
//! can score the end of a rollout or stand in for one at a frontier node.
//! All of them return values in `[0, 1]`.

use crate::board::{Board, MAX_CUBES_PER_COLOR, MAX_OUTBREAKS};
use crate::core::map::{Color, N_COLORS};

/// A pure board evaluation.
pub type Heuristic = fn(&Board) -> f64;

/// 1 for a win, 0 otherwise.
#[must_use]
pub fn pure_game_reward(board: &Board) -> f64 {
    if board.won() {
        1.0
    } else {
        0.0
    }
}

/// Fraction of diseases cured.
#[must_use]
pub fn cure_goal(board: &Board) -> f64 {
    board.cured_count() as f64 / N_COLORS as f64
}

/// Best fraction of the required cure cards any player holds for `color`.
fn best_cure_fraction(board: &Board, color: Color) -> f64 {
    board
        .players()
        .iter()
        .map(|p| {
            let held = p.color_counts()[color.index()] as f64;
            (held / p.role().cure_cards_required() as f64).min(1.0)
        })
        .fold(0.0, f64::max)
}

/// 0.25 per cured disease, plus 0.2 times the best cure-card fraction for
/// each uncured one.
#[must_use]
pub fn cure_goal_conditions(board: &Board) -> f64 {
    Color::ALL
        .into_iter()
        .map(|color| {
            if board.is_cured(color) {
                0.25
            } else {
                0.2 * best_cure_fraction(board, color)
            }
        })
        .sum()
}

/// Like [`cure_goal_conditions`] with 0.15 per card fraction, plus a
/// bonus for an uncured disease whose cure is ready to play: 0.05 when a
/// player holding enough cards stands on a research station, 0.025 when
/// they are next to one.
#[must_use]
pub fn cure_goal_conditions_with_station(board: &Board) -> f64 {
    let mut value = 0.0;
    for color in Color::ALL {
        if board.is_cured(color) {
            value += 0.25;
            continue;
        }
        value += 0.15 * best_cure_fraction(board, color);

        let ready = board.players().iter().filter(|p| p.can_cure(color));
        let mut bonus: f64 = 0.0;
        for player in ready {
            let here = player.position();
            if board.has_station(here) {
                bonus = 0.05;
                break;
            }
            if here.neighbors().iter().any(|&n| board.has_station(n)) {
                bonus = bonus.max(0.025);
            }
        }
        value += bonus;
    }
    value
}

/// How close the board is to a loss, from outbreaks or cube supply.
#[must_use]
pub fn loss_proximity(board: &Board) -> f64 {
    let outbreaks = (0.5 * (f64::from(board.outbreak_count()) - f64::from(MAX_OUTBREAKS + 1))).exp();
    let limit = f64::from(MAX_CUBES_PER_COLOR + 1);
    let cubes = Color::ALL
        .into_iter()
        .map(|c| (4.0 * (f64::from(board.total_cubes(c)) - limit) / limit).exp())
        .fold(0.0, f64::max);
    outbreaks.max(cubes).min(1.0)
}

/// Progress toward a win, discounted by how close a loss is.
#[must_use]
pub fn compound_loss_win(board: &Board) -> f64 {
    cure_goal_conditions_with_station(board) * (1.0 - loss_proximity(board))
}
