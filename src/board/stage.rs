//! Turn structure.
//!
//! A turn is four player actions, two player-card draws, then as many
//! infection draws as the current infection rate. The counter carried by
//! each variant is how many steps of that phase are already done.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Player actions per turn.
pub const ACTIONS_PER_TURN: u8 = 4;

/// Player cards drawn per turn.
pub const PLAYER_DRAWS_PER_TURN: u8 = 2;

/// Infection cards drawn per turn, indexed by epidemics drawn so far.
pub const INFECTION_RATE: [u8; 7] = [2, 2, 2, 3, 3, 4, 4];

/// Infection rate after `epidemics` epidemics.
#[must_use]
pub fn infection_rate(epidemics: u8) -> u8 {
    INFECTION_RATE[usize::from(epidemics).min(INFECTION_RATE.len() - 1)]
}

/// Where the active player is within their turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnStage {
    /// Player actions taken so far (0-3).
    PlayerAction(u8),
    /// Player cards drawn so far (0-1).
    DrawPlayerCards(u8),
    /// Infection cards drawn so far.
    DrawInfectCards(u8),
}

impl Default for TurnStage {
    fn default() -> Self {
        TurnStage::PlayerAction(0)
    }
}

impl TurnStage {
    /// Legacy stage number: 0-3 player actions, 4 card draws, 5 infection.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            TurnStage::PlayerAction(n) => n,
            TurnStage::DrawPlayerCards(_) => ACTIONS_PER_TURN,
            TurnStage::DrawInfectCards(_) => ACTIONS_PER_TURN + 1,
        }
    }

    #[must_use]
    pub const fn is_player_action(self) -> bool {
        matches!(self, TurnStage::PlayerAction(_))
    }

    #[must_use]
    pub const fn is_infect_phase(self) -> bool {
        matches!(self, TurnStage::DrawInfectCards(_))
    }

    /// Stage after one player action. Other stages are unchanged.
    #[must_use]
    pub const fn after_player_action(self) -> Self {
        match self {
            TurnStage::PlayerAction(n) if n + 1 >= ACTIONS_PER_TURN => TurnStage::DrawPlayerCards(0),
            TurnStage::PlayerAction(n) => TurnStage::PlayerAction(n + 1),
            other => other,
        }
    }

    /// Stage after one player-card draw.
    #[must_use]
    pub const fn after_player_draw(self) -> Self {
        match self {
            TurnStage::DrawPlayerCards(n) if n + 1 >= PLAYER_DRAWS_PER_TURN => TurnStage::DrawInfectCards(0),
            TurnStage::DrawPlayerCards(n) => TurnStage::DrawPlayerCards(n + 1),
            other => other,
        }
    }

    /// Stage after one infection draw at the given rate; `None` means the
    /// turn is over.
    #[must_use]
    pub const fn after_infect_draw(self, rate: u8) -> Option<Self> {
        match self {
            TurnStage::DrawInfectCards(n) if n + 1 >= rate => None,
            TurnStage::DrawInfectCards(n) => Some(TurnStage::DrawInfectCards(n + 1)),
            other => Some(other),
        }
    }

    /// Whether the carried counter is in range for its phase.
    #[must_use]
    pub const fn is_consistent(self, rate: u8) -> bool {
        match self {
            TurnStage::PlayerAction(n) => n < ACTIONS_PER_TURN,
            TurnStage::DrawPlayerCards(n) => n < PLAYER_DRAWS_PER_TURN,
            TurnStage::DrawInfectCards(n) => n < rate,
        }
    }
}

impl fmt::Display for TurnStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnStage::PlayerAction(n) => write!(f, "action {}", n + 1),
            TurnStage::DrawPlayerCards(n) => write!(f, "player draw {}", n + 1),
            TurnStage::DrawInfectCards(n) => write!(f, "infect draw {}", n + 1),
        }
    }
}
