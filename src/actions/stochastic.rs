//! Non-player transitions: player-card draws, epidemics and infection draws.
//!
//! Sampling only peeks at the decks. The draw is committed when the
//! resulting action executes, so a sampled outcome can be stored and
//! replayed on any copy of the board it was sampled from.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::constructor::ForcedDiscard;
use crate::board::{Board, TurnStage};
use crate::core::card::PlayerCard;
use crate::core::error::GameError;
use crate::core::map::CityId;
use crate::core::rng::GameRng;
use crate::decks::DeckEnd;

/// One sampled chance outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StochasticAction {
    /// A city or event card goes to the active player's hand.
    PlayerCardDraw { card: PlayerCard },
    /// An epidemic, with the card drawn from the bottom of the infection deck.
    EpidemicDraw { epidemic: u8, infect_card: CityId },
    /// One infection card from the top of the infection deck.
    InfectDraw { card: CityId },
}

/// Whether the board is waiting on a chance transition.
///
/// False on terminal boards and while a forced discard is pending.
#[must_use]
pub fn is_stochastic(board: &Board) -> bool {
    if board.is_over() || ForcedDiscard::legal(board) {
        return false;
    }
    match board.stage() {
        TurnStage::PlayerAction(_) => false,
        stage => stage.is_consistent(board.infection_rate()),
    }
}

/// Resolve chance transitions until a player decision is needed, the game
/// ends, or a forced discard interrupts. Returns the actions applied.
pub fn resolve_nonplayer(board: &mut Board, rng: &mut GameRng) -> Vec<StochasticAction> {
    let mut applied = Vec::new();
    while is_stochastic(board) {
        match StochasticAction::sample(board, rng) {
            Ok(action) => {
                action.execute(board);
                applied.push(action);
            }
            Err(err) => {
                board.mark_broken(format!("sampling a chance outcome failed: {err}"));
                break;
            }
        }
    }
    applied
}

impl StochasticAction {
    /// Peek at the decks for the next chance outcome.
    pub fn sample(board: &Board, rng: &mut GameRng) -> Result<Self, GameError> {
        match board.stage() {
            TurnStage::DrawPlayerCards(_) => {
                let card = board.player_deck().peek(rng).ok_or(GameError::EmptyDeck("player"))?;
                match card {
                    PlayerCard::Epidemic(epidemic) => {
                        let infect_card = board
                            .infect_deck()
                            .peek(DeckEnd::Bottom, rng)
                            .ok_or(GameError::EmptyDeck("infection"))?;
                        Ok(StochasticAction::EpidemicDraw { epidemic, infect_card })
                    }
                    card => Ok(StochasticAction::PlayerCardDraw { card }),
                }
            }
            TurnStage::DrawInfectCards(_) => {
                let card = board
                    .infect_deck()
                    .peek(DeckEnd::Top, rng)
                    .ok_or(GameError::EmptyDeck("infection"))?;
                Ok(StochasticAction::InfectDraw { card })
            }
            stage => Err(GameError::IllegalAction(format!("no chance transition during {stage}"))),
        }
    }

    /// Apply the outcome and refresh status. Failures latch `broken`.
    pub fn execute(&self, board: &mut Board) {
        log::trace!("{self}");
        if let Err(err) = self.apply(board) {
            board.mark_broken(format!("{} failed: {err}", self.kind()));
        }
        board.update_status();
    }

    pub fn apply(&self, board: &mut Board) -> Result<(), GameError> {
        match *self {
            StochasticAction::PlayerCardDraw { card } => {
                expect_player_draw(board)?;
                board.update_player_deck(card)?;
                board.active_player_mut().add_card(card)?;
                board.set_stage(board.stage().after_player_draw());
            }
            StochasticAction::EpidemicDraw { epidemic, infect_card } => {
                expect_player_draw(board)?;
                board.update_infect_deck(infect_card, DeckEnd::Bottom)?;
                board.update_player_deck(PlayerCard::Epidemic(epidemic))?;
                let color = infect_card.color();
                if !board.is_eradicated(color) {
                    board.infect(infect_card, color, 3);
                }
                board.readd_infect_discard();
                board.set_stage(board.stage().after_player_draw());
            }
            StochasticAction::InfectDraw { card } => {
                if !board.stage().is_infect_phase() {
                    return Err(GameError::IllegalAction(format!(
                        "infection draw during {}",
                        board.stage()
                    )));
                }
                if board.quiet_night() {
                    board.set_quiet_night(false);
                    board.end_turn();
                    return Ok(());
                }
                board.update_infect_deck(card, DeckEnd::Top)?;
                let color = card.color();
                if !board.is_eradicated(color) {
                    board.infect(card, color, 1);
                }
                match board.stage().after_infect_draw(board.infection_rate()) {
                    Some(stage) => board.set_stage(stage),
                    None => board.end_turn(),
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            StochasticAction::PlayerCardDraw { .. } => "PLAYERDRAW",
            StochasticAction::EpidemicDraw { .. } => "PLAYERDRAW: EPIDEMIC",
            StochasticAction::InfectDraw { .. } => "INFECTDRAW",
        }
    }
}

fn expect_player_draw(board: &Board) -> Result<(), GameError> {
    match board.stage() {
        TurnStage::DrawPlayerCards(_) => Ok(()),
        stage => Err(GameError::IllegalAction(format!("player card draw during {stage}"))),
    }
}

impl fmt::Display for StochasticAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StochasticAction::PlayerCardDraw { card } => write!(f, "{} drew {card}", self.kind()),
            StochasticAction::EpidemicDraw { infect_card, .. } => {
                write!(f, "{} (drew {infect_card} from the bottom of the infection deck)", self.kind())
            }
            StochasticAction::InfectDraw { card } => write!(f, "{} infected {card}", self.kind()),
        }
    }
}
