//! The infection deck.
//!
//! Modelled as a stack of chunks. Each chunk is an unordered set of cards
//! whose internal order is unknown; drawing from the top takes a uniform
//! card from the top chunk, drawing from the bottom takes one from the
//! bottom chunk. An epidemic puts the discard pile back on top as a brand
//! new chunk, so recently seen cards come back before anything else.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::error::GameError;
use crate::core::map::CityId;
use crate::core::rng::GameRng;

/// Which end of the deck a draw comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckEnd {
    Top,
    Bottom,
}

/// Infection deck: a stack of chunks plus a discard pile.
///
/// `chunks[0]` is the bottom of the deck, the last chunk is the top.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfectDeck {
    chunks: Vec<Vector<CityId>>,
    discard: Vector<CityId>,
}

impl Default for InfectDeck {
    fn default() -> Self {
        Self::new()
    }
}

impl InfectDeck {
    /// All 48 city cards in a single chunk, empty discard.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunks: vec![CityId::all().collect()],
            discard: Vector::new(),
        }
    }

    fn chunk_index(&self, end: DeckEnd) -> Option<usize> {
        match end {
            _ if self.chunks.is_empty() => None,
            DeckEnd::Top => Some(self.chunks.len() - 1),
            DeckEnd::Bottom => Some(0),
        }
    }

    /// Sample the card a draw from `end` would yield, without drawing it.
    pub fn peek(&self, end: DeckEnd, rng: &mut GameRng) -> Option<CityId> {
        let chunk = &self.chunks[self.chunk_index(end)?];
        if chunk.is_empty() {
            return None;
        }
        chunk.get(rng.gen_index(chunk.len())).copied()
    }

    /// Commit a draw of `card` from `end`: remove it from that end's chunk
    /// (dropping the chunk if it empties) and discard it.
    pub fn update(&mut self, card: CityId, end: DeckEnd) -> Result<(), GameError> {
        let ci = self.chunk_index(end).ok_or(GameError::EmptyDeck("infection"))?;
        let chunk = &mut self.chunks[ci];
        let idx = chunk.index_of(&card).ok_or(GameError::InfectCardMissing(card))?;
        chunk.remove(idx);
        if chunk.is_empty() {
            self.chunks.remove(ci);
        }
        self.discard.push_back(card);
        Ok(())
    }

    /// Peek and commit in one step.
    pub fn draw(&mut self, end: DeckEnd, rng: &mut GameRng) -> Result<CityId, GameError> {
        let card = self.peek(end, rng).ok_or(GameError::EmptyDeck("infection"))?;
        self.update(card, end)?;
        Ok(card)
    }

    /// Put the discard pile on top of the deck as a new chunk.
    pub fn readd_discard(&mut self) {
        if self.discard.is_empty() {
            return;
        }
        let pile = std::mem::take(&mut self.discard);
        self.chunks.push(pile);
    }

    /// Cards left in the deck.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.iter().map(Vector::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of chunks in the stack.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Size of the chunk at `end`.
    #[must_use]
    pub fn chunk_len(&self, end: DeckEnd) -> usize {
        self.chunk_index(end).map_or(0, |i| self.chunks[i].len())
    }

    #[must_use]
    pub fn discard(&self) -> &Vector<CityId> {
        &self.discard
    }
}
