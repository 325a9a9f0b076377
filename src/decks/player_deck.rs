//! The player deck and its epidemic chunk model.
//!
//! The physical game splits the deck into `difficulty` piles, shuffles one
//! epidemic into each, and stacks them. Rather than materializing a shuffled
//! array, the deck tracks which non-epidemic cards remain and how many cards
//! have been drawn since setup. The draw position identifies the current
//! chunk; if that chunk's epidemic is still pending it is drawn with
//! probability `1 / cards left in the chunk`, otherwise a remaining
//! non-epidemic card is drawn uniformly.
//!
//! Chunk sizes are fixed at [`PlayerDeck::setup_shuffle`]. With `n` cards
//! left and `d` epidemics, `(n + d) % d` chunks are "fat" (one card larger)
//! and they come first.
//!
//! Drawing is split into [`PlayerDeck::peek`], which samples a card without
//! touching the deck, and [`PlayerDeck::update`], which commits it. Search
//! code samples an outcome for one tree path and applies it later on a
//! board copy.

use im::Vector;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::core::card::{PlayerCard, FIRST_EPIDEMIC_INDEX};
use crate::core::error::GameError;
use crate::core::rng::GameRng;

/// Player deck with analytically modelled epidemic placement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDeck {
    remaining: Vector<PlayerCard>,
    difficulty: u8,
    epidemics_drawn: u8,
    /// Cards drawn since `setup_shuffle` (setup deals excluded).
    total_drawn: usize,
    chunk_size: usize,
    fat_chunk_size: usize,
    /// Number of fat chunks.
    remainder: usize,
}

impl PlayerDeck {
    /// A fresh deck of 48 city cards and 3 events, epidemics not yet placed.
    #[must_use]
    pub fn new(difficulty: u8) -> Self {
        Self {
            remaining: (0..FIRST_EPIDEMIC_INDEX).map(PlayerCard::from_index).collect(),
            difficulty,
            epidemics_drawn: 0,
            total_drawn: 0,
            chunk_size: 0,
            fat_chunk_size: 0,
            remainder: 0,
        }
    }

    /// Deal one card during setup: uniform over non-epidemics, not counted
    /// toward chunk positions.
    pub fn deal(&mut self, rng: &mut GameRng) -> Option<PlayerCard> {
        if self.remaining.is_empty() {
            return None;
        }
        let idx = rng.gen_index(self.remaining.len());
        Some(self.remaining.remove(idx))
    }

    /// Fix chunk sizes for the cards left after the setup deal.
    pub fn setup_shuffle(&mut self) {
        let d = usize::from(self.difficulty.max(1));
        let total = self.remaining.len() + d;
        self.remainder = total % d;
        if self.remainder == 0 {
            self.fat_chunk_size = total / d;
            self.chunk_size = self.fat_chunk_size;
        } else {
            self.fat_chunk_size = total / d + 1;
            self.chunk_size = self.fat_chunk_size - 1;
        }
    }

    /// Draw position range covered by `chunk`.
    #[must_use]
    pub fn chunk_bounds(&self, chunk: usize) -> Range<usize> {
        let size = |c: usize| if c < self.remainder { self.fat_chunk_size } else { self.chunk_size };
        let start: usize = (0..chunk).map(size).sum();
        start..start + size(chunk)
    }

    /// The chunk the next draw comes from, if any remain.
    #[must_use]
    pub fn current_chunk(&self) -> Option<usize> {
        (0..usize::from(self.difficulty)).find(|&c| self.chunk_bounds(c).contains(&self.total_drawn))
    }

    /// Sample the next card without modifying the deck.
    pub fn peek(&self, rng: &mut GameRng) -> Option<PlayerCard> {
        let chunk = self.current_chunk()?;
        let bounds = self.chunk_bounds(chunk);
        let epidemic_pending = usize::from(self.epidemics_drawn) <= chunk;
        if epidemic_pending && rng.one_in(bounds.end - self.total_drawn) {
            return Some(PlayerCard::Epidemic(self.epidemics_drawn));
        }
        if self.remaining.is_empty() {
            // Only the pending epidemic is left in this chunk.
            return epidemic_pending.then_some(PlayerCard::Epidemic(self.epidemics_drawn));
        }
        self.remaining.get(rng.gen_index(self.remaining.len())).copied()
    }

    /// Commit a card previously returned by [`peek`](Self::peek).
    pub fn update(&mut self, card: PlayerCard) -> Result<(), GameError> {
        match card {
            PlayerCard::Epidemic(n) => {
                if n != self.epidemics_drawn || self.epidemics_drawn >= self.difficulty {
                    return Err(GameError::CardNotInDeck(card));
                }
                self.epidemics_drawn += 1;
            }
            _ => {
                let idx = self
                    .remaining
                    .index_of(&card)
                    .ok_or(GameError::CardNotInDeck(card))?;
                self.remaining.remove(idx);
            }
        }
        self.total_drawn += 1;
        Ok(())
    }

    /// Peek and commit in one step.
    pub fn draw(&mut self, rng: &mut GameRng) -> Result<PlayerCard, GameError> {
        let card = self.peek(rng).ok_or(GameError::EmptyDeck("player"))?;
        self.update(card)?;
        Ok(card)
    }

    /// Cards left to draw, epidemics included.
    #[must_use]
    pub fn remaining_cards(&self) -> usize {
        self.remaining.len() + usize::from(self.difficulty - self.epidemics_drawn.min(self.difficulty))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining_cards() == 0
    }

    #[must_use]
    pub fn contains(&self, card: PlayerCard) -> bool {
        match card {
            PlayerCard::Epidemic(n) => n >= self.epidemics_drawn && n < self.difficulty,
            _ => self.remaining.contains(&card),
        }
    }

    /// Non-epidemic cards still in the deck.
    pub fn remaining_nonepidemic(&self) -> impl Iterator<Item = &PlayerCard> {
        self.remaining.iter()
    }

    #[must_use]
    pub const fn epidemics_drawn(&self) -> u8 {
        self.epidemics_drawn
    }

    #[must_use]
    pub const fn difficulty(&self) -> u8 {
        self.difficulty
    }

    #[must_use]
    pub const fn total_drawn(&self) -> usize {
        self.total_drawn
    }

    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    #[must_use]
    pub const fn fat_chunk_size(&self) -> usize {
        self.fat_chunk_size
    }

    /// Number of fat chunks.
    #[must_use]
    pub const fn fat_chunks(&self) -> usize {
        self.remainder
    }
}
