//! Card-deck mode: a shuffled prompt deck dealt one card at a time.
//!
//! Deck contents are deliberately ephemeral; nothing here is persisted, so a
//! reload always deals a fresh deck.

use rand::Rng;

use crate::pool::{PoolError, QuestionPool};
use crate::shuffle::shuffled;

/// A face-down shuffled deck with at most one face-up card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<String>,
    position: Option<usize>,
}

impl Deck {
    /// Deal a new deck from the pool's usable prompts.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Insufficient`] when the pool has no usable
    /// prompts.
    pub fn deal(pool: &QuestionPool, rng: &mut impl Rng) -> Result<Self, PoolError> {
        let usable: Vec<&str> = pool.usable().collect();
        if usable.is_empty() {
            return Err(PoolError::Insufficient {
                required: 1,
                available: 0,
            });
        }
        Ok(Self {
            cards: shuffled(&usable, rng)
                .into_iter()
                .map(ToString::to_string)
                .collect(),
            position: None,
        })
    }

    /// Turn over the next card, wrapping back to the top after the last one.
    pub fn draw(&mut self) -> Option<&str> {
        let next = match self.position {
            None => 0,
            Some(i) if i + 1 >= self.cards.len() => 0,
            Some(i) => i + 1,
        };
        self.position = Some(next);
        self.current()
    }

    /// The face-up card, if a card has been drawn.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.position
            .and_then(|i| self.cards.get(i))
            .map(String::as_str)
    }

    /// Put the deck back face-down without reshuffling.
    pub fn clear(&mut self) {
        self.position = None;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
