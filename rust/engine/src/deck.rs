use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

/// Ordered supply of card faces. Every quantum card takes two of them.
#[derive(Debug)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
    rng: ChaCha20Rng,
    reshuffles: u32,
}

impl Deck {
    pub fn new_with_seed(seed: u64) -> Self {
        let rng = ChaCha20Rng::seed_from_u64(seed);
        // Keep initial order until shuffle is called explicitly
        Self {
            cards: full_deck(),
            position: 0,
            rng,
            reshuffles: 0,
        }
    }

    /// Deck that deals `faces` in the given order before falling back to
    /// shuffled 52-face decks.
    pub fn stacked(faces: Vec<Card>, seed: u64) -> Self {
        Self {
            cards: faces,
            position: 0,
            rng: ChaCha20Rng::seed_from_u64(seed),
            reshuffles: 0,
        }
    }

    /// Fisher-Yates shuffle of a fresh 52-face deck.
    pub fn shuffle(&mut self) {
        self.cards = full_deck();
        self.cards.shuffle(&mut self.rng);
        self.position = 0;
    }

    pub fn try_draw(&mut self) -> Result<Card, GameError> {
        let c = self
            .cards
            .get(self.position)
            .copied()
            .ok_or(GameError::DeckExhausted)?;
        self.position += 1;
        Ok(c)
    }

    /// Removes and returns the top face, reshuffling when exhausted.
    pub fn draw(&mut self) -> Card {
        loop {
            match self.try_draw() {
                Ok(c) => return c,
                Err(_) => {
                    tracing::warn!(
                        reshuffles = self.reshuffles + 1,
                        "deck exhausted, reshuffling"
                    );
                    self.reshuffles += 1;
                    self.shuffle();
                }
            }
        }
    }

    /// Draws the two candidate faces for one quantum card. A face equal to
    /// the first is discarded and drawn again.
    pub fn draw_pair(&mut self) -> (Card, Card) {
        let a = self.draw();
        let mut b = self.draw();
        while b == a {
            tracing::debug!(face = %a, "identical candidate drawn, redrawing");
            b = self.draw();
        }
        (a, b)
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }

    pub fn reshuffles(&self) -> u32 {
        self.reshuffles
    }
}
