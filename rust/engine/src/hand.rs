//! Hands and blackjack valuation over quantum cards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::quantum::{CardId, CardStore, QuantumCard};

pub const BLACKJACK: u16 = 21;

/// Which participant a hand (or card) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Owner {
    Player,
    Dealer,
}

impl Owner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Owner::Player => "player",
            Owner::Dealer => "dealer",
        }
    }
}

/// Achievable hand total, `[min, max]`. Bounds above 21 are kept so that
/// `min > 21` reads as a guaranteed bust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: u16,
    pub max: u16,
    /// At least one card in the hand is still superposed.
    pub uncertain: bool,
}

impl ValueRange {
    pub const EMPTY: ValueRange = ValueRange {
        min: 0,
        max: 0,
        uncertain: false,
    };

    pub fn is_bust(&self) -> bool {
        self.min > BLACKJACK
    }

    pub fn is_single(&self) -> bool {
        self.min == self.max
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{} (uncertain)", self.min, self.max)
        }
    }
}

/// Sums per-card ranges and softens aces on each bound independently.
///
/// Known approximation: min and max are softened separately rather than by
/// enumerating every joint face/ace assignment, so with several uncertain
/// aces the reported range can differ from the truly achievable one.
pub fn value_range<'a, I>(cards: I) -> ValueRange
where
    I: IntoIterator<Item = &'a QuantumCard>,
{
    let mut min = 0u16;
    let mut max = 0u16;
    let mut aces = 0u16;
    let mut uncertain = false;

    for card in cards {
        let (lo, hi) = card.value_range();
        min += lo;
        max += hi;
        if card.is_ace_eligible() {
            aces += 1;
        }
        uncertain |= card.is_superposed();
    }

    ValueRange {
        min: soften(min, aces),
        max: soften(max, aces),
        uncertain,
    }
}

fn soften(mut total: u16, mut aces: u16) -> u16 {
    while total > BLACKJACK && aces > 0 {
        total -= 10; // ace counted as 1 instead of 11
        aces -= 1;
    }
    total
}

/// Ordered cards held by one participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hand {
    owner: Owner,
    cards: Vec<CardId>,
}

impl Hand {
    pub fn new(owner: Owner) -> Self {
        Self {
            owner,
            cards: Vec::new(),
        }
    }

    pub fn owner(&self) -> Owner {
        self.owner
    }

    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn add_card(&mut self, id: CardId) {
        self.cards.push(id);
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn value_range(&self, store: &CardStore) -> ValueRange {
        value_range(self.cards.iter().filter_map(|&id| store.get(id)))
    }

    /// Two collapsed cards totalling 21. Superposed hands never count.
    pub fn is_natural(&self, store: &CardStore) -> bool {
        let range = self.value_range(store);
        self.cards.len() == 2 && !range.uncertain && range.min == BLACKJACK
    }
}
