//! Quantum cards: two candidate faces, superposition, entanglement and
//! collapse.
//!
//! Cards live in a [`CardStore`] arena and are addressed by [`CardId`].
//! Entanglement is a symmetric relation kept in the store rather than a
//! pointer held by each card, so a collapse clears both directions with a
//! single update.
//!
//! ```
//! use qjack_engine::cards::{Card, Rank, Suit};
//! use qjack_engine::quantum::CardStore;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(7);
//! let mut store = CardStore::new();
//! let id = store
//!     .insert(Card::new(Rank::Six, Suit::Diamonds), Card::new(Rank::Nine, Suit::Clubs))
//!     .unwrap();
//!
//! store.superpose(id).unwrap();
//! let outcome = store.collapse(id, &mut rng).unwrap();
//! assert!(outcome.face.rank == Rank::Six || outcome.face.rank == Rank::Nine);
//! ```

use std::collections::HashMap;
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::{GameError, Ineligibility};

/// Handle for a card in a [`CardStore`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Complex probability amplitude.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amplitude {
    pub re: f64,
    pub im: f64,
}

impl Amplitude {
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// |a|², the probability weight of the face this amplitude belongs to.
    pub fn norm_sqr(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }
}

/// Mode of a quantum card. Amplitudes only exist while superposed; the
/// resolved face only while collapsed.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CardMode {
    Collapsed { face: Card },
    Superposed { amplitude_a: Amplitude, amplitude_b: Amplitude },
}

/// A card holding two distinct candidate faces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantumCard {
    id: CardId,
    face_a: Card,
    face_b: Card,
    mode: CardMode,
}

impl QuantumCard {
    /// New card, collapsed to `face_a`.
    pub fn new(id: CardId, face_a: Card, face_b: Card) -> Result<Self, GameError> {
        if face_a == face_b {
            return Err(Ineligibility::IdenticalFaces.into());
        }
        Ok(Self {
            id,
            face_a,
            face_b,
            mode: CardMode::Collapsed { face: face_a },
        })
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn faces(&self) -> (Card, Card) {
        (self.face_a, self.face_b)
    }

    pub fn mode(&self) -> CardMode {
        self.mode
    }

    pub fn is_superposed(&self) -> bool {
        matches!(self.mode, CardMode::Superposed { .. })
    }

    /// The resolved face; `None` while superposed.
    pub fn resolved_face(&self) -> Option<Card> {
        match self.mode {
            CardMode::Collapsed { face } => Some(face),
            CardMode::Superposed { .. } => None,
        }
    }

    /// Probability of collapsing to `face_a`; `None` while collapsed.
    pub fn probability_a(&self) -> Option<f64> {
        match self.mode {
            CardMode::Superposed { amplitude_a, .. } => Some(amplitude_a.norm_sqr()),
            CardMode::Collapsed { .. } => None,
        }
    }

    /// Enters an equal-weight superposition of both candidates.
    ///
    /// Entanglement is not visible from here; [`CardStore::superpose`]
    /// checks it first.
    pub fn superpose(&mut self) -> Result<(), Ineligibility> {
        if self.is_superposed() {
            return Err(Ineligibility::AlreadySuperposed);
        }
        self.mode = CardMode::Superposed {
            amplitude_a: Amplitude::new(FRAC_1_SQRT_2, 0.0),
            amplitude_b: Amplitude::new(FRAC_1_SQRT_2, 0.0),
        };
        Ok(())
    }

    /// Measures the card. A forced face must be one of the candidates;
    /// otherwise one draw picks `face_a` with probability |amplitude_a|².
    pub fn collapse<R: Rng + ?Sized>(
        &mut self,
        forced: Option<Card>,
        rng: &mut R,
    ) -> Result<Card, Ineligibility> {
        let CardMode::Superposed { amplitude_a, .. } = self.mode else {
            return Err(Ineligibility::NotSuperposed);
        };
        let face = match forced {
            Some(f) if f == self.face_a || f == self.face_b => f,
            Some(_) => return Err(Ineligibility::ForeignFace),
            None => {
                if rng.random::<f64>() < amplitude_a.norm_sqr() {
                    self.face_a
                } else {
                    self.face_b
                }
            }
        };
        self.mode = CardMode::Collapsed { face };
        Ok(face)
    }

    /// Own best/worst blackjack value, ignoring amplitudes.
    pub fn value_range(&self) -> (u16, u16) {
        match self.mode {
            CardMode::Collapsed { face } => {
                let v = face.blackjack_value();
                (v, v)
            }
            CardMode::Superposed { .. } => {
                let a = self.face_a.blackjack_value();
                let b = self.face_b.blackjack_value();
                (a.min(b), a.max(b))
            }
        }
    }

    /// Whether an ace takes part in this card's value: the resolved face
    /// when collapsed, either candidate when superposed.
    pub fn is_ace_eligible(&self) -> bool {
        match self.mode {
            CardMode::Collapsed { face } => face.is_ace(),
            CardMode::Superposed { .. } => self.face_a.is_ace() || self.face_b.is_ace(),
        }
    }
}

/// Symmetric entanglement relation between card ids.
#[derive(Debug, Default, Clone)]
pub struct Entanglements {
    partners: HashMap<CardId, CardId>,
}

impl Entanglements {
    pub fn partner(&self, id: CardId) -> Option<CardId> {
        self.partners.get(&id).copied()
    }

    pub fn link(&mut self, a: CardId, b: CardId) {
        self.partners.insert(a, b);
        self.partners.insert(b, a);
    }

    /// Drops the link on both sides and returns the former partner.
    pub fn unlink(&mut self, id: CardId) -> Option<CardId> {
        let partner = self.partners.remove(&id)?;
        self.partners.remove(&partner);
        Some(partner)
    }

    pub fn len(&self) -> usize {
        self.partners.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }

    pub fn clear(&mut self) {
        self.partners.clear();
    }
}

/// The partner side of a collapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartnerCollapse {
    pub card: CardId,
    pub face: Card,
    /// False when the partner had no candidate of the required color and
    /// fell back to an ordinary draw.
    pub color_matched: bool,
}

/// Result of [`CardStore::collapse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollapseOutcome {
    pub card: CardId,
    pub face: Card,
    pub partner: Option<PartnerCollapse>,
}

/// Arena of the quantum cards on the table plus their entanglement links.
#[derive(Debug, Default)]
pub struct CardStore {
    cards: Vec<QuantumCard>,
    links: Entanglements,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, face_a: Card, face_b: Card) -> Result<CardId, GameError> {
        let id = CardId(self.cards.len() as u32);
        self.cards.push(QuantumCard::new(id, face_a, face_b)?);
        Ok(id)
    }

    pub fn get(&self, id: CardId) -> Option<&QuantumCard> {
        self.cards.get(id.0 as usize)
    }

    fn get_mut(&mut self, id: CardId) -> Result<&mut QuantumCard, Ineligibility> {
        self.cards
            .get_mut(id.0 as usize)
            .ok_or(Ineligibility::UnknownCard)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuantumCard> {
        self.cards.iter()
    }

    pub fn partner(&self, id: CardId) -> Option<CardId> {
        self.links.partner(id)
    }

    pub fn entanglements(&self) -> &Entanglements {
        &self.links
    }

    /// Removes every card and link; ids restart from zero.
    pub fn clear(&mut self) {
        self.cards.clear();
        self.links.clear();
    }

    pub fn superpose(&mut self, id: CardId) -> Result<(), GameError> {
        if self.links.partner(id).is_some() {
            return Err(Ineligibility::AlreadyEntangled.into());
        }
        self.get_mut(id)?.superpose()?;
        tracing::debug!(card = %id, "card superposed");
        Ok(())
    }

    pub fn entangle(&mut self, a: CardId, b: CardId) -> Result<(), GameError> {
        if a == b {
            return Err(Ineligibility::SameCard.into());
        }
        let first = self.get(a).ok_or(Ineligibility::UnknownCard)?;
        let second = self.get(b).ok_or(Ineligibility::UnknownCard)?;
        if !first.is_superposed() {
            return Err(Ineligibility::NotSuperposed.into());
        }
        if !second.is_superposed() {
            return Err(Ineligibility::PartnerNotSuperposed.into());
        }
        if self.links.partner(a).is_some() || self.links.partner(b).is_some() {
            return Err(Ineligibility::AlreadyEntangled.into());
        }
        self.links.link(a, b);
        tracing::debug!(a = %a, b = %b, "cards entangled");
        Ok(())
    }

    /// Collapses `id` by a random draw, then force-collapses a still
    /// superposed partner to its candidate sharing the resolved color
    /// (`face_a` preferred). The partner never propagates further.
    pub fn collapse<R: Rng + ?Sized>(
        &mut self,
        id: CardId,
        rng: &mut R,
    ) -> Result<CollapseOutcome, GameError> {
        let face = self.get_mut(id)?.collapse(None, rng)?;
        let partner = self.links.unlink(id);
        tracing::debug!(card = %id, face = %face, "card collapsed");

        let mut outcome = CollapseOutcome {
            card: id,
            face,
            partner: None,
        };
        let Some(pid) = partner else {
            return Ok(outcome);
        };
        let color = face.color();
        let partner_card = self.get_mut(pid)?;
        if !partner_card.is_superposed() {
            return Ok(outcome);
        }
        let (pa, pb) = partner_card.faces();
        let target = if pa.color() == color {
            Some(pa)
        } else if pb.color() == color {
            Some(pb)
        } else {
            None
        };
        let partner_face = partner_card.collapse(target, rng)?;
        if target.is_none() {
            tracing::warn!(
                card = %pid,
                wanted = ?color,
                face = %partner_face,
                "entangled partner has no candidate of the measured color"
            );
        }
        outcome.partner = Some(PartnerCollapse {
            card: pid,
            face: partner_face,
            color_matched: target.is_some(),
        });
        Ok(outcome)
    }
}
