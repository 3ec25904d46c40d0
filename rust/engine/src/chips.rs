//! Consumable quantum chips gating superpose / collapse / entangle.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{GameError, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipKind {
    Superpose,
    Collapse,
    Entangle,
}

impl ChipKind {
    pub const ALL: [ChipKind; 3] = [ChipKind::Superpose, ChipKind::Collapse, ChipKind::Entangle];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChipKind::Superpose => "superpose",
            ChipKind::Collapse => "collapse",
            ChipKind::Entangle => "entangle",
        }
    }
}

impl fmt::Display for ChipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bankroll price of one chip of each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipPrices {
    pub superpose: u32,
    pub collapse: u32,
    pub entangle: u32,
}

impl Default for ChipPrices {
    fn default() -> Self {
        Self {
            superpose: 50,
            collapse: 25,
            entangle: 75,
        }
    }
}

impl ChipPrices {
    pub fn price(&self, kind: ChipKind) -> u32 {
        match kind {
            ChipKind::Superpose => self.superpose,
            ChipKind::Collapse => self.collapse,
            ChipKind::Entangle => self.entangle,
        }
    }
}

/// Chip counts owned by the player for the whole session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChipInventory {
    counts: BTreeMap<ChipKind, u32>,
}

impl ChipInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_counts(superpose: u32, collapse: u32, entangle: u32) -> Self {
        let mut inv = Self::new();
        inv.add(ChipKind::Superpose, superpose);
        inv.add(ChipKind::Collapse, collapse);
        inv.add(ChipKind::Entangle, entangle);
        inv
    }

    pub fn count(&self, kind: ChipKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn has(&self, kind: ChipKind) -> bool {
        self.count(kind) > 0
    }

    pub fn add(&mut self, kind: ChipKind, n: u32) {
        let c = self.counts.entry(kind).or_insert(0);
        *c = c.saturating_add(n);
    }

    /// Spends one chip.
    pub fn use_chip(&mut self, kind: ChipKind) -> Result<(), GameError> {
        match self.counts.get_mut(&kind) {
            Some(c) if *c > 0 => {
                *c -= 1;
                Ok(())
            }
            _ => Err(GameError::InsufficientResource(Resource::Chip(kind))),
        }
    }

    /// Buys one chip out of `bankroll`.
    pub fn purchase(
        &mut self,
        kind: ChipKind,
        bankroll: &mut u32,
        prices: &ChipPrices,
    ) -> Result<(), GameError> {
        let price = prices.price(kind);
        if *bankroll < price {
            return Err(GameError::InsufficientResource(Resource::Bankroll {
                needed: price,
                available: *bankroll,
            }));
        }
        *bankroll -= price;
        self.add(kind, 1);
        Ok(())
    }
}
