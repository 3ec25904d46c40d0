use serde::{Deserialize, Serialize};

use crate::chips::ChipKind;
use crate::quantum::CardId;

/// Inbound intents a presentation layer can submit to the engine.
/// Dispatched by [`crate::engine::Engine::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    /// Stake an amount and deal a new round
    PlaceBet(u32),
    /// Take one more card
    Hit,
    /// End the player turn; collapses the player's superposed cards
    Stand,
    /// Spend a superpose or collapse chip on a card
    UseChip { kind: ChipKind, card: CardId },
    /// Spend an entangle chip linking two superposed cards
    Entangle { a: CardId, b: CardId },
    /// Buy one chip out of the bankroll
    BuyChip(ChipKind),
    /// Leave a finished round and return to idle
    NewRound,
}

impl PlayerAction {
    pub fn name(&self) -> &'static str {
        match self {
            PlayerAction::PlaceBet(_) => "place bet",
            PlayerAction::Hit => "hit",
            PlayerAction::Stand => "stand",
            PlayerAction::UseChip { .. } => "use chip",
            PlayerAction::Entangle { .. } => "entangle",
            PlayerAction::BuyChip(_) => "buy chip",
            PlayerAction::NewRound => "start new round",
        }
    }
}
