use serde::Serialize;
use thiserror::Error;

use crate::chips::ChipKind;
use crate::engine::RoundState;

/// Why a quantum operation was refused for the selected card(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ineligibility {
    AlreadySuperposed,
    AlreadyEntangled,
    NotSuperposed,
    PartnerNotSuperposed,
    SameCard,
    UnknownCard,
    HiddenCard,
    IdenticalFaces,
    ForeignFace,
    NeedsTwoCards,
}

impl Ineligibility {
    pub fn describe(self) -> &'static str {
        match self {
            Ineligibility::AlreadySuperposed => "card is already in superposition",
            Ineligibility::AlreadyEntangled => "card is already entangled",
            Ineligibility::NotSuperposed => "card is not in superposition",
            Ineligibility::PartnerNotSuperposed => "other card is not in superposition",
            Ineligibility::SameCard => "a card cannot be entangled with itself",
            Ineligibility::UnknownCard => "no such card on the table",
            Ineligibility::HiddenCard => "card is face down",
            Ineligibility::IdenticalFaces => "candidate faces must differ",
            Ineligibility::ForeignFace => "forced face is not one of the card's candidates",
            Ineligibility::NeedsTwoCards => "entangling takes two selected cards",
        }
    }
}

/// Resource that ran short for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Chip(ChipKind),
    Bankroll { needed: u32, available: u32 },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cannot {action} while round is {state}")]
    InvalidStateTransition {
        action: &'static str,
        state: RoundState,
    },
    #[error("Insufficient {}", describe_resource(.0))]
    InsufficientResource(Resource),
    #[error("Ineligible card operation: {}", .0.describe())]
    IneligibleCardOperation(Ineligibility),
    #[error("Deck exhausted")]
    DeckExhausted,
    #[error("Another action is still in flight")]
    ActionInFlight,
    #[error("Invalid bet amount: {amount}")]
    InvalidBetAmount { amount: u32 },
}

fn describe_resource(resource: &Resource) -> String {
    match resource {
        Resource::Chip(kind) => format!("{} chips", kind.as_str()),
        Resource::Bankroll { needed, available } => {
            format!("bankroll: need {}, have {}", needed, available)
        }
    }
}

impl GameError {
    /// Stable reason code for presentation layers.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::InvalidStateTransition { .. } => "invalid_state_transition",
            GameError::InsufficientResource(_) => "insufficient_resource",
            GameError::IneligibleCardOperation(_) => "ineligible_card_operation",
            GameError::DeckExhausted => "deck_exhausted",
            GameError::ActionInFlight => "action_in_flight",
            GameError::InvalidBetAmount { .. } => "invalid_bet_amount",
        }
    }
}

impl From<Ineligibility> for GameError {
    fn from(reason: Ineligibility) -> Self {
        GameError::IneligibleCardOperation(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_human_readable() {
        let e = GameError::InvalidStateTransition {
            action: "hit",
            state: RoundState::DealerTurn,
        };
        assert_eq!(e.to_string(), "Cannot hit while round is dealer_turn");
        assert_eq!(e.code(), "invalid_state_transition");

        let e = GameError::InsufficientResource(Resource::Chip(ChipKind::Entangle));
        assert_eq!(e.to_string(), "Insufficient entangle chips");

        let e = GameError::InsufficientResource(Resource::Bankroll {
            needed: 100,
            available: 40,
        });
        assert!(e.to_string().contains("need 100, have 40"));

        let e: GameError = Ineligibility::SameCard.into();
        assert_eq!(e.code(), "ineligible_card_operation");
        assert!(e.to_string().contains("itself"));
    }
}
