//! Outbound notifications for renderers, audio and UI.
//!
//! The engine never calls into a presenter. It appends [`GameEvent`]s to an
//! [`EventQueue`] during each action and the presenter drains them at its
//! own pace, animating between events if it wants to.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::chips::ChipInventory;
use crate::engine::{Outcome, RoundState};
use crate::hand::Owner;
use crate::quantum::CardId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// `face` is `None` for the dealer's hole card.
    CardDealt {
        card: CardId,
        owner: Owner,
        face: Option<Card>,
    },
    CardRevealed {
        card: CardId,
        face: Card,
    },
    CardSuperposed {
        card: CardId,
        face_a: Card,
        face_b: Card,
        probability_a: f64,
    },
    CardCollapsed {
        card: CardId,
        face: Card,
        /// Collapsed by entanglement propagation rather than measured directly.
        propagated: bool,
    },
    CardsEntangled {
        a: CardId,
        b: CardId,
    },
    HandValueChanged {
        owner: Owner,
        min: u16,
        max: u16,
        uncertain: bool,
    },
    RoundStateChanged {
        state: RoundState,
    },
    RoundResult {
        outcome: Outcome,
        payout: u32,
        bankroll: u32,
    },
    ChipCountChanged {
        inventory: ChipInventory,
    },
    DeckShuffled {
        remaining: usize,
    },
}

/// FIFO of pending presentation events.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        tracing::trace!(event = ?event, "event queued");
        self.pending.push_back(event);
    }

    pub fn pop(&mut self) -> Option<GameEvent> {
        self.pending.pop_front()
    }

    /// Takes every pending event in emission order.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.pending.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_order_and_empties() {
        let mut q = EventQueue::new();
        q.push(GameEvent::RoundStateChanged {
            state: RoundState::Betting,
        });
        q.push(GameEvent::CardsEntangled {
            a: CardId(0),
            b: CardId(1),
        });
        let drained = q.drain();
        assert_eq!(drained.len(), 2);
        assert!(matches!(drained[0], GameEvent::RoundStateChanged { .. }));
        assert!(q.is_empty());
    }

    #[test]
    fn pop_takes_oldest_first() {
        let mut q = EventQueue::new();
        q.push(GameEvent::DeckShuffled { remaining: 52 });
        q.push(GameEvent::RoundStateChanged {
            state: RoundState::Idle,
        });
        assert_eq!(q.iter().count(), 2);
        assert!(matches!(q.iter().next(), Some(GameEvent::DeckShuffled { .. })));

        assert_eq!(q.pop(), Some(GameEvent::DeckShuffled { remaining: 52 }));
        assert_eq!(q.len(), 1);
        assert!(matches!(q.pop(), Some(GameEvent::RoundStateChanged { .. })));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn events_serialize_with_tag() {
        let ev = GameEvent::HandValueChanged {
            owner: Owner::Player,
            min: 6,
            max: 9,
            uncertain: true,
        };
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.contains("\"event\":\"hand_value_changed\""));
        assert!(json.contains("\"owner\":\"player\""));
    }
}
