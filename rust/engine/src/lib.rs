//! # qjack-engine: Quantum Blackjack Core
//!
//! A deterministic blackjack engine whose cards can be put into a two-face
//! superposition, entangled in pairs, and collapsed back to one face.
//! Hand totals are reported as ranges while any card is unresolved.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card faces (Suit, Rank, Color) and the 52-face deck list
//! - [`deck`] - Seeded ChaCha20 deck that supplies two faces per dealt card
//! - [`quantum`] - Quantum cards, entanglement links and collapse propagation
//! - [`hand`] - Hands and value-range valuation
//! - [`chips`] - Consumable superpose / collapse / entangle chips
//! - [`rules`] - Table rules, payouts and bet validation
//! - [`player`] - Inbound player actions
//! - [`events`] - Outbound presentation events and their queue
//! - [`engine`] - Round state machine
//! - [`session`] - Bankroll and chips persisted between sessions
//! - [`logger`] - RoundRecord serialization to JSONL
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use qjack_engine::engine::{Engine, RoundState};
//! use qjack_engine::hand::Owner;
//! use qjack_engine::rules::TableRules;
//! use qjack_engine::session::Session;
//!
//! let mut engine = Engine::new(TableRules::default(), Session::default(), Some(42));
//! engine.place_bet(50).unwrap();
//!
//! for event in engine.drain_events() {
//!     println!("{:?}", event);
//! }
//! println!("player: {}", engine.value_range(Owner::Player));
//! ```
//!
//! ## Deterministic Gameplay
//!
//! The deck and the collapse draws both derive from one seed:
//!
//! ```rust
//! use qjack_engine::deck::Deck;
//!
//! let mut deck1 = Deck::new_with_seed(42);
//! let mut deck2 = Deck::new_with_seed(42);
//! deck1.shuffle();
//! deck2.shuffle();
//! assert_eq!(deck1.draw_pair(), deck2.draw_pair());
//! ```

pub mod cards;
pub mod chips;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod events;
pub mod hand;
pub mod logger;
pub mod player;
pub mod quantum;
pub mod rules;
pub mod session;
