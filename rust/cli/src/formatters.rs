//! Card, hand and event formatters for terminal display.
//!
//! Suits use Unicode symbols with an ASCII fallback on Windows consoles that
//! cannot render them.
//!
//! ```rust
//! use qjack_engine::cards::{Card, Rank, Suit};
//! use qjack_cli::formatters::format_card;
//!
//! let ace_spades = Card::new(Rank::Ace, Suit::Spades);
//! assert!(format_card(&ace_spades) == "A♠" || format_card(&ace_spades) == "As");
//! ```

use qjack_engine::cards::{Card, Rank, Suit};
use qjack_engine::chips::{ChipInventory, ChipKind};
use qjack_engine::engine::Engine;
use qjack_engine::events::GameEvent;
use qjack_engine::hand::Owner;
use qjack_engine::quantum::{CardId, CardMode};

/// Windows only renders suit symbols in modern terminals; elsewhere assume yes.
pub fn supports_unicode() -> bool {
    if cfg!(windows) {
        std::env::var("WT_SESSION").is_ok()
            || std::env::var("TERM_PROGRAM").is_ok()
            || std::env::var("VSCODE_INJECTION").is_ok()
    } else {
        true
    }
}

pub fn format_suit(suit: &Suit) -> &'static str {
    match (supports_unicode(), suit) {
        (true, Suit::Hearts) => "♥",
        (true, Suit::Diamonds) => "♦",
        (true, Suit::Clubs) => "♣",
        (true, Suit::Spades) => "♠",
        (false, Suit::Hearts) => "h",
        (false, Suit::Diamonds) => "d",
        (false, Suit::Clubs) => "c",
        (false, Suit::Spades) => "s",
    }
}

pub fn format_rank(rank: &Rank) -> &'static str {
    rank.symbol()
}

pub fn format_card(card: &Card) -> String {
    format!("{}{}", format_rank(&card.rank), format_suit(&card.suit))
}

/// Table label of a card: `p1`, `d2`, ...
pub fn card_label(engine: &Engine, id: CardId) -> String {
    for owner in [Owner::Player, Owner::Dealer] {
        if let Some(pos) = engine.hand(owner).cards().iter().position(|&c| c == id) {
            let prefix = match owner {
                Owner::Player => 'p',
                Owner::Dealer => 'd',
            };
            return format!("{}{}", prefix, pos + 1);
        }
    }
    id.to_string()
}

/// One card as seen at the table: `9♣`, `6♦|9♣~` while superposed (`~~`
/// when entangled), `[??]` face down.
pub fn format_table_card(engine: &Engine, id: CardId) -> String {
    if engine.is_hidden(id) {
        return "[??]".to_string();
    }
    let Some(card) = engine.card(id) else {
        return "?".to_string();
    };
    match card.mode() {
        CardMode::Collapsed { face } => format_card(&face),
        CardMode::Superposed { .. } => {
            let (a, b) = card.faces();
            let mark = if engine.partner(id).is_some() { "~~" } else { "~" };
            format!("{}|{}{}", format_card(&a), format_card(&b), mark)
        }
    }
}

/// e.g. `Player: p1 10♠  p2 6♦|9♣~  = 16-19 (uncertain)`
pub fn format_hand(engine: &Engine, owner: Owner) -> String {
    let name = match owner {
        Owner::Player => "Player",
        Owner::Dealer => "Dealer",
    };
    let cards: Vec<String> = engine
        .hand(owner)
        .cards()
        .iter()
        .map(|&id| format!("{} {}", card_label(engine, id), format_table_card(engine, id)))
        .collect();
    format!(
        "{}: {}  = {}",
        name,
        cards.join("  "),
        engine.value_range(owner)
    )
}

pub fn format_chips(chips: &ChipInventory) -> String {
    ChipKind::ALL
        .iter()
        .map(|k| format!("{}={}", k, chips.count(*k)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Presentation line for an engine event, or `None` for events that only
/// matter to animated front-ends.
pub fn format_event(engine: &Engine, event: &GameEvent) -> Option<String> {
    let line = match event {
        GameEvent::CardDealt { card, owner, face } => match face {
            Some(f) => format!(
                "{} dealt {}: {}",
                owner.as_str(),
                card_label(engine, *card),
                format_card(f)
            ),
            None => format!(
                "{} dealt {}: [face down]",
                owner.as_str(),
                card_label(engine, *card)
            ),
        },
        GameEvent::CardRevealed { card, face } => {
            format!("{} revealed: {}", card_label(engine, *card), format_card(face))
        }
        GameEvent::CardSuperposed {
            card,
            face_a,
            face_b,
            probability_a,
        } => format!(
            "{} superposed: {} ({:.0}%) | {}",
            card_label(engine, *card),
            format_card(face_a),
            probability_a * 100.0,
            format_card(face_b)
        ),
        GameEvent::CardCollapsed {
            card,
            face,
            propagated,
        } => {
            let via = if *propagated { " (entanglement)" } else { "" };
            format!(
                "{} collapsed to {}{}",
                card_label(engine, *card),
                format_card(face),
                via
            )
        }
        GameEvent::CardsEntangled { a, b } => format!(
            "{} and {} entangled",
            card_label(engine, *a),
            card_label(engine, *b)
        ),
        GameEvent::HandValueChanged { .. } | GameEvent::RoundStateChanged { .. } => return None,
        GameEvent::RoundResult {
            outcome,
            payout,
            bankroll,
        } => format!("Result: {} payout={} bankroll={}", outcome, payout, bankroll),
        GameEvent::ChipCountChanged { inventory } => {
            format!("Chips: {}", format_chips(inventory))
        }
        GameEvent::DeckShuffled { remaining } => {
            format!("Deck shuffled ({} faces)", remaining)
        }
    };
    Some(line)
}
