//! Parsing of interactive `play` input.
//!
//! Input is parsed into a [`TableCommand`] without looking at the engine;
//! card references such as `p1` are resolved against the table afterwards.

use qjack_engine::chips::ChipKind;
use qjack_engine::engine::Engine;
use qjack_engine::hand::Owner;
use qjack_engine::quantum::CardId;

/// A card addressed by hand and 1-based position, e.g. `p1` or `d2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardRef {
    pub owner: Owner,
    pub position: usize,
}

impl CardRef {
    pub fn resolve(&self, engine: &Engine) -> Option<CardId> {
        engine
            .hand(self.owner)
            .cards()
            .get(self.position.checked_sub(1)?)
            .copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCommand {
    Bet(u32),
    Hit,
    Stand,
    Superpose(CardRef),
    Collapse(CardRef),
    Entangle(CardRef, CardRef),
    Buy(ChipKind),
    Chips,
    Help,
}

#[derive(Debug, PartialEq)]
pub enum ParseResult {
    Command(TableCommand),
    /// User entered quit command (q or quit)
    Quit,
    Invalid(String),
}

/// Parses one line of `play` input (case-insensitive).
///
/// ```rust
/// # use qjack_cli::validation::{parse_table_command, ParseResult, TableCommand};
/// assert_eq!(parse_table_command("bet 50"), ParseResult::Command(TableCommand::Bet(50)));
/// assert_eq!(parse_table_command("Q"), ParseResult::Quit);
/// assert!(matches!(parse_table_command("bet"), ParseResult::Invalid(_)));
/// ```
pub fn parse_table_command(input: &str) -> ParseResult {
    let lower = input.trim().to_ascii_lowercase();
    let parts: Vec<&str> = lower.split_whitespace().collect();
    let Some((&head, args)) = parts.split_first() else {
        return ParseResult::Invalid("Empty input".to_string());
    };

    let cmd = match (head, args) {
        ("q" | "quit" | "exit", []) => return ParseResult::Quit,
        ("h" | "hit", []) => TableCommand::Hit,
        ("s" | "stand", []) => TableCommand::Stand,
        ("chips", []) => TableCommand::Chips,
        ("help" | "?", []) => TableCommand::Help,
        ("bet" | "b", [amount]) => match amount.parse::<u32>() {
            Ok(a) if a > 0 => TableCommand::Bet(a),
            _ => return ParseResult::Invalid(format!("Invalid bet amount: {}", amount)),
        },
        ("superpose" | "sp", [card]) => match parse_card_ref(card) {
            Ok(c) => TableCommand::Superpose(c),
            Err(msg) => return ParseResult::Invalid(msg),
        },
        ("collapse" | "cl", [card]) => match parse_card_ref(card) {
            Ok(c) => TableCommand::Collapse(c),
            Err(msg) => return ParseResult::Invalid(msg),
        },
        ("entangle" | "en", [a, b]) => match (parse_card_ref(a), parse_card_ref(b)) {
            (Ok(a), Ok(b)) => TableCommand::Entangle(a, b),
            (Err(msg), _) | (_, Err(msg)) => return ParseResult::Invalid(msg),
        },
        ("buy", [kind]) => match parse_chip_kind(kind) {
            Some(k) => TableCommand::Buy(k),
            None => return ParseResult::Invalid(format!("Unknown chip kind: {}", kind)),
        },
        ("bet" | "b" | "superpose" | "sp" | "collapse" | "cl" | "entangle" | "en" | "buy", _) => {
            return ParseResult::Invalid(format!(
                "Wrong number of arguments for '{}'. Type 'help' for usage.",
                head
            ));
        }
        _ => {
            return ParseResult::Invalid(format!(
                "Unrecognized command: {}. Type 'help' for usage.",
                input.trim()
            ));
        }
    };
    ParseResult::Command(cmd)
}

/// `p1`, `d3`, ... into a [`CardRef`].
pub fn parse_card_ref(s: &str) -> Result<CardRef, String> {
    let s = s.trim().to_ascii_lowercase();
    let mut chars = s.chars();
    let owner = match chars.next() {
        Some('p') => Owner::Player,
        Some('d') => Owner::Dealer,
        _ => return Err(format!("Invalid card reference: {} (use p1, d1, ...)", s)),
    };
    match chars.as_str().parse::<usize>() {
        Ok(position) if position > 0 => Ok(CardRef { owner, position }),
        _ => Err(format!("Invalid card reference: {} (use p1, d1, ...)", s)),
    }
}

pub fn parse_chip_kind(s: &str) -> Option<ChipKind> {
    match s.trim().to_ascii_lowercase().as_str() {
        "superpose" | "s" => Some(ChipKind::Superpose),
        "collapse" | "c" => Some(ChipKind::Collapse),
        "entangle" | "e" => Some(ChipKind::Entangle),
        _ => None,
    }
}
