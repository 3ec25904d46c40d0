//! # Play Command
//!
//! Interactive quantum blackjack against the dealer.
//!
//! Each input line becomes one engine action. After every action the
//! queued engine events are drained and printed, then the table is shown.
//! The session (bankroll and chips) can be loaded from and saved to a JSON
//! file, and resolved rounds can be appended to a JSONL log.

use std::io::{BufRead, Write};
use std::path::Path;

use qjack_engine::chips::ChipKind;
use qjack_engine::engine::{Engine, RoundState};
use qjack_engine::errors::{GameError, Ineligibility};
use qjack_engine::hand::Owner;
use qjack_engine::logger::RoundLogger;
use qjack_engine::quantum::CardId;
use qjack_engine::session::Session;

use crate::config;
use crate::error::CliError;
use crate::formatters::{format_chips, format_event, format_hand};
use crate::io_utils::{ensure_parent_dir, read_stdin_line};
use crate::ui;
use crate::validation::{CardRef, ParseResult, TableCommand, parse_table_command};

/// Handle the play command: read commands from `stdin` until `q` or EOF.
///
/// # Arguments
///
/// * `seed` - RNG seed (falls back to the configured seed, then random)
/// * `session_path` - Session JSON loaded when present and saved on exit
/// * `log_path` - JSONL file receiving one record per resolved round
///
/// # Errors
///
/// Configuration, session and log I/O failures. Rejected game actions are
/// reported on `err` and do not end the session.
pub fn handle_play_command(
    seed: Option<u64>,
    session_path: Option<String>,
    log_path: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let cfg = config::load()?;
    let seed = seed.or(cfg.seed).unwrap_or_else(rand::random);

    let session = match &session_path {
        Some(p) if Path::new(p).exists() => Session::load(p)?,
        _ => Session {
            bankroll: cfg.bankroll,
            ..Session::default()
        },
    };
    let mut logger = match &log_path {
        Some(p) => {
            ensure_parent_dir(Path::new(p)).map_err(CliError::InvalidInput)?;
            Some(RoundLogger::create(p)?)
        }
        None => None,
    };

    let mut engine = Engine::new(cfg.table_rules(), session, Some(seed));
    writeln!(out, "play: seed={} bankroll={}", seed, engine.bankroll())?;
    writeln!(out, "Chips: {}", format_chips(engine.chips()))?;
    writeln!(out, "Type 'help' for commands.")?;

    let mut logged_round = 0u32;
    let mut rounds = 0u32;
    loop {
        if matches!(engine.state(), RoundState::Idle | RoundState::GameOver)
            && engine.bankroll() == 0
        {
            writeln!(out, "Bankroll exhausted.")?;
            break;
        }
        write!(out, "{}", prompt(engine.state()))?;
        out.flush()?;

        let Some(line) = read_stdin_line(stdin) else {
            break;
        };
        if line.is_empty() {
            continue;
        }
        let cmd = match parse_table_command(&line) {
            ParseResult::Command(cmd) => cmd,
            ParseResult::Quit => break,
            ParseResult::Invalid(msg) => {
                ui::write_error(err, &msg)?;
                continue;
            }
        };

        let result = match cmd {
            TableCommand::Help => {
                ui::write_help(out)?;
                continue;
            }
            TableCommand::Chips => {
                writeln!(out, "Chips: {}", format_chips(engine.chips()))?;
                writeln!(out, "Bankroll: {}", engine.bankroll())?;
                continue;
            }
            TableCommand::Bet(amount) => engine.place_bet(amount),
            TableCommand::Hit => engine.hit(),
            TableCommand::Stand => engine.stand(),
            TableCommand::Superpose(r) => {
                resolve_card(&engine, r).and_then(|id| engine.use_chip(ChipKind::Superpose, id))
            }
            TableCommand::Collapse(r) => {
                resolve_card(&engine, r).and_then(|id| engine.use_chip(ChipKind::Collapse, id))
            }
            TableCommand::Entangle(a, b) => {
                match (resolve_card(&engine, a), resolve_card(&engine, b)) {
                    (Ok(a), Ok(b)) => engine.entangle_selection(a, b),
                    (Err(e), _) | (_, Err(e)) => Err(e),
                }
            }
            TableCommand::Buy(kind) => engine.buy_chip(kind),
        };
        if let Err(e) = result {
            ui::write_error(err, &format!("{} [{}]", e, e.code()))?;
            continue;
        }

        render(&mut engine, out)?;

        if engine.state() == RoundState::GameOver && engine.round() != logged_round {
            logged_round = engine.round();
            rounds += 1;
            if let (Some(logger), Some(record)) = (logger.as_mut(), engine.last_record()) {
                logger.write(record)?;
            }
        }
    }

    writeln!(out, "Rounds played: {}", rounds)?;
    writeln!(out, "Bankroll: {}", engine.bankroll())?;
    if let Some(p) = session_path {
        let mut session = engine.into_session();
        session.save(&p)?;
        writeln!(out, "Session saved to {}", p)?;
    }
    Ok(())
}

fn prompt(state: RoundState) -> &'static str {
    match state {
        RoundState::PlayerTurn => "Action (hit/stand/superpose/collapse/entangle/buy/q): ",
        _ => "Bet (bet N/chips/q): ",
    }
}

fn resolve_card(engine: &Engine, r: CardRef) -> Result<CardId, GameError> {
    r.resolve(engine)
        .ok_or(GameError::IneligibleCardOperation(Ineligibility::UnknownCard))
}

/// Prints pending events, then the table while a round is on it.
fn render(engine: &mut Engine, out: &mut dyn Write) -> Result<(), CliError> {
    engine.hold_input();
    let events = engine.drain_events();
    for ev in &events {
        if let Some(line) = format_event(engine, ev) {
            writeln!(out, "{}", line)?;
        }
    }
    engine.release_input();

    if !engine.hand(Owner::Player).is_empty() {
        writeln!(out, "{}", format_hand(engine, Owner::Dealer))?;
        writeln!(out, "{}", format_hand(engine, Owner::Player))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn play(script: &str) -> (Result<(), CliError>, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let result = handle_play_command(Some(42), None, None, &mut out, &mut err, &mut input);
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn quit_immediately() {
        let (result, out, _) = play("q\n");
        assert!(result.is_ok());
        assert!(out.contains("play: seed=42"));
        assert!(out.contains("Rounds played: 0"));
    }

    #[test]
    fn hit_before_bet_reports_state_error() {
        let (result, _, err) = play("hit\nq\n");
        assert!(result.is_ok());
        assert!(err.contains("[invalid_state_transition]"));
    }

    #[test]
    fn unknown_card_is_reported() {
        let (result, _, err) = play("bet 10\nsuperpose p9\nq\n");
        assert!(result.is_ok());
        assert!(err.contains("no such card on the table [ineligible_card_operation]"));
    }
}
