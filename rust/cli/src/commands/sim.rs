//! Simulation command: automated rounds with a fixed bet.
//!
//! The built-in policy hits below 17, superposes its newest card when a
//! collapsed hand sits on 12-16, and spends a collapse chip when an
//! uncertain hand could bust.
//!
//! # Examples
//!
//! ```no_run
//! use qjack_cli::commands::sim::handle_sim_command;
//! use std::io;
//!
//! let mut out = io::stdout();
//! let mut err = io::stderr();
//! handle_sim_command(100, Some(10), Some(42), None, &mut out, &mut err).unwrap();
//! ```

use std::io::Write;
use std::path::Path;

use qjack_engine::chips::ChipKind;
use qjack_engine::engine::{Engine, Outcome, RoundState};
use qjack_engine::errors::GameError;
use qjack_engine::hand::{BLACKJACK, Owner};
use qjack_engine::logger::RoundLogger;
use qjack_engine::session::Session;

use crate::config;
use crate::error::CliError;
use crate::io_utils::ensure_parent_dir;
use crate::ui;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SimSummary {
    pub rounds: u32,
    pub wins: u32,
    pub losses: u32,
    pub pushes: u32,
    pub blackjacks: u32,
    pub chips_used: u32,
}

impl SimSummary {
    fn tally(&mut self, outcome: Outcome) {
        self.rounds += 1;
        match outcome {
            Outcome::PlayerBlackjack => {
                self.blackjacks += 1;
                self.wins += 1;
            }
            Outcome::PlayerWin | Outcome::DealerBust => self.wins += 1,
            Outcome::DealerWin | Outcome::PlayerBust => self.losses += 1,
            Outcome::Push => self.pushes += 1,
        }
    }
}

/// Handle the sim command.
///
/// # Arguments
///
/// * `rounds` - Number of rounds to play (>= 1)
/// * `bet` - Stake per round (falls back to the configured bet)
/// * `seed` - RNG seed (falls back to the configured seed, then random)
/// * `output` - Optional JSONL file for round records
pub fn handle_sim_command(
    rounds: u32,
    bet: Option<u32>,
    seed: Option<u64>,
    output: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if rounds == 0 {
        ui::write_error(err, "rounds must be >= 1")?;
        return Err(CliError::InvalidInput("rounds must be >= 1".to_string()));
    }
    let cfg = config::load()?;
    let bet = bet.unwrap_or(cfg.bet);
    if bet == 0 {
        ui::write_error(err, "bet must be >= 1")?;
        return Err(CliError::InvalidInput("bet must be >= 1".to_string()));
    }
    let seed = seed.or(cfg.seed).unwrap_or_else(rand::random);

    let mut logger = match &output {
        Some(p) => {
            ensure_parent_dir(Path::new(p)).map_err(CliError::InvalidInput)?;
            Some(RoundLogger::create(p)?)
        }
        None => None,
    };

    let session = Session {
        bankroll: cfg.bankroll,
        ..Session::default()
    };
    let start = session.bankroll;
    let mut engine = Engine::new(cfg.table_rules(), session, Some(seed));
    writeln!(out, "sim: rounds={} bet={} seed={}", rounds, bet, seed)?;

    let mut summary = SimSummary::default();
    for i in 1..=rounds {
        if engine.bankroll() < bet {
            ui::display_warning(
                err,
                &format!("bankroll exhausted after {} rounds", summary.rounds),
            )?;
            break;
        }
        engine.place_bet(bet)?;
        summary.chips_used += play_round(&mut engine)?;
        // the sim never renders, so events are discarded
        engine.drain_events();

        let Some(result) = engine.last_result().copied() else {
            return Err(CliError::Engine("round ended without a result".to_string()));
        };
        summary.tally(result.outcome);
        writeln!(
            out,
            "Round {}: {} {}-{} payout={} bankroll={}",
            i,
            result.outcome,
            result.player_total,
            result.dealer_total,
            result.payout,
            engine.bankroll()
        )?;
        if let (Some(logger), Some(record)) = (logger.as_mut(), engine.last_record()) {
            logger.write(record)?;
        }
    }

    let end = engine.bankroll();
    writeln!(out, "Rounds played: {}", summary.rounds)?;
    writeln!(
        out,
        "Wins: {} Losses: {} Pushes: {} Blackjacks: {}",
        summary.wins, summary.losses, summary.pushes, summary.blackjacks
    )?;
    writeln!(out, "Chips used: {}", summary.chips_used)?;
    writeln!(
        out,
        "Final bankroll: {} (net {:+})",
        end,
        i64::from(end) - i64::from(start)
    )?;
    Ok(())
}

/// Plays the player turn to completion; returns the number of chips spent.
fn play_round(engine: &mut Engine) -> Result<u32, GameError> {
    let mut used = 0;
    while engine.state() == RoundState::PlayerTurn {
        let range = engine.value_range(Owner::Player);
        let cards = engine.hand(Owner::Player).cards().to_vec();

        if range.uncertain && range.max > BLACKJACK && engine.chips().has(ChipKind::Collapse) {
            let superposed = cards
                .iter()
                .copied()
                .find(|&id| engine.card(id).is_some_and(|c| c.is_superposed()));
            if let Some(id) = superposed {
                engine.use_chip(ChipKind::Collapse, id)?;
                used += 1;
                continue;
            }
        }
        if !range.uncertain
            && (12..=16).contains(&range.min)
            && engine.chips().has(ChipKind::Superpose)
            && let Some(&id) = cards.last()
        {
            engine.use_chip(ChipKind::Superpose, id)?;
            used += 1;
            continue;
        }
        if range.min < 17 {
            engine.hit()?;
        } else {
            engine.stand()?;
        }
    }
    Ok(used)
}
