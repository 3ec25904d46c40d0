//! # Quantum Blackjack CLI Library
//!
//! Command-line front-end for the `qjack-engine` crate.
//!
//! ## Main Entry Point
//!
//! [`run`] parses the command line and executes the subcommand, writing to
//! the given streams.
//!
//! ```no_run
//! use std::io;
//! let args = vec!["qjack", "sim", "--rounds", "10", "--seed", "7"];
//! let code = qjack_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: Play interactively, one command per input line
//! - `sim`: Play rounds with a built-in policy and report totals
//! - `cfg`: Display the resolved configuration

use clap::Parser;
use std::io::Write;

#[macro_use]
mod macros;

pub mod cli;
pub mod commands;
mod config;
mod error;
mod exit_code;
pub mod formatters;
pub mod io_utils;
mod logging;
pub mod ui;
pub mod validation;

use cli::{Commands, QjackCli};
use commands::{handle_cfg_command, handle_play_command, handle_sim_command};

pub use error::CliError;

/// Environment variable holding scripted `play` input. Used by tests in
/// place of stdin.
pub const TEST_INPUT_ENV: &str = "QJACK_TEST_INPUT";

const COMMANDS: &[&str] = &["play", "sim", "cfg"];

/// Main entry point for the CLI application.
///
/// # Returns
///
/// Exit code: `0` for success, `2` for any error.
///
/// # Example
///
/// ```
/// use std::io;
/// let code = qjack_cli::run(vec!["qjack", "cfg"], &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match QjackCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version go to stdout with a success code
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                if write!(out, "{}", e).is_err() {
                    return exit_code::ERROR;
                }
                return exit_code::SUCCESS;
            }
            write_or_exit!(err, "{}", e);
            write_or_exit!(err, "Usage: qjack <command> [options]\n");
            write_or_exit!(err, "Commands:");
            for c in COMMANDS {
                write_or_exit!(err, "  {}", c);
            }
            write_or_exit!(err, "\nFor full help, run: qjack --help");
            return exit_code::ERROR;
        }
    };

    logging::init_logging(cli.verbose);
    tracing::debug!(command = cli.cmd.name(), "dispatching");

    let result = match cli.cmd {
        Commands::Cfg => handle_cfg_command(out, err),
        Commands::Play { seed, session, log } => match std::env::var(TEST_INPUT_ENV) {
            Ok(script) => {
                let mut input = std::io::Cursor::new(script.into_bytes());
                handle_play_command(seed, session, log, out, err, &mut input)
            }
            Err(_) => {
                let stdin = std::io::stdin();
                let mut stdin_lock = stdin.lock();
                handle_play_command(seed, session, log, out, err, &mut stdin_lock)
            }
        },
        Commands::Sim {
            rounds,
            bet,
            seed,
            output,
        } => handle_sim_command(rounds, bet, seed, output, out, err),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            write_or_exit!(err, "Error: {}", e);
            exit_code::ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_capture(args: &[&str]) -> (i32, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(args.iter().copied(), &mut out, &mut err);
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn help_exits_zero() {
        let (code, out, _) = run_capture(&["qjack", "--help"]);
        assert_eq!(code, 0);
        assert!(out.contains("Usage"));
    }

    #[test]
    fn unknown_command_lists_commands() {
        let (code, _, err) = run_capture(&["qjack", "fold"]);
        assert_eq!(code, 2);
        for c in COMMANDS {
            assert!(err.contains(c));
        }
    }

    #[test]
    fn sim_with_zero_rounds_fails() {
        let (code, _, err) = run_capture(&["qjack", "sim", "--rounds", "0"]);
        assert_eq!(code, 2);
        assert!(err.contains("rounds must be >= 1"));
    }
}
