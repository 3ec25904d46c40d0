//! Command-line definitions parsed by clap.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "qjack",
    version,
    about = "Quantum blackjack: superpose, entangle and collapse your cards"
)]
pub struct QjackCli {
    /// Log engine activity (debug level) to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play interactively from stdin
    Play {
        #[arg(long)]
        seed: Option<u64>,
        /// Session file: loaded if present, saved on exit
        #[arg(long)]
        session: Option<String>,
        /// Append resolved rounds to this JSONL file
        #[arg(long)]
        log: Option<String>,
    },
    /// Play rounds automatically with a fixed bet
    Sim {
        #[arg(long, default_value_t = 100)]
        rounds: u32,
        #[arg(long)]
        bet: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
        /// Write round records (JSONL)
        #[arg(long)]
        output: Option<String>,
    },
    /// Show the resolved configuration as JSON
    Cfg,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Play { .. } => "play",
            Commands::Sim { .. } => "sim",
            Commands::Cfg => "cfg",
        }
    }
}
