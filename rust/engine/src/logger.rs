use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::engine::Outcome;
use crate::quantum::CardId;

/// A quantum operation performed during a round.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum QuantumOp {
    Superpose {
        card: CardId,
    },
    Entangle {
        a: CardId,
        b: CardId,
    },
    /// Chip-driven measurement; `partner` is set when entanglement propagated.
    Collapse {
        card: CardId,
        face: Card,
        #[serde(default)]
        partner: Option<(CardId, Card)>,
    },
}

/// Complete record of a resolved round.
/// Serialized to JSONL for round history.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Identifier assigned by [`RoundLogger`] (format: YYYYMMDD-NNNNNN)
    #[serde(default)]
    pub round_id: Option<String>,
    /// Round number within the engine's lifetime, starting at 1
    pub round: u32,
    /// RNG seed of the engine (enables deterministic replay)
    pub seed: Option<u64>,
    pub bet: u32,
    /// Final faces of the player's cards, in deal order
    pub player: Vec<Card>,
    /// Final faces of the dealer's cards, in deal order
    pub dealer: Vec<Card>,
    pub player_total: u16,
    pub dealer_total: u16,
    /// Chip operations in the order they were performed
    pub quantum_ops: Vec<QuantumOp>,
    pub outcome: Outcome,
    pub payout: u32,
    pub bankroll_after: u32,
    /// Timestamp when the round was logged (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
}

pub fn format_round_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct RoundLogger {
    writer: Option<BufWriter<std::fs::File>>,
    date: String,
    seq: u32,
}

impl RoundLogger {
    /// Opens `path` for appending, creating parent directories.
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    pub fn with_seq_for_test(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_round_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &RoundRecord) -> std::io::Result<()> {
        // inject id and timestamp if missing
        let mut rec = record.clone();
        if rec.round_id.is_none() {
            rec.round_id = Some(self.next_id());
        }
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
