//! Player state that outlives a round: bankroll and chips.
//!
//! A session is owned by the [`crate::engine::Engine`] while playing and is
//! saved/loaded explicitly at session boundaries.

use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chips::ChipInventory;

pub const STARTING_BANKROLL: u32 = 1_000;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub bankroll: u32,
    pub chips: ChipInventory,
    #[serde(default)]
    pub rounds_played: u32,
    /// RFC3339 time of the last save
    #[serde(default)]
    pub saved_at: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(STARTING_BANKROLL, ChipInventory::with_counts(2, 2, 1))
    }
}

impl Session {
    pub fn new(bankroll: u32, chips: ChipInventory) -> Self {
        Self {
            bankroll,
            chips,
            rounds_played: 0,
            saved_at: None,
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SessionError> {
        let s = fs::read_to_string(path.as_ref())?;
        let session: Session = serde_json::from_str(&s)?;
        tracing::info!(
            path = %path.as_ref().display(),
            bankroll = session.bankroll,
            "session loaded"
        );
        Ok(session)
    }

    /// Writes pretty JSON, stamping `saved_at`.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SessionError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        self.saved_at = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        tracing::info!(path = %path.as_ref().display(), "session saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chips::ChipKind;

    #[test]
    fn default_session_has_starter_chips() {
        let s = Session::default();
        assert_eq!(s.bankroll, STARTING_BANKROLL);
        assert_eq!(s.chips.count(ChipKind::Superpose), 2);
        assert_eq!(s.chips.count(ChipKind::Collapse), 2);
        assert_eq!(s.chips.count(ChipKind::Entangle), 1);
    }

    #[test]
    fn missing_optional_fields_default() {
        let s: Session =
            serde_json::from_str(r#"{"bankroll":5,"chips":{"counts":{"collapse":3}}}"#).unwrap();
        assert_eq!(s.bankroll, 5);
        assert_eq!(s.rounds_played, 0);
        assert_eq!(s.chips.count(ChipKind::Collapse), 3);
        assert!(s.saved_at.is_none());
    }
}
