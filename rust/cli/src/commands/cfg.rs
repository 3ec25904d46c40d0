//! Configuration command handler.
//!
//! Prints the resolved configuration with the source of every value
//! (`default`, `file` or `env`).
//!
//! # Example Output
//!
//! ```json
//! {
//!   "bankroll": {
//!     "value": 1000,
//!     "source": "default"
//!   },
//!   "bet": {
//!     "value": 100,
//!     "source": "env"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use std::io::Write;

/// Handle the cfg command.
///
/// # Errors
///
/// Returns `CliError::Config` if the configuration cannot be loaded and
/// `CliError::Io` if writing to `out` fails.
pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(format!("Invalid configuration: {}", e)));
        }
    };

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "bankroll": {
            "value": config.bankroll,
            "source": sources.bankroll,
        },
        "bet": {
            "value": config.bet,
            "source": sources.bet,
        },
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "reshuffle_threshold": {
            "value": config.reshuffle_threshold,
            "source": sources.reshuffle_threshold,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
