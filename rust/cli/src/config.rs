use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub bankroll: u32,
    pub bet: u32,
    pub seed: Option<u64>,
    pub reshuffle_threshold: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub bankroll: ValueSource,
    pub bet: ValueSource,
    pub seed: ValueSource,
    pub reshuffle_threshold: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            bankroll: ValueSource::Default,
            bet: ValueSource::Default,
            seed: ValueSource::Default,
            reshuffle_threshold: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bankroll: qjack_engine::session::STARTING_BANKROLL,
            bet: 100,
            seed: None,
            reshuffle_threshold: qjack_engine::rules::TableRules::default().reshuffle_threshold,
        }
    }
}

impl Config {
    pub fn table_rules(&self) -> qjack_engine::rules::TableRules {
        qjack_engine::rules::TableRules {
            reshuffle_threshold: self.reshuffle_threshold,
            ..Default::default()
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "malformed config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

/// Defaults, then the TOML file named by `QJACK_CONFIG`, then `QJACK_*` variables.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("QJACK_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.bankroll {
            cfg.bankroll = v;
            sources.bankroll = ValueSource::File;
        }
        if let Some(v) = f.bet {
            cfg.bet = v;
            sources.bet = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.reshuffle_threshold {
            cfg.reshuffle_threshold = v;
            sources.reshuffle_threshold = ValueSource::File;
        }
    }

    if let Some(v) = env_parse::<u64>("QJACK_SEED", "seed")? {
        cfg.seed = Some(v);
        sources.seed = ValueSource::Env;
    }
    if let Some(v) = env_parse::<u32>("QJACK_BANKROLL", "bankroll")? {
        cfg.bankroll = v;
        sources.bankroll = ValueSource::Env;
    }
    if let Some(v) = env_parse::<u32>("QJACK_BET", "bet")? {
        cfg.bet = v;
        sources.bet = ValueSource::Env;
    }
    if let Some(v) = env_parse::<usize>("QJACK_RESHUFFLE_THRESHOLD", "reshuffle_threshold")? {
        cfg.reshuffle_threshold = v;
        sources.reshuffle_threshold = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn env_parse<T: std::str::FromStr>(key: &str, what: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", what, v))),
        _ => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    bankroll: Option<u32>,
    #[serde(default)]
    bet: Option<u32>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    reshuffle_threshold: Option<usize>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.bankroll == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: bankroll must be >0".into(),
        ));
    }
    if cfg.bet == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: bet must be >0".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        assert!(validate(&cfg).is_ok());
        assert_eq!(cfg.table_rules().reshuffle_threshold, 16);
    }

    #[test]
    fn zero_bet_is_rejected() {
        let cfg = Config {
            bet: 0,
            ..Config::default()
        };
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
    }
}
