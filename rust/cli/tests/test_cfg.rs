use qjack_cli::run;
use serde_json::Value;
use serial_test::serial;
use std::fs;

const VARS: &[&str] = &[
    "QJACK_CONFIG",
    "QJACK_SEED",
    "QJACK_BANKROLL",
    "QJACK_BET",
    "QJACK_RESHUFFLE_THRESHOLD",
];

fn clear_env() {
    for var in VARS {
        unsafe {
            std::env::remove_var(var);
        }
    }
}

fn cfg_json() -> (i32, Value, String) {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = run(["qjack", "cfg"], &mut out, &mut err);
    let stdout = String::from_utf8_lossy(&out).into_owned();
    let json = serde_json::from_str(&stdout).unwrap_or(Value::Null);
    (code, json, String::from_utf8_lossy(&err).into_owned())
}

#[test]
#[serial]
fn defaults_when_nothing_is_set() {
    clear_env();
    let (code, json, _) = cfg_json();
    assert_eq!(code, 0);
    assert_eq!(json["bankroll"]["value"].as_u64(), Some(1000));
    assert_eq!(json["bankroll"]["source"].as_str(), Some("default"));
    assert_eq!(json["bet"]["value"].as_u64(), Some(100));
    assert!(json["seed"]["value"].is_null());
    assert_eq!(json["reshuffle_threshold"]["value"].as_u64(), Some(16));
}

#[test]
#[serial]
fn env_overrides_file_overrides_default() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("qjack.toml");
    fs::write(&path, "bankroll = 500\nbet = 25\nseed = 7\n").unwrap();
    unsafe {
        std::env::set_var("QJACK_CONFIG", &path);
        std::env::set_var("QJACK_SEED", "99");
    }

    let (code, json, err) = cfg_json();
    clear_env();

    assert_eq!(code, 0, "stderr: {}", err);
    assert_eq!(json["bankroll"]["value"].as_u64(), Some(500));
    assert_eq!(json["bankroll"]["source"].as_str(), Some("file"));
    assert_eq!(json["bet"]["value"].as_u64(), Some(25));
    assert_eq!(json["seed"]["value"].as_u64(), Some(99));
    assert_eq!(json["seed"]["source"].as_str(), Some("env"));
    assert_eq!(json["reshuffle_threshold"]["source"].as_str(), Some("default"));
}

#[test]
#[serial]
fn invalid_env_value_is_a_config_error() {
    clear_env();
    unsafe {
        std::env::set_var("QJACK_BET", "lots");
    }
    let (code, _, err) = cfg_json();
    clear_env();

    assert_eq!(code, 2);
    assert!(err.contains("Invalid bet: lots"), "stderr: {}", err);
}

#[test]
#[serial]
fn zero_bankroll_is_rejected() {
    clear_env();
    unsafe {
        std::env::set_var("QJACK_BANKROLL", "0");
    }
    let (code, _, err) = cfg_json();
    clear_env();

    assert_eq!(code, 2);
    assert!(err.contains("bankroll must be >0"), "stderr: {}", err);
}

#[test]
#[serial]
fn malformed_file_is_reported() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "bankroll = \"lots\"\n").unwrap();
    unsafe {
        std::env::set_var("QJACK_CONFIG", &path);
    }
    let (code, _, err) = cfg_json();
    clear_env();

    assert_eq!(code, 2);
    assert!(err.contains("malformed config file"), "stderr: {}", err);
}
