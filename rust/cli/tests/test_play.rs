use qjack_cli::{TEST_INPUT_ENV, run};
use qjack_engine::session::Session;
use serial_test::serial;
use std::fs;

fn play(script: &str, extra: &[&str]) -> (i32, String, String) {
    unsafe {
        std::env::remove_var("QJACK_CONFIG");
        std::env::set_var(TEST_INPUT_ENV, script);
    }
    let mut args = vec!["qjack", "play", "--seed", "42"];
    args.extend_from_slice(extra);
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = run(args, &mut out, &mut err);
    unsafe {
        std::env::remove_var(TEST_INPUT_ENV);
    }
    (
        code,
        String::from_utf8_lossy(&out).into_owned(),
        String::from_utf8_lossy(&err).into_owned(),
    )
}

#[test]
#[serial]
fn quick_quit() {
    let (code, out, _) = play("q\n", &[]);
    assert_eq!(code, 0);
    assert!(out.contains("play: seed=42 bankroll=1000"));
    assert!(out.contains("Rounds played: 0"));
    assert!(out.contains("Bankroll: 1000"));
}

#[test]
#[serial]
fn bet_and_stand_resolves_one_round() {
    let (code, out, _) = play("bet 100\nstand\nq\n", &[]);
    assert_eq!(code, 0);
    assert!(out.contains("Result: "), "stdout: {}", out);
    assert!(out.contains("Rounds played: 1"));
    assert!(out.contains("Dealer: d1 "));
}

#[test]
#[serial]
fn eof_ends_the_session() {
    let (code, out, _) = play("bet 50\n", &[]);
    assert_eq!(code, 0);
    assert!(out.contains("Bankroll: "));
}

#[test]
#[serial]
fn rejected_commands_do_not_end_the_session() {
    let (code, out, err) = play("stand\nbet 5000\nfold\nhelp\nq\n", &[]);
    assert_eq!(code, 0);
    assert!(err.contains("[invalid_state_transition]"), "stderr: {}", err);
    assert!(err.contains("[insufficient_resource]"), "stderr: {}", err);
    assert!(err.contains("Unrecognized command: fold"));
    assert!(out.contains("Commands:"));
    assert!(out.contains("Bankroll: 1000"));
}

#[test]
#[serial]
fn chips_command_shows_inventory() {
    let (code, out, _) = play("chips\nq\n", &[]);
    assert_eq!(code, 0);
    assert!(out.contains("Chips: superpose=2 collapse=2 entangle=1"));
}

#[test]
#[serial]
fn session_is_saved_and_reloaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saves").join("session.json");
    let path_str = path.to_string_lossy().into_owned();

    let (code, out, err) = play("bet 100\nstand\nq\n", &["--session", &path_str]);
    assert_eq!(code, 0, "stderr: {}", err);
    assert!(out.contains("Session saved to"));

    let saved = Session::load(&path).unwrap();
    assert_eq!(saved.rounds_played, 1);
    assert!(saved.saved_at.is_some());
    assert!(out.contains(&format!("Bankroll: {}", saved.bankroll)));

    let (code, out, _) = play("q\n", &["--session", &path_str]);
    assert_eq!(code, 0);
    assert!(out.contains(&format!("bankroll={}", saved.bankroll)));
}

#[test]
#[serial]
fn rounds_are_logged_as_jsonl() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rounds.jsonl");
    let path_str = path.to_string_lossy().into_owned();

    let (code, _, err) = play(
        "bet 10\nstand\nbet 10\nstand\nq\n",
        &["--log", &path_str],
    );
    assert_eq!(code, 0, "stderr: {}", err);

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().filter(|l| !l.trim().is_empty()).collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let v: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(v["round_id"].is_string());
        assert_eq!(v["seed"].as_u64(), Some(42));
        assert_eq!(v["bet"].as_u64(), Some(10));
    }
}
