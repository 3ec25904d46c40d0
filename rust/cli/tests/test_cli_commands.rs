use qjack_cli::run;
use serial_test::serial;

fn run_capture(args: &[&str]) -> (i32, String, String) {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = run(args.iter().copied(), &mut out, &mut err);
    (
        code,
        String::from_utf8_lossy(&out).into_owned(),
        String::from_utf8_lossy(&err).into_owned(),
    )
}

#[test]
fn help_lists_subcommands() {
    let (code, out, _) = run_capture(&["qjack", "--help"]);
    assert_eq!(code, 0);
    for cmd in ["play", "sim", "cfg"] {
        assert!(out.contains(cmd), "help should mention {}: {}", cmd, out);
    }
}

#[test]
fn version_exits_zero() {
    let (code, out, _) = run_capture(&["qjack", "--version"]);
    assert_eq!(code, 0);
    assert!(out.contains("qjack"));
}

#[test]
fn unknown_subcommand_exits_two_with_usage() {
    let (code, out, err) = run_capture(&["qjack", "deal"]);
    assert_eq!(code, 2);
    assert!(out.is_empty());
    assert!(err.contains("Usage: qjack <command> [options]"));
}

#[test]
fn missing_subcommand_exits_two() {
    let (code, _, _) = run_capture(&["qjack"]);
    assert_eq!(code, 2);
}

#[test]
fn bad_flag_value_exits_two() {
    let (code, _, err) = run_capture(&["qjack", "sim", "--rounds", "many"]);
    assert_eq!(code, 2);
    assert!(err.contains("--rounds"));
}

#[test]
#[serial]
fn cfg_prints_json() {
    unsafe {
        std::env::remove_var("QJACK_CONFIG");
    }
    let (code, out, err) = run_capture(&["qjack", "cfg"]);
    assert_eq!(code, 0, "stderr: {}", err);
    let json: serde_json::Value = serde_json::from_str(&out).expect("cfg prints JSON");
    assert!(json["bankroll"]["value"].is_u64());
}
