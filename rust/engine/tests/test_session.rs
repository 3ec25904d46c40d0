use qjack_engine::chips::{ChipInventory, ChipKind};
use qjack_engine::engine::{Engine, RoundState};
use qjack_engine::rules::TableRules;
use qjack_engine::session::{Session, SessionError};

#[test]
fn save_then_load_restores_bankroll_and_chips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");

    let mut session = Session::new(740, ChipInventory::with_counts(1, 3, 0));
    session.rounds_played = 12;
    session.save(&path).unwrap();
    assert!(session.saved_at.is_some());

    let loaded = Session::load(&path).unwrap();
    assert_eq!(loaded, session);
    assert_eq!(loaded.chips.count(ChipKind::Collapse), 3);
}

#[test]
fn session_carries_across_engines() {
    let mut e = Engine::new(TableRules::default(), Session::default(), Some(17));
    e.place_bet(50).unwrap();
    if e.state() == RoundState::PlayerTurn {
        e.stand().unwrap();
    }
    let bankroll = e.bankroll();
    let session = e.into_session();
    assert_eq!(session.rounds_played, 1);

    let e2 = Engine::new(TableRules::default(), session, Some(18));
    assert_eq!(e2.bankroll(), bankroll);
    assert_eq!(e2.state(), RoundState::Idle);
}

#[test]
fn load_reports_missing_and_corrupt_files() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    assert!(matches!(Session::load(&missing), Err(SessionError::Io(_))));

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{ not json").unwrap();
    assert!(matches!(Session::load(&bad), Err(SessionError::Parse(_))));
}
