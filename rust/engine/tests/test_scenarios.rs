use qjack_engine::cards::{Card, Color, Rank as R, Suit as S};
use qjack_engine::chips::ChipKind;
use qjack_engine::deck::Deck;
use qjack_engine::engine::{Engine, Outcome, RoundState};
use qjack_engine::events::GameEvent;
use qjack_engine::hand::Owner;
use qjack_engine::logger::QuantumOp;
use qjack_engine::rules::TableRules;
use qjack_engine::session::Session;

fn c(rank: R, suit: S) -> Card {
    Card::new(rank, suit)
}

fn engine_with(faces: Vec<Card>) -> Engine {
    Engine::with_deck(
        TableRules::default(),
        Session::default(),
        Deck::stacked(faces, 42),
        42,
    )
}

#[test]
fn dealer_bust_pays_double() {
    // P: 10 + 8 = 18. D: 10 + 4 = 14, draws 10 -> 24
    let mut e = engine_with(vec![
        c(R::Ten, S::Spades),
        c(R::Two, S::Clubs),
        c(R::Ten, S::Clubs),
        c(R::Three, S::Clubs),
        c(R::Eight, S::Hearts),
        c(R::Three, S::Diamonds),
        c(R::Four, S::Diamonds),
        c(R::Five, S::Clubs),
        c(R::Ten, S::Diamonds),
        c(R::Six, S::Clubs),
    ]);
    assert_eq!(e.bankroll(), 1000);
    e.place_bet(100).unwrap();
    assert_eq!(e.bankroll(), 900);
    assert_eq!(e.state(), RoundState::PlayerTurn);

    e.stand().unwrap();
    let r = *e.last_result().unwrap();
    assert_eq!(r.outcome, Outcome::DealerBust);
    assert_eq!(r.dealer_total, 24);
    assert_eq!(r.payout, 200);
    assert_eq!(e.bankroll(), 1100);
    assert_eq!(e.hand(Owner::Dealer).len(), 3);

    let events = e.drain_events();
    let states: Vec<_> = events
        .iter()
        .filter_map(|ev| match ev {
            GameEvent::RoundStateChanged { state } => Some(*state),
            _ => None,
        })
        .collect();
    assert_eq!(
        states,
        vec![
            RoundState::Betting,
            RoundState::PlayerTurn,
            RoundState::DealerTurn,
            RoundState::Resolving,
            RoundState::GameOver,
        ]
    );
    assert!(events.contains(&GameEvent::CardRevealed {
        card: e.hand(Owner::Dealer).cards()[1],
        face: c(R::Four, S::Diamonds),
    }));
    assert!(events.contains(&GameEvent::RoundResult {
        outcome: Outcome::DealerBust,
        payout: 200,
        bankroll: 1100,
    }));
}

fn natural_deal(dealer_hole: Card) -> Vec<Card> {
    vec![
        c(R::Ace, S::Spades),
        c(R::Two, S::Clubs),
        c(R::King, S::Clubs),
        c(R::Three, S::Clubs),
        c(R::King, S::Hearts),
        c(R::Three, S::Diamonds),
        dealer_hole,
        c(R::Five, S::Clubs),
    ]
}

#[test]
fn natural_blackjack_short_circuits_and_pays_five_to_two() {
    let mut e = engine_with(natural_deal(c(R::Six, S::Diamonds)));
    e.place_bet(100).unwrap();
    assert_eq!(e.state(), RoundState::GameOver);
    let r = e.last_result().unwrap();
    assert_eq!(r.outcome, Outcome::PlayerBlackjack);
    assert_eq!(r.payout, 250);
    assert_eq!(e.bankroll(), 1150);
    // dealer never played
    assert_eq!(e.hand(Owner::Dealer).len(), 2);
    let states: Vec<_> = e
        .drain_events()
        .into_iter()
        .filter_map(|ev| match ev {
            GameEvent::RoundStateChanged { state } => Some(state),
            _ => None,
        })
        .collect();
    assert!(!states.contains(&RoundState::PlayerTurn));
    assert!(states.contains(&RoundState::Resolving));
}

#[test]
fn natural_against_dealer_21_is_push() {
    let mut e = engine_with(natural_deal(c(R::Ace, S::Diamonds)));
    e.place_bet(100).unwrap();
    let r = e.last_result().unwrap();
    assert_eq!(r.outcome, Outcome::Push);
    assert_eq!(r.payout, 100);
    assert_eq!(e.bankroll(), 1000);
}

#[test]
fn superposed_six_nine_displays_range() {
    let mut e = engine_with(vec![
        c(R::Six, S::Diamonds),
        c(R::Nine, S::Clubs),
        c(R::Ten, S::Clubs),
        c(R::Three, S::Clubs),
        c(R::Two, S::Hearts),
        c(R::Three, S::Diamonds),
        c(R::Seven, S::Diamonds),
        c(R::Five, S::Clubs),
    ]);
    e.place_bet(100).unwrap();
    let p1 = e.hand(Owner::Player).cards()[0];
    assert_eq!(e.value_range(Owner::Player).to_string(), "8");

    e.use_chip(ChipKind::Superpose, p1).unwrap();
    assert_eq!(e.card(p1).unwrap().value_range(), (6, 9));
    let r = e.value_range(Owner::Player);
    assert_eq!((r.min, r.max), (8, 11));
    assert_eq!(r.to_string(), "8-11 (uncertain)");
    assert_eq!(e.chips().count(ChipKind::Superpose), 1);

    let events = e.drain_events();
    assert!(events.iter().any(|ev| matches!(
        ev,
        GameEvent::CardSuperposed { probability_a, .. } if (probability_a - 0.5).abs() < 1e-9
    )));
    assert!(events.contains(&GameEvent::HandValueChanged {
        owner: Owner::Player,
        min: 8,
        max: 11,
        uncertain: true,
    }));
}

#[test]
fn entangled_partner_follows_red_collapse() {
    // P1 = 5♥|4♦ (always red), P2 = 10♣|2♥
    let mut e = engine_with(vec![
        c(R::Five, S::Hearts),
        c(R::Four, S::Diamonds),
        c(R::Nine, S::Clubs),
        c(R::Three, S::Clubs),
        c(R::Ten, S::Clubs),
        c(R::Two, S::Hearts),
        c(R::Seven, S::Diamonds),
        c(R::Five, S::Clubs),
    ]);
    e.place_bet(100).unwrap();
    let (p1, p2) = {
        let cards = e.hand(Owner::Player).cards();
        (cards[0], cards[1])
    };
    e.use_chip(ChipKind::Superpose, p1).unwrap();
    e.use_chip(ChipKind::Superpose, p2).unwrap();
    e.entangle_selection(p1, p2).unwrap();
    assert_eq!(e.partner(p1), Some(p2));
    assert_eq!(e.partner(p2), Some(p1));

    e.use_chip(ChipKind::Collapse, p1).unwrap();
    let a = e.card(p1).unwrap().resolved_face().unwrap();
    let b = e.card(p2).unwrap().resolved_face().unwrap();
    assert_eq!(a.color(), Color::Red);
    assert_eq!(b, c(R::Two, S::Hearts));
    assert_eq!(e.partner(p1), None);
    assert_eq!(e.partner(p2), None);

    let events = e.drain_events();
    assert!(events.contains(&GameEvent::CardCollapsed {
        card: p2,
        face: c(R::Two, S::Hearts),
        propagated: true,
    }));

    e.stand().unwrap();
    let record = e.last_record().unwrap();
    assert_eq!(record.quantum_ops.len(), 4);
    assert_eq!(
        record.quantum_ops[3],
        QuantumOp::Collapse {
            card: p1,
            face: a,
            partner: Some((p2, c(R::Two, S::Hearts))),
        }
    );
}

#[test]
fn same_seed_replays_identically() {
    let play = |seed: u64| {
        let session = Session::default();
        let mut e = Engine::new(TableRules::default(), session, Some(seed));
        let mut log = Vec::new();
        for _ in 0..5 {
            e.place_bet(10).unwrap();
            if e.state() == RoundState::PlayerTurn {
                let p1 = e.hand(Owner::Player).cards()[0];
                let _ = e.use_chip(ChipKind::Superpose, p1);
            }
            if e.state() == RoundState::PlayerTurn {
                e.stand().unwrap();
            }
            log.extend(e.drain_events());
        }
        (log, e.bankroll())
    };
    assert_eq!(play(31), play(31));
}
