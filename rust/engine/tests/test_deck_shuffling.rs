use std::collections::HashSet;

use qjack_engine::cards::full_deck;
use qjack_engine::deck::Deck;
use qjack_engine::errors::GameError;

#[test]
fn same_seed_same_order() {
    let mut d1 = Deck::new_with_seed(12345);
    let mut d2 = Deck::new_with_seed(12345);
    d1.shuffle();
    d2.shuffle();
    for _ in 0..52 {
        assert_eq!(d1.try_draw(), d2.try_draw());
    }
}

#[test]
fn different_seeds_differ() {
    let mut d1 = Deck::new_with_seed(1);
    let mut d2 = Deck::new_with_seed(2);
    d1.shuffle();
    d2.shuffle();
    let a: Vec<_> = (0..52).map(|_| d1.draw()).collect();
    let b: Vec<_> = (0..52).map(|_| d2.draw()).collect();
    assert_ne!(a, b);
}

#[test]
fn shuffle_is_a_permutation_of_52_faces() {
    let mut deck = Deck::new_with_seed(99);
    deck.shuffle();
    let drawn: HashSet<_> = (0..52).map(|_| deck.draw()).collect();
    let all: HashSet<_> = full_deck().into_iter().collect();
    assert_eq!(drawn, all);
    assert_eq!(deck.try_draw(), Err(GameError::DeckExhausted));
}

#[test]
fn draw_never_fails_and_counts_reshuffles() {
    let mut deck = Deck::new_with_seed(5);
    deck.shuffle();
    for _ in 0..(52 * 3 + 1) {
        deck.draw();
    }
    assert_eq!(deck.reshuffles(), 3);
}

#[test]
fn pairs_are_always_distinct() {
    let mut deck = Deck::new_with_seed(77);
    deck.shuffle();
    for _ in 0..500 {
        let (a, b) = deck.draw_pair();
        assert_ne!(a, b);
    }
}
