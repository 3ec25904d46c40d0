use std::fmt;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::chips::{ChipInventory, ChipKind};
use crate::deck::Deck;
use crate::errors::{GameError, Ineligibility, Resource};
use crate::events::{EventQueue, GameEvent};
use crate::hand::{value_range, Hand, Owner, ValueRange, BLACKJACK};
use crate::logger::{QuantumOp, RoundRecord};
use crate::player::PlayerAction;
use crate::quantum::{CardId, CardStore, CollapseOutcome, QuantumCard};
use crate::rules::{validate_bet, TableRules};
use crate::session::Session;

/// Mixed into the seed for the collapse stream so it is independent of the shuffle.
const COLLAPSE_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundState {
    Idle,
    Betting,
    PlayerTurn,
    DealerTurn,
    Resolving,
    GameOver,
}

impl RoundState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundState::Idle => "idle",
            RoundState::Betting => "betting",
            RoundState::PlayerTurn => "player_turn",
            RoundState::DealerTurn => "dealer_turn",
            RoundState::Resolving => "resolving",
            RoundState::GameOver => "game_over",
        }
    }
}

impl fmt::Display for RoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Two-card 21 dealt collapsed, dealer without 21
    PlayerBlackjack,
    PlayerWin,
    DealerBust,
    DealerWin,
    PlayerBust,
    Push,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::PlayerBlackjack => "player_blackjack",
            Outcome::PlayerWin => "player_win",
            Outcome::DealerBust => "dealer_bust",
            Outcome::DealerWin => "dealer_win",
            Outcome::PlayerBust => "player_bust",
            Outcome::Push => "push",
        }
    }

    pub fn player_wins(&self) -> bool {
        matches!(
            self,
            Outcome::PlayerBlackjack | Outcome::PlayerWin | Outcome::DealerBust
        )
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub outcome: Outcome,
    /// Amount returned to the bankroll, stake included
    pub payout: u32,
    pub player_total: u16,
    pub dealer_total: u16,
}

/// Round orchestrator for one table: betting, dealing, player and dealer
/// turns, resolution.
///
/// Every operation runs synchronously and appends [`GameEvent`]s for the
/// presenter. Operations invoked in the wrong state return an error and
/// leave the engine untouched.
///
/// # Examples
///
/// ```
/// use qjack_engine::engine::{Engine, RoundState};
/// use qjack_engine::rules::TableRules;
/// use qjack_engine::session::Session;
///
/// let mut engine = Engine::new(TableRules::default(), Session::default(), Some(7));
/// assert_eq!(engine.state(), RoundState::Idle);
/// assert!(engine.hit().is_err());
///
/// engine.place_bet(100).unwrap();
/// assert_eq!(engine.bet(), 100);
/// if engine.state() == RoundState::PlayerTurn {
///     engine.stand().unwrap();
/// }
/// assert_eq!(engine.state(), RoundState::GameOver);
/// assert!(engine.last_result().is_some());
/// ```
#[derive(Debug)]
pub struct Engine {
    state: RoundState,
    deck: Deck,
    collapse_rng: ChaCha20Rng,
    store: CardStore,
    player: Hand,
    dealer: Hand,
    /// Dealer's face-down card, cleared once revealed
    hole: Option<CardId>,
    /// Player was dealt a collapsed two-card 21
    natural: bool,
    bet: u32,
    session: Session,
    rules: TableRules,
    events: EventQueue,
    busy: bool,
    held: bool,
    shown: [ValueRange; 2],
    seed: u64,
    round: u32,
    ops: Vec<QuantumOp>,
    last_result: Option<RoundResult>,
    last_record: Option<RoundRecord>,
}

impl Engine {
    /// Engine with a freshly shuffled deck. Without a seed one is drawn at
    /// random; [`Engine::seed`] reports it either way.
    pub fn new(rules: TableRules, session: Session, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        let mut deck = Deck::new_with_seed(seed);
        deck.shuffle();
        Self::with_deck(rules, session, deck, seed)
    }

    /// Engine dealing from `deck` as given (no initial shuffle).
    pub fn with_deck(rules: TableRules, session: Session, deck: Deck, seed: u64) -> Self {
        Self {
            state: RoundState::Idle,
            deck,
            collapse_rng: ChaCha20Rng::seed_from_u64(seed ^ COLLAPSE_STREAM),
            store: CardStore::new(),
            player: Hand::new(Owner::Player),
            dealer: Hand::new(Owner::Dealer),
            hole: None,
            natural: false,
            bet: 0,
            session,
            rules,
            events: EventQueue::new(),
            busy: false,
            held: false,
            shown: [ValueRange::EMPTY; 2],
            seed,
            round: 0,
            ops: Vec::new(),
            last_result: None,
            last_record: None,
        }
    }

    /// Runs one inbound intent to completion.
    ///
    /// # Errors
    ///
    /// - [`GameError::ActionInFlight`] while another action runs or input is held
    /// - [`GameError::InvalidStateTransition`] when the action is illegal in the current state
    /// - [`GameError::InsufficientResource`] / [`GameError::IneligibleCardOperation`]
    ///   for chip operations that cannot proceed
    pub fn apply(&mut self, action: PlayerAction) -> Result<(), GameError> {
        if self.busy || self.held {
            return Err(GameError::ActionInFlight);
        }
        let name = action.name();
        self.busy = true;
        let result = match action {
            PlayerAction::PlaceBet(amount) => self.do_place_bet(amount),
            PlayerAction::Hit => self.do_hit(),
            PlayerAction::Stand => self.do_stand(),
            PlayerAction::UseChip { kind, card } => self.do_use_chip(kind, card),
            PlayerAction::Entangle { a, b } => self.do_entangle(a, b),
            PlayerAction::BuyChip(kind) => self.do_buy_chip(kind),
            PlayerAction::NewRound => self.do_new_round(),
        };
        self.busy = false;
        if let Err(e) = &result {
            tracing::debug!(action = name, reason = e.code(), "action rejected");
        }
        result
    }

    pub fn place_bet(&mut self, amount: u32) -> Result<(), GameError> {
        self.apply(PlayerAction::PlaceBet(amount))
    }

    pub fn hit(&mut self) -> Result<(), GameError> {
        self.apply(PlayerAction::Hit)
    }

    pub fn stand(&mut self) -> Result<(), GameError> {
        self.apply(PlayerAction::Stand)
    }

    pub fn use_chip(&mut self, kind: ChipKind, card: CardId) -> Result<(), GameError> {
        self.apply(PlayerAction::UseChip { kind, card })
    }

    pub fn entangle_selection(&mut self, a: CardId, b: CardId) -> Result<(), GameError> {
        self.apply(PlayerAction::Entangle { a, b })
    }

    pub fn buy_chip(&mut self, kind: ChipKind) -> Result<(), GameError> {
        self.apply(PlayerAction::BuyChip(kind))
    }

    pub fn start_new_round(&mut self) -> Result<(), GameError> {
        self.apply(PlayerAction::NewRound)
    }

    /// Blocks further actions until [`Engine::release_input`], e.g. while
    /// the presenter animates queued events.
    pub fn hold_input(&mut self) {
        self.held = true;
    }

    pub fn release_input(&mut self) {
        self.held = false;
    }

    pub fn is_input_held(&self) -> bool {
        self.held
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn pending_events(&self) -> &EventQueue {
        &self.events
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn bankroll(&self) -> u32 {
        self.session.bankroll
    }

    pub fn bet(&self) -> u32 {
        self.bet
    }

    pub fn chips(&self) -> &ChipInventory {
        &self.session.chips
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    pub fn hand(&self, owner: Owner) -> &Hand {
        match owner {
            Owner::Player => &self.player,
            Owner::Dealer => &self.dealer,
        }
    }

    pub fn card(&self, id: CardId) -> Option<&QuantumCard> {
        self.store.get(id)
    }

    pub fn partner(&self, id: CardId) -> Option<CardId> {
        self.store.partner(id)
    }

    pub fn is_hidden(&self, id: CardId) -> bool {
        self.hole == Some(id)
    }

    /// Range of the cards a player can see; the dealer's hole card is left out.
    pub fn value_range(&self, owner: Owner) -> ValueRange {
        let hand = self.hand(owner);
        value_range(
            hand.cards()
                .iter()
                .filter(|&&id| Some(id) != self.hole)
                .filter_map(|&id| self.store.get(id)),
        )
    }

    pub fn last_result(&self) -> Option<&RoundResult> {
        self.last_result.as_ref()
    }

    pub fn last_record(&self) -> Option<&RoundRecord> {
        self.last_record.as_ref()
    }

    fn expect_state(&self, action: &'static str, allowed: &[RoundState]) -> Result<(), GameError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(GameError::InvalidStateTransition {
                action,
                state: self.state,
            })
        }
    }

    fn transition(&mut self, to: RoundState) {
        tracing::info!(from = %self.state, to = %to, round = self.round, "round state");
        self.state = to;
        self.events.push(GameEvent::RoundStateChanged { state: to });
    }

    fn do_place_bet(&mut self, amount: u32) -> Result<(), GameError> {
        self.expect_state("place bet", &[RoundState::Idle, RoundState::GameOver])?;
        validate_bet(amount, self.session.bankroll)?;
        if self.state == RoundState::GameOver {
            self.reset_round();
        }
        self.session.bankroll -= amount;
        self.bet = amount;
        self.round += 1;
        self.transition(RoundState::Betting);
        tracing::info!(bet = amount, bankroll = self.session.bankroll, "bet placed");

        self.deal_to(Owner::Player, false)?;
        self.deal_to(Owner::Dealer, false)?;
        self.deal_to(Owner::Player, false)?;
        self.deal_to(Owner::Dealer, true)?;
        self.refresh_ranges();

        if self.player.is_natural(&self.store) {
            self.natural = true;
            tracing::info!("player natural blackjack");
            return self.resolve();
        }
        self.transition(RoundState::PlayerTurn);
        Ok(())
    }

    fn do_hit(&mut self) -> Result<(), GameError> {
        self.expect_state("hit", &[RoundState::PlayerTurn])?;
        self.deal_to(Owner::Player, false)?;
        self.after_player_mutation()
    }

    fn do_stand(&mut self) -> Result<(), GameError> {
        self.expect_state("stand", &[RoundState::PlayerTurn])?;
        let pending: Vec<CardId> = self.player.cards().to_vec();
        for id in pending {
            if self.is_superposed(id) {
                self.collapse_card(id)?;
            }
        }
        self.refresh_ranges();
        if self.player.value_range(&self.store).is_bust() {
            return self.resolve();
        }
        self.play_dealer()
    }

    fn do_use_chip(&mut self, kind: ChipKind, card: CardId) -> Result<(), GameError> {
        self.expect_state("use chip", &[RoundState::PlayerTurn])?;
        self.ensure_chip(kind)?;
        self.ensure_visible(card)?;
        match kind {
            ChipKind::Superpose => {
                self.store.superpose(card)?;
                if let Some(qc) = self.store.get(card) {
                    let (face_a, face_b) = qc.faces();
                    self.events.push(GameEvent::CardSuperposed {
                        card,
                        face_a,
                        face_b,
                        probability_a: qc.probability_a().unwrap_or(1.0),
                    });
                }
                self.ops.push(QuantumOp::Superpose { card });
            }
            ChipKind::Collapse => {
                let outcome = self.collapse_card(card)?;
                self.ops.push(QuantumOp::Collapse {
                    card,
                    face: outcome.face,
                    partner: outcome.partner.map(|p| (p.card, p.face)),
                });
            }
            ChipKind::Entangle => return Err(Ineligibility::NeedsTwoCards.into()),
        }
        self.spend_chip(kind)?;
        self.after_player_mutation()
    }

    fn do_entangle(&mut self, a: CardId, b: CardId) -> Result<(), GameError> {
        self.expect_state("entangle", &[RoundState::PlayerTurn])?;
        self.ensure_chip(ChipKind::Entangle)?;
        self.ensure_visible(a)?;
        self.ensure_visible(b)?;
        self.store.entangle(a, b)?;
        self.events.push(GameEvent::CardsEntangled { a, b });
        self.ops.push(QuantumOp::Entangle { a, b });
        self.spend_chip(ChipKind::Entangle)
    }

    fn do_buy_chip(&mut self, kind: ChipKind) -> Result<(), GameError> {
        self.expect_state("buy chip", &[RoundState::PlayerTurn, RoundState::GameOver])?;
        let prices = self.rules.chip_prices;
        self.session
            .chips
            .purchase(kind, &mut self.session.bankroll, &prices)?;
        tracing::info!(chip = %kind, bankroll = self.session.bankroll, "chip purchased");
        self.events.push(GameEvent::ChipCountChanged {
            inventory: self.session.chips.clone(),
        });
        Ok(())
    }

    fn do_new_round(&mut self) -> Result<(), GameError> {
        self.expect_state("start new round", &[RoundState::GameOver])?;
        self.reset_round();
        self.transition(RoundState::Idle);
        Ok(())
    }

    fn reset_round(&mut self) {
        self.store.clear();
        self.player.clear();
        self.dealer.clear();
        self.hole = None;
        self.natural = false;
        self.bet = 0;
        self.ops.clear();
        self.refresh_ranges();
        if self.deck.remaining() < self.rules.reshuffle_threshold {
            self.deck.shuffle();
            tracing::info!(remaining = self.deck.remaining(), "deck reshuffled between rounds");
            self.events.push(GameEvent::DeckShuffled {
                remaining: self.deck.remaining(),
            });
        }
    }

    fn deal_to(&mut self, owner: Owner, hidden: bool) -> Result<CardId, GameError> {
        let before = self.deck.reshuffles();
        let (a, b) = self.deck.draw_pair();
        if self.deck.reshuffles() != before {
            self.events.push(GameEvent::DeckShuffled {
                remaining: self.deck.remaining(),
            });
        }
        let id = self.store.insert(a, b)?;
        match owner {
            Owner::Player => self.player.add_card(id),
            Owner::Dealer => self.dealer.add_card(id),
        }
        if hidden {
            self.hole = Some(id);
        }
        if hidden {
            tracing::debug!(card = %id, owner = owner.as_str(), "hole card dealt");
        } else {
            tracing::debug!(card = %id, owner = owner.as_str(), face_a = %a, face_b = %b, "card dealt");
        }
        self.events.push(GameEvent::CardDealt {
            card: id,
            owner,
            face: (!hidden).then_some(a),
        });
        Ok(id)
    }

    fn ensure_chip(&self, kind: ChipKind) -> Result<(), GameError> {
        if self.session.chips.has(kind) {
            Ok(())
        } else {
            Err(GameError::InsufficientResource(Resource::Chip(kind)))
        }
    }

    fn spend_chip(&mut self, kind: ChipKind) -> Result<(), GameError> {
        self.session.chips.use_chip(kind)?;
        self.events.push(GameEvent::ChipCountChanged {
            inventory: self.session.chips.clone(),
        });
        Ok(())
    }

    fn ensure_visible(&self, id: CardId) -> Result<(), GameError> {
        if self.store.get(id).is_none() {
            return Err(Ineligibility::UnknownCard.into());
        }
        if self.is_hidden(id) {
            return Err(Ineligibility::HiddenCard.into());
        }
        Ok(())
    }

    fn is_superposed(&self, id: CardId) -> bool {
        self.store.get(id).is_some_and(|c| c.is_superposed())
    }

    fn collapse_card(&mut self, id: CardId) -> Result<CollapseOutcome, GameError> {
        let outcome = self.store.collapse(id, &mut self.collapse_rng)?;
        self.events.push(GameEvent::CardCollapsed {
            card: id,
            face: outcome.face,
            propagated: false,
        });
        if let Some(p) = outcome.partner {
            self.events.push(GameEvent::CardCollapsed {
                card: p.card,
                face: p.face,
                propagated: true,
            });
        }
        Ok(outcome)
    }

    fn after_player_mutation(&mut self) -> Result<(), GameError> {
        self.refresh_ranges();
        if self.player.value_range(&self.store).is_bust() {
            tracing::info!("player hand is a guaranteed bust");
            return self.resolve();
        }
        Ok(())
    }

    /// Emits `HandValueChanged` for every hand whose visible range moved.
    fn refresh_ranges(&mut self) {
        for (slot, owner) in [Owner::Player, Owner::Dealer].into_iter().enumerate() {
            let range = self.value_range(owner);
            if range != self.shown[slot] {
                self.shown[slot] = range;
                self.events.push(GameEvent::HandValueChanged {
                    owner,
                    min: range.min,
                    max: range.max,
                    uncertain: range.uncertain,
                });
            }
        }
    }

    fn reveal_hole(&mut self) {
        let Some(id) = self.hole.take() else {
            return;
        };
        if let Some(face) = self.store.get(id).and_then(|c| c.resolved_face()) {
            tracing::debug!(card = %id, face = %face, "hole card revealed");
            self.events.push(GameEvent::CardRevealed { card: id, face });
        }
    }

    fn play_dealer(&mut self) -> Result<(), GameError> {
        self.transition(RoundState::DealerTurn);
        self.reveal_hole();
        let dealer_cards: Vec<CardId> = self.dealer.cards().to_vec();
        for id in dealer_cards {
            if self.is_superposed(id) {
                self.collapse_card(id)?;
            }
        }
        self.refresh_ranges();
        while self.dealer.value_range(&self.store).min < self.rules.dealer_stands_on {
            self.deal_to(Owner::Dealer, false)?;
            self.refresh_ranges();
        }
        self.resolve()
    }

    fn resolve(&mut self) -> Result<(), GameError> {
        self.transition(RoundState::Resolving);
        self.reveal_hole();
        let pending: Vec<CardId> = self
            .store
            .iter()
            .filter(|c| c.is_superposed())
            .map(|c| c.id())
            .collect();
        for id in pending {
            // an earlier collapse may already have resolved it as a partner
            if self.is_superposed(id) {
                self.collapse_card(id)?;
            }
        }
        self.refresh_ranges();

        let player_total = self.player.value_range(&self.store).min;
        let dealer_total = self.dealer.value_range(&self.store).min;
        let outcome = if player_total > BLACKJACK {
            Outcome::PlayerBust
        } else if self.natural {
            if dealer_total == BLACKJACK {
                Outcome::Push
            } else {
                Outcome::PlayerBlackjack
            }
        } else if dealer_total > BLACKJACK {
            Outcome::DealerBust
        } else if player_total > dealer_total {
            Outcome::PlayerWin
        } else if player_total < dealer_total {
            Outcome::DealerWin
        } else {
            Outcome::Push
        };
        let payout = match outcome {
            Outcome::PlayerBlackjack => self.rules.blackjack_payout.apply(self.bet),
            Outcome::PlayerWin | Outcome::DealerBust => self.rules.win_payout.apply(self.bet),
            Outcome::Push => self.rules.push_payout.apply(self.bet),
            Outcome::DealerWin | Outcome::PlayerBust => 0,
        };
        self.session.bankroll = self.session.bankroll.saturating_add(payout);
        self.session.rounds_played += 1;
        tracing::info!(
            outcome = %outcome,
            player_total,
            dealer_total,
            payout,
            bankroll = self.session.bankroll,
            "round resolved"
        );

        self.events.push(GameEvent::RoundResult {
            outcome,
            payout,
            bankroll: self.session.bankroll,
        });
        self.last_result = Some(RoundResult {
            outcome,
            payout,
            player_total,
            dealer_total,
        });
        self.last_record = Some(RoundRecord {
            round_id: None,
            round: self.round,
            seed: Some(self.seed),
            bet: self.bet,
            player: self.final_faces(Owner::Player),
            dealer: self.final_faces(Owner::Dealer),
            player_total,
            dealer_total,
            quantum_ops: self.ops.clone(),
            outcome,
            payout,
            bankroll_after: self.session.bankroll,
            ts: None,
        });
        self.transition(RoundState::GameOver);
        Ok(())
    }

    fn final_faces(&self, owner: Owner) -> Vec<Card> {
        self.hand(owner)
            .cards()
            .iter()
            .filter_map(|&id| self.store.get(id).and_then(|c| c.resolved_face()))
            .collect()
    }
}
