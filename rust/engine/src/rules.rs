use serde::{Deserialize, Serialize};

use crate::chips::ChipPrices;
use crate::errors::{GameError, Resource};

/// Total return on a bet (stake included) as a ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub numerator: u32,
    pub denominator: u32,
}

impl Payout {
    pub const DOUBLE: Self = Self {
        numerator: 2,
        denominator: 1,
    };
    pub const FIVE_TO_TWO: Self = Self {
        numerator: 5,
        denominator: 2,
    };
    pub const STAKE: Self = Self {
        numerator: 1,
        denominator: 1,
    };

    /// Rounds down to whole chips.
    pub fn apply(&self, bet: u32) -> u32 {
        let v = u64::from(bet) * u64::from(self.numerator) / u64::from(self.denominator.max(1));
        u32::try_from(v).unwrap_or(u32::MAX)
    }
}

/// Table configuration for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRules {
    /// Dealer draws while its minimum total is below this.
    pub dealer_stands_on: u16,
    /// Regular win.
    pub win_payout: Payout,
    /// Two-card natural 21 for the player.
    pub blackjack_payout: Payout,
    /// Push returns the stake.
    pub push_payout: Payout,
    /// A new round starts from a fresh shuffle when fewer faces remain.
    pub reshuffle_threshold: usize,
    pub chip_prices: ChipPrices,
}

impl Default for TableRules {
    fn default() -> Self {
        Self {
            dealer_stands_on: 17,
            win_payout: Payout::DOUBLE,
            blackjack_payout: Payout::FIVE_TO_TWO,
            push_payout: Payout::STAKE,
            reshuffle_threshold: 16,
            chip_prices: ChipPrices::default(),
        }
    }
}

/// Validates a bet against the bankroll.
///
/// # Errors
///
/// - [`GameError::InvalidBetAmount`] - zero bet
/// - [`GameError::InsufficientResource`] - bet larger than the bankroll
///
/// # Examples
///
/// ```
/// use qjack_engine::rules::validate_bet;
/// use qjack_engine::errors::GameError;
///
/// assert_eq!(validate_bet(100, 1000), Ok(100));
/// assert!(matches!(validate_bet(0, 1000), Err(GameError::InvalidBetAmount { .. })));
/// assert!(matches!(
///     validate_bet(2000, 1000),
///     Err(GameError::InsufficientResource(_))
/// ));
/// ```
pub fn validate_bet(amount: u32, bankroll: u32) -> Result<u32, GameError> {
    if amount == 0 {
        return Err(GameError::InvalidBetAmount { amount });
    }
    if amount > bankroll {
        return Err(GameError::InsufficientResource(Resource::Bankroll {
            needed: amount,
            available: bankroll,
        }));
    }
    Ok(amount)
}
