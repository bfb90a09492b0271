//! Player wallet: balance and current bet
//!
//! The wallet is the only place balance and bet change. It never raises:
//! out-of-range bet adjustments are clamped and an unaffordable bet is
//! refused through `place_bet` returning `false`.
//!
//! Invariants:
//! - `current_bet >= min_bet` at all times
//! - `current_bet <= max(balance, min_bet)` after every bet adjustment,
//!   restore and reset. `place_bet` only deducts, so a lost spin may leave the
//!   bet above the remaining balance until the next adjustment; the next
//!   `place_bet` then refuses it.
//! - `balance` never goes below zero (unsigned, deductions are gated)

use serde::{Deserialize, Serialize};

use crate::config::WalletConfig;

/// Starting balance for a new player
pub const DEFAULT_BALANCE: u64 = 1000;

/// Starting bet for a new player
pub const DEFAULT_BET: u64 = 10;

/// Floor for the current bet
pub const MIN_BET: u64 = 5;

/// Wallet limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetLimits {
    pub min_bet: u64,
    pub default_bet: u64,
    pub starting_balance: u64,
}

impl Default for BetLimits {
    fn default() -> Self {
        Self {
            min_bet: MIN_BET,
            default_bet: DEFAULT_BET,
            starting_balance: DEFAULT_BALANCE,
        }
    }
}

impl From<&WalletConfig> for BetLimits {
    fn from(config: &WalletConfig) -> Self {
        Self {
            min_bet: config.min_bet.max(1),
            default_bet: config.default_bet,
            starting_balance: config.starting_balance,
        }
    }
}

/// Balance and bet as seen by the UI and the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSnapshot {
    pub balance: u64,
    pub current_bet: u64,
}

/// Player wallet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wallet {
    balance: u64,
    current_bet: u64,
    limits: BetLimits,
}

impl Wallet {
    /// Wallet with default limits
    pub fn new() -> Self {
        Self::with_limits(BetLimits::default())
    }

    /// Fresh wallet for `limits`
    pub fn with_limits(limits: BetLimits) -> Self {
        let mut wallet = Self {
            balance: limits.starting_balance,
            current_bet: limits.default_bet,
            limits,
        };
        wallet.clamp_bet();
        wallet
    }

    /// Rebuild a wallet from persisted values
    ///
    /// A missing or negative balance falls back to the starting balance, a
    /// missing bet to the default bet. The bet is clamped into range.
    pub fn restore(limits: BetLimits, balance: Option<i64>, bet: Option<i64>) -> Self {
        let balance = match balance {
            Some(value) => u64::try_from(value).unwrap_or_else(|_| {
                log::warn!("Ignoring negative saved balance {}", value);
                limits.starting_balance
            }),
            None => limits.starting_balance,
        };
        let current_bet = match bet {
            Some(value) => u64::try_from(value).unwrap_or(limits.min_bet),
            None => limits.default_bet,
        };

        let mut wallet = Self {
            balance,
            current_bet,
            limits,
        };
        wallet.clamp_bet();
        if wallet.current_bet != current_bet {
            log::debug!(
                "Restored bet {} clamped to {}",
                current_bet,
                wallet.current_bet
            );
        }
        wallet
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    pub fn limits(&self) -> BetLimits {
        self.limits
    }

    pub fn min_bet(&self) -> u64 {
        self.limits.min_bet
    }

    pub fn snapshot(&self) -> WalletSnapshot {
        WalletSnapshot {
            balance: self.balance,
            current_bet: self.current_bet,
        }
    }

    /// Deduct the current bet if it is affordable
    pub fn place_bet(&mut self) -> bool {
        if self.current_bet > 0 && self.balance >= self.current_bet {
            self.balance -= self.current_bet;
            true
        } else {
            false
        }
    }

    /// Credit winnings
    pub fn add_to_balance(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
    }

    /// Raise the bet by `amount`, maxing out at the balance
    pub fn increase_bet(&mut self, amount: u64) {
        if amount == 0 {
            return;
        }
        match self.current_bet.checked_add(amount) {
            Some(bet) if bet <= self.balance => self.current_bet = bet,
            _ => self.current_bet = self.balance.max(self.limits.min_bet),
        }
    }

    /// Lower the bet by `amount`, stopping at the minimum bet
    pub fn decrease_bet(&mut self, amount: u64) {
        if amount == 0 {
            return;
        }
        match self.current_bet.checked_sub(amount) {
            Some(bet) if bet >= self.limits.min_bet => self.current_bet = bet,
            _ => self.current_bet = self.limits.min_bet,
        }
    }

    /// Set the bet directly, clamped into range
    pub fn set_bet(&mut self, amount: u64) {
        self.current_bet = amount;
        self.clamp_bet();
    }

    /// Bet the minimum
    pub fn min_out(&mut self) {
        self.current_bet = self.limits.min_bet;
    }

    /// Bet the whole balance
    pub fn max_out(&mut self) {
        let headroom = self.balance.saturating_sub(self.current_bet);
        if headroom > 0 {
            self.increase_bet(headroom);
        } else {
            self.current_bet = self.balance.max(self.limits.min_bet);
        }
    }

    /// Restore the starting balance
    ///
    /// The bet is kept when it is still affordable and lowered to the new
    /// balance otherwise.
    pub fn reset(&mut self) {
        self.balance = self.limits.starting_balance;
        self.clamp_bet();
        log::info!(
            "Wallet reset to {} (bet {})",
            self.balance,
            self.current_bet
        );
    }

    /// The "-" button is usable
    pub fn can_decrease(&self) -> bool {
        self.current_bet > self.limits.min_bet
    }

    /// The "+" and MAX buttons are usable
    pub fn can_increase(&self) -> bool {
        self.current_bet < self.balance
    }

    /// A quick "+amount" button is usable
    pub fn can_increase_by(&self, amount: u64) -> bool {
        self.current_bet
            .checked_add(amount)
            .is_some_and(|bet| bet <= self.balance)
    }

    /// `place_bet` would succeed
    pub fn can_afford_bet(&self) -> bool {
        self.current_bet > 0 && self.balance >= self.current_bet
    }

    /// Out of funds
    pub fn is_broke(&self) -> bool {
        self.balance == 0
    }

    fn clamp_bet(&mut self) {
        let ceiling = self.balance.max(self.limits.min_bet);
        self.current_bet = self.current_bet.clamp(self.limits.min_bet, ceiling);
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new()
    }
}
