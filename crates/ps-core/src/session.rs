//! Game session
//!
//! Ties the wallet, paytable, reels and history together and enforces that at
//! most one spin is in flight. A front-end drives a spin in two steps:
//!
//! ```text
//! start_spin() ──► SpinTicket (bet deducted, stop schedule, cues)
//!      │
//!      │   reels animate, stop at schedule.stops[i]
//!      ▼
//! resolve_spin(payline) ──► SpinReport (payout credited, history updated)
//! ```
//!
//! If the reels never report back, `abort_spin` settles the spin as a loss
//! once `schedule.watchdog_ms` has passed. Headless callers use `spin`, which
//! does both steps with the built-in reel set.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GameConfig;
use crate::history::{GameHistory, HistoryEntry, SessionStats};
use crate::paytable::{PayTable, SpinOutcome};
use crate::reels::{ReelSet, SpinGrid};
use crate::store::{WalletStore, load_wallet, save_wallet};
use crate::symbols::REEL_COUNT;
use crate::timing::{ReelSchedule, TimingConfig};
use crate::wallet::{BetLimits, Wallet, WalletSnapshot};

/// Audio trigger for the front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SoundCue {
    LeverPull,
    SpinStart,
    SpinStop,
    Win,
}

/// Whether a spin is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinPhase {
    #[default]
    Idle,
    Spinning { spin_id: u64, bet: u64 },
}

/// Why a spin did not start
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum SpinRejected {
    #[error("a spin is already in progress")]
    AlreadySpinning,

    #[error("insufficient funds: balance {balance}, bet {bet}")]
    #[serde(rename_all = "camelCase")]
    InsufficientFunds {
        balance: u64,
        bet: u64,
        /// How long to show the notice
        notice_ms: f64,
    },
}

/// A started spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinTicket {
    pub spin_id: u64,
    /// Amount deducted
    pub bet: u64,
    /// Balance after the deduction
    pub balance: u64,
    pub schedule: ReelSchedule,
    pub lever_reset_ms: f64,
    pub cues: Vec<SoundCue>,
}

/// A resolved spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinReport {
    pub spin_id: u64,
    pub bet: u64,
    pub symbols: Vec<String>,
    pub outcome: SpinOutcome,
    /// Balance after crediting the payout
    pub balance: u64,
    /// Bet after resolution (unchanged by the spin itself)
    pub current_bet: u64,
    /// How long to show the result banner
    pub display_ms: f64,
    pub cues: Vec<SoundCue>,
}

/// One player's game
pub struct GameSession<S: WalletStore> {
    config: GameConfig,
    wallet: Wallet,
    paytable: PayTable,
    reels: ReelSet,
    timing: TimingConfig,
    history: GameHistory,
    stats: SessionStats,
    store: S,
    phase: SpinPhase,
    spin_count: u64,
    rng: StdRng,
}

impl<S: WalletStore> GameSession<S> {
    /// Open a session, restoring the wallet from `store`
    pub fn open(config: GameConfig, store: S, seed: u64) -> Self {
        let limits = BetLimits::from(&config.wallet);
        let wallet = load_wallet(&store, &config.storage, limits);
        log::info!(
            "Session opened: balance {} bet {}",
            wallet.balance(),
            wallet.current_bet()
        );

        Self {
            paytable: PayTable::from_config(&config.paytable),
            reels: ReelSet::new(seed),
            timing: config.timing.resolve(),
            history: GameHistory::new(config.history_limit),
            stats: SessionStats::default(),
            store,
            phase: SpinPhase::Idle,
            spin_count: 0,
            rng: StdRng::seed_from_u64(seed.rotate_left(32)),
            wallet,
            config,
        }
    }

    // ═══ Spin lifecycle ═══

    /// Deduct the bet and start a spin
    pub fn start_spin(&mut self) -> Result<SpinTicket, SpinRejected> {
        if self.is_spinning() {
            return Err(SpinRejected::AlreadySpinning);
        }

        let bet = self.wallet.current_bet();
        if !self.wallet.place_bet() {
            log::info!(
                "Spin refused: balance {} below bet {}",
                self.wallet.balance(),
                bet
            );
            return Err(SpinRejected::InsufficientFunds {
                balance: self.wallet.balance(),
                bet,
                notice_ms: self.timing.funds_notice_ms,
            });
        }
        self.persist();

        self.spin_count += 1;
        let spin_id = self.spin_count;
        self.phase = SpinPhase::Spinning { spin_id, bet };
        log::debug!("Spin {} started with bet {}", spin_id, bet);

        Ok(SpinTicket {
            spin_id,
            bet,
            balance: self.wallet.balance(),
            schedule: self.timing.schedule(REEL_COUNT, &mut self.rng),
            lever_reset_ms: self.timing.lever_reset_ms,
            cues: vec![SoundCue::LeverPull, SoundCue::SpinStart],
        })
    }

    /// Settle the spin in flight with the payline the reels stopped on
    ///
    /// Returns `None` when no spin is in flight.
    pub fn resolve_spin<T: AsRef<str>>(&mut self, payline: &[T]) -> Option<SpinReport> {
        let SpinPhase::Spinning { spin_id, bet } = self.phase else {
            log::debug!("resolve_spin called with no spin in flight");
            return None;
        };
        self.phase = SpinPhase::Idle;

        let outcome = self.paytable.evaluate(payline, bet);
        self.history.push(HistoryEntry::new(bet, &outcome, payline));
        Some(self.settle(spin_id, bet, outcome, payline))
    }

    /// Force-stop a spin that never resolved; the bet is lost
    pub fn abort_spin(&mut self) -> Option<SpinReport> {
        let SpinPhase::Spinning { spin_id, bet } = self.phase else {
            return None;
        };
        self.phase = SpinPhase::Idle;
        log::warn!("Spin {} aborted by watchdog, bet {} lost", spin_id, bet);

        let outcome = self.paytable.evaluate::<&str>(&[], bet);
        Some(self.settle::<&str>(spin_id, bet, outcome, &[]))
    }

    /// Start, spin the built-in reels and resolve in one go
    pub fn spin(&mut self) -> Result<(SpinGrid, SpinReport), SpinRejected> {
        let ticket = self.start_spin()?;
        let grid = self.reels.spin();
        let payline = grid.payline_glyphs();

        self.phase = SpinPhase::Idle;
        let outcome = self.paytable.evaluate(&payline, ticket.bet);
        self.history
            .push(HistoryEntry::new(ticket.bet, &outcome, &payline));
        let report = self.settle(ticket.spin_id, ticket.bet, outcome, &payline);
        Ok((grid, report))
    }

    /// Spin the reels for the animation without touching the wallet
    pub fn spin_reels(&mut self) -> SpinGrid {
        self.reels.spin()
    }

    fn settle<T: AsRef<str>>(
        &mut self,
        spin_id: u64,
        bet: u64,
        outcome: SpinOutcome,
        payline: &[T],
    ) -> SpinReport {
        if outcome.payout > 0 {
            self.wallet.add_to_balance(outcome.payout);
            self.persist();
        }
        self.stats.record(bet, &outcome);

        let mut cues = vec![SoundCue::SpinStop];
        if outcome.is_win {
            cues.push(SoundCue::Win);
            log::info!("Spin {} won {} ({:?})", spin_id, outcome.payout, outcome.kind);
        } else {
            log::debug!("Spin {} lost {}", spin_id, bet);
        }

        SpinReport {
            spin_id,
            bet,
            symbols: payline.iter().map(|s| s.as_ref().to_string()).collect(),
            outcome,
            balance: self.wallet.balance(),
            current_bet: self.wallet.current_bet(),
            display_ms: self.timing.result_display_ms,
            cues,
        }
    }

    // ═══ Bet controls ═══

    /// Raise the bet; `false` while spinning
    pub fn increase_bet(&mut self, amount: u64) -> bool {
        self.adjust(|wallet| wallet.increase_bet(amount))
    }

    /// Lower the bet; `false` while spinning
    pub fn decrease_bet(&mut self, amount: u64) -> bool {
        self.adjust(|wallet| wallet.decrease_bet(amount))
    }

    /// Set the bet, clamped into range; `false` while spinning
    pub fn set_bet(&mut self, amount: u64) -> bool {
        self.adjust(|wallet| wallet.set_bet(amount))
    }

    /// Bet the minimum; `false` while spinning
    pub fn min_bet(&mut self) -> bool {
        self.adjust(Wallet::min_out)
    }

    /// Bet the whole balance; `false` while spinning
    pub fn max_bet(&mut self) -> bool {
        self.adjust(Wallet::max_out)
    }

    /// Restore the starting balance and start a fresh session
    pub fn reset_balance(&mut self) -> bool {
        if !self.adjust(Wallet::reset) {
            return false;
        }
        self.history.clear();
        self.stats.reset();
        true
    }

    fn adjust(&mut self, f: impl FnOnce(&mut Wallet)) -> bool {
        if self.is_spinning() {
            log::debug!("Bet controls are locked while spinning");
            return false;
        }
        f(&mut self.wallet);
        self.persist();
        true
    }

    fn persist(&self) {
        if let Err(e) = save_wallet(&self.store, &self.config.storage, &self.wallet) {
            log::warn!("Failed to persist wallet: {}", e);
        }
    }

    // ═══ Accessors ═══

    pub fn is_spinning(&self) -> bool {
        matches!(self.phase, SpinPhase::Spinning { .. })
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn snapshot(&self) -> WalletSnapshot {
        self.wallet.snapshot()
    }

    pub fn history(&self) -> &GameHistory {
        &self.history
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn paytable(&self) -> &PayTable {
        &self.paytable
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paytable::WinKind;
    use crate::store::MemoryStore;
    use crate::timing::TimingProfile;

    fn session() -> GameSession<MemoryStore> {
        GameSession::open(GameConfig::default(), MemoryStore::new(), 7)
    }

    #[test]
    fn test_spin_lifecycle() {
        let mut game = session();
        let ticket = game.start_spin().unwrap();
        assert_eq!(ticket.bet, 10);
        assert_eq!(ticket.balance, 990);
        assert_eq!(ticket.schedule.stops.len(), 3);
        assert_eq!(ticket.cues, vec![SoundCue::LeverPull, SoundCue::SpinStart]);
        assert!(game.is_spinning());

        let report = game.resolve_spin(&["👾", "👾", "🎮"]).unwrap();
        assert_eq!(report.outcome.payout, 20);
        assert_eq!(report.balance, 1010);
        assert_eq!(report.cues, vec![SoundCue::SpinStop, SoundCue::Win]);
        assert!(!game.is_spinning());
        assert_eq!(game.stats().session_balance, 10);
        assert_eq!(game.history().latest().map(|e| e.amount), Some(20));
    }

    #[test]
    fn test_one_spin_in_flight() {
        let mut game = session();
        game.start_spin().unwrap();
        assert_eq!(game.start_spin(), Err(SpinRejected::AlreadySpinning));
        assert_eq!(game.wallet().balance(), 990);

        assert!(!game.increase_bet(10));
        assert!(!game.max_bet());
        assert!(!game.reset_balance());
        assert_eq!(game.wallet().current_bet(), 10);
    }

    #[test]
    fn test_resolve_without_spin() {
        let mut game = session();
        assert!(game.resolve_spin(&["👾", "👾", "👾"]).is_none());
        assert!(game.abort_spin().is_none());
        assert_eq!(game.wallet().balance(), 1000);
    }

    #[test]
    fn test_insufficient_funds() {
        let store = MemoryStore::new();
        store.save("pixel-slots-balance", 5).unwrap();
        store.save("pixel-slots-bet", 5).unwrap();
        let mut game = GameSession::open(GameConfig::default(), store, 1);

        let report = game.start_spin().map(|_| game.resolve_spin(&["👾", "🎮", "🏆"]));
        assert!(matches!(report, Ok(Some(_))));
        assert_eq!(game.wallet().balance(), 0);
        assert!(game.wallet().is_broke());

        match game.start_spin() {
            Err(SpinRejected::InsufficientFunds { balance, bet, notice_ms }) => {
                assert_eq!(balance, 0);
                assert_eq!(bet, 5);
                assert_eq!(notice_ms, 2000.0);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(!game.is_spinning());
    }

    #[test]
    fn test_abort_loses_bet() {
        let mut game = session();
        game.start_spin().unwrap();
        let report = game.abort_spin().unwrap();
        assert_eq!(report.outcome.kind, WinKind::Malformed);
        assert_eq!(report.balance, 990);
        assert_eq!(game.stats().losses, 1);
        assert!(game.history().is_empty());
        assert!(!game.is_spinning());
    }

    #[test]
    fn test_malformed_payline_is_a_loss() {
        let mut game = session();
        game.start_spin().unwrap();
        let report = game.resolve_spin(&["👾", ""]).unwrap();
        assert!(!report.outcome.is_win);
        assert_eq!(report.balance, 990);
    }

    #[test]
    fn test_headless_spin_persists() {
        let mut game = session();
        for _ in 0..25 {
            let (grid, report) = game.spin().unwrap();
            assert_eq!(report.symbols, grid.payline_glyphs().to_vec());
        }
        let saved = game.store().load("pixel-slots-balance").unwrap();
        assert_eq!(saved, Some(game.wallet().balance() as i64));
        assert_eq!(game.stats().total_spins, 25);
        assert_eq!(game.history().len(), 10);
    }

    #[test]
    fn test_bet_controls_persist() {
        let mut game = session();
        assert!(game.increase_bet(25));
        assert_eq!(game.store().load("pixel-slots-bet").unwrap(), Some(35));
        assert!(game.min_bet());
        assert_eq!(game.wallet().current_bet(), 5);
        assert!(game.max_bet());
        assert_eq!(game.wallet().current_bet(), 1000);
        assert!(game.set_bet(3));
        assert_eq!(game.wallet().current_bet(), 5);
    }

    #[test]
    fn test_reset_balance_starts_fresh() {
        let mut game = session();
        game.set_bet(500);
        for _ in 0..2 {
            game.start_spin().unwrap();
            game.resolve_spin(&["👾", "🎮", "🏆"]).unwrap();
        }
        assert_eq!(game.wallet().balance(), 0);

        assert!(game.reset_balance());
        assert_eq!(game.wallet().balance(), 1000);
        assert_eq!(game.wallet().current_bet(), 500);
        assert!(game.history().is_empty());
        assert_eq!(game.stats().total_spins, 0);
    }

    #[test]
    fn test_oversized_timing_scale_still_spins() {
        // Built in code, so validation never ran
        let mut config = GameConfig::default();
        config.timing.scale = Some(1e307);
        let mut game = GameSession::open(config, MemoryStore::new(), 4);

        let ticket = game.start_spin().unwrap();
        assert_eq!(ticket.schedule.stops.len(), 3);
        assert_eq!(ticket.balance, 990);

        let report = game.resolve_spin(&["👾", "👾", "👾"]).unwrap();
        assert_eq!(report.balance, 990 + 150);
    }

    #[test]
    fn test_instant_timing() {
        let mut config = GameConfig::default();
        config.timing.profile = TimingProfile::Instant;
        let mut game = GameSession::open(config, MemoryStore::new(), 0);
        let ticket = game.start_spin().unwrap();
        assert_eq!(ticket.schedule.resolve_at_ms, 0.0);
    }
}
