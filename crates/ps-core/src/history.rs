//! Game history and session statistics

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::paytable::SpinOutcome;

/// Consecutive wins that count as a hot streak
pub const HOT_STREAK: u32 = 3;

/// One resolved spin as shown in the history panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Payout for a win, the lost bet otherwise
    pub amount: u64,
    pub is_win: bool,
    /// Payline glyphs
    pub symbols: Vec<String>,
}

impl HistoryEntry {
    pub fn new<S: AsRef<str>>(bet: u64, outcome: &SpinOutcome, symbols: &[S]) -> Self {
        Self {
            amount: if outcome.is_win { outcome.payout } else { bet },
            is_win: outcome.is_win,
            symbols: symbols.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }
}

/// Most recent spins, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameHistory {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl GameHistory {
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Add an entry, dropping the oldest past the limit
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.limit);
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for GameHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

/// Direction of the current streak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakKind {
    #[default]
    Win,
    Loss,
}

/// Consecutive results of the same kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Streak {
    pub kind: StreakKind,
    pub count: u32,
}

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub total_spins: u64,
    pub wins: u64,
    pub losses: u64,
    pub total_wagered: u64,
    pub total_won: u64,
    /// Net balance change since the session started
    pub session_balance: i64,
    pub streak: Streak,
    pub best_win: u64,
}

impl SessionStats {
    /// Record a resolved spin
    pub fn record(&mut self, bet: u64, outcome: &SpinOutcome) {
        self.total_spins += 1;
        self.total_wagered = self.total_wagered.saturating_add(bet);
        self.total_won = self.total_won.saturating_add(outcome.payout);
        self.session_balance = self
            .session_balance
            .saturating_add(to_signed(outcome.payout))
            .saturating_sub(to_signed(bet));

        let kind = if outcome.is_win {
            self.wins += 1;
            self.best_win = self.best_win.max(outcome.payout);
            StreakKind::Win
        } else {
            self.losses += 1;
            StreakKind::Loss
        };

        if self.streak.kind == kind && self.streak.count > 0 {
            self.streak.count += 1;
        } else {
            self.streak = Streak { kind, count: 1 };
        }
    }

    /// Win percentage rounded to a whole number
    pub fn win_percentage(&self) -> u32 {
        if self.total_spins > 0 {
            ((self.wins as f64 / self.total_spins as f64) * 100.0).round() as u32
        } else {
            0
        }
    }

    /// Calculate RTP
    pub fn rtp(&self) -> f64 {
        if self.total_wagered > 0 {
            (self.total_won as f64 / self.total_wagered as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn is_hot_streak(&self) -> bool {
        self.streak.kind == StreakKind::Win && self.streak.count >= HOT_STREAK
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn to_signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paytable::evaluate_spin;

    const PAIR: [&str; 3] = ["👾", "👾", "🎮"];
    const MISS: [&str; 3] = ["👾", "🎮", "🏆"];

    #[test]
    fn test_history_newest_first_and_bounded() {
        let mut history = GameHistory::new(3);
        for bet in 1..=5 {
            let outcome = evaluate_spin(&MISS, bet);
            history.push(HistoryEntry::new(bet, &outcome, &MISS));
        }
        assert_eq!(history.len(), 3);
        let amounts: Vec<u64> = history.entries().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![5, 4, 3]);
    }

    #[test]
    fn test_entry_amounts() {
        let win = evaluate_spin(&PAIR, 10);
        let entry = HistoryEntry::new(10, &win, &PAIR);
        assert!(entry.is_win);
        assert_eq!(entry.amount, 20);

        let loss = evaluate_spin(&MISS, 10);
        let entry = HistoryEntry::new(10, &loss, &MISS);
        assert!(!entry.is_win);
        assert_eq!(entry.amount, 10);
        assert_eq!(entry.symbols, vec!["👾", "🎮", "🏆"]);
    }

    #[test]
    fn test_session_balance_is_net() {
        let mut stats = SessionStats::default();
        stats.record(10, &evaluate_spin(&PAIR, 10));
        assert_eq!(stats.session_balance, 10);

        stats.record(10, &evaluate_spin(&MISS, 10));
        assert_eq!(stats.session_balance, 0);
        assert_eq!(stats.total_wagered, 20);
        assert_eq!(stats.total_won, 20);
        assert_eq!(stats.rtp(), 100.0);
        assert_eq!(stats.win_percentage(), 50);
    }

    #[test]
    fn test_streaks() {
        let mut stats = SessionStats::default();
        assert_eq!(stats.win_percentage(), 0);

        for _ in 0..3 {
            stats.record(5, &evaluate_spin(&PAIR, 5));
        }
        assert!(stats.is_hot_streak());
        assert_eq!(stats.streak, Streak { kind: StreakKind::Win, count: 3 });

        stats.record(5, &evaluate_spin(&MISS, 5));
        assert!(!stats.is_hot_streak());
        assert_eq!(stats.streak, Streak { kind: StreakKind::Loss, count: 1 });
        assert_eq!(stats.best_win, 10);
    }

    #[test]
    fn test_first_loss_starts_streak() {
        let mut stats = SessionStats::default();
        stats.record(5, &evaluate_spin(&MISS, 5));
        assert_eq!(stats.streak, Streak { kind: StreakKind::Loss, count: 1 });
        assert_eq!(stats.session_balance, -5);
    }
}
