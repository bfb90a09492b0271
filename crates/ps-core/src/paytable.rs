//! Paytable and win evaluation
//!
//! The payline is the middle row of the three reels. Evaluation is ordered and
//! the first match wins:
//!
//! 1. anything other than three non-blank entries is a loss
//! 2. three equal symbols pay the symbol's triple multiplier (fallback 5x)
//! 3. any two equal symbols pay the flat pair multiplier
//! 4. otherwise the spin loses

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::PaytableConfig;
use crate::symbols::{REEL_COUNT, Symbol};

/// Flat multiplier for any pair on the payline
pub const ANY_PAIR_MULTIPLIER: u64 = 2;

/// Multiplier for a triple missing from the paytable
pub const DEFAULT_TRIPLE_MULTIPLIER: u64 = 5;

/// Pair positions in the order they are checked
const PAIR_POSITIONS: [(usize, usize); 3] = [(0, 1), (1, 2), (0, 2)];

/// How a spin was scored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WinKind {
    /// All three payline symbols equal
    Triple { glyph: String, multiplier: u64 },
    /// Two payline symbols equal; `positions` is the first matching pair
    Pair {
        positions: (usize, usize),
        multiplier: u64,
    },
    /// No matching symbols
    NoMatch,
    /// Wrong arity or a blank symbol
    Malformed,
}

impl WinKind {
    /// Triple or pair, whatever the bet
    pub fn is_win(&self) -> bool {
        matches!(self, WinKind::Triple { .. } | WinKind::Pair { .. })
    }

    /// Multiplier applied to the bet (0 for losses)
    pub fn multiplier(&self) -> u64 {
        match self {
            WinKind::Triple { multiplier, .. } | WinKind::Pair { multiplier, .. } => *multiplier,
            WinKind::NoMatch | WinKind::Malformed => 0,
        }
    }
}

/// Result of evaluating one payline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinOutcome {
    pub is_win: bool,
    pub payout: u64,
    pub kind: WinKind,
}

impl SpinOutcome {
    fn scored(kind: WinKind, bet: u64) -> Self {
        let payout = bet.saturating_mul(kind.multiplier());
        Self {
            is_win: kind.is_win(),
            payout,
            kind,
        }
    }

    fn loss(kind: WinKind) -> Self {
        Self {
            is_win: false,
            payout: 0,
            kind,
        }
    }
}

/// Triple multipliers plus the pair rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayTable {
    /// Triple multipliers keyed by glyph
    triples: BTreeMap<String, u64>,
    /// Multiplier for any pair
    any_pair: u64,
    /// Multiplier for a triple not listed in `triples`
    default_triple: u64,
}

impl PayTable {
    /// The cabinet's paytable
    pub fn standard() -> Self {
        let triples = [
            (Symbol::Invader, 15),
            (Symbol::Gamepad, 10),
            (Symbol::Ogre, 20),
            (Symbol::Trophy, 30),
            (Symbol::Bomb, 25),
            (Symbol::CrystalBall, 12),
            (Symbol::Die, 8),
        ]
        .into_iter()
        .map(|(symbol, mult)| (symbol.glyph().to_string(), mult))
        .collect();

        Self {
            triples,
            any_pair: ANY_PAIR_MULTIPLIER,
            default_triple: DEFAULT_TRIPLE_MULTIPLIER,
        }
    }

    /// Build from configuration
    pub fn from_config(config: &PaytableConfig) -> Self {
        Self {
            triples: config.triples.clone(),
            any_pair: config.any_pair,
            default_triple: config.default_triple,
        }
    }

    /// Multiplier paid for three of `glyph`
    pub fn triple_multiplier(&self, glyph: &str) -> u64 {
        self.triples.get(glyph).copied().unwrap_or(self.default_triple)
    }

    /// Multiplier paid for any pair
    pub fn pair_multiplier(&self) -> u64 {
        self.any_pair
    }

    /// Triple entries, highest paying first
    pub fn entries(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self.triples.iter().map(|(g, m)| (g.as_str(), *m)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Evaluate a payline of glyphs for `bet`
    pub fn evaluate<S: AsRef<str>>(&self, symbols: &[S], bet: u64) -> SpinOutcome {
        if symbols.len() != REEL_COUNT || symbols.iter().any(|s| s.as_ref().trim().is_empty()) {
            log::warn!(
                "Malformed payline ({} entries), scoring as a loss",
                symbols.len()
            );
            return SpinOutcome::loss(WinKind::Malformed);
        }

        let line: Vec<&str> = symbols.iter().map(AsRef::as_ref).collect();

        if line[0] == line[1] && line[1] == line[2] {
            let multiplier = self.triple_multiplier(line[0]);
            log::debug!("Triple {} pays {}x", line[0], multiplier);
            return SpinOutcome::scored(
                WinKind::Triple {
                    glyph: line[0].to_string(),
                    multiplier,
                },
                bet,
            );
        }

        if let Some(&positions) = PAIR_POSITIONS.iter().find(|(a, b)| line[*a] == line[*b]) {
            log::debug!(
                "Pair {} at positions {}-{} pays {}x",
                line[positions.0],
                positions.0,
                positions.1,
                self.any_pair
            );
            return SpinOutcome::scored(
                WinKind::Pair {
                    positions,
                    multiplier: self.any_pair,
                },
                bet,
            );
        }

        log::debug!("No match on payline {}", line.join(" | "));
        SpinOutcome::loss(WinKind::NoMatch)
    }

    /// Evaluate a typed payline
    pub fn evaluate_symbols(&self, symbols: [Symbol; REEL_COUNT], bet: u64) -> SpinOutcome {
        self.evaluate(&symbols.map(Symbol::glyph), bet)
    }
}

impl Default for PayTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Evaluate a payline against the standard paytable
pub fn evaluate_spin<S: AsRef<str>>(symbols: &[S], bet: u64) -> SpinOutcome {
    PayTable::standard().evaluate(symbols, bet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triple_pays_symbol_multiplier() {
        let outcome = evaluate_spin(&["👾", "👾", "👾"], 10);
        assert!(outcome.is_win);
        assert_eq!(outcome.payout, 150);
        assert_eq!(
            outcome.kind,
            WinKind::Triple {
                glyph: "👾".to_string(),
                multiplier: 15
            }
        );
    }

    #[test]
    fn test_jackpot() {
        let outcome = evaluate_spin(&["🏆", "🏆", "🏆"], 10);
        assert!(outcome.is_win);
        assert_eq!(outcome.payout, 300);
    }

    #[test]
    fn test_every_standard_triple() {
        let table = PayTable::standard();
        for (symbol, mult) in [
            (Symbol::Invader, 15),
            (Symbol::Gamepad, 10),
            (Symbol::Ogre, 20),
            (Symbol::Trophy, 30),
            (Symbol::Bomb, 25),
            (Symbol::CrystalBall, 12),
            (Symbol::Die, 8),
        ] {
            let outcome = table.evaluate_symbols([symbol; 3], 7);
            assert_eq!(outcome.payout, 7 * mult, "{symbol:?}");
        }
    }

    #[test]
    fn test_unknown_triple_falls_back() {
        let outcome = evaluate_spin(&["🍒", "🍒", "🍒"], 10);
        assert!(outcome.is_win);
        assert_eq!(outcome.payout, 50);
    }

    #[test]
    fn test_pair_in_any_position() {
        let lines = [
            (["👾", "👾", "🎮"], (0, 1)),
            (["🎮", "👾", "👾"], (1, 2)),
            (["👾", "🎮", "👾"], (0, 2)),
        ];
        for (line, positions) in lines {
            let outcome = evaluate_spin(&line, 10);
            assert!(outcome.is_win);
            assert_eq!(outcome.payout, 20);
            assert_eq!(
                outcome.kind,
                WinKind::Pair {
                    positions,
                    multiplier: 2
                }
            );
        }
    }

    #[test]
    fn test_no_match() {
        let outcome = evaluate_spin(&["👾", "🎮", "🏆"], 10);
        assert!(!outcome.is_win);
        assert_eq!(outcome.payout, 0);
        assert_eq!(outcome.kind, WinKind::NoMatch);
    }

    #[test]
    fn test_malformed_is_a_loss() {
        for line in [vec!["👾", "👾"], vec![], vec!["👾", "", "👾"], vec!["👾"; 4]] {
            let outcome = evaluate_spin(&line, 10);
            assert!(!outcome.is_win);
            assert_eq!(outcome.payout, 0);
            assert_eq!(outcome.kind, WinKind::Malformed);
        }
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let table = PayTable::standard();
        let line = ["💣", "🔮", "💣"];
        assert_eq!(table.evaluate(&line, 25), table.evaluate(&line, 25));
    }

    #[test]
    fn test_entries_sorted_by_multiplier() {
        let table = PayTable::standard();
        let entries = table.entries();
        assert_eq!(entries[0], ("🏆", 30));
        assert_eq!(entries.last().copied(), Some(("🎲", 8)));
    }

    #[test]
    fn test_zero_bet_keeps_win_kind() {
        let outcome = evaluate_spin(&["🏆", "🏆", "🏆"], 0);
        assert!(outcome.is_win);
        assert_eq!(outcome.payout, 0);
        assert_eq!(outcome.kind.multiplier(), 30);

        let outcome = evaluate_spin(&["👾", "🎮", "👾"], 0);
        assert!(outcome.is_win);
        assert!(!evaluate_spin(&["👾", "🎮", "🏆"], 0).is_win);
    }

    #[test]
    fn test_payout_saturates() {
        let outcome = evaluate_spin(&["🏆", "🏆", "🏆"], u64::MAX);
        assert_eq!(outcome.payout, u64::MAX);
    }
}
