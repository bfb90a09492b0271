//! Reel set and payline production
//!
//! Each spin reshuffles every strip and shows its top three symbols through
//! the window. Symbol order is cosmetic; payouts only depend on the middle row
//! handed to the evaluator.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::symbols::{PAYLINE_ROW, REEL_COUNT, ReelStrip, Symbol, VISIBLE_ROWS, standard_strips};

/// Visible symbols after a spin, one column per reel (top to bottom)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinGrid {
    pub columns: [[Symbol; VISIBLE_ROWS]; REEL_COUNT],
}

impl SpinGrid {
    /// Middle row, left to right
    pub fn payline(&self) -> [Symbol; REEL_COUNT] {
        self.row(PAYLINE_ROW)
    }

    /// Middle row as glyph strings
    pub fn payline_glyphs(&self) -> [&'static str; REEL_COUNT] {
        self.payline().map(Symbol::glyph)
    }

    /// Row `index` (0 = top), left to right. Out of range rows wrap.
    pub fn row(&self, index: usize) -> [Symbol; REEL_COUNT] {
        let index = index % VISIBLE_ROWS;
        [
            self.columns[0][index],
            self.columns[1][index],
            self.columns[2][index],
        ]
    }
}

/// The machine's reels
#[derive(Debug, Clone)]
pub struct ReelSet {
    strips: Vec<ReelStrip>,
    rng: StdRng,
}

impl ReelSet {
    /// Standard strips with a seeded RNG
    pub fn new(seed: u64) -> Self {
        Self::with_strips(standard_strips(), seed)
    }

    /// Custom strips
    ///
    /// Missing reels and empty strips are replaced by the standard strip for
    /// that position; extra strips are ignored.
    pub fn with_strips(strips: Vec<ReelStrip>, seed: u64) -> Self {
        let standard = standard_strips();
        let mut strips: Vec<ReelStrip> = strips.into_iter().take(REEL_COUNT).collect();
        for (index, fallback) in standard.into_iter().enumerate() {
            match strips.get_mut(index) {
                Some(strip) if strip.is_empty() => {
                    log::warn!("Reel {} strip is empty, using the standard strip", index);
                    *strip = fallback;
                }
                Some(_) => {}
                None => strips.push(fallback),
            }
        }

        Self {
            strips,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Reseed the RNG
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn strips(&self) -> &[ReelStrip] {
        &self.strips
    }

    /// Spin all reels
    pub fn spin(&mut self) -> SpinGrid {
        let mut columns = [[Symbol::Invader; VISIBLE_ROWS]; REEL_COUNT];
        for (column, strip) in columns.iter_mut().zip(self.strips.iter_mut()) {
            strip.symbols.shuffle(&mut self.rng);
            if let Some(window) = strip.visible_window(0) {
                *column = window;
            }
        }

        let grid = SpinGrid { columns };
        log::trace!("Spin grid payline {:?}", grid.payline_glyphs());
        grid
    }
}

impl Default for ReelSet {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payline_symbols_come_from_own_strip() {
        let mut reels = ReelSet::new(42);
        let base = standard_strips();

        for _ in 0..200 {
            let grid = reels.spin();
            for (reel, symbol) in grid.payline().iter().enumerate() {
                assert!(base[reel].symbols.contains(symbol));
            }
        }
    }

    #[test]
    fn test_window_has_distinct_symbols() {
        // Standard strips hold each symbol once, so a column never repeats
        let mut reels = ReelSet::new(3);
        let grid = reels.spin();
        for column in grid.columns {
            assert_ne!(column[0], column[1]);
            assert_ne!(column[1], column[2]);
            assert_ne!(column[0], column[2]);
        }
    }

    #[test]
    fn test_seeded_spins_are_deterministic() {
        let mut a = ReelSet::new(1234);
        let mut b = ReelSet::new(1234);
        for _ in 0..20 {
            assert_eq!(a.spin(), b.spin());
        }
    }

    #[test]
    fn test_row_accessors() {
        use Symbol::*;
        let grid = SpinGrid {
            columns: [
                [Invader, Gamepad, Ogre],
                [Trophy, Bomb, CrystalBall],
                [Die, Invader, Gamepad],
            ],
        };
        assert_eq!(grid.row(0), [Invader, Trophy, Die]);
        assert_eq!(grid.payline(), [Gamepad, Bomb, Invader]);
        assert_eq!(grid.payline_glyphs(), ["🎮", "💣", "👾"]);
        assert_eq!(grid.row(2), [Ogre, CrystalBall, Gamepad]);
    }

    #[test]
    fn test_empty_strips_fall_back() {
        let reels = ReelSet::with_strips(vec![ReelStrip::new(0, Vec::new())], 0);
        assert_eq!(reels.strips().len(), REEL_COUNT);
        assert!(reels.strips().iter().all(|s| s.len() == 7));
    }
}
