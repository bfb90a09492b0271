//! Symbol definitions and reel strips

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PsError;

/// Number of reels on the machine
pub const REEL_COUNT: usize = 3;

/// Rows visible through the reel window
pub const VISIBLE_ROWS: usize = 3;

/// Row of the visible window that forms the payline (middle)
pub const PAYLINE_ROW: usize = 1;

/// A retro reel symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Symbol {
    Invader = 0,
    Gamepad = 1,
    Ogre = 2,
    Trophy = 3,
    Bomb = 4,
    CrystalBall = 5,
    Die = 6,
}

impl Symbol {
    /// All symbols in paytable order
    pub const ALL: [Symbol; 7] = [
        Symbol::Invader,
        Symbol::Gamepad,
        Symbol::Ogre,
        Symbol::Trophy,
        Symbol::Bomb,
        Symbol::CrystalBall,
        Symbol::Die,
    ];

    /// Glyph shown on the reel
    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Invader => "👾",
            Symbol::Gamepad => "🎮",
            Symbol::Ogre => "👹",
            Symbol::Trophy => "🏆",
            Symbol::Bomb => "💣",
            Symbol::CrystalBall => "🔮",
            Symbol::Die => "🎲",
        }
    }

    /// Human readable name
    pub fn name(self) -> &'static str {
        match self {
            Symbol::Invader => "invader",
            Symbol::Gamepad => "gamepad",
            Symbol::Ogre => "ogre",
            Symbol::Trophy => "trophy",
            Symbol::Bomb => "bomb",
            Symbol::CrystalBall => "crystal-ball",
            Symbol::Die => "die",
        }
    }

    /// Look up a symbol by its glyph
    pub fn from_glyph(glyph: &str) -> Option<Symbol> {
        Self::ALL.iter().copied().find(|s| s.glyph() == glyph)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

impl FromStr for Symbol {
    type Err = PsError;

    /// Accepts either the glyph or the (case-insensitive) name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::from_glyph(trimmed)
            .or_else(|| {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|sym| sym.name().eq_ignore_ascii_case(trimmed))
            })
            .ok_or_else(|| PsError::InvalidSymbol(s.to_string()))
    }
}

/// A reel strip in its current visual order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelStrip {
    /// Reel index
    pub reel_index: u8,
    /// Symbols in order, top to bottom
    pub symbols: Vec<Symbol>,
}

impl ReelStrip {
    /// Create a new reel strip
    pub fn new(reel_index: u8, symbols: Vec<Symbol>) -> Self {
        Self { reel_index, symbols }
    }

    /// Get symbol at position (wraps around)
    pub fn symbol_at(&self, position: usize) -> Option<Symbol> {
        if self.symbols.is_empty() {
            return None;
        }
        Some(self.symbols[position % self.symbols.len()])
    }

    /// Visible window (top, middle, bottom) starting at `offset`
    pub fn visible_window(&self, offset: usize) -> Option<[Symbol; VISIBLE_ROWS]> {
        Some([
            self.symbol_at(offset)?,
            self.symbol_at(offset + 1)?,
            self.symbol_at(offset + 2)?,
        ])
    }

    /// Get total strip length
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// The three base strips of the cabinet
pub fn standard_strips() -> Vec<ReelStrip> {
    use Symbol::*;

    vec![
        ReelStrip::new(0, vec![Invader, Gamepad, Ogre, Trophy, Bomb, CrystalBall, Die]),
        ReelStrip::new(1, vec![Die, Invader, Gamepad, Bomb, Trophy, Ogre, CrystalBall]),
        ReelStrip::new(2, vec![CrystalBall, Bomb, Die, Invader, Gamepad, Ogre, Trophy]),
    ]
}
