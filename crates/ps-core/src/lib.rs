//! # ps-core — Pixel Slots game core
//!
//! Wallet, paytable and session logic for a three-reel retro slot machine.
//! Front-ends (browser, terminal) only animate and render; every balance
//! change and payout decision happens here.
//!
//! ## Features
//!
//! - **Wallet**: balance and bet with a minimum bet floor and balance ceiling
//! - **Win Evaluator**: triple and any-pair rules over the middle payline
//! - **Reels**: three fixed strips, reshuffled every spin
//! - **Timing**: reel stop schedule and UI delays as data
//! - **Persistence**: pluggable key-value store (memory, JSON file, localStorage)
//!
//! ## Architecture
//!
//! ```text
//! GameSession
//!     │
//!     ├── Wallet ◄──── WalletStore (load on open, save on every change)
//!     ├── PayTable (triple multipliers, ANY_PAIR)
//!     ├── ReelSet (strips + seeded RNG)
//!     └── TimingConfig
//!           │
//!           v
//!     SpinTicket → payline → SpinReport → GameHistory + SessionStats
//! ```

pub mod config;
pub mod error;
pub mod history;
pub mod paytable;
pub mod reels;
pub mod session;
pub mod store;
pub mod symbols;
pub mod timing;
pub mod wallet;

pub use config::*;
pub use error::*;
pub use history::*;
pub use paytable::*;
pub use reels::*;
pub use session::*;
pub use store::*;
pub use symbols::*;
pub use timing::*;
pub use wallet::*;
