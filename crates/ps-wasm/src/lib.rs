// ============================================================================
// PIXEL SLOTS — WASM Port
// Browser bindings for the Pixel Slots game core
// The page animates reels and plays sounds; the wallet lives here
// ============================================================================

use ps_core::{
    GameConfig, GameSession, HistoryEntry, MemoryStore, PsError, PsResult, SessionStats,
    SpinRejected, SpinTicket, Symbol, WalletStore, evaluate_spin as evaluate_payline,
};
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;
use web_sys::Storage;

// ============================================================================
// INITIALIZATION
// ============================================================================

#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    console_log::init_with_level(log::Level::Debug).ok();
    log::info!("[Pixel Slots WASM] Initialized");
}

// ============================================================================
// HELPERS
// ============================================================================

/// Convert to a plain JavaScript object (no ES2015 Maps, u64 as numbers)
fn to_object<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize: {e}")))
}

/// Money arrives from JS as a double; anything not a positive finite number is 0
pub fn to_amount(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.floor() as u64
    } else {
        0
    }
}

/// Map a `[0, 1)` random double onto a u64 seed
pub fn seed_from_random(random: f64) -> u64 {
    const SEED_SPACE: f64 = (1u64 << 53) as f64;
    to_amount(random.clamp(0.0, 1.0) * SEED_SPACE)
}

// ============================================================================
// STORAGE
// ============================================================================

/// `window.localStorage`, values stored as decimal strings
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// `None` when there is no window or storage is disabled
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        Some(Self { storage })
    }
}

impl WalletStore for LocalStorageStore {
    fn load(&self, key: &str) -> PsResult<Option<i64>> {
        let raw = self
            .storage
            .get_item(key)
            .map_err(|e| PsError::Storage(format!("localStorage.getItem failed: {e:?}")))?;

        Ok(raw.and_then(|value| match value.trim().parse::<i64>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                log::warn!("Ignoring non-numeric {:?} in localStorage: {:?}", key, value);
                None
            }
        }))
    }

    fn save(&self, key: &str, value: i64) -> PsResult<()> {
        self.storage
            .set_item(key, &value.to_string())
            .map_err(|e| PsError::Storage(format!("localStorage.setItem failed: {e:?}")))
    }
}

fn browser_store() -> Box<dyn WalletStore> {
    match LocalStorageStore::open() {
        Some(store) => Box::new(store),
        None => {
            log::warn!("[Pixel Slots WASM] localStorage unavailable, progress will not be saved");
            Box::new(MemoryStore::new())
        }
    }
}

// ============================================================================
// GAME
// ============================================================================

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
enum StartResponse {
    Started { ticket: SpinTicket },
    Rejected { rejection: SpinRejected },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaytableRow {
    glyph: String,
    multiplier: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionExport<'a> {
    balance: u64,
    current_bet: u64,
    stats: &'a SessionStats,
    history: Vec<&'a HistoryEntry>,
}

/// Pixel Slots game for one browser tab
#[wasm_bindgen]
pub struct PixelSlots {
    session: GameSession<Box<dyn WalletStore>>,
}

#[wasm_bindgen]
impl PixelSlots {
    /// Create a game, optionally from a JSON config
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PixelSlots, JsValue> {
        let config = match config_json {
            Some(json) => GameConfig::from_json_str(&json)
                .map_err(|e| JsValue::from_str(&format!("Config error: {}", e)))?,
            None => GameConfig::default(),
        };

        let seed = seed_from_random(js_sys::Math::random());
        Ok(PixelSlots {
            session: GameSession::open(config, browser_store(), seed),
        })
    }

    // ─── State ───

    #[wasm_bindgen(getter)]
    pub fn balance(&self) -> f64 {
        self.session.wallet().balance() as f64
    }

    #[wasm_bindgen(getter)]
    pub fn current_bet(&self) -> f64 {
        self.session.wallet().current_bet() as f64
    }

    #[wasm_bindgen(getter)]
    pub fn is_spinning(&self) -> bool {
        self.session.is_spinning()
    }

    #[wasm_bindgen(getter)]
    pub fn is_broke(&self) -> bool {
        self.session.wallet().is_broke()
    }

    /// "-" button enabled
    pub fn can_decrease(&self) -> bool {
        !self.session.is_spinning() && self.session.wallet().can_decrease()
    }

    /// "+" and MAX buttons enabled
    pub fn can_increase(&self) -> bool {
        !self.session.is_spinning() && self.session.wallet().can_increase()
    }

    /// Quick "+amount" button enabled
    pub fn can_increase_by(&self, amount: f64) -> bool {
        !self.session.is_spinning() && self.session.wallet().can_increase_by(to_amount(amount))
    }

    // ─── Bet controls ───

    pub fn increase_bet(&mut self, amount: f64) -> bool {
        self.session.increase_bet(to_amount(amount))
    }

    pub fn decrease_bet(&mut self, amount: f64) -> bool {
        self.session.decrease_bet(to_amount(amount))
    }

    pub fn set_bet(&mut self, amount: f64) -> bool {
        self.session.set_bet(to_amount(amount))
    }

    pub fn min_bet(&mut self) -> bool {
        self.session.min_bet()
    }

    pub fn max_bet(&mut self) -> bool {
        self.session.max_bet()
    }

    pub fn reset_balance(&mut self) -> bool {
        self.session.reset_balance()
    }

    // ─── Spin ───

    /// Deduct the bet and get the reel stop schedule
    ///
    /// Returns `{ status: "started", ticket }` or `{ status: "rejected", rejection }`.
    pub fn start_spin(&mut self) -> Result<JsValue, JsValue> {
        let response = match self.session.start_spin() {
            Ok(ticket) => StartResponse::Started { ticket },
            Err(rejection) => StartResponse::Rejected { rejection },
        };
        to_object(&response)
    }

    /// Settle the spin with the middle-row glyphs; `null` when nothing is spinning
    pub fn resolve_spin(&mut self, symbols: JsValue) -> Result<JsValue, JsValue> {
        let payline: Vec<String> = serde_wasm_bindgen::from_value(symbols).unwrap_or_else(|e| {
            log::warn!("[Pixel Slots WASM] Unreadable payline ({}), scoring as a loss", e);
            Vec::new()
        });
        to_object(&self.session.resolve_spin(&payline))
    }

    /// Watchdog: settle a stuck spin as a loss
    pub fn abort_spin(&mut self) -> Result<JsValue, JsValue> {
        to_object(&self.session.abort_spin())
    }

    /// Fresh reel windows for the animation, one glyph column per reel
    pub fn spin_reels(&mut self) -> Result<JsValue, JsValue> {
        let grid = self.session.spin_reels();
        to_object(&grid.columns.map(|column| column.map(Symbol::glyph)))
    }

    // ─── Panels ───

    pub fn history(&self) -> Result<JsValue, JsValue> {
        let entries: Vec<&HistoryEntry> = self.session.history().entries().collect();
        to_object(&entries)
    }

    pub fn stats(&self) -> Result<JsValue, JsValue> {
        to_object(self.session.stats())
    }

    pub fn paytable(&self) -> Result<JsValue, JsValue> {
        let rows: Vec<PaytableRow> = self
            .session
            .paytable()
            .entries()
            .into_iter()
            .map(|(glyph, multiplier)| PaytableRow {
                glyph: glyph.to_string(),
                multiplier,
            })
            .collect();
        to_object(&rows)
    }

    /// Timing values for the animation layer
    pub fn timing(&self) -> Result<JsValue, JsValue> {
        to_object(self.session.timing())
    }

    /// Session snapshot as a JSON string
    pub fn export_session_json(&self) -> Result<String, JsValue> {
        let export = SessionExport {
            balance: self.session.wallet().balance(),
            current_bet: self.session.wallet().current_bet(),
            stats: self.session.stats(),
            history: self.session.history().entries().collect(),
        };
        serde_json::to_string(&export)
            .map_err(|e| JsValue::from_str(&format!("JSON error: {}", e)))
    }
}

// ============================================================================
// UTILITY FUNCTIONS
// ============================================================================

/// Evaluate a payline against the standard paytable
#[wasm_bindgen]
pub fn evaluate_spin(symbols: JsValue, bet: f64) -> Result<JsValue, JsValue> {
    let payline: Vec<String> = serde_wasm_bindgen::from_value(symbols)
        .map_err(|e| JsValue::from_str(&format!("Invalid symbols: {}", e)))?;
    to_object(&evaluate_payline(&payline, to_amount(bet)))
}

/// Get version string
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_amount() {
        assert_eq!(to_amount(25.0), 25);
        assert_eq!(to_amount(12.9), 12);
        assert_eq!(to_amount(-5.0), 0);
        assert_eq!(to_amount(f64::NAN), 0);
        assert_eq!(to_amount(f64::INFINITY), 0);
    }

    #[test]
    fn test_seed_from_random() {
        assert_eq!(seed_from_random(0.0), 0);
        assert!(seed_from_random(0.5) > 0);
        assert_ne!(seed_from_random(0.25), seed_from_random(0.75));
        assert_eq!(seed_from_random(-1.0), 0);
    }

    #[test]
    fn test_start_response_shape() {
        let rejected = StartResponse::Rejected {
            rejection: SpinRejected::AlreadySpinning,
        };
        let json = serde_json::to_value(&rejected).unwrap();
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["rejection"]["reason"], "alreadySpinning");
    }
}
