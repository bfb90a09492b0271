//! Game configuration
//!
//! Every section has defaults matching the cabinet, so a config file only
//! needs the values it changes. JSON and YAML are both accepted.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, PsResult};
use crate::paytable::{ANY_PAIR_MULTIPLIER, DEFAULT_TRIPLE_MULTIPLIER, PayTable};
use crate::timing::{TimingConfig, TimingProfile};
use crate::wallet::{DEFAULT_BALANCE, DEFAULT_BET, MIN_BET};

/// Default number of entries kept in the game history
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Storage key for the balance
pub const BALANCE_KEY: &str = "pixel-slots-balance";

/// Storage key for the current bet
pub const BET_KEY: &str = "pixel-slots-bet";

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub wallet: WalletConfig,
    pub paytable: PaytableConfig,
    pub timing: TimingSettings,
    /// Number of spins shown in the history panel
    pub history_limit: usize,
    pub storage: StorageKeys,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            wallet: WalletConfig::default(),
            paytable: PaytableConfig::default(),
            timing: TimingSettings::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            storage: StorageKeys::default(),
        }
    }
}

/// Wallet limits and bet control steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Balance for a new player and after a reset
    pub starting_balance: u64,
    /// Bet for a new player
    pub default_bet: u64,
    /// Floor for the current bet
    pub min_bet: u64,
    /// Step of the +/- bet buttons
    pub bet_step: u64,
    /// Quick increase buttons
    pub quick_bets: Vec<u64>,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            starting_balance: DEFAULT_BALANCE,
            default_bet: DEFAULT_BET,
            min_bet: MIN_BET,
            bet_step: 5,
            quick_bets: vec![10, 25, 50],
        }
    }
}

/// Paytable multipliers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaytableConfig {
    /// Triple multipliers keyed by glyph
    pub triples: BTreeMap<String, u64>,
    /// Multiplier for any pair
    pub any_pair: u64,
    /// Multiplier for a triple not listed above
    pub default_triple: u64,
}

impl Default for PaytableConfig {
    fn default() -> Self {
        let standard = PayTable::standard();
        Self {
            triples: standard
                .entries()
                .into_iter()
                .map(|(glyph, mult)| (glyph.to_string(), mult))
                .collect(),
            any_pair: ANY_PAIR_MULTIPLIER,
            default_triple: DEFAULT_TRIPLE_MULTIPLIER,
        }
    }
}

/// Timing profile selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    pub profile: TimingProfile,
    /// Extra scale applied on top of the profile (< 1.0 = faster)
    pub scale: Option<f64>,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            profile: TimingProfile::Normal,
            scale: None,
        }
    }
}

impl TimingSettings {
    /// Resolve into concrete durations
    pub fn resolve(&self) -> TimingConfig {
        let base = TimingConfig::from_profile(self.profile);
        match self.scale {
            Some(factor) if factor > 0.0 => base.scaled(factor),
            _ => base,
        }
    }
}

/// Keys used in the key-value store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub balance_key: String,
    pub bet_key: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            balance_key: BALANCE_KEY.to_string(),
            bet_key: BET_KEY.to_string(),
        }
    }
}

impl GameConfig {
    /// Parse a JSON document
    pub fn from_json_str(json: &str) -> PsResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> PsResult<Self> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load_from<P: AsRef<Path>>(path: P) -> PsResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let config = match ext.as_str() {
            "json" => Self::from_json_str(&content)?,
            "yaml" | "yml" => Self::from_yaml_str(&content)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string()).into()),
        };
        log::info!("Loaded game config from {:?}", path);
        Ok(config)
    }

    /// Check that the configuration can run a game
    pub fn validate(&self) -> Result<(), ConfigError> {
        let wallet = &self.wallet;
        if wallet.min_bet == 0 {
            return Err(ConfigError::InvalidWallet("min_bet must be positive"));
        }
        if wallet.default_bet < wallet.min_bet {
            return Err(ConfigError::InvalidWallet("default_bet is below min_bet"));
        }
        if wallet.starting_balance < wallet.min_bet {
            return Err(ConfigError::InvalidWallet("starting_balance is below min_bet"));
        }
        if wallet.bet_step == 0 {
            return Err(ConfigError::InvalidWallet("bet_step must be positive"));
        }

        if let Some((glyph, _)) = self.paytable.triples.iter().find(|(_, m)| **m == 0) {
            return Err(ConfigError::ZeroMultiplier(glyph.clone()));
        }
        if self.paytable.any_pair == 0 {
            return Err(ConfigError::ZeroMultiplier("ANY_PAIR".to_string()));
        }
        if self.paytable.default_triple == 0 {
            return Err(ConfigError::ZeroMultiplier("DEFAULT_TRIPLE".to_string()));
        }

        if let Some(scale) = self.timing.scale {
            if !scale.is_finite() || scale <= 0.0 || !self.timing.resolve().is_finite() {
                return Err(ConfigError::InvalidTimingScale(scale.to_string()));
            }
        }

        if self.history_limit == 0 {
            return Err(ConfigError::EmptyHistory);
        }
        if self.storage.balance_key.is_empty() {
            return Err(ConfigError::EmptyStorageKey("balance_key"));
        }
        if self.storage.bet_key.is_empty() {
            return Err(ConfigError::EmptyStorageKey("bet_key"));
        }
        Ok(())
    }
}
