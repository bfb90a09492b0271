//! Wallet persistence
//!
//! The wallet is saved as two integers under string keys. Backends only
//! need `load` and `save`; the browser build plugs in `localStorage`, the
//! terminal build a JSON file.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::config::StorageKeys;
use crate::error::{PsError, PsResult};
use crate::wallet::{BetLimits, Wallet};

/// String-keyed integer store
pub trait WalletStore {
    /// Read a value, `None` when the key was never written
    fn load(&self, key: &str) -> PsResult<Option<i64>>;

    /// Write a value
    fn save(&self, key: &str, value: i64) -> PsResult<()>;
}

impl<T: WalletStore + ?Sized> WalletStore for &T {
    fn load(&self, key: &str) -> PsResult<Option<i64>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: i64) -> PsResult<()> {
        (**self).save(key, value)
    }
}

impl<T: WalletStore + ?Sized> WalletStore for Box<T> {
    fn load(&self, key: &str) -> PsResult<Option<i64>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: i64) -> PsResult<()> {
        (**self).save(key, value)
    }
}

/// Restore the wallet, falling back to defaults when the store fails
pub fn load_wallet<S: WalletStore + ?Sized>(
    store: &S,
    keys: &StorageKeys,
    limits: BetLimits,
) -> Wallet {
    let balance = read_or_default(store, &keys.balance_key);
    let bet = read_or_default(store, &keys.bet_key);
    let wallet = Wallet::restore(limits, balance, bet);
    log::debug!(
        "Wallet loaded: balance {} bet {}",
        wallet.balance(),
        wallet.current_bet()
    );
    wallet
}

/// Persist balance and bet
pub fn save_wallet<S: WalletStore + ?Sized>(
    store: &S,
    keys: &StorageKeys,
    wallet: &Wallet,
) -> PsResult<()> {
    store.save(&keys.balance_key, to_stored(wallet.balance()))?;
    store.save(&keys.bet_key, to_stored(wallet.current_bet()))?;
    Ok(())
}

fn read_or_default<S: WalletStore + ?Sized>(store: &S, key: &str) -> Option<i64> {
    match store.load(key) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Storage unavailable for {:?}, using defaults: {}", key, e);
            None
        }
    }
}

fn to_stored(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

// ============ Memory Store ============

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, i64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }
}

impl WalletStore for MemoryStore {
    fn load(&self, key: &str) -> PsResult<Option<i64>> {
        Ok(self.values.lock().get(key).copied())
    }

    fn save(&self, key: &str, value: i64) -> PsResult<()> {
        self.values.lock().insert(key.to_string(), value);
        Ok(())
    }
}

// ============ JSON File Store ============

/// Store backed by a JSON object on disk
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, i64>>,
}

impl JsonFileStore {
    /// Open the store at `path`
    ///
    /// A missing file starts empty. An unreadable or corrupt file is logged and
    /// also starts empty; it is overwritten on the next save.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("Ignoring corrupt wallet file {:?}: {}", path, e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::warn!("Failed to read wallet file {:?}: {}", path, e);
                BTreeMap::new()
            }
        };

        Self {
            path,
            values: Mutex::new(values),
        }
    }

    /// Open the store at the platform default location
    pub fn open_default() -> Self {
        Self::open(Self::default_path())
    }

    /// Get default wallet file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("pixel-slots"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wallet.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, values: &BTreeMap<String, i64>) -> PsResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, json).map_err(|e| {
            PsError::Storage(format!("failed to write {}: {}", self.path.display(), e))
        })
    }
}

impl WalletStore for JsonFileStore {
    fn load(&self, key: &str) -> PsResult<Option<i64>> {
        Ok(self.values.lock().get(key).copied())
    }

    fn save(&self, key: &str, value: i64) -> PsResult<()> {
        let mut values = self.values.lock();
        values.insert(key.to_string(), value);
        self.flush(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl WalletStore for BrokenStore {
        fn load(&self, _key: &str) -> PsResult<Option<i64>> {
            Err(PsError::Storage("no backend".into()))
        }

        fn save(&self, _key: &str, _value: i64) -> PsResult<()> {
            Err(PsError::Storage("no backend".into()))
        }
    }

    #[test]
    fn test_memory_round_trip() {
        let store = MemoryStore::new();
        let keys = StorageKeys::default();
        let mut wallet = Wallet::new();
        wallet.add_to_balance(55);
        wallet.increase_bet(15);

        save_wallet(&store, &keys, &wallet).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.load("pixel-slots-balance").unwrap(), Some(1055));

        let restored = load_wallet(&store, &keys, BetLimits::default());
        assert_eq!(restored, wallet);
    }

    #[test]
    fn test_broken_store_falls_back_to_defaults() {
        let keys = StorageKeys::default();
        let wallet = load_wallet(&BrokenStore, &keys, BetLimits::default());
        assert_eq!(wallet, Wallet::new());
        assert!(save_wallet(&BrokenStore, &keys, &wallet).is_err());
    }

    #[test]
    fn test_json_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("wallet.json");

        let store = JsonFileStore::open(&path);
        assert_eq!(store.load("pixel-slots-bet").unwrap(), None);
        store.save("pixel-slots-bet", 25).unwrap();
        store.save("pixel-slots-balance", 740).unwrap();

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.load("pixel-slots-bet").unwrap(), Some(25));
        assert_eq!(reopened.load("pixel-slots-balance").unwrap(), Some(740));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::open(&path);
        assert_eq!(store.load("pixel-slots-balance").unwrap(), None);
        store.save("pixel-slots-balance", 1000).unwrap();
        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.load("pixel-slots-balance").unwrap(), Some(1000));
    }
}
