//! Key-value persistence for ledger state and the archive.

pub mod codec;
pub mod file_store;
pub mod memory;

use crate::errors::Result;

pub use file_store::FileStore;
pub use memory::MemoryStore;

pub const DEFAULT_KEY_PREFIX: &str = "budgetApp";

/// Abstraction over string key-value stores that hold the four ledger records.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Names of the independently keyed records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub budget: String,
    pub cycle_date: String,
    pub open_entries: String,
    pub archive: String,
}

impl StorageKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            budget: format!("{prefix}_daily_budget"),
            cycle_date: format!("{prefix}_current_cycle_date"),
            open_entries: format!("{prefix}_current_expenses"),
            archive: format!("{prefix}_daily_history"),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}
