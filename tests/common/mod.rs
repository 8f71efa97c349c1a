#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use budget_cycle::{
    domain::FixedClock,
    errors::{BudgetError, Result},
    storage::{KeyValueStore, MemoryStore},
    CycleManager, ManagerOptions,
};
use chrono::NaiveDate;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}

/// Manager over an empty in-memory store with the clock pinned to `today`.
pub fn manager_on(today: NaiveDate) -> CycleManager {
    reopen(Box::new(MemoryStore::new()), today)
}

/// Opens a fresh manager over an existing store, as a restarted app would.
pub fn reopen(store: Box<dyn KeyValueStore>, today: NaiveDate) -> CycleManager {
    let options = ManagerOptions::default().with_clock(FixedClock::on(today));
    CycleManager::open_with(store, options).expect("open manager")
}

/// Store that rejects writes to one key while armed.
pub struct FlakyStore {
    inner: MemoryStore,
    failing_key: String,
    armed: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn new(failing_key: &str) -> (Self, Arc<AtomicBool>) {
        let armed = Arc::new(AtomicBool::new(false));
        let store = Self {
            inner: MemoryStore::new(),
            failing_key: failing_key.to_string(),
            armed: Arc::clone(&armed),
        };
        (store, armed)
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if key == self.failing_key && self.armed.load(Ordering::SeqCst) {
            return Err(BudgetError::Persistence(format!("quota exceeded writing {key}")));
        }
        self.inner.set(key, value)
    }
}

pub fn arm(flag: &AtomicBool, on: bool) {
    flag.store(on, Ordering::SeqCst);
}
