#![doc(test(attr(deny(warnings))))]

//! Budget Cycle tracks a daily spending budget: one open cycle of expenses
//! against a budget, sealed into an append-only archive at the end of each day.
//!
//! The presentation layer drives everything through [`CycleManager`], which
//! validates each change and writes it through to a [`KeyValueStore`].

pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::config::{Config, ConfigManager};
pub use crate::core::{CycleManager, ManagerOptions};
pub use crate::domain::{Clock, CycleOutcome, CycleRecord, ExpenseEntry, FixedClock, SystemClock};
pub use crate::errors::{BudgetError, Result};
pub use crate::ledger::{Archive, BudgetUsage, CyclePolicy, CycleTotals, LedgerState};
pub use crate::storage::{FileStore, KeyValueStore, MemoryStore, StorageKeys};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        let build = utils::build_info::current();
        tracing::info!(
            version = build.version,
            git_hash = build.git_hash,
            profile = build.profile,
            "Budget Cycle tracing initialized."
        );
    });
}
