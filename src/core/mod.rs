//! Owner of the live ledger and its write-through persistence.

pub mod cycle_manager;

pub use cycle_manager::{CycleManager, ManagerOptions};
