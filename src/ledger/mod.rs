//! The open budget cycle, its derived totals, and the archive of sealed cycles.

pub mod archive;
pub mod cycle;
pub mod totals;

pub use archive::Archive;
pub use cycle::{parse_cycle_date, CyclePolicy, LedgerState, CYCLE_DATE_FORMAT};
pub use totals::{BudgetUsage, CycleTotals};
