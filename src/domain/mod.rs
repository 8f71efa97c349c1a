//! Domain models for budget cycles. No I/O; only data types and the
//! arithmetic that keeps them consistent.

pub mod amount;
pub mod common;
pub mod expense;
pub mod record;

pub use amount::{to_minor_units, IntoAmount, MINOR_UNITS};
pub use common::{Amounted, Clock, FixedClock, Identifiable, SystemClock};
pub use expense::{checked_sum, sum_amounts, ExpenseEntry};
pub use record::{CycleOutcome, CycleRecord};
