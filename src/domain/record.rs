//! Sealed snapshots of finalized budget cycles.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{new_id, Identifiable};
use super::expense::{sum_amounts, ExpenseEntry};

/// Immutable record of one finalized cycle.
///
/// Fields are private: a record is built once by [`CycleRecord::seal`] and can
/// only be read afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredCycleRecord")]
pub struct CycleRecord {
    id: Uuid,
    date: NaiveDate,
    starting_budget: Decimal,
    total_expenses: Decimal,
    ending_balance: Decimal,
    transactions: Vec<ExpenseEntry>,
}

impl CycleRecord {
    /// Takes ownership of `transactions` and derives the totals from them.
    pub(crate) fn seal(
        date: NaiveDate,
        starting_budget: Decimal,
        transactions: Vec<ExpenseEntry>,
    ) -> Self {
        Self::with_id(new_id(), date, starting_budget, transactions)
    }

    fn with_id(
        id: Uuid,
        date: NaiveDate,
        starting_budget: Decimal,
        transactions: Vec<ExpenseEntry>,
    ) -> Self {
        let total_expenses = sum_amounts(&transactions);
        Self {
            id,
            date,
            starting_budget,
            total_expenses,
            ending_balance: starting_budget
                .checked_sub(total_expenses)
                .unwrap_or(Decimal::MIN),
            transactions,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn starting_budget(&self) -> Decimal {
        self.starting_budget
    }

    pub fn total_expenses(&self) -> Decimal {
        self.total_expenses
    }

    pub fn ending_balance(&self) -> Decimal {
        self.ending_balance
    }

    pub fn transactions(&self) -> &[ExpenseEntry] {
        &self.transactions
    }

    pub fn outcome(&self) -> CycleOutcome {
        if self.ending_balance < Decimal::ZERO {
            CycleOutcome::Overspent
        } else {
            CycleOutcome::Saved
        }
    }
}

impl Identifiable for CycleRecord {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Whether a finalized cycle stayed within its budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Saved,
    Overspent,
}

impl fmt::Display for CycleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CycleOutcome::Saved => "Saved",
            CycleOutcome::Overspent => "Overspent",
        };
        f.write_str(label)
    }
}

/// On-disk shape of a record. Totals are optional so older or hand-edited
/// payloads still load.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCycleRecord {
    id: Uuid,
    date: NaiveDate,
    #[serde(default)]
    starting_budget: Decimal,
    #[serde(default)]
    total_expenses: Option<Decimal>,
    #[serde(default)]
    ending_balance: Option<Decimal>,
    #[serde(default)]
    transactions: Vec<ExpenseEntry>,
}

impl From<StoredCycleRecord> for CycleRecord {
    fn from(stored: StoredCycleRecord) -> Self {
        let record = CycleRecord::with_id(
            stored.id,
            stored.date,
            stored.starting_budget,
            stored.transactions,
        );
        let consistent = stored.total_expenses == Some(record.total_expenses)
            && stored.ending_balance == Some(record.ending_balance);
        if !consistent {
            tracing::warn!(
                record = %record.id,
                date = %record.date,
                "archived totals disagree with transactions; recomputed"
            );
        }
        record
    }
}
