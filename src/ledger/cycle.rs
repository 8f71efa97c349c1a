use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{
    archive::Archive,
    totals::{BudgetUsage, CycleTotals},
};
use crate::{
    domain::{checked_sum, CycleRecord, ExpenseEntry, IntoAmount},
    errors::{BudgetError, Result},
};

pub const CYCLE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Rules the presentation layer cannot bypass when changing the cycle date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CyclePolicy {
    pub allow_future_dates: bool,
}

/// The single open budget cycle.
///
/// Every mutation validates first and only then touches state, so a failed
/// call leaves the ledger exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerState {
    budget: Decimal,
    cycle_date: NaiveDate,
    open_entries: Vec<ExpenseEntry>,
}

impl LedgerState {
    /// Fresh cycle with no budget and no entries.
    pub fn new(cycle_date: NaiveDate) -> Self {
        Self {
            budget: Decimal::ZERO,
            cycle_date,
            open_entries: Vec::new(),
        }
    }

    /// Rebuilds state from persisted parts. Entries are reordered newest first
    /// and duplicate ids after the first occurrence are dropped.
    pub(crate) fn from_parts(
        budget: Decimal,
        cycle_date: NaiveDate,
        mut open_entries: Vec<ExpenseEntry>,
    ) -> Self {
        open_entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let mut seen = HashSet::new();
        open_entries.retain(|entry| seen.insert(entry.id));
        Self {
            budget: budget.max(Decimal::ZERO),
            cycle_date,
            open_entries,
        }
    }

    pub fn budget(&self) -> Decimal {
        self.budget
    }

    pub fn cycle_date(&self) -> NaiveDate {
        self.cycle_date
    }

    /// Open entries, most recent first.
    pub fn open_entries(&self) -> &[ExpenseEntry] {
        &self.open_entries
    }

    pub fn entry(&self, id: Uuid) -> Option<&ExpenseEntry> {
        self.open_entries.iter().find(|entry| entry.id == id)
    }

    pub fn set_budget(&mut self, amount: impl IntoAmount) -> Result<()> {
        let budget = amount
            .to_amount()
            .filter(|value| *value >= Decimal::ZERO)
            .ok_or_else(|| BudgetError::validation("budget must be a non-negative number"))?;
        self.budget = budget;
        Ok(())
    }

    /// Logs an expense against the current cycle date and returns its id.
    ///
    /// Entries stay ordered by `created_at`, newest first; an entry sharing a
    /// timestamp with existing ones goes in front of them.
    pub fn add_expense(
        &mut self,
        description: &str,
        amount: impl IntoAmount,
        created_at: DateTime<Utc>,
    ) -> Result<Uuid> {
        let description = description.trim();
        if description.is_empty() {
            return Err(BudgetError::validation("description must not be empty"));
        }
        let amount = amount
            .to_amount()
            .filter(|value| *value > Decimal::ZERO)
            .ok_or_else(|| BudgetError::validation("amount must be a number greater than zero"))?;
        checked_sum(&self.open_entries)
            .and_then(|total| total.checked_add(amount))
            .ok_or_else(|| BudgetError::validation("amount is too large for this cycle"))?;
        let entry = ExpenseEntry::new(description, amount, self.cycle_date, created_at);
        let id = entry.id;
        let position = self
            .open_entries
            .partition_point(|existing| existing.created_at > created_at);
        self.open_entries.insert(position, entry);
        Ok(id)
    }

    /// Removes the entry with `id`. Unknown ids are ignored; returns whether
    /// an entry was removed.
    pub fn delete_expense(&mut self, id: Uuid) -> bool {
        let before = self.open_entries.len();
        self.open_entries.retain(|entry| entry.id != id);
        self.open_entries.len() != before
    }

    /// Moves the cycle to `date`. Entries keep the date they were logged under.
    pub fn set_cycle_date(
        &mut self,
        date: NaiveDate,
        policy: CyclePolicy,
        today: NaiveDate,
    ) -> Result<()> {
        if !policy.allow_future_dates && date > today {
            return Err(BudgetError::validation("cycle date cannot be in the future"));
        }
        self.cycle_date = date;
        Ok(())
    }

    pub fn compute_totals(&self) -> CycleTotals {
        CycleTotals::compute(self.budget, &self.open_entries)
    }

    pub fn usage(&self) -> BudgetUsage {
        BudgetUsage::compute(self.budget, &self.open_entries)
    }

    /// True when finalizing would archive nothing meaningful.
    pub fn is_blank(&self) -> bool {
        self.budget.is_zero() && self.open_entries.is_empty()
    }

    /// Seals the cycle into `archive` and opens the next calendar day.
    ///
    /// A budget with no expenses is a valid cycle; only an unbudgeted, empty
    /// cycle is refused.
    pub fn finalize(&mut self, archive: &mut Archive) -> Result<CycleRecord> {
        if self.is_blank() {
            return Err(BudgetError::Finalization("nothing to finalize".into()));
        }
        let next_date = self.cycle_date.succ_opt().ok_or_else(|| {
            BudgetError::Finalization(format!("no calendar day follows {}", self.cycle_date))
        })?;
        let transactions = std::mem::take(&mut self.open_entries);
        let record = CycleRecord::seal(self.cycle_date, self.budget, transactions);
        archive.append(record.clone());
        self.budget = Decimal::ZERO;
        self.cycle_date = next_date;
        Ok(record)
    }
}

/// Parses a `YYYY-MM-DD` cycle date.
pub fn parse_cycle_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), CYCLE_DATE_FORMAT)
        .map_err(|_| BudgetError::validation(format!("`{}` is not a valid date", raw.trim())))
}
