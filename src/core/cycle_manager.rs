use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    config::Config,
    domain::{Clock, CycleRecord, ExpenseEntry, IntoAmount, SystemClock},
    errors::Result,
    ledger::{parse_cycle_date, Archive, BudgetUsage, CyclePolicy, CycleTotals, LedgerState},
    storage::{codec, FileStore, KeyValueStore, StorageKeys},
};

/// Settings applied when a manager is opened.
pub struct ManagerOptions {
    pub keys: StorageKeys,
    pub policy: CyclePolicy,
    pub clock: Box<dyn Clock>,
}

impl ManagerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            keys: config.storage_keys(),
            policy: config.cycle_policy(),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_policy(mut self, policy: CyclePolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            keys: StorageKeys::default(),
            policy: CyclePolicy::default(),
            clock: Box::new(SystemClock),
        }
    }
}

/// Facade that owns the open cycle, the archive, and the store behind them.
///
/// Every mutating call runs against a staged copy of the state, writes the
/// full copy through to the store, and only then replaces the live state. A
/// call that fails at any step leaves the manager as it was, and the store is
/// rewritten with the previous records when a write fails part way.
pub struct CycleManager {
    state: LedgerState,
    archive: Archive,
    store: Box<dyn KeyValueStore>,
    keys: StorageKeys,
    policy: CyclePolicy,
    clock: Box<dyn Clock>,
}

impl CycleManager {
    /// Loads state from `store` with default keys, policy, and the system clock.
    pub fn open(store: Box<dyn KeyValueStore>) -> Result<Self> {
        Self::open_with(store, ManagerOptions::default())
    }

    pub fn open_with(store: Box<dyn KeyValueStore>, options: ManagerOptions) -> Result<Self> {
        let ManagerOptions {
            keys,
            policy,
            clock,
        } = options;
        let (state, archive) = codec::restore(store.as_ref(), &keys, clock.today())?;
        tracing::info!(
            cycle_date = %state.cycle_date(),
            open_entries = state.open_entries().len(),
            archived = archive.len(),
            "ledger loaded"
        );
        Ok(Self {
            state,
            archive,
            store,
            keys,
            policy,
            clock,
        })
    }

    /// Opens the file-backed store selected by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = FileStore::from_config(config)?;
        Self::open_with(Box::new(store), ManagerOptions::from_config(config))
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    pub fn history(&self) -> &[CycleRecord] {
        self.archive.list()
    }

    pub fn budget(&self) -> rust_decimal::Decimal {
        self.state.budget()
    }

    pub fn cycle_date(&self) -> NaiveDate {
        self.state.cycle_date()
    }

    pub fn open_entries(&self) -> &[ExpenseEntry] {
        self.state.open_entries()
    }

    pub fn compute_totals(&self) -> CycleTotals {
        self.state.compute_totals()
    }

    pub fn usage(&self) -> BudgetUsage {
        self.state.usage()
    }

    pub fn policy(&self) -> CyclePolicy {
        self.policy
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn into_store(self) -> Box<dyn KeyValueStore> {
        self.store
    }

    pub fn set_budget(&mut self, amount: impl IntoAmount) -> Result<()> {
        self.commit(|state, _, _| state.set_budget(amount))?;
        tracing::debug!(budget = %self.state.budget(), "budget updated");
        Ok(())
    }

    pub fn add_expense(&mut self, description: &str, amount: impl IntoAmount) -> Result<Uuid> {
        let id = self.commit(|state, _, clock| state.add_expense(description, amount, clock.now()))?;
        tracing::debug!(entry = %id, cycle_date = %self.state.cycle_date(), "expense logged");
        Ok(id)
    }

    /// Removes an open entry. Unknown ids succeed without changing anything.
    pub fn delete_expense(&mut self, id: Uuid) -> Result<bool> {
        let removed = self.commit(|state, _, _| Ok(state.delete_expense(id)))?;
        if removed {
            tracing::debug!(entry = %id, "expense deleted");
        } else {
            tracing::debug!(entry = %id, "delete ignored; no such open entry");
        }
        Ok(removed)
    }

    pub fn set_cycle_date(&mut self, date: NaiveDate) -> Result<()> {
        let policy = self.policy;
        self.commit(|state, _, clock| state.set_cycle_date(date, policy, clock.today()))?;
        tracing::debug!(cycle_date = %date, "cycle date changed");
        Ok(())
    }

    /// Same as [`CycleManager::set_cycle_date`] for `YYYY-MM-DD` text.
    pub fn set_cycle_date_str(&mut self, raw: &str) -> Result<()> {
        let date = parse_cycle_date(raw)?;
        self.set_cycle_date(date)
    }

    /// Seals the open cycle into the archive. There is no way back.
    pub fn finalize_cycle(&mut self) -> Result<CycleRecord> {
        let record = self.commit(|state, archive, _| state.finalize(archive))?;
        tracing::info!(
            date = %record.date(),
            starting_budget = %record.starting_budget(),
            total_expenses = %record.total_expenses(),
            ending_balance = %record.ending_balance(),
            outcome = %record.outcome(),
            next_cycle = %self.state.cycle_date(),
            "cycle finalized"
        );
        Ok(record)
    }

    /// Writes the current state without changing it.
    pub fn save(&mut self) -> Result<()> {
        codec::persist(self.store.as_mut(), &self.keys, &self.state, &self.archive)
    }

    fn commit<T>(
        &mut self,
        op: impl FnOnce(&mut LedgerState, &mut Archive, &dyn Clock) -> Result<T>,
    ) -> Result<T> {
        let mut state = self.state.clone();
        let mut archive = self.archive.clone();
        let output = op(&mut state, &mut archive, self.clock.as_ref())?;
        if let Err(err) = codec::persist(self.store.as_mut(), &self.keys, &state, &archive) {
            tracing::warn!(error = %err, "write-through failed; change discarded");
            // Records written before the failure still hold the staged values.
            if let Err(rollback) =
                codec::persist(self.store.as_mut(), &self.keys, &self.state, &self.archive)
            {
                tracing::error!(error = %rollback, "previous records could not be restored");
            }
            return Err(err);
        }
        self.state = state;
        self.archive = archive;
        Ok(output)
    }
}
