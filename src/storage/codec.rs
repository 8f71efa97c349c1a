//! Translation between the typed ledger model and the store's string records.
//!
//! Encoding is strict. Decoding favours availability: a record that cannot be
//! parsed falls back to its default and a warning is logged, it never fails
//! the load.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{KeyValueStore, StorageKeys};
use crate::{
    domain::{CycleRecord, ExpenseEntry, IntoAmount},
    errors::Result,
    ledger::{Archive, LedgerState, CYCLE_DATE_FORMAT},
};

/// Writes all four records.
pub fn persist(
    store: &mut dyn KeyValueStore,
    keys: &StorageKeys,
    state: &LedgerState,
    archive: &Archive,
) -> Result<()> {
    let entries = encode_entries(state.open_entries())?;
    let records = encode_archive(archive)?;
    store.set(&keys.budget, &encode_budget(state.budget()))?;
    store.set(&keys.cycle_date, &encode_cycle_date(state.cycle_date()))?;
    store.set(&keys.open_entries, &entries)?;
    store.set(&keys.archive, &records)?;
    Ok(())
}

/// Reads all four records, substituting defaults for anything missing or
/// malformed. Only store failures are returned as errors.
pub fn restore(
    store: &dyn KeyValueStore,
    keys: &StorageKeys,
    today: NaiveDate,
) -> Result<(LedgerState, Archive)> {
    let budget = store
        .get(&keys.budget)?
        .map(|raw| decode_budget(&raw))
        .unwrap_or(Decimal::ZERO);
    let cycle_date = store
        .get(&keys.cycle_date)?
        .and_then(|raw| decode_cycle_date(&raw))
        .unwrap_or(today);
    let entries = store
        .get(&keys.open_entries)?
        .map(|raw| decode_entries(&raw))
        .unwrap_or_default();
    let records = store
        .get(&keys.archive)?
        .map(|raw| decode_archive(&raw))
        .unwrap_or_default();
    Ok((LedgerState::from_parts(budget, cycle_date, entries), records))
}

pub fn encode_budget(budget: Decimal) -> String {
    budget.to_string()
}

pub fn encode_cycle_date(date: NaiveDate) -> String {
    date.format(CYCLE_DATE_FORMAT).to_string()
}

pub fn encode_entries(entries: &[ExpenseEntry]) -> Result<String> {
    Ok(serde_json::to_string(entries)?)
}

pub fn encode_archive(archive: &Archive) -> Result<String> {
    Ok(serde_json::to_string(archive.list())?)
}

/// Unparseable or negative budgets read as zero, i.e. "unset".
pub fn decode_budget(raw: &str) -> Decimal {
    match raw.to_amount() {
        Some(value) if value >= Decimal::ZERO => value,
        _ => {
            tracing::warn!(raw, "stored budget is not a non-negative number; using 0");
            Decimal::ZERO
        }
    }
}

pub fn decode_cycle_date(raw: &str) -> Option<NaiveDate> {
    let parsed = NaiveDate::parse_from_str(raw.trim(), CYCLE_DATE_FORMAT).ok();
    if parsed.is_none() {
        tracing::warn!(raw, "stored cycle date is invalid; using today");
    }
    parsed
}

pub fn decode_entries(raw: &str) -> Vec<ExpenseEntry> {
    decode_list(raw, "open entries")
}

pub fn decode_archive(raw: &str) -> Archive {
    Archive::from_records(decode_list::<CycleRecord>(raw, "archive"))
}

/// Parses a JSON array element by element, skipping elements that do not fit
/// `T`. Anything other than an array yields an empty list.
fn decode_list<T: DeserializeOwned>(raw: &str, label: &str) -> Vec<T> {
    let items = match serde_json::from_str::<Vec<Value>>(raw) {
        Ok(items) => items,
        Err(err) => {
            tracing::warn!(record = label, error = %err, "stored record unreadable; starting empty");
            return Vec::new();
        }
    };
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(record = label, error = %err, "skipping malformed element");
                None
            }
        })
        .collect();
    if decoded.len() != total {
        tracing::warn!(
            record = label,
            kept = decoded.len(),
            total,
            "dropped malformed elements while loading"
        );
    }
    decoded
}
