//! Expense entries logged against a budget cycle.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{new_id, Amounted, Identifiable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseEntry {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    #[serde(alias = "date")]
    pub cycle_date: NaiveDate,
    /// Entries persisted before timestamps existed load with the load time.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl ExpenseEntry {
    /// Builds an entry with a fresh identifier. Callers validate inputs first.
    pub fn new(
        description: impl Into<String>,
        amount: Decimal,
        cycle_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: new_id(),
            description: description.into(),
            amount,
            cycle_date,
            created_at,
        }
    }
}

impl Identifiable for ExpenseEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for ExpenseEntry {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

/// Sums the amounts of any amounted items, or `None` if the sum overflows.
pub fn checked_sum<'a, T: Amounted + 'a>(
    items: impl IntoIterator<Item = &'a T>,
) -> Option<Decimal> {
    items
        .into_iter()
        .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.amount()))
}

/// Sums the amounts of any amounted items, saturating at the representable bounds.
pub fn sum_amounts<'a, T: Amounted + 'a>(items: impl IntoIterator<Item = &'a T>) -> Decimal {
    let mut total = Decimal::ZERO;
    for item in items {
        total = total.checked_add(item.amount()).unwrap_or_else(|| {
            if item.amount() < Decimal::ZERO {
                Decimal::MIN
            } else {
                Decimal::MAX
            }
        });
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let entry = ExpenseEntry::new("Coffee", dec!(120.50), day(), Utc::now());
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["description"], "Coffee");
        assert_eq!(json["amount"], "120.50");
        assert_eq!(json["cycleDate"], "2024-01-10");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn legacy_payload_without_timestamp_loads() {
        let raw = r#"{"id":"0190f5c2-4a1b-7cc0-8000-000000000001","description":"Grab","amount":80,"date":"2024-01-10"}"#;
        let before = Utc::now();
        let entry: ExpenseEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.amount, dec!(80));
        assert_eq!(entry.cycle_date, day());
        assert!(entry.created_at >= before);
    }

    #[test]
    fn sums_amounts_exactly() {
        let entries = vec![
            ExpenseEntry::new("a", dec!(0.10), day(), Utc::now()),
            ExpenseEntry::new("b", dec!(0.20), day(), Utc::now()),
        ];
        assert_eq!(sum_amounts(&entries), dec!(0.30));
        assert_eq!(checked_sum(&entries), Some(dec!(0.30)));
    }

    #[test]
    fn overflowing_sums_saturate() {
        let entries = vec![
            ExpenseEntry::new("a", Decimal::MAX, day(), Utc::now()),
            ExpenseEntry::new("b", Decimal::MAX, day(), Utc::now()),
        ];
        assert_eq!(checked_sum(&entries), None);
        assert_eq!(sum_amounts(&entries), Decimal::MAX);
    }
}
