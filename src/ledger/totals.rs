//! Derived figures for the open cycle. Always recomputed, never stored.

use rust_decimal::Decimal;

use crate::domain::{sum_amounts, ExpenseEntry};

/// Spent and remaining amounts for the open cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTotals {
    pub total_spent: Decimal,
    pub balance: Decimal,
}

impl CycleTotals {
    pub fn compute(budget: Decimal, entries: &[ExpenseEntry]) -> Self {
        let total_spent = sum_amounts(entries);
        Self {
            total_spent,
            balance: budget.checked_sub(total_spent).unwrap_or(Decimal::MIN),
        }
    }
}

/// Proportions used to draw the spent/remaining gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetUsage {
    pub budget: Decimal,
    pub totals: CycleTotals,
    /// Share of the budget spent, in percent, rounded to two places. Zero when
    /// no budget is set; `Decimal::MAX` when the share is too large to represent.
    pub spent_percentage: Decimal,
    /// `spent_percentage` capped at 100 for drawing the arc.
    pub normalized_percentage: Decimal,
    pub is_over_budget: bool,
}

impl BudgetUsage {
    pub fn compute(budget: Decimal, entries: &[ExpenseEntry]) -> Self {
        let totals = CycleTotals::compute(budget, entries);
        let hundred = Decimal::ONE_HUNDRED;
        let spent_percentage = if budget > Decimal::ZERO {
            totals
                .total_spent
                .checked_div(budget)
                .and_then(|share| share.checked_mul(hundred))
                .map(|percent| percent.round_dp(2))
                .unwrap_or(Decimal::MAX)
        } else {
            Decimal::ZERO
        };
        Self {
            budget,
            totals,
            spent_percentage,
            normalized_percentage: spent_percentage.min(hundred),
            is_over_budget: totals.total_spent > budget,
        }
    }

    /// Whether a budget has been set for the cycle.
    pub fn has_budget(&self) -> bool {
        self.budget > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    fn entries(amounts: &[Decimal]) -> Vec<ExpenseEntry> {
        let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        amounts
            .iter()
            .map(|amount| ExpenseEntry::new("item", *amount, day, Utc::now()))
            .collect()
    }

    #[test]
    fn totals_have_no_rounding_drift() {
        let items = entries(&[dec!(0.10), dec!(0.20), dec!(0.30)]);
        let totals = CycleTotals::compute(dec!(1.00), &items);
        assert_eq!(totals.total_spent, dec!(0.60));
        assert_eq!(totals.balance, dec!(0.40));
    }

    #[test]
    fn usage_reports_share_of_budget() {
        let usage = BudgetUsage::compute(dec!(500), &entries(&[dec!(120), dec!(80)]));
        assert_eq!(usage.spent_percentage, dec!(40));
        assert_eq!(usage.normalized_percentage, dec!(40));
        assert!(!usage.is_over_budget);
        assert!(usage.has_budget());
    }

    #[test]
    fn usage_caps_arc_when_over_budget() {
        let usage = BudgetUsage::compute(dec!(100), &entries(&[dec!(150)]));
        assert_eq!(usage.spent_percentage, dec!(150));
        assert_eq!(usage.normalized_percentage, dec!(100));
        assert!(usage.is_over_budget);
        assert_eq!(usage.totals.balance, dec!(-50));
    }

    #[test]
    fn usage_without_budget_is_zero_percent() {
        let usage = BudgetUsage::compute(Decimal::ZERO, &entries(&[dec!(25)]));
        assert_eq!(usage.spent_percentage, Decimal::ZERO);
        assert!(usage.is_over_budget);
        assert!(!usage.has_budget());
    }

    #[test]
    fn huge_share_of_tiny_budget_saturates() {
        let huge = Decimal::from_i128_with_scale(10_i128.pow(27), 0);
        let usage = BudgetUsage::compute(dec!(0.01), &entries(&[huge]));
        assert_eq!(usage.spent_percentage, Decimal::MAX);
        assert_eq!(usage.normalized_percentage, dec!(100));
        assert!(usage.is_over_budget);
    }

    #[test]
    fn overflowing_totals_do_not_panic() {
        let items = entries(&[Decimal::MAX, Decimal::MAX]);
        let totals = CycleTotals::compute(dec!(10), &items);
        assert_eq!(totals.total_spent, Decimal::MAX);
        assert!(totals.balance < Decimal::ZERO);
    }
}
