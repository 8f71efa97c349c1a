//! Conversion of raw user input into currency amounts.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits kept for every stored amount.
pub const MINOR_UNITS: u32 = 2;

/// Rounds to minor-unit precision, halves away from zero.
pub fn to_minor_units(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MINOR_UNITS, RoundingStrategy::MidpointAwayFromZero)
}

/// Values accepted wherever the ledger takes an amount.
///
/// Returns `None` when the input is not a finite number. Sign and range
/// checks are left to the operation consuming the amount.
pub trait IntoAmount {
    fn to_amount(self) -> Option<Decimal>;
}

impl IntoAmount for Decimal {
    fn to_amount(self) -> Option<Decimal> {
        Some(to_minor_units(self))
    }
}

impl IntoAmount for f64 {
    fn to_amount(self) -> Option<Decimal> {
        if !self.is_finite() {
            return None;
        }
        Decimal::from_f64(self).map(to_minor_units)
    }
}

impl IntoAmount for i64 {
    fn to_amount(self) -> Option<Decimal> {
        Some(Decimal::from(self))
    }
}

impl IntoAmount for &str {
    fn to_amount(self) -> Option<Decimal> {
        let raw = self.trim();
        if raw.is_empty() {
            return None;
        }
        Decimal::from_str(raw)
            .or_else(|_| Decimal::from_scientific(raw))
            .ok()
            .map(to_minor_units)
    }
}

impl IntoAmount for &String {
    fn to_amount(self) -> Option<Decimal> {
        self.as_str().to_amount()
    }
}

impl IntoAmount for String {
    fn to_amount(self) -> Option<Decimal> {
        self.as_str().to_amount()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn text_input_is_trimmed_and_parsed() {
        assert_eq!(" 150.75 ".to_amount(), Some(dec!(150.75)));
        assert_eq!("1e2".to_amount(), Some(dec!(100)));
    }

    #[test]
    fn non_numeric_text_is_rejected() {
        assert_eq!("".to_amount(), None);
        assert_eq!("NaN".to_amount(), None);
        assert_eq!("twelve".to_amount(), None);
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        assert_eq!(f64::NAN.to_amount(), None);
        assert_eq!(f64::INFINITY.to_amount(), None);
        assert_eq!(f64::NEG_INFINITY.to_amount(), None);
    }

    #[test]
    fn extra_precision_rounds_half_away_from_zero() {
        assert_eq!(dec!(10.005).to_amount(), Some(dec!(10.01)));
        assert_eq!(dec!(-10.005).to_amount(), Some(dec!(-10.01)));
        assert_eq!(dec!(0.004).to_amount(), Some(dec!(0.00)));
    }
}
