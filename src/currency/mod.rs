//! Display formatting for amounts and cycle dates.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::Config;

/// ISO 4217 currency representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("PHP")
    }
}

/// Locale-aware separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl LocaleConfig {
    /// Picks separators for a BCP 47 tag; unknown tags use `.` and `,`.
    pub fn from_tag(tag: &str) -> Self {
        let language = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let (decimal_separator, grouping_separator) = match language.as_str() {
            "de" | "es" | "id" | "it" | "nl" | "pt" => (',', '.'),
            _ => ('.', ','),
        };
        Self {
            language_tag: tag.to_string(),
            decimal_separator,
            grouping_separator,
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::from_tag("fil-PH")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegativeStyle {
    #[default]
    Sign,
    /// Drops the sign; callers label the value ("Over", "Overspent") themselves.
    Absolute,
}

/// Formats amounts for one currency and locale.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CurrencyFormatter {
    pub code: CurrencyCode,
    pub locale: LocaleConfig,
    pub negative_style: NegativeStyle,
}

impl CurrencyFormatter {
    pub fn from_config(config: &Config) -> Self {
        Self {
            code: CurrencyCode::new(config.currency.as_str()),
            locale: LocaleConfig::from_tag(&config.locale),
            negative_style: NegativeStyle::default(),
        }
    }

    pub fn with_negative_style(mut self, style: NegativeStyle) -> Self {
        self.negative_style = style;
        self
    }

    pub fn format(&self, amount: Decimal) -> String {
        format_currency_value(amount, &self.code, &self.locale, self.negative_style)
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "PHP" => "₱".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u32 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Renders `value` with a fixed number of fractional digits and digit grouping.
pub fn format_number(locale: &LocaleConfig, value: Decimal, precision: u32) -> String {
    let rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    let body = format!("{:.*}", precision as usize, rounded.abs());
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (body.as_str(), None),
    };
    let mut rendered = String::new();
    if rounded < Decimal::ZERO {
        rendered.push('-');
    }
    rendered.push_str(&group_digits(int_part, locale.grouping_separator));
    if let Some(frac) = frac_part {
        rendered.push(locale.decimal_separator);
        rendered.push_str(frac);
    }
    rendered
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

pub fn format_currency_value(
    amount: Decimal,
    code: &CurrencyCode,
    locale: &LocaleConfig,
    negative_style: NegativeStyle,
) -> String {
    let precision = minor_units_for(code.as_str());
    let body = format_number(locale, amount.abs(), precision);
    let symbol = symbol_for(code.as_str());
    let negative = amount.round_dp(precision) < Decimal::ZERO;
    match negative_style {
        NegativeStyle::Sign if negative => format!("-{}{}", symbol, body),
        _ => format!("{}{}", symbol, body),
    }
}

/// Long form used in history headings, e.g. `January 10, 2024`.
pub fn format_cycle_date(date: NaiveDate) -> String {
    format!("{} {}, {}", month_label(date.month()), date.day(), date.year())
}

fn month_label(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "",
    }
}
