//! Utility functions for formatting and parsing numbers and dates
//!
//! This module provides centralized formatting utilities for consistent
//! display of currency and decimal values throughout the application, plus
//! the tolerant number parser shared by all importers.

use anyhow::{anyhow, Result};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Currency symbol options for formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencySymbol {
    /// Include "€ " prefix
    Eur,
    /// No currency symbol (for table cells)
    None,
}

/// Core formatting function with full control over output.
///
/// Formats a Decimal value using Dutch locale conventions:
/// - Thousands separator: `.` (period)
/// - Decimal separator: `,` (comma)
///
/// # Arguments
/// * `value` - The decimal value to format
/// * `width` - Minimum width for padding (0 for no padding, right-aligned)
/// * `symbol` - Whether to include currency symbol
///
/// # Examples
/// ```
/// use portefeuille::utils::{format_currency_with_width, CurrencySymbol};
/// use rust_decimal_macros::dec;
///
/// assert_eq!(
///     format_currency_with_width(dec!(1234.56), 0, CurrencySymbol::Eur),
///     "€ 1.234,56"
/// );
///
/// assert_eq!(
///     format_currency_with_width(dec!(1234), 15, CurrencySymbol::None),
///     "       1.234,00"
/// );
/// ```
pub fn format_currency_with_width(value: Decimal, width: usize, symbol: CurrencySymbol) -> String {
    let is_negative = value < Decimal::ZERO;
    let formatted = format!("{:.2}", value.abs());
    let (integer_part, decimal_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    let digits: Vec<char> = integer_part.chars().collect();
    let mut with_separators = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            with_separators.push('.');
        }
        with_separators.push(*c);
    }

    let sign = if is_negative { "-" } else { "" };
    let prefix = match symbol {
        CurrencySymbol::Eur => "€ ",
        CurrencySymbol::None => "",
    };

    let result = format!("{}{}{},{}", prefix, sign, with_separators, decimal_part);

    // Width counts characters, the euro sign is three bytes
    let len = result.chars().count();
    if width > len {
        format!("{}{}", " ".repeat(width - len), result)
    } else {
        result
    }
}

/// Format as euro with symbol: "€ 1.234,56"
///
/// # Examples
/// ```
/// use portefeuille::utils::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234.56)), "€ 1.234,56");
/// assert_eq!(format_currency(dec!(-500)), "€ -500,00");
/// ```
pub fn format_currency(value: Decimal) -> String {
    format_currency_with_width(value, 0, CurrencySymbol::Eur)
}

/// Format number only (no symbol): "1.234,56"
pub fn format_decimal_nl(value: Decimal) -> String {
    format_currency_with_width(value, 0, CurrencySymbol::None)
}

/// Format a fraction as a percentage with one decimal: 0.1234 -> "12,3%"
///
/// Fractions too large to scale print as `n.v.t.`.
pub fn format_percentage(fraction: Decimal) -> String {
    match fraction.checked_mul(Decimal::ONE_HUNDRED) {
        Some(pct) => format!("{:.1}%", pct.round_dp(1)).replace('.', ","),
        None => "n.v.t.".to_string(),
    }
}

/// Parse a number as written in broker exports.
///
/// Accepts decimal comma (`1.234,56`) and decimal point (`1234.56`), an
/// optional currency prefix and surrounding whitespace. Empty input is zero.
pub fn parse_decimal(text: &str) -> Result<Decimal> {
    let cleaned: String = text
        .trim()
        .trim_start_matches("EUR")
        .trim_start_matches('€')
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect();

    if cleaned.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };

    Decimal::from_str(&normalized).map_err(|_| anyhow!("not a number: '{}'", text.trim()))
}

/// Parse a date in one of the formats found in broker exports
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    let trimmed = date_str.trim();
    for format in ["%d-%m-%Y", "%Y-%m-%d", "%d/%m/%Y", "%d-%m-%y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }
    Err(anyhow!("could not parse date: '{}'", trimmed))
}

const DUTCH_MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maart",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Augustus",
    "September",
    "Oktober",
    "November",
    "December",
];

/// Dutch month name for a date
pub fn dutch_month(date: NaiveDate) -> &'static str {
    DUTCH_MONTHS[date.month0() as usize]
}

/// Column label used for a snapshot date: "1 Februari"
pub fn snapshot_label(date: NaiveDate) -> String {
    format!("{} {}", date.day(), dutch_month(date))
}
