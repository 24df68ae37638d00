use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::importers::{EntryKind, LedgerEntry};

/// Dividend received in one calendar quarter and one currency
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuarterDividends {
    /// `2021-Q1`
    pub quarter: String,
    pub currency: String,
    pub gross: Decimal,
    /// Withheld tax, negative as in the statement
    pub tax: Decimal,
    pub net: Decimal,
}

/// Dividend totals of one security over the whole history, per currency
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDividends {
    pub product: String,
    pub currency: String,
    pub gross: Decimal,
    pub tax: Decimal,
    pub net: Decimal,
}

pub fn quarter_label(date: chrono::NaiveDate) -> String {
    format!("{}-Q{}", date.year(), date.month0() / 3 + 1)
}

fn add_dividend(slot: &mut (Decimal, Decimal), entry: &LedgerEntry) {
    if entry.kind == EntryKind::Dividend {
        slot.0 += entry.amount;
    } else {
        slot.1 += entry.amount;
    }
}

fn is_dividend(entry: &LedgerEntry) -> bool {
    matches!(entry.kind, EntryKind::Dividend | EntryKind::DividendTax)
}

/// Quarterly pivot of dividend and dividend tax lines, oldest quarter first.
/// Amounts in different currencies are never added together.
pub fn quarterly_dividends(entries: &[LedgerEntry]) -> Vec<QuarterDividends> {
    let mut quarters: BTreeMap<(String, &str), (Decimal, Decimal)> = BTreeMap::new();

    for entry in entries.iter().filter(|e| is_dividend(e)) {
        let key = (quarter_label(entry.date), entry.currency.as_str());
        add_dividend(quarters.entry(key).or_default(), entry);
    }

    quarters
        .into_iter()
        .map(|((quarter, currency), (gross, tax))| QuarterDividends {
            quarter,
            currency: currency.to_string(),
            gross,
            tax,
            net: gross + tax,
        })
        .collect()
}

/// Dividend totals per security and currency, largest net first
pub fn dividends_by_product(entries: &[LedgerEntry]) -> Vec<ProductDividends> {
    let mut products: BTreeMap<(&str, &str), (Decimal, Decimal)> = BTreeMap::new();

    for entry in entries.iter().filter(|e| is_dividend(e)) {
        let key = (entry.product.as_str(), entry.currency.as_str());
        add_dividend(products.entry(key).or_default(), entry);
    }

    let mut result: Vec<ProductDividends> = products
        .into_iter()
        .map(|((product, currency), (gross, tax))| ProductDividends {
            product: product.to_string(),
            currency: currency.to_string(),
            gross,
            tax,
            net: gross + tax,
        })
        .collect();
    result.sort_by(|a, b| b.net.cmp(&a.net));
    result
}
