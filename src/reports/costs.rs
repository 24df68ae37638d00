use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::importers::{EntryKind, LedgerEntry};

/// Broker costs paid in one year and one currency, positive amounts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearCosts {
    pub year: i32,
    pub currency: String,
    /// Keyed by ledger description
    pub by_kind: BTreeMap<String, Decimal>,
    pub total: Decimal,
}

/// Cost lines grouped per year, currency and description, oldest year first
pub fn costs_per_year(entries: &[LedgerEntry]) -> Vec<YearCosts> {
    let mut years: BTreeMap<(i32, &str), BTreeMap<String, Decimal>> = BTreeMap::new();

    for entry in entries.iter().filter(|e| e.kind == EntryKind::Cost) {
        *years
            .entry((entry.date.year(), entry.currency.as_str()))
            .or_default()
            .entry(entry.description.clone())
            .or_default() -= entry.amount;
    }

    years
        .into_iter()
        .map(|((year, currency), by_kind)| YearCosts {
            year,
            currency: currency.to_string(),
            total: by_kind.values().copied().sum(),
            by_kind,
        })
        .collect()
}
