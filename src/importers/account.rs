use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use super::{csv_reader, read_text};
use crate::config::LedgerConfig;
use crate::error::ReportError;
use crate::utils::{parse_date, parse_decimal};

/// Ledger line categories the report cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum EntryKind {
    Deposit,
    Withdrawal,
    Dividend,
    DividendTax,
    Cost,
}

impl EntryKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Deposit => "Storting",
            EntryKind::Withdrawal => "Terugstorting",
            EntryKind::Dividend => "Dividend",
            EntryKind::DividendTax => "Dividendbelasting",
            EntryKind::Cost => "Kosten",
        }
    }

    /// Deposits and withdrawals both move money in or out of the portfolio
    pub fn is_cash_flow(&self) -> bool {
        matches!(self, EntryKind::Deposit | EntryKind::Withdrawal)
    }
}

/// One classified line of the cash account statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub product: String,
    pub description: String,
    pub currency: String,
    /// Signed as in the statement: deposits positive, costs and withdrawals negative
    pub amount: Decimal,
    pub kind: EntryKind,
}

/// Classify a description, `None` for lines the report ignores
pub fn classify(description: &str, ledger: &LedgerConfig) -> Option<EntryKind> {
    let text = description.trim();
    let lower = text.to_lowercase();
    let exact = |list: &[String]| list.iter().any(|d| d.trim().eq_ignore_ascii_case(text));

    if exact(&ledger.deposit_descriptions) {
        Some(EntryKind::Deposit)
    } else if exact(&ledger.withdrawal_descriptions) {
        Some(EntryKind::Withdrawal)
    } else if exact(&ledger.dividend_descriptions) {
        Some(EntryKind::Dividend)
    } else if exact(&ledger.dividend_tax_descriptions) {
        Some(EntryKind::DividendTax)
    } else if ledger
        .cost_keywords
        .iter()
        .any(|k| !k.is_empty() && lower.contains(&k.to_lowercase()))
    {
        Some(EntryKind::Cost)
    } else {
        None
    }
}

#[derive(Debug)]
struct AccountColumns {
    date: usize,
    product: Option<usize>,
    description: usize,
    currency: usize,
    amount: usize,
}

fn find_columns(headers: &csv::StringRecord, path: &Path) -> Result<AccountColumns> {
    let mut date_idx = None;
    let mut product_idx = None;
    let mut description_idx = None;
    let mut change_idx = None;

    for (idx, header) in headers.iter().enumerate() {
        let text = header.trim().to_lowercase();
        match text.as_str() {
            // Exact match: "Valutadatum"/"Value date" must not win
            "datum" | "date" => date_idx = Some(idx),
            "product" => product_idx = Some(idx),
            "omschrijving" | "description" => description_idx = Some(idx),
            "mutatie" | "change" => change_idx = Some(idx),
            _ => {}
        }
    }

    let missing = |column: &str| ReportError::MissingColumn {
        path: path.to_path_buf(),
        column: column.to_string(),
    };
    let change = change_idx.ok_or_else(|| missing("Mutatie"))?;

    // The change header spans two cells: currency, then the unnamed amount
    Ok(AccountColumns {
        date: date_idx.ok_or_else(|| missing("Datum"))?,
        product: product_idx,
        description: description_idx.ok_or_else(|| missing("Omschrijving"))?,
        currency: change,
        amount: change + 1,
    })
}

/// Parse the cash account statement, keeping only classified lines, oldest first.
pub fn parse_account_csv(path: &Path, ledger: &LedgerConfig) -> Result<Vec<LedgerEntry>> {
    info!("Parsing account statement: {:?}", path);
    let content = read_text(path)?;
    let mut reader = csv_reader(&content);

    let headers = reader
        .headers()
        .map_err(|e| malformed(path, 1, e.to_string()))?
        .clone();
    let columns = find_columns(&headers, path)?;
    debug!("Column mapping: {:?}", columns);

    let mut entries = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let row = idx + 2;
        let record = record.map_err(|e| malformed(path, row, e.to_string()))?;
        let field = |i: usize| record.get(i).unwrap_or_default().trim();

        let description = field(columns.description);
        let Some(kind) = classify(description, ledger) else {
            continue;
        };

        let date = parse_date(field(columns.date)).map_err(|e| malformed(path, row, e.to_string()))?;
        let amount =
            parse_decimal(field(columns.amount)).map_err(|e| malformed(path, row, e.to_string()))?;

        entries.push(LedgerEntry {
            date,
            product: columns.product.map(field).unwrap_or_default().to_string(),
            description: description.to_string(),
            currency: field(columns.currency).to_string(),
            amount,
            kind,
        });
    }

    // Statements list newest first
    entries.sort_by_key(|e| e.date);
    info!("Classified {} ledger lines", entries.len());
    Ok(entries)
}

fn malformed(path: &Path, row: usize, reason: String) -> anyhow::Error {
    ReportError::MalformedCsv {
        path: path.to_path_buf(),
        row,
        reason,
    }
    .into()
}
