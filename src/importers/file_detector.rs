use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook, Reader, Xlsx};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use super::{csv_reader, read_text};

/// Type of export file detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileKind {
    Holdings,
    Account,
    Benchmark,
}

impl FileKind {
    pub fn describe(&self) -> &'static str {
        match self {
            FileKind::Holdings => "holdings snapshot (position report)",
            FileKind::Account => "cash account statement",
            FileKind::Benchmark => "benchmark price history",
        }
    }
}

/// Detect the kind of export from its header row.
///
/// Detection strategy:
/// - `Omschrijving`/`Description` plus `Mutatie`/`Change` → account statement
/// - `Product` plus `Aantal`/`Quantity` → holdings snapshot
/// - `Date` plus `Close` → benchmark prices
///
/// Returns the kind together with the header cells.
pub fn detect_file_kind<P: AsRef<Path>>(path: P) -> Result<(FileKind, Vec<String>)> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| anyhow!("File has no extension"))?
        .to_lowercase();

    let headers: Vec<String> = match extension.as_str() {
        "csv" => {
            let content = read_text(path)?;
            let mut reader = csv_reader(&content);
            let record = reader.headers().context("Failed to read CSV headers")?.clone();
            let headers: Vec<String> = record.iter().map(|h| h.trim().to_string()).collect();
            headers
        }
        "xlsx" => {
            let mut workbook: Xlsx<_> =
                open_workbook(path).context("Failed to open Excel file for type detection")?;
            let sheet = workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| anyhow!("Workbook has no sheets"))?;
            let range = workbook.worksheet_range(&sheet)?;
            let headers: Vec<String> = range
                .rows()
                .next()
                .map(|row| row.iter().map(|c| c.to_string().trim().to_string()).collect())
                .unwrap_or_default();
            headers
        }
        _ => return Err(anyhow!("Unsupported file extension: {}", extension)),
    };

    let lower: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    let has = |names: &[&str]| lower.iter().any(|h| names.contains(&h.as_str()));
    let has_part = |parts: &[&str]| lower.iter().any(|h| parts.iter().any(|p| h.contains(p)));

    let kind = if has(&["omschrijving", "description"]) && has(&["mutatie", "change"]) {
        FileKind::Account
    } else if has(&["product"]) && has_part(&["aantal", "quantity"]) {
        FileKind::Holdings
    } else if has(&["date"]) && has(&["close"]) {
        FileKind::Benchmark
    } else {
        return Err(anyhow!(
            "Could not determine file type.\n\
             Found headers: {:?}\n\
             Expected either:\n  \
             - position report with: Product, Aantal/Quantity, Waarde in EUR\n  \
             - account statement with: Datum, Omschrijving, Mutatie\n  \
             - price history with: Date, Close",
            headers
        ));
    };

    info!("Detected {:?} in {}", kind, path.display());
    Ok((kind, headers))
}
