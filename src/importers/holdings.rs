use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

use super::{csv_reader, read_text};
use crate::config::HoldingsConfig;
use crate::error::ReportError;
use crate::utils::parse_decimal;

/// One line of a broker position report
#[derive(Debug, Clone, PartialEq)]
pub struct RawPosition {
    pub product: String,
    pub symbol: String,
    pub quantity: Decimal,
    pub value: Decimal,
}

/// All positions of one monthly export
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub date: NaiveDate,
    pub source: PathBuf,
    pub positions: Vec<RawPosition>,
}

impl Snapshot {
    /// Rename the broker's cash line to a readable label
    pub fn rename_product(&mut self, from: &str, to: &str) {
        for position in &mut self.positions {
            if position.product.trim().eq_ignore_ascii_case(from.trim()) {
                position.product = to.to_string();
            }
        }
    }
}

/// Snapshot date embedded in a file name such as `2021-02-01.csv`
pub fn snapshot_date_from_path(path: &Path) -> Option<NaiveDate> {
    static DATE_RE: OnceLock<Regex> = OnceLock::new();
    let re = DATE_RE.get_or_init(|| {
        Regex::new(r"(\d{4})-(\d{2})-(\d{2})").expect("static snapshot date regex")
    });

    let stem = path.file_stem()?.to_str()?;
    let caps = re.captures(stem)?;
    NaiveDate::from_ymd_opt(
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    )
}

/// Read every snapshot in `dir`, sorted by date.
///
/// Files whose name carries no `YYYY-MM-DD` date are skipped. The cash line is
/// renamed according to `holdings`.
pub fn load_snapshots(dir: &Path, holdings: &HoldingsConfig) -> Result<Vec<Snapshot>> {
    if !dir.is_dir() {
        return Err(ReportError::FileNotFound(dir.to_path_buf()).into());
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| matches!(e.to_lowercase().as_str(), "csv" | "xlsx"))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();

    let mut snapshots = Vec::new();
    for path in paths {
        let Some(date) = snapshot_date_from_path(&path) else {
            warn!("Skipping {}: no YYYY-MM-DD date in file name", path.display());
            continue;
        };

        let positions = parse_holdings_file(&path)?;
        let mut snapshot = Snapshot {
            date,
            source: path,
            positions,
        };
        snapshot.rename_product(&holdings.cash_product, &holdings.cash_label);
        snapshots.push(snapshot);
    }

    if snapshots.is_empty() {
        return Err(ReportError::NoSnapshots(dir.to_path_buf()).into());
    }

    snapshots.sort_by_key(|s| s.date);
    info!("Loaded {} holdings snapshots from {}", snapshots.len(), dir.display());
    Ok(snapshots)
}

/// Parse one position report (auto-detects Excel vs CSV)
pub fn parse_holdings_file(path: &Path) -> Result<Vec<RawPosition>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| anyhow!("File has no extension: {}", path.display()))?
        .to_lowercase();

    match extension.as_str() {
        "xlsx" => parse_holdings_excel(path),
        "csv" => parse_holdings_csv(path),
        _ => Err(anyhow!(
            "Unsupported file format: {}. Supported formats: .xlsx, .csv",
            extension
        )),
    }
}

#[derive(Debug)]
struct HoldingsColumns {
    product: usize,
    symbol: Option<usize>,
    quantity: usize,
    value: usize,
}

fn find_columns<'a>(
    headers: impl IntoIterator<Item = &'a str>,
    path: &Path,
) -> Result<HoldingsColumns> {
    let mut product_idx = None;
    let mut symbol_idx = None;
    let mut quantity_idx = None;
    let mut value_idx = None;
    let mut plain_value_idx = None;

    for (idx, header) in headers.into_iter().enumerate() {
        let text = header.trim().to_lowercase();

        if text == "product" {
            product_idx = Some(idx);
        }

        if symbol_idx.is_none() && (text.contains("isin") || text.starts_with("symbo")) {
            symbol_idx = Some(idx);
        }

        if text.contains("aantal") || text.contains("quantity") {
            quantity_idx = Some(idx);
        }

        // Base currency value wins over the local value column
        if text.contains("in eur") || text.contains("(eur)") {
            value_idx = Some(idx);
        } else if text == "waarde" || text == "value" {
            plain_value_idx = Some(idx);
        }
    }

    let missing = |column: &str| ReportError::MissingColumn {
        path: path.to_path_buf(),
        column: column.to_string(),
    };

    Ok(HoldingsColumns {
        product: product_idx.ok_or_else(|| missing("Product"))?,
        symbol: symbol_idx,
        quantity: quantity_idx.ok_or_else(|| missing("Aantal"))?,
        value: value_idx
            .or(plain_value_idx)
            .ok_or_else(|| missing("Waarde in EUR"))?,
    })
}

/// Parse a CSV position report
pub fn parse_holdings_csv(path: &Path) -> Result<Vec<RawPosition>> {
    debug!("Parsing holdings CSV: {:?}", path);
    let content = read_text(path)?;
    let mut reader = csv_reader(&content);

    let headers = reader
        .headers()
        .map_err(|e| malformed(path, 1, e.to_string()))?
        .clone();
    let columns = find_columns(headers.iter(), path)?;
    debug!("Column mapping: {:?}", columns);

    let mut positions = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let row = idx + 2;
        let record = record.map_err(|e| malformed(path, row, e.to_string()))?;
        let field = |i: usize| record.get(i).unwrap_or_default();

        if let Some(position) = build_position(
            field(columns.product),
            columns.symbol.map(field).unwrap_or_default(),
            field(columns.quantity),
            field(columns.value),
        )
        .map_err(|e| malformed(path, row, e.to_string()))?
        {
            positions.push(position);
        }
    }

    Ok(positions)
}

/// Parse the first sheet of an Excel position report
pub fn parse_holdings_excel(path: &Path) -> Result<Vec<RawPosition>> {
    debug!("Parsing holdings Excel: {:?}", path);
    if !path.exists() {
        return Err(ReportError::FileNotFound(path.to_path_buf()).into());
    }

    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("Failed to open Excel file {}", path.display()))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("No sheets in {}", path.display()))?;
    let range = workbook
        .worksheet_range(&sheet)
        .with_context(|| format!("Failed to read sheet '{}'", sheet))?;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .ok_or_else(|| malformed(path, 1, "empty sheet".to_string()))?
        .iter()
        .map(|c| c.to_string())
        .collect();
    let columns = find_columns(header.iter().map(String::as_str), path)?;

    let mut positions = Vec::new();
    for (idx, row) in rows.enumerate() {
        let cell = |i: usize| row.get(i).map(cell_text).unwrap_or_default();
        if let Some(position) = build_position(
            &cell(columns.product),
            &columns.symbol.map(cell).unwrap_or_default(),
            &cell(columns.quantity),
            &cell(columns.value),
        )
        .map_err(|e| malformed(path, idx + 2, e.to_string()))?
        {
            positions.push(position);
        }
    }

    Ok(positions)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn build_position(
    product: &str,
    symbol: &str,
    quantity: &str,
    value: &str,
) -> Result<Option<RawPosition>> {
    let product = product.trim();
    if product.is_empty() {
        return Ok(None);
    }

    Ok(Some(RawPosition {
        product: product.to_string(),
        symbol: symbol.trim().to_string(),
        quantity: parse_decimal(quantity)?,
        value: parse_decimal(value)?,
    }))
}

fn malformed(path: &Path, row: usize, reason: String) -> anyhow::Error {
    ReportError::MalformedCsv {
        path: path.to_path_buf(),
        row,
        reason,
    }
    .into()
}
