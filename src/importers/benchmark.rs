use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::{csv_reader, read_text};
use crate::error::ReportError;
use crate::utils::{parse_date, parse_decimal};

/// Closing prices of one index tracker, keyed by trading day
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkSeries {
    pub name: String,
    pub closes: BTreeMap<NaiveDate, Decimal>,
}

/// Parse a Yahoo-style price download (`Date`, ..., `Close`, ...).
///
/// The file stem is the benchmark name. Rows without a close (`null`, empty)
/// are skipped.
pub fn parse_benchmark_csv(path: &Path) -> Result<BenchmarkSeries> {
    let content = read_text(path)?;
    let mut reader = csv_reader(&content);

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read headers of {}", path.display()))?
        .clone();

    let position = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
    let missing = |column: &str| ReportError::MissingColumn {
        path: path.to_path_buf(),
        column: column.to_string(),
    };
    let date_idx = position("date").ok_or_else(|| missing("Date"))?;
    let close_idx = position("close").ok_or_else(|| missing("Close"))?;

    let mut closes = BTreeMap::new();
    for (idx, record) in reader.records().enumerate() {
        let row = idx + 2;
        let record = record.map_err(|e| ReportError::MalformedCsv {
            path: path.to_path_buf(),
            row,
            reason: e.to_string(),
        })?;

        let close = record.get(close_idx).unwrap_or_default().trim();
        if close.is_empty() || close.eq_ignore_ascii_case("null") {
            continue;
        }

        // Timestamps like "2021-02-01 00:00:00+01:00" keep only the day
        let date_text = record.get(date_idx).unwrap_or_default().trim();
        let date_text = date_text.get(..10).unwrap_or(date_text);

        let parsed = parse_date(date_text).and_then(|d| Ok((d, parse_decimal(close)?)));
        match parsed {
            Ok((date, price)) => {
                closes.insert(date, price);
            }
            Err(e) => {
                return Err(ReportError::MalformedCsv {
                    path: path.to_path_buf(),
                    row,
                    reason: e.to_string(),
                }
                .into())
            }
        }
    }

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("benchmark")
        .to_string();

    Ok(BenchmarkSeries { name, closes })
}

/// Load every `*.csv` in `dir`. A missing directory means no benchmarks.
pub fn load_benchmarks(dir: &Path) -> Result<Vec<BenchmarkSeries>> {
    if !dir.is_dir() {
        info!("No benchmark directory at {}, skipping comparison", dir.display());
        return Ok(Vec::new());
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
        })
        .collect();
    paths.sort();

    let mut series = Vec::new();
    for path in paths {
        let s = parse_benchmark_csv(&path)?;
        if s.closes.is_empty() {
            warn!("Benchmark {} has no prices, skipping", s.name);
            continue;
        }
        series.push(s);
    }

    info!("Loaded {} benchmark series", series.len());
    Ok(series)
}
