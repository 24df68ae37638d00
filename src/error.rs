//! Error handling for portefeuille
//!
//! Defines the domain error taxonomy and establishes a unified Result type
//! using anyhow for context chaining and error propagation. Every error is
//! fatal: the binary prints it and exits non-zero.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Core error types for reading exports and building the report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("malformed CSV {} (row {row}): {reason}", .path.display())]
    MalformedCsv {
        path: PathBuf,
        row: usize,
        reason: String,
    },

    #[error("column '{column}' not found in {}", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("duplicate snapshot date {date}: {} and {}", .first.display(), .second.display())]
    DuplicateSnapshot {
        date: NaiveDate,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("negative quantity {quantity} for {product} on {date}")]
    NegativeQuantity {
        product: String,
        date: NaiveDate,
        quantity: rust_decimal::Decimal,
    },

    #[error("no holdings snapshots found in {}", .0.display())]
    NoSnapshots(PathBuf),

    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for report operations
pub type Result<T> = anyhow::Result<T>;
