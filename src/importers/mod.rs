// Import module - broker holdings snapshots, account ledger and benchmark prices

pub mod account;
pub mod benchmark;
mod file_detector;
pub mod holdings;

use anyhow::{Context, Result};
use encoding_rs::WINDOWS_1252;
use std::path::Path;
use tracing::debug;

use crate::error::ReportError;

pub use account::{EntryKind, LedgerEntry};
pub use benchmark::BenchmarkSeries;
pub use file_detector::{detect_file_kind, FileKind};
pub use holdings::{RawPosition, Snapshot};

/// Read a text export, falling back to Windows-1252 for non-UTF-8 files.
pub(crate) fn read_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ReportError::FileNotFound(path.to_path_buf()).into());
    }

    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&bytes);

    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(_) => {
            debug!("{} is not UTF-8, decoding as Windows-1252", path.display());
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            Ok(text.into_owned())
        }
    }
}

/// Pick the field delimiter from the header line (`;` or `,`).
pub(crate) fn detect_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or_default();
    let semicolons = header.matches(';').count();
    let commas = header.matches(',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

/// CSV reader over already-decoded text
pub(crate) fn csv_reader(content: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(content))
        .flexible(true) // Broker exports leave unnamed trailing columns
        .from_reader(content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("Datum;Tijd;Product\n1;2;3"), b';');
        assert_eq!(detect_delimiter("Date,Open,Close\n"), b',');
        assert_eq!(detect_delimiter(""), b',');
    }

    #[test]
    fn test_read_text_decodes_windows_1252() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("Account.csv");
        // "Café" with 0xE9 for é
        std::fs::write(&path, b"Product\nCaf\xE9\n").unwrap();
        assert_eq!(read_text(&path).unwrap(), "Product\nCafé\n");
    }

    #[test]
    fn test_read_text_missing_file() {
        let err = read_text(Path::new("/nonexistent/Account.csv")).unwrap_err();
        assert!(err.to_string().starts_with("file not found"));
    }
}
