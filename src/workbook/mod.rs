// Workbook module - renders the portfolio into an .xlsx report

mod formats;
mod summary_sheets;
mod year_sheet;

use anyhow::Context;
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::portfolio::Portfolio;
use crate::reports::{costs_per_year, dividends_by_product, quarterly_dividends, BenchmarkComparison};

pub use formats::Formats;

/// Assemble every sheet: years newest first, then the summaries.
pub fn build_workbook(portfolio: &Portfolio, benchmarks: &[BenchmarkComparison]) -> Result<Workbook> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();

    for view in portfolio.years().values().rev() {
        year_sheet::write_year_sheet(workbook.add_worksheet(), view, &formats)
            .with_context(|| format!("Failed to write sheet for {}", view.year))?;
    }

    summary_sheets::write_deposits_sheet(workbook.add_worksheet(), &portfolio.deposits, &formats)?;
    summary_sheets::write_dividends_sheet(
        workbook.add_worksheet(),
        &quarterly_dividends(&portfolio.ledger),
        &dividends_by_product(&portfolio.ledger),
        &formats,
    )?;
    summary_sheets::write_costs_sheet(workbook.add_worksheet(), &costs_per_year(&portfolio.ledger), &formats)?;
    if !benchmarks.is_empty() {
        summary_sheets::write_benchmarks_sheet(workbook.add_worksheet(), &portfolio.totals, benchmarks, &formats)?;
    }

    Ok(workbook)
}

/// Write the report to `path`, creating its directory when needed.
pub fn write_report(portfolio: &Portfolio, benchmarks: &[BenchmarkComparison], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }

    let mut workbook = build_workbook(portfolio, benchmarks)?;
    workbook
        .save(path)
        .with_context(|| format!("Failed to save workbook {}", path.display()))?;

    info!("Report written to {}", path.display());
    Ok(())
}
