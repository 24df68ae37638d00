use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use super::benchmark_comparisons;
use crate::cli::formatters;
use crate::config::ResolvedConfig;
use crate::portfolio::Portfolio;
use crate::workbook;

pub fn dispatch_report(config: &ResolvedConfig, output: Option<&Path>, json_output: bool) -> Result<()> {
    info!("Generating spreadsheet report");

    let portfolio = Portfolio::load(config)?;
    let benchmarks = benchmark_comparisons(config, &portfolio)?;
    let path = output.unwrap_or(config.output.as_path());

    let reassigned: Vec<_> = portfolio.reassigned_deposits().collect();
    if !reassigned.is_empty() {
        let amount: Decimal = reassigned.iter().map(|d| d.deposit.amount).sum();
        warn!(
            "{} deposit(s) after the last snapshot counted on {}",
            reassigned.len(),
            reassigned[0].snapshot_date
        );
        if !json_output {
            eprintln!("{}", formatters::format_reassigned_warning(reassigned.len(), amount));
        }
    }

    workbook::write_report(&portfolio, &benchmarks, path)?;

    let years: Vec<i32> = portfolio.years().keys().copied().collect();
    if json_output {
        #[derive(Serialize)]
        struct JsonReport {
            output: String,
            years: Vec<i32>,
            snapshots: usize,
            benchmarks: Vec<String>,
        }

        println!(
            "{}",
            formatters::to_json(&JsonReport {
                output: path.display().to_string(),
                years,
                snapshots: portfolio.holdings.dates.len(),
                benchmarks: benchmarks.iter().map(|b| b.name.clone()).collect(),
            })
        );
    } else {
        print!("{}", formatters::format_report_written(path, years.len(), benchmarks.len()));
    }

    Ok(())
}
