//! Command dispatcher that routes parsed clap commands to their handlers.
//!
//! Every handler except `inspect` works on a fully built [`Portfolio`], so
//! configuration is resolved here and passed down.

mod deposits;
mod holdings;
mod inspect;
mod overview;
mod report;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use crate::cli::Commands;
use crate::config::ResolvedConfig;
use crate::importers::benchmark::load_benchmarks;
use crate::portfolio::Portfolio;
use crate::reports::{compare_all, BenchmarkComparison};

/// Route a parsed command to its handler
pub fn dispatch_command(command: Commands, config_path: Option<&Path>, json_output: bool) -> Result<()> {
    debug!("Dispatching {:?}", command);

    match command {
        Commands::Inspect { file } => inspect::dispatch_inspect(&file, json_output),
        Commands::Report { output } => {
            let config = ResolvedConfig::load(config_path)?;
            report::dispatch_report(&config, output.as_deref(), json_output)
        }
        Commands::Holdings { year } => {
            let config = ResolvedConfig::load(config_path)?;
            holdings::dispatch_holdings(&config, year, json_output)
        }
        Commands::Overview => {
            let config = ResolvedConfig::load(config_path)?;
            overview::dispatch_overview(&config, json_output)
        }
        Commands::Deposits => {
            let config = ResolvedConfig::load(config_path)?;
            deposits::dispatch_deposits(&config, json_output)
        }
    }
}

/// Benchmarks from the configured directory, compared on the portfolio's dates
fn benchmark_comparisons(config: &ResolvedConfig, portfolio: &Portfolio) -> Result<Vec<BenchmarkComparison>> {
    let series = load_benchmarks(&config.benchmarks_dir).context("Failed to read benchmark prices")?;
    Ok(compare_all(&series, &portfolio.totals))
}
