use anyhow::Result;
use serde::Serialize;

use super::benchmark_comparisons;
use crate::cli::formatters;
use crate::config::ResolvedConfig;
use crate::portfolio::{PeriodTotals, Portfolio, YearSummary, YearView};
use crate::reports::BenchmarkComparison;

pub fn dispatch_overview(config: &ResolvedConfig, json_output: bool) -> Result<()> {
    tracing::info!("Showing overview");

    let portfolio = Portfolio::load(config)?;
    let benchmarks = benchmark_comparisons(config, &portfolio)?;
    let years: Vec<YearSummary> = portfolio.years().values().map(YearView::summary).collect();

    if json_output {
        #[derive(Serialize)]
        struct JsonOverview<'a> {
            totals: &'a [PeriodTotals],
            years: &'a [YearSummary],
            benchmarks: &'a [BenchmarkComparison],
        }

        println!(
            "{}",
            formatters::to_json(&JsonOverview {
                totals: &portfolio.totals,
                years: &years,
                benchmarks: &benchmarks,
            })
        );
    } else {
        print!("{}", formatters::format_overview_table(&portfolio.totals, &years, &benchmarks));
    }

    Ok(())
}
