//! Integration tests for the portefeuille report
//!
//! These tests run the library end to end on a small set of exports:
//! - snapshot merge across a year boundary
//! - deposit attribution, including one after the last snapshot
//! - per-year split and totals
//! - dividend and cost summaries
//! - benchmark comparison
//! - the written workbook, read back with calamine

mod cli_helpers;

use anyhow::Result;
use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveDate;
use portefeuille::config::ResolvedConfig;
use portefeuille::importers::benchmark::load_benchmarks;
use portefeuille::portfolio::Portfolio;
use portefeuille::reports::{compare_all, costs_per_year, quarterly_dividends};
use portefeuille::workbook::write_report;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn load_fixture() -> Result<(TempDir, ResolvedConfig, Portfolio)> {
    let dir = TempDir::new()?;
    let config_path = cli_helpers::write_fixtures(dir.path());
    let config = ResolvedConfig::load(Some(config_path.as_path()))?;
    let portfolio = Portfolio::load(&config)?;
    Ok((dir, config, portfolio))
}

#[test]
fn test_merge_keeps_one_cell_per_snapshot() -> Result<()> {
    let (_dir, _config, portfolio) = load_fixture()?;

    assert_eq!(
        portfolio.holdings.dates,
        vec![date(2021, 11, 1), date(2021, 12, 1), date(2022, 1, 1)]
    );
    assert_eq!(portfolio.holdings.rows.len(), 3);
    for row in &portfolio.holdings.rows {
        assert_eq!(row.cells.len(), 3, "{} has a cell per snapshot", row.product);
    }

    // Cash line is renamed
    assert!(portfolio.holdings.rows.iter().any(|r| r.product == "VRIJE RUIMTE"));

    let asml = portfolio
        .holdings
        .rows
        .iter()
        .find(|r| r.product == "ASML HOLDING")
        .unwrap();
    assert_eq!(asml.cells[1].pct_change, dec!(50) / dec!(600));
    // Sold: missing in January means zero
    assert!(asml.cells[2].is_empty());
    assert_eq!(asml.cells[2].pct_change, Decimal::ZERO);

    Ok(())
}

#[test]
fn test_totals_and_deposits() -> Result<()> {
    let (_dir, _config, portfolio) = load_fixture()?;

    let values: Vec<Decimal> = portfolio.totals.iter().map(|t| t.total_value).collect();
    assert_eq!(values, vec![dec!(1600), dec!(2150), dec!(2210)]);

    let deposits: Vec<Decimal> = portfolio.totals.iter().map(|t| t.deposits).collect();
    assert_eq!(deposits, vec![dec!(1600), dec!(500), dec!(100)]);

    let profit_loss: Vec<Decimal> = portfolio.totals.iter().map(|t| t.profit_loss).collect();
    assert_eq!(profit_loss, vec![dec!(0), dec!(50), dec!(-40)]);

    assert_eq!(portfolio.totals[2].cumulative_deposits, dec!(2200));

    let reassigned: Vec<_> = portfolio.reassigned_deposits().collect();
    assert_eq!(reassigned.len(), 1);
    assert_eq!(reassigned[0].deposit.date, date(2022, 1, 10));
    assert_eq!(reassigned[0].snapshot_date, date(2022, 1, 1));

    Ok(())
}

#[test]
fn test_year_split_partitions_dates() -> Result<()> {
    let (_dir, _config, portfolio) = load_fixture()?;
    let years = portfolio.years();

    assert_eq!(years.keys().copied().collect::<Vec<_>>(), vec![2021, 2022]);
    let all_dates: Vec<NaiveDate> = years
        .values()
        .flat_map(|y| y.holdings.dates.iter().copied())
        .collect();
    assert_eq!(all_dates, portfolio.holdings.dates);

    // ASML has nothing in 2022
    let products: Vec<&str> = years[&2022]
        .holdings
        .rows
        .iter()
        .map(|r| r.product.as_str())
        .collect();
    assert_eq!(products, vec!["VANGUARD FTSE ALL-WORLD", "VRIJE RUIMTE"]);

    // Inleg keeps counting across the year boundary
    let overview = years[&2022].overview();
    assert_eq!(overview[0].cumulative_deposits, dec!(2200));
    assert_eq!(years[&2021].profit_loss(), dec!(50));

    Ok(())
}

#[test]
fn test_dividend_and_cost_summaries() -> Result<()> {
    let (_dir, _config, portfolio) = load_fixture()?;

    let quarters = quarterly_dividends(&portfolio.ledger);
    assert_eq!(quarters.len(), 1);
    assert_eq!(quarters[0].quarter, "2021-Q4");
    assert_eq!(quarters[0].net, dec!(2.97));

    let costs = costs_per_year(&portfolio.ledger);
    assert_eq!(costs.len(), 1);
    assert_eq!(costs[0].total, dec!(2.00));

    Ok(())
}

#[test]
fn test_benchmark_comparison_on_snapshot_dates() -> Result<()> {
    let (_dir, config, portfolio) = load_fixture()?;

    let series = load_benchmarks(&config.benchmarks_dir)?;
    let comparisons = compare_all(&series, &portfolio.totals);
    assert_eq!(comparisons.len(), 1);

    let points = &comparisons[0].points;
    assert_eq!(comparisons[0].name, "MSCI_World");
    assert_eq!(points.len(), 3);
    // No close on 2021-11-01: the next one (2021-12-01) is used
    assert_eq!(points[0].price, dec!(105.0));
    // 2022-01-01 takes the 2022-01-03 close
    assert_eq!(points[2].price, dec!(112.0));
    assert_eq!(points[0].shadow_value.round_dp(2), dec!(1600));

    Ok(())
}

#[test]
fn test_workbook_written_and_readable() -> Result<()> {
    let (_dir, config, portfolio) = load_fixture()?;
    let series = load_benchmarks(&config.benchmarks_dir)?;
    let comparisons = compare_all(&series, &portfolio.totals);

    write_report(&portfolio, &comparisons, &config.output)?;
    assert!(config.output.ends_with("results/rapport.xlsx"));

    let mut workbook: Xlsx<_> = open_workbook(&config.output)?;
    assert_eq!(
        workbook.sheet_names(),
        vec!["2022", "2021", "Stortingen", "Dividends", "Kosten", "Benchmarks"]
    );

    let deposits = workbook.worksheet_range("Stortingen")?;
    assert_eq!(deposits.get_value((3, 3)), Some(&Data::String("ja".to_string())));

    let year = workbook.worksheet_range("2021")?;
    assert_eq!(year.get_value((0, 0)), Some(&Data::String("2021".to_string())));
    assert_eq!(year.get_value((1, 5)), Some(&Data::String("1 December".to_string())));

    Ok(())
}
