// Portfolio module - merged holdings, deposits, totals and yearly views

pub mod deposits;
pub mod holdings;
pub mod totals;
pub mod years;

use anyhow::Context;
use std::collections::BTreeMap;
use tracing::info;

use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::importers::{account, holdings as holdings_import, LedgerEntry, Snapshot};

pub use deposits::{assign_deposits, deposits_from_ledger, deposits_per_date, AssignedDeposit, Deposit};
pub use holdings::{merge_snapshots, HoldingCell, HoldingRow, HoldingsTable, Trend};
pub use totals::{compute_totals, PeriodTotals};
pub use years::{split_by_year, YearOverviewRow, YearSummary, YearView};

/// Everything derived from the snapshots and the account statement
#[derive(Debug, Clone)]
pub struct Portfolio {
    pub holdings: HoldingsTable,
    pub totals: Vec<PeriodTotals>,
    pub deposits: Vec<AssignedDeposit>,
    pub ledger: Vec<LedgerEntry>,
}

impl Portfolio {
    /// Merge snapshots and attribute the ledger's deposits to them.
    pub fn build(snapshots: &[Snapshot], ledger: Vec<LedgerEntry>) -> Result<Self> {
        let holdings = merge_snapshots(snapshots)?;
        let deposits = assign_deposits(&deposits_from_ledger(&ledger), &holdings.dates)?;
        let per_date = deposits_per_date(&deposits, &holdings.dates);
        let totals = compute_totals(&holdings.dates, &holdings.total_values(), &per_date);

        info!(
            "Portfolio with {} securities over {} snapshots, {} deposits",
            holdings.rows.len(),
            holdings.dates.len(),
            deposits.len()
        );

        Ok(Self {
            holdings,
            totals,
            deposits,
            ledger,
        })
    }

    /// Read exports and statement from the configured locations.
    pub fn load(config: &ResolvedConfig) -> Result<Self> {
        let snapshots = holdings_import::load_snapshots(&config.exports_dir, &config.holdings)
            .context("Failed to read holdings snapshots")?;
        let ledger = account::parse_account_csv(&config.account_file, &config.ledger)
            .context("Failed to read account statement")?;
        Self::build(&snapshots, ledger)
    }

    pub fn years(&self) -> BTreeMap<i32, YearView> {
        split_by_year(&self.holdings, &self.totals)
    }

    /// Deposits that were moved onto the last snapshot
    pub fn reassigned_deposits(&self) -> impl Iterator<Item = &AssignedDeposit> {
        self.deposits.iter().filter(|d| d.reassigned)
    }
}
