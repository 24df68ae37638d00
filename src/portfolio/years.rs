//! Calendar-year views of the merged portfolio.

use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use super::holdings::HoldingsTable;
use super::totals::{compound, PeriodTotals};

/// Everything one yearly sheet shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearView {
    pub year: i32,
    pub holdings: HoldingsTable,
    pub totals: Vec<PeriodTotals>,
}

/// One line of the jaaroverzicht block
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearOverviewRow {
    pub date: NaiveDate,
    pub portfolio_value: Decimal,
    /// Inleg carried over from earlier years
    pub cumulative_deposits: Decimal,
    pub profit_loss: Decimal,
}

/// Headline figures of one calendar year
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub deposits: Decimal,
    pub profit_loss: Decimal,
    pub year_return: Decimal,
}

impl YearView {
    pub fn profit_loss(&self) -> Decimal {
        super::totals::total_profit_loss(&self.totals)
    }

    pub fn deposits(&self) -> Decimal {
        self.totals.iter().map(|t| t.deposits).sum()
    }

    /// Time-weighted return within the year
    pub fn year_return(&self) -> Decimal {
        self.totals
            .iter()
            .fold(Decimal::ONE, |growth, t| compound(growth, t.period_return, t.date))
            - Decimal::ONE
    }

    pub fn summary(&self) -> YearSummary {
        YearSummary {
            year: self.year,
            deposits: self.deposits(),
            profit_loss: self.profit_loss(),
            year_return: self.year_return(),
        }
    }

    pub fn overview(&self) -> Vec<YearOverviewRow> {
        self.totals
            .iter()
            .map(|t| YearOverviewRow {
                date: t.date,
                portfolio_value: t.total_value,
                cumulative_deposits: t.cumulative_deposits,
                profit_loss: t.profit_loss,
            })
            .collect()
    }
}

/// Partition the table and the totals by calendar year.
///
/// `totals` must be aligned with `table.dates`. Each date lands in exactly one
/// year; rows without any position in a year are left out of that year.
pub fn split_by_year(table: &HoldingsTable, totals: &[PeriodTotals]) -> BTreeMap<i32, YearView> {
    let mut years = BTreeMap::new();
    let mut start = 0;

    for (year, group) in &table.dates.iter().chunk_by(|d| d.year()) {
        let end = start + group.count();
        years.insert(
            year,
            YearView {
                year,
                holdings: table.slice(start, end),
                totals: totals[start..end].to_vec(),
            },
        );
        start = end;
    }

    years
}
