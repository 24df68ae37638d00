//! Per-period aggregates: value, change, deposits, profit/loss and returns.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

/// Aggregates for one snapshot date. Always derived from the holdings table
/// and the assigned deposits, never read from input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodTotals {
    pub date: NaiveDate,
    pub total_value: Decimal,
    /// Difference with the previous snapshot (the full value for the first one)
    pub change: Decimal,
    pub deposits: Decimal,
    /// Winst/verlies: change not explained by deposits
    pub profit_loss: Decimal,
    /// Profit/loss relative to the capital at work during the period
    pub period_return: Decimal,
    /// Inleg so far, including this period
    pub cumulative_deposits: Decimal,
    /// Time-weighted return since the first snapshot
    pub cumulative_return: Decimal,
}

/// Build the totals series from per-date values and deposits.
///
/// The period return is `profit_loss / (previous value + deposits)`; a
/// period without capital has a zero return.
pub fn compute_totals(
    dates: &[NaiveDate],
    values: &[Decimal],
    deposits: &[Decimal],
) -> Vec<PeriodTotals> {
    let mut totals = Vec::with_capacity(dates.len());
    let mut previous = Decimal::ZERO;
    let mut cumulative_deposits = Decimal::ZERO;
    let mut growth = Decimal::ONE;

    for ((date, value), deposit) in dates.iter().zip(values).zip(deposits) {
        let change = *value - previous;
        let profit_loss = change - *deposit;
        let capital = previous + *deposit;
        let period_return = if capital > Decimal::ZERO {
            profit_loss.checked_div(capital).unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };

        cumulative_deposits += *deposit;
        growth = compound(growth, period_return, *date);

        totals.push(PeriodTotals {
            date: *date,
            total_value: *value,
            change,
            deposits: *deposit,
            profit_loss,
            period_return,
            cumulative_deposits,
            cumulative_return: growth - Decimal::ONE,
        });
        previous = *value;
    }

    totals
}

/// Apply one period return to a running growth factor.
///
/// A factor that does not fit in a `Decimal` leaves the growth unchanged.
pub fn compound(growth: Decimal, period_return: Decimal, date: NaiveDate) -> Decimal {
    match Decimal::ONE
        .checked_add(period_return)
        .and_then(|factor| growth.checked_mul(factor))
    {
        Some(next) => next,
        None => {
            warn!(
                "Return of {} on {} overflows the cumulative return, period left out",
                period_return, date
            );
            growth
        }
    }
}

/// Sum of profit/loss over a run of periods
pub fn total_profit_loss(totals: &[PeriodTotals]) -> Decimal {
    totals.iter().map(|t| t.profit_loss).sum()
}
