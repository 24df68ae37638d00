//! Match cash deposits to the snapshot that first reflects them.

use anyhow::anyhow;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::importers::LedgerEntry;

/// A deposit (positive) or withdrawal (negative) from the cash statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Deposit {
    pub date: NaiveDate,
    pub amount: Decimal,
}

/// A deposit together with the snapshot date it counts towards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssignedDeposit {
    pub deposit: Deposit,
    pub snapshot_date: NaiveDate,
    /// Made after the last snapshot and moved back onto it
    pub reassigned: bool,
}

/// Cash-flow lines of the ledger as deposits
pub fn deposits_from_ledger(entries: &[LedgerEntry]) -> Vec<Deposit> {
    entries
        .iter()
        .filter(|e| e.kind.is_cash_flow())
        .map(|e| Deposit {
            date: e.date,
            amount: e.amount,
        })
        .collect()
}

/// Attribute each deposit to the first snapshot dated on or after it.
///
/// `dates` must be sorted. Deposits after the last snapshot are moved onto
/// the last snapshot and flagged.
pub fn assign_deposits(deposits: &[Deposit], dates: &[NaiveDate]) -> Result<Vec<AssignedDeposit>> {
    let last = *dates
        .last()
        .ok_or_else(|| anyhow!("cannot assign deposits without snapshot dates"))?;

    let mut assigned: Vec<AssignedDeposit> = deposits
        .iter()
        .map(|deposit| {
            let idx = dates.partition_point(|d| *d < deposit.date);
            match dates.get(idx) {
                Some(snapshot_date) => AssignedDeposit {
                    deposit: *deposit,
                    snapshot_date: *snapshot_date,
                    reassigned: false,
                },
                None => {
                    warn!(
                        "Deposit of {} on {} is after the last snapshot, counted on {}",
                        deposit.amount, deposit.date, last
                    );
                    AssignedDeposit {
                        deposit: *deposit,
                        snapshot_date: last,
                        reassigned: true,
                    }
                }
            }
        })
        .collect();

    assigned.sort_by_key(|a| (a.snapshot_date, a.deposit.date));
    Ok(assigned)
}

/// Deposit sum per snapshot date, aligned with `dates`
pub fn deposits_per_date(assigned: &[AssignedDeposit], dates: &[NaiveDate]) -> Vec<Decimal> {
    dates
        .iter()
        .map(|date| {
            assigned
                .iter()
                .filter(|a| a.snapshot_date == *date)
                .map(|a| a.deposit.amount)
                .sum::<Decimal>()
        })
        .collect()
}
