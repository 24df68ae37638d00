//! Wide holdings table: one row per security, one cell per snapshot date.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::error::{ReportError, Result};
use crate::importers::Snapshot;

/// Quantity movement compared with the previous snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

/// Quantity, value and percent-change triple of one security on one date
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HoldingCell {
    pub quantity: Decimal,
    pub value: Decimal,
    /// Unit value change vs. the previous snapshot, as a fraction
    pub pct_change: Decimal,
    pub trend: Trend,
}

impl HoldingCell {
    pub const EMPTY: HoldingCell = HoldingCell {
        quantity: Decimal::ZERO,
        value: Decimal::ZERO,
        pct_change: Decimal::ZERO,
        trend: Trend::Flat,
    };

    pub fn is_empty(&self) -> bool {
        self.quantity.is_zero() && self.value.is_zero()
    }

    /// Value per unit, `None` when there are no units
    pub fn unit_value(&self) -> Option<Decimal> {
        if self.quantity.is_zero() {
            None
        } else {
            self.value.checked_div(self.quantity)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingRow {
    pub product: String,
    pub symbol: String,
    pub cells: Vec<HoldingCell>,
}

impl HoldingRow {
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(HoldingCell::is_empty)
    }
}

/// Merged holdings of all snapshots. Every row has exactly `dates.len()` cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingsTable {
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<HoldingRow>,
}

/// `(new_unit − old_unit) / old_unit`, zero whenever a unit value is undefined
pub fn unit_value_change(old: &HoldingCell, new: &HoldingCell) -> Decimal {
    match (old.unit_value(), new.unit_value()) {
        (Some(old_unit), Some(new_unit)) if !old_unit.is_zero() => (new_unit - old_unit)
            .checked_div(old_unit)
            .unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

/// Outer-join all snapshots on (product, symbol).
///
/// Missing cells are zero; rows keep the order in which securities first
/// appear. Positions listed twice in one export are summed.
pub fn merge_snapshots(snapshots: &[Snapshot]) -> Result<HoldingsTable> {
    let mut ordered: Vec<&Snapshot> = snapshots.iter().collect();
    ordered.sort_by_key(|s| s.date);

    if let Some(pair) = ordered.windows(2).find(|w| w[0].date == w[1].date) {
        return Err(ReportError::DuplicateSnapshot {
            date: pair[1].date,
            first: pair[0].source.clone(),
            second: pair[1].source.clone(),
        }
        .into());
    }

    let dates: Vec<NaiveDate> = ordered.iter().map(|s| s.date).collect();
    let mut rows: Vec<HoldingRow> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for (col, snapshot) in ordered.iter().enumerate() {
        for position in &snapshot.positions {
            if position.quantity < Decimal::ZERO {
                return Err(ReportError::NegativeQuantity {
                    product: position.product.clone(),
                    date: snapshot.date,
                    quantity: position.quantity,
                }
                .into());
            }

            let key = (position.product.clone(), position.symbol.clone());
            let row_idx = *index.entry(key).or_insert_with(|| {
                rows.push(HoldingRow {
                    product: position.product.clone(),
                    symbol: position.symbol.clone(),
                    cells: vec![HoldingCell::EMPTY; dates.len()],
                });
                rows.len() - 1
            });

            let cell = &mut rows[row_idx].cells[col];
            cell.quantity += position.quantity;
            cell.value += position.value;
        }
    }

    for row in &mut rows {
        for col in 1..row.cells.len() {
            let (previous, current) = (row.cells[col - 1], row.cells[col]);
            let cell = &mut row.cells[col];
            cell.pct_change = unit_value_change(&previous, &current);
            cell.trend = match current.quantity.cmp(&previous.quantity) {
                std::cmp::Ordering::Greater => Trend::Up,
                std::cmp::Ordering::Less => Trend::Down,
                std::cmp::Ordering::Equal => Trend::Flat,
            };
        }
    }

    Ok(HoldingsTable { dates, rows })
}

impl HoldingsTable {
    /// Totals row: summed value per date, quantity and percent change zero
    pub fn column_totals(&self) -> Vec<HoldingCell> {
        let mut totals = vec![HoldingCell::EMPTY; self.dates.len()];
        for row in &self.rows {
            for (total, cell) in totals.iter_mut().zip(&row.cells) {
                total.value += cell.value;
            }
        }
        totals
    }

    /// Total portfolio value per date
    pub fn total_values(&self) -> Vec<Decimal> {
        self.column_totals().iter().map(|c| c.value).collect()
    }

    /// Sub-table with the date columns `start..end`, dropping rows that are
    /// entirely zero there. Percent changes and trends are kept as computed
    /// on the full table.
    pub fn slice(&self, start: usize, end: usize) -> HoldingsTable {
        let rows = self
            .rows
            .iter()
            .map(|row| HoldingRow {
                product: row.product.clone(),
                symbol: row.symbol.clone(),
                cells: row.cells[start..end].to_vec(),
            })
            .filter(|row| !row.is_empty())
            .collect();

        HoldingsTable {
            dates: self.dates[start..end].to_vec(),
            rows,
        }
    }

    /// Cells of the most recent date with a position, largest value first
    pub fn latest_positions(&self) -> Vec<(&HoldingRow, &HoldingCell)> {
        let Some(last) = self.dates.len().checked_sub(1) else {
            return Vec::new();
        };
        let mut positions: Vec<_> = self
            .rows
            .iter()
            .map(|row| (row, &row.cells[last]))
            .filter(|(_, cell)| !cell.is_empty())
            .collect();
        positions.sort_by(|a, b| b.1.value.cmp(&a.1.value));
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importers::RawPosition;
    use rust_decimal_macros::dec;
    use std::path::PathBuf;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn position(product: &str, quantity: Decimal, value: Decimal) -> RawPosition {
        RawPosition {
            product: product.to_string(),
            symbol: format!("{}-ISIN", product),
            quantity,
            value,
        }
    }

    fn snapshot(date: NaiveDate, positions: Vec<RawPosition>) -> Snapshot {
        Snapshot {
            date,
            source: PathBuf::from(format!("{}.csv", date)),
            positions,
        }
    }

    fn sample() -> Vec<Snapshot> {
        vec![
            snapshot(
                date(2021, 2, 1),
                vec![position("VWRL", dec!(10), dec!(900)), position("VRIJE RUIMTE", dec!(0), dec!(50))],
            ),
            // Out of order on purpose
            snapshot(
                date(2021, 4, 1),
                vec![position("VWRL", dec!(12), dec!(1200)), position("ASML", dec!(1), dec!(500))],
            ),
            snapshot(
                date(2021, 3, 1),
                vec![position("VWRL", dec!(10), dec!(990)), position("VRIJE RUIMTE", dec!(0), dec!(20))],
            ),
        ]
    }

    #[test]
    fn test_merge_yields_one_cell_per_snapshot() {
        let table = merge_snapshots(&sample()).unwrap();
        assert_eq!(table.dates, vec![date(2021, 2, 1), date(2021, 3, 1), date(2021, 4, 1)]);
        assert_eq!(table.rows.len(), 3);
        for row in &table.rows {
            assert_eq!(row.cells.len(), 3);
        }

        let asml = table.rows.iter().find(|r| r.product == "ASML").unwrap();
        assert!(asml.cells[0].is_empty());
        assert!(asml.cells[1].is_empty());
        assert_eq!(asml.cells[2].value, dec!(500));
    }

    #[test]
    fn test_percent_change_uses_unit_values() {
        let table = merge_snapshots(&sample()).unwrap();
        let vwrl = &table.rows[0];

        // 90 -> 99 per unit
        assert_eq!(vwrl.cells[0].pct_change, Decimal::ZERO);
        assert_eq!(vwrl.cells[1].pct_change, dec!(0.1));
        // 99 -> 100 per unit
        let expected = (dec!(100) - dec!(99)) / dec!(99);
        assert_eq!(vwrl.cells[2].pct_change, expected);
        assert_eq!(vwrl.cells[2].trend, Trend::Up);
        assert_eq!(vwrl.cells[1].trend, Trend::Flat);
    }

    #[test]
    fn test_percent_change_zero_when_undefined() {
        let table = merge_snapshots(&sample()).unwrap();

        // Cash has no quantity
        let cash = table.rows.iter().find(|r| r.product == "VRIJE RUIMTE").unwrap();
        assert!(cash.cells.iter().all(|c| c.pct_change.is_zero()));
        assert_eq!(cash.cells[2].value, Decimal::ZERO);

        // ASML appears from nothing
        let asml = table.rows.iter().find(|r| r.product == "ASML").unwrap();
        assert_eq!(asml.cells[2].pct_change, Decimal::ZERO);
        assert_eq!(asml.cells[2].trend, Trend::Up);
    }

    #[test]
    fn test_column_totals_only_sum_values() {
        let table = merge_snapshots(&sample()).unwrap();
        let totals = table.column_totals();

        assert_eq!(totals.len(), 3);
        for (col, total) in totals.iter().enumerate() {
            let sum: Decimal = table.rows.iter().map(|r| r.cells[col].value).sum();
            assert_eq!(total.value, sum);
            assert_eq!(total.quantity, Decimal::ZERO);
            assert_eq!(total.pct_change, Decimal::ZERO);
        }
        assert_eq!(table.total_values(), vec![dec!(950), dec!(1010), dec!(1700)]);
    }

    #[test]
    fn test_duplicate_dates_rejected() {
        let snapshots = vec![
            snapshot(date(2021, 2, 1), vec![]),
            snapshot(date(2021, 2, 1), vec![]),
        ];
        let err = merge_snapshots(&snapshots).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReportError>(),
            Some(ReportError::DuplicateSnapshot { .. })
        ));
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let snapshots = vec![snapshot(date(2021, 2, 1), vec![position("SHORT", dec!(-1), dec!(-10))])];
        let err = merge_snapshots(&snapshots).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReportError>(),
            Some(ReportError::NegativeQuantity { .. })
        ));
    }

    #[test]
    fn test_duplicate_lines_in_one_export_are_summed() {
        let snapshots = vec![snapshot(
            date(2021, 2, 1),
            vec![position("VRIJE RUIMTE", dec!(0), dec!(10)), position("VRIJE RUIMTE", dec!(0), dec!(5))],
        )];
        let table = merge_snapshots(&snapshots).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].cells[0].value, dec!(15));
    }

    #[test]
    fn test_slice_drops_empty_rows() {
        let table = merge_snapshots(&sample()).unwrap();
        let first_two = table.slice(0, 2);
        assert_eq!(first_two.dates.len(), 2);
        assert!(first_two.rows.iter().all(|r| r.product != "ASML"));

        let latest = table.latest_positions();
        assert_eq!(latest[0].0.product, "VWRL");
        assert_eq!(latest.len(), 2);
    }
}
