//! Compare the portfolio with index trackers over the same snapshot dates.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::importers::BenchmarkSeries;
use crate::portfolio::PeriodTotals;

/// Benchmark figures on one snapshot date
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BenchmarkPoint {
    pub date: NaiveDate,
    pub price: Decimal,
    pub period_return: Decimal,
    /// Since the first snapshot
    pub cumulative_return: Decimal,
    /// Value had every deposit bought the benchmark instead
    pub shadow_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkComparison {
    pub name: String,
    pub points: Vec<BenchmarkPoint>,
}

impl BenchmarkComparison {
    pub fn final_return(&self) -> Decimal {
        self.points
            .last()
            .map(|p| p.cumulative_return)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Daily prices from `from` to `to` (widened to the series' own range).
///
/// Days without a close take the next known close (back-fill); days after the
/// last close keep the last one (forward-fill).
pub fn fill_daily(series: &BenchmarkSeries, from: NaiveDate, to: NaiveDate) -> BTreeMap<NaiveDate, Decimal> {
    let mut filled = BTreeMap::new();
    let (Some((&first, _)), Some((&last, &last_close))) =
        (series.closes.first_key_value(), series.closes.last_key_value())
    else {
        return filled;
    };

    let start = from.min(first);
    let end = to.max(last);
    let mut day = start;
    while day <= end {
        let price = series
            .closes
            .range(day..)
            .next()
            .map(|(_, close)| *close)
            .unwrap_or(last_close);
        filled.insert(day, price);

        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }

    filled
}

/// Benchmark performance at every snapshot in `totals`.
///
/// Returns `None` when the series has no prices.
pub fn compare(series: &BenchmarkSeries, totals: &[PeriodTotals]) -> Option<BenchmarkComparison> {
    let (first, last) = (totals.first()?.date, totals.last()?.date);
    let daily = fill_daily(series, first, last);
    let base = *daily.get(&first)?;

    let mut points = Vec::with_capacity(totals.len());
    let mut previous = base;
    let mut units = Decimal::ZERO;

    for period in totals {
        let price = *daily.get(&period.date)?;
        if !price.is_zero() {
            units += period.deposits.checked_div(price).unwrap_or(Decimal::ZERO);
        }

        points.push(BenchmarkPoint {
            date: period.date,
            price,
            period_return: relative_change(previous, price),
            cumulative_return: relative_change(base, price),
            shadow_value: units * price,
        });
        previous = price;
    }

    Some(BenchmarkComparison {
        name: series.name.clone(),
        points,
    })
}

/// Compare every benchmark, skipping series without prices
pub fn compare_all(series: &[BenchmarkSeries], totals: &[PeriodTotals]) -> Vec<BenchmarkComparison> {
    series.iter().filter_map(|s| compare(s, totals)).collect()
}

fn relative_change(old: Decimal, new: Decimal) -> Decimal {
    if old.is_zero() {
        Decimal::ZERO
    } else {
        (new - old).checked_div(old).unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::compute_totals;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series() -> BenchmarkSeries {
        BenchmarkSeries {
            name: "MSCI_World".to_string(),
            closes: BTreeMap::from([
                (date(2021, 1, 29), dec!(100)),
                (date(2021, 2, 2), dec!(104)),
                (date(2021, 3, 1), dec!(110)),
            ]),
        }
    }

    #[test]
    fn test_fill_daily_back_then_forward() {
        let daily = fill_daily(&series(), date(2021, 1, 27), date(2021, 3, 3));

        // Before the first close: back-filled
        assert_eq!(daily[&date(2021, 1, 27)], dec!(100));
        // Weekend gap takes the next close
        assert_eq!(daily[&date(2021, 1, 30)], dec!(104));
        assert_eq!(daily[&date(2021, 2, 1)], dec!(104));
        assert_eq!(daily[&date(2021, 2, 2)], dec!(104));
        // After the last close: forward-filled
        assert_eq!(daily[&date(2021, 3, 3)], dec!(110));
        assert_eq!(daily.len(), 36);
    }

    #[test]
    fn test_compare_returns_and_shadow_value() {
        let dates = vec![date(2021, 2, 1), date(2021, 3, 1)];
        let totals = compute_totals(&dates, &[dec!(1040), dec!(1600)], &[dec!(1040), dec!(500)]);

        let comparison = compare(&series(), &totals).unwrap();
        assert_eq!(comparison.name, "MSCI_World");
        assert_eq!(comparison.points[0].price, dec!(104));
        assert_eq!(comparison.points[0].shadow_value, dec!(1040));
        assert_eq!(comparison.points[0].period_return, Decimal::ZERO);

        let march = comparison.points[1];
        // 10 units from February plus 500 / 110
        assert_eq!(march.shadow_value, (dec!(10) + dec!(500) / dec!(110)) * dec!(110));
        assert_eq!(march.cumulative_return, dec!(6) / dec!(104));
        assert_eq!(comparison.final_return(), march.cumulative_return);
    }

    #[test]
    fn test_empty_series_is_skipped() {
        let empty = BenchmarkSeries {
            name: "AEX".to_string(),
            closes: BTreeMap::new(),
        };
        let dates = vec![date(2021, 2, 1)];
        let totals = compute_totals(&dates, &[dec!(10)], &[dec!(10)]);
        assert!(compare_all(&[empty, series()], &totals).len() == 1);
    }
}
