//! Output formatting module for CLI display
//!
//! Terminal tables for the read-only commands and their JSON counterparts.
//! Calculations live in `portfolio` and `reports`; this module only renders.

use chrono::NaiveDate;
use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::Path;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use crate::importers::FileKind;
use crate::portfolio::{AssignedDeposit, HoldingCell, HoldingRow, PeriodTotals, YearSummary};
use crate::reports::BenchmarkComparison;
use crate::utils::{format_currency, format_decimal_nl, format_percentage, snapshot_label};

/// Serialize any report value, falling back to an error object
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

fn colored_amount(value: Decimal) -> String {
    let text = format_currency(value);
    if value > Decimal::ZERO {
        text.green().to_string()
    } else if value < Decimal::ZERO {
        text.red().to_string()
    } else {
        text
    }
}

fn colored_percentage(fraction: Decimal) -> String {
    let text = format_percentage(fraction);
    if fraction > Decimal::ZERO {
        text.green().to_string()
    } else if fraction < Decimal::ZERO {
        text.red().to_string()
    } else {
        text
    }
}

/// Positions on one snapshot date
pub fn format_holdings_table(date: NaiveDate, positions: &[(&HoldingRow, &HoldingCell)]) -> String {
    #[derive(Tabled)]
    struct PositionRow {
        #[tabled(rename = "Product")]
        product: String,
        #[tabled(rename = "Symbool/ISIN")]
        symbol: String,
        #[tabled(rename = "Aantal")]
        quantity: String,
        #[tabled(rename = "Waarde")]
        value: String,
        #[tabled(rename = "Koers %")]
        change: String,
    }

    let mut output = format!(
        "\n{} Portefeuille op {} {}\n\n",
        "📊".cyan().bold(),
        snapshot_label(date),
        date.format("%Y")
    );

    let rows: Vec<PositionRow> = positions
        .iter()
        .map(|(row, cell)| PositionRow {
            product: row.product.clone(),
            symbol: row.symbol.clone(),
            quantity: cell.quantity.normalize().to_string(),
            value: format_currency(cell.value),
            change: colored_percentage(cell.pct_change),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(2..), Alignment::right());
    output.push_str(&table.to_string());

    let total: Decimal = positions.iter().map(|(_, cell)| cell.value).sum();
    output.push_str(&format!("\n\n{:<20} {}\n", "Totaal:".bold(), format_currency(total)));
    output
}

/// JSON shape of `holdings`
pub fn format_holdings_json(date: NaiveDate, positions: &[(&HoldingRow, &HoldingCell)]) -> String {
    #[derive(Serialize)]
    struct JsonPosition<'a> {
        product: &'a str,
        symbol: &'a str,
        quantity: Decimal,
        value: Decimal,
        pct_change: Decimal,
    }

    #[derive(Serialize)]
    struct JsonHoldings<'a> {
        date: NaiveDate,
        positions: Vec<JsonPosition<'a>>,
        total_value: Decimal,
    }

    let report = JsonHoldings {
        date,
        positions: positions
            .iter()
            .map(|(row, cell)| JsonPosition {
                product: &row.product,
                symbol: &row.symbol,
                quantity: cell.quantity,
                value: cell.value,
                pct_change: cell.pct_change,
            })
            .collect(),
        total_value: positions.iter().map(|(_, cell)| cell.value).sum(),
    };
    to_json(&report)
}

/// Totals per snapshot, with each benchmark's cumulative return appended,
/// followed by one line per calendar year
pub fn format_overview_table(
    totals: &[PeriodTotals],
    years: &[YearSummary],
    benchmarks: &[BenchmarkComparison],
) -> String {
    let mut builder = tabled::builder::Builder::default();

    let mut header = vec![
        "Datum".to_string(),
        "Portefeuille".to_string(),
        "Verschil".to_string(),
        "Inleg".to_string(),
        "Winst/Verlies".to_string(),
        "Rendement".to_string(),
        "Cumulatief".to_string(),
    ];
    header.extend(benchmarks.iter().map(|b| b.name.clone()));
    builder.push_record(header);

    for (index, period) in totals.iter().enumerate() {
        let mut record = vec![
            period.date.to_string(),
            format_currency(period.total_value),
            format_currency(period.change),
            format_currency(period.deposits),
            colored_amount(period.profit_loss),
            colored_percentage(period.period_return),
            colored_percentage(period.cumulative_return),
        ];
        for benchmark in benchmarks {
            record.push(
                benchmark
                    .points
                    .get(index)
                    .map(|p| colored_percentage(p.cumulative_return))
                    .unwrap_or_else(|| "N/A".to_string()),
            );
        }
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());

    let mut output = format!("\n{} Overzicht per snapshot\n\n", "📈".cyan().bold());
    output.push_str(&table.to_string());

    if let Some(last) = totals.last() {
        let profit_loss: Decimal = totals.iter().map(|t| t.profit_loss).sum();
        output.push_str(&format!("\n\n{}", "━".repeat(60).bright_black()));
        output.push_str(&format!("\n{:<20} {}", "Waarde:".bold(), format_currency(last.total_value)));
        output.push_str(&format!("\n{:<20} {}", "Inleg:".bold(), format_currency(last.cumulative_deposits)));
        output.push_str(&format!("\n{:<20} {}", "Winst/Verlies:".bold(), colored_amount(profit_loss)));
        output.push_str(&format!(
            "\n{:<20} {}\n",
            "Rendement:".bold(),
            colored_percentage(last.cumulative_return)
        ));
        for benchmark in benchmarks {
            output.push_str(&format!(
                "{:<20} {}\n",
                format!("{}:", benchmark.name).bold(),
                colored_percentage(benchmark.final_return())
            ));
        }
    }

    if !years.is_empty() {
        output.push_str(&format!("\n{} Per jaar\n\n", "📅".cyan().bold()));
        output.push_str(&format_year_table(years));
        output.push('\n');
    }

    output
}

fn format_year_table(years: &[YearSummary]) -> String {
    #[derive(Tabled)]
    struct YearRow {
        #[tabled(rename = "Jaar")]
        year: i32,
        #[tabled(rename = "Inleg")]
        deposits: String,
        #[tabled(rename = "Winst/Verlies")]
        profit_loss: String,
        #[tabled(rename = "Rendement")]
        year_return: String,
    }

    let rows: Vec<YearRow> = years
        .iter()
        .map(|y| YearRow {
            year: y.year,
            deposits: format_currency(y.deposits),
            profit_loss: colored_amount(y.profit_loss),
            year_return: colored_percentage(y.year_return),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());
    table.to_string()
}

pub fn format_deposits_table(deposits: &[AssignedDeposit]) -> String {
    #[derive(Tabled)]
    struct DepositRow {
        #[tabled(rename = "Datum")]
        date: String,
        #[tabled(rename = "Bedrag")]
        amount: String,
        #[tabled(rename = "Snapshot")]
        snapshot: String,
        #[tabled(rename = "Opmerking")]
        note: String,
    }

    if deposits.is_empty() {
        return format!("{} Geen stortingen gevonden\n", "ℹ".blue().bold());
    }

    let rows: Vec<DepositRow> = deposits
        .iter()
        .map(|d| DepositRow {
            date: d.deposit.date.to_string(),
            amount: format_currency(d.deposit.amount),
            snapshot: d.snapshot_date.to_string(),
            note: if d.reassigned {
                "na laatste snapshot".yellow().to_string()
            } else {
                String::new()
            },
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::one(1), Alignment::right());

    let total: Decimal = deposits.iter().map(|d| d.deposit.amount).sum();
    format!(
        "\n{} Stortingen\n\n{}\n\n{:<20} {}\n",
        "💶".cyan().bold(),
        table,
        "Totaal:".bold(),
        format_currency(total)
    )
}

pub fn format_inspect(path: &Path, kind: FileKind, headers: &[String]) -> String {
    let mut output = format!(
        "{} Inspecting file: {}\n\n",
        "📊".cyan().bold(),
        path.display().to_string().green()
    );
    output.push_str(&format!("{} {}\n\n", "Detected:".bold(), kind.describe().yellow()));
    output.push_str(&format!("{} {} column(s):\n", "📄".cyan().bold(), headers.len()));
    for header in headers {
        output.push_str(&format!("  • {}\n", header));
    }
    output
}

pub fn format_report_written(path: &Path, years: usize, benchmarks: usize) -> String {
    let mut output = format!(
        "{} Rapport geschreven naar {}\n",
        "✓".green().bold(),
        path.display().to_string().bold()
    );
    output.push_str(&format!("  Jaren: {}\n", years));
    if benchmarks > 0 {
        output.push_str(&format!("  Benchmarks: {}\n", benchmarks));
    }
    output
}

/// One-line warning shown for deposits moved onto the last snapshot
pub fn format_reassigned_warning(count: usize, amount: Decimal) -> String {
    format!(
        "{} {} storting(en) na de laatste snapshot ({}) meegeteld bij de laatste datum",
        "⚠".yellow().bold(),
        count,
        format_decimal_nl(amount)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::{Deposit, Trend};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_holdings_table_lists_products_and_total() {
        colored::control::set_override(false);
        let row = HoldingRow {
            product: "VANGUARD FTSE ALL-WORLD".to_string(),
            symbol: "IE00B3RBWM25".to_string(),
            cells: vec![],
        };
        let cell = HoldingCell {
            quantity: dec!(12),
            value: dec!(1234.50),
            pct_change: dec!(0.05),
            trend: Trend::Up,
        };

        let output = format_holdings_table(date(2021, 2, 1), &[(&row, &cell)]);
        assert!(output.contains("1 Februari 2021"));
        assert!(output.contains("VANGUARD FTSE ALL-WORLD"));
        assert!(output.contains("€ 1.234,50"));
        assert!(output.contains("5,0%"));
    }

    #[test]
    fn test_holdings_json_has_total() {
        let row = HoldingRow {
            product: "ASML".to_string(),
            symbol: "NL0010273215".to_string(),
            cells: vec![],
        };
        let cell = HoldingCell {
            quantity: dec!(1),
            value: dec!(600),
            pct_change: Decimal::ZERO,
            trend: Trend::Flat,
        };
        let json: serde_json::Value =
            serde_json::from_str(&format_holdings_json(date(2021, 2, 1), &[(&row, &cell)])).unwrap();
        assert_eq!(json["date"], "2021-02-01");
        assert_eq!(json["positions"][0]["product"], "ASML");
        assert_eq!(json["total_value"], "600");
    }

    #[test]
    fn test_deposits_table_marks_reassigned() {
        colored::control::set_override(false);
        let deposits = vec![AssignedDeposit {
            deposit: Deposit {
                date: date(2021, 3, 5),
                amount: dec!(40),
            },
            snapshot_date: date(2021, 3, 1),
            reassigned: true,
        }];
        let output = format_deposits_table(&deposits);
        assert!(output.contains("na laatste snapshot"));
        assert!(output.contains("€ 40,00"));
    }

    #[test]
    fn test_empty_deposits_message() {
        assert!(format_deposits_table(&[]).contains("Geen stortingen"));
    }

    #[test]
    fn test_overview_shows_year_and_benchmark_returns() {
        colored::control::set_override(false);
        let period = PeriodTotals {
            date: date(2022, 2, 1),
            total_value: dec!(1150),
            change: dec!(50),
            deposits: Decimal::ZERO,
            profit_loss: dec!(50),
            period_return: dec!(0.05),
            cumulative_deposits: dec!(1000),
            cumulative_return: dec!(0.15),
        };
        let years = vec![YearSummary {
            year: 2022,
            deposits: Decimal::ZERO,
            profit_loss: dec!(150),
            year_return: dec!(0.15),
        }];
        let benchmark = BenchmarkComparison {
            name: "MSCI_World".to_string(),
            points: vec![crate::reports::BenchmarkPoint {
                date: date(2022, 2, 1),
                price: dec!(112),
                period_return: dec!(0.02),
                cumulative_return: dec!(0.12),
                shadow_value: dec!(1120),
            }],
        };

        let output = format_overview_table(&[period], &years, &[benchmark]);
        assert!(output.contains("Per jaar"));
        assert!(output.contains("2022"));
        assert!(output.contains("€ 150,00"));
        assert!(output.contains("MSCI_World:"));
        assert!(output.contains("12,0%"));
        assert!(output.contains("15,0%"));
    }
}
