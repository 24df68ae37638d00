use rust_decimal::Decimal;
use rust_xlsxwriter::{Chart, ChartType, ColNum, RowNum, Worksheet};

use super::formats::{num, Formats};
use crate::error::Result;
use crate::portfolio::{AssignedDeposit, PeriodTotals};
use crate::reports::{BenchmarkComparison, ProductDividends, QuarterDividends, YearCosts};

fn write_header(sheet: &mut Worksheet, row: RowNum, headers: &[&str], formats: &Formats) -> Result<()> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(row, col as ColNum, *header, &formats.column_header)?;
        sheet.set_column_width(col as ColNum, if col == 0 { 24.0 } else { 17.0 })?;
    }
    Ok(())
}

pub fn write_deposits_sheet(sheet: &mut Worksheet, deposits: &[AssignedDeposit], formats: &Formats) -> Result<()> {
    sheet.set_name("Stortingen")?;
    write_header(sheet, 0, &["Datum", "Bedrag", "Snapshot", "Na laatste snapshot"], formats)?;

    for (offset, assigned) in deposits.iter().enumerate() {
        let row = 1 + offset as RowNum;
        sheet.write_string(row, 0, assigned.deposit.date.to_string())?;
        sheet.write_number_with_format(row, 1, num(assigned.deposit.amount), &formats.euro)?;
        sheet.write_string(row, 2, assigned.snapshot_date.to_string())?;
        if assigned.reassigned {
            sheet.write_string(row, 3, "ja")?;
        }
    }

    let total_row = deposits.len() as RowNum + 2;
    let total: Decimal = deposits.iter().map(|d| d.deposit.amount).sum();
    sheet.write_string_with_format(total_row, 0, "Totaal", &formats.bold)?;
    sheet.write_number_with_format(total_row, 1, num(total), &formats.summary_value)?;
    sheet.set_freeze_panes(1, 0)?;

    Ok(())
}

pub fn write_dividends_sheet(
    sheet: &mut Worksheet,
    quarters: &[QuarterDividends],
    products: &[ProductDividends],
    formats: &Formats,
) -> Result<()> {
    sheet.set_name("Dividends")?;
    let columns = ["Valuta", "Bruto", "Belasting", "Netto"];

    write_header(sheet, 0, &["Kwartaal", columns[0], columns[1], columns[2], columns[3]], formats)?;
    for (offset, quarter) in quarters.iter().enumerate() {
        let row = 1 + offset as RowNum;
        sheet.write_string(row, 0, &quarter.quarter)?;
        sheet.write_string(row, 1, &quarter.currency)?;
        write_amounts(sheet, row, &[quarter.gross, quarter.tax, quarter.net], formats)?;
    }

    let product_header = quarters.len() as RowNum + 2;
    write_header(
        sheet,
        product_header,
        &["Product", columns[0], columns[1], columns[2], columns[3]],
        formats,
    )?;
    for (offset, product) in products.iter().enumerate() {
        let row = product_header + 1 + offset as RowNum;
        sheet.write_string(row, 0, &product.product)?;
        sheet.write_string(row, 1, &product.currency)?;
        write_amounts(sheet, row, &[product.gross, product.tax, product.net], formats)?;
    }

    Ok(())
}

/// Amounts start after the label and currency columns
fn write_amounts(sheet: &mut Worksheet, row: RowNum, amounts: &[Decimal], formats: &Formats) -> Result<()> {
    for (index, amount) in amounts.iter().enumerate() {
        sheet.write_number_with_format(row, 2 + index as ColNum, num(*amount), &formats.value)?;
    }
    Ok(())
}

pub fn write_costs_sheet(sheet: &mut Worksheet, costs: &[YearCosts], formats: &Formats) -> Result<()> {
    sheet.set_name("Kosten")?;
    write_header(sheet, 0, &["Jaar", "Valuta", "Omschrijving", "Bedrag"], formats)?;
    sheet.set_column_width(2, 40.0)?;

    let mut row: RowNum = 1;
    for year in costs {
        for (description, amount) in &year.by_kind {
            sheet.write_number(row, 0, year.year)?;
            sheet.write_string(row, 1, &year.currency)?;
            sheet.write_string(row, 2, description)?;
            sheet.write_number_with_format(row, 3, num(*amount), &formats.value)?;
            row += 1;
        }
        sheet.write_string_with_format(
            row,
            2,
            format!("Totaal {} {}", year.year, year.currency),
            &formats.bold,
        )?;
        sheet.write_number_with_format(row, 3, num(year.total), &formats.bold_value)?;
        row += 2;
    }

    Ok(())
}

/// Portfolio return next to every benchmark, one row per snapshot date.
pub fn write_benchmarks_sheet(
    sheet: &mut Worksheet,
    totals: &[PeriodTotals],
    comparisons: &[BenchmarkComparison],
    formats: &Formats,
) -> Result<()> {
    let name = "Benchmarks";
    sheet.set_name(name)?;

    let mut headers = vec![
        "Datum".to_string(),
        "Portefeuille".to_string(),
        "Inleg".to_string(),
        "Rendement".to_string(),
    ];
    for comparison in comparisons {
        headers.push(format!("{} koers", comparison.name));
        headers.push(format!("{} rendement", comparison.name));
        headers.push(format!("{} schaduwwaarde", comparison.name));
    }
    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
    write_header(sheet, 0, &header_refs, formats)?;

    for (offset, period) in totals.iter().enumerate() {
        let row = 1 + offset as RowNum;
        sheet.write_string(row, 0, period.date.to_string())?;
        sheet.write_number_with_format(row, 1, num(period.total_value), &formats.euro)?;
        sheet.write_number_with_format(row, 2, num(period.cumulative_deposits), &formats.euro)?;
        sheet.write_number_with_format(row, 3, num(period.cumulative_return), &formats.percent)?;

        for (index, comparison) in comparisons.iter().enumerate() {
            let Some(point) = comparison.points.get(offset) else {
                continue;
            };
            let base = 4 + 3 * index as ColNum;
            sheet.write_number(row, base, num(point.price))?;
            sheet.write_number_with_format(row, base + 1, num(point.cumulative_return), &formats.percent)?;
            sheet.write_number_with_format(row, base + 2, num(point.shadow_value), &formats.euro)?;
        }
    }
    sheet.set_freeze_panes(1, 1)?;

    if totals.is_empty() {
        return Ok(());
    }

    let last = totals.len() as RowNum;
    let mut chart = Chart::new(ChartType::Line);
    chart.title().set_name("Rendement");
    let return_cols = std::iter::once(3).chain((0..comparisons.len()).map(|i| 5 + 3 * i as ColNum));
    for col in return_cols {
        chart
            .add_series()
            .set_name((name, 0, col))
            .set_categories((name, 1, 0, last, 0))
            .set_values((name, 1, col, last, col));
    }
    sheet.insert_chart(last + 2, 1, &chart)?;

    Ok(())
}
