//! One worksheet per calendar year.
//!
//! Layout, top to bottom: title row, holdings block (three columns per
//! snapshot: quantity, value, unit value change), totals block, the
//! winst/verlies row, and the jaaroverzicht block with the year return and
//! its chart.

use rust_xlsxwriter::{Chart, ChartType, ColNum, RowNum, Worksheet};

use super::formats::{num, Formats};
use crate::error::Result;
use crate::portfolio::YearView;
use crate::utils::snapshot_label;

const FIRST_HOLDING_ROW: RowNum = 2;
const PRODUCT_WIDTH: f64 = 35.0;
const DATA_WIDTH: f64 = 17.0;

fn quantity_col(index: usize) -> ColNum {
    1 + 3 * index as ColNum
}

fn value_col(index: usize) -> ColNum {
    quantity_col(index) + 1
}

fn percent_col(index: usize) -> ColNum {
    quantity_col(index) + 2
}

pub fn write_year_sheet(sheet: &mut Worksheet, view: &YearView, formats: &Formats) -> Result<()> {
    let name = view.year.to_string();
    sheet.set_name(&name)?;

    sheet.write_string_with_format(0, 0, &name, &formats.title_right)?;
    sheet.write_string_with_format(0, 1, "Waarde Portefeuille", &formats.title_left)?;
    sheet.set_row_height(0, 32.0)?;

    write_holdings(sheet, view, formats)?;
    let totals_row = FIRST_HOLDING_ROW + view.holdings.rows.len() as RowNum + 1;
    let after_totals = write_totals(sheet, view, formats, totals_row)?;
    write_overview(sheet, &name, view, formats, after_totals + 1)?;

    sheet.set_column_width(0, PRODUCT_WIDTH)?;
    for index in 0..view.holdings.dates.len() {
        for col in [quantity_col(index), value_col(index), percent_col(index)] {
            sheet.set_column_width(col, DATA_WIDTH)?;
        }
    }
    sheet.set_freeze_panes(FIRST_HOLDING_ROW, 1)?;

    Ok(())
}

fn write_holdings(sheet: &mut Worksheet, view: &YearView, formats: &Formats) -> Result<()> {
    let header_row = FIRST_HOLDING_ROW - 1;
    sheet.write_string_with_format(header_row, 0, "Product", &formats.column_header)?;
    for (index, date) in view.holdings.dates.iter().enumerate() {
        sheet.write_string_with_format(header_row, quantity_col(index), "Aantal", &formats.column_header_border)?;
        sheet.write_string_with_format(header_row, value_col(index), snapshot_label(*date), &formats.column_header)?;
        sheet.write_string_with_format(header_row, percent_col(index), "%", &formats.column_header)?;
    }

    for (offset, row) in view.holdings.rows.iter().enumerate() {
        let excel_row = FIRST_HOLDING_ROW + offset as RowNum;
        sheet.write_string(excel_row, 0, &row.product)?;

        // Gaps are written as zero, which the value format shows as a dash
        for (index, cell) in row.cells.iter().enumerate() {
            sheet.write_number_with_format(
                excel_row,
                quantity_col(index),
                num(cell.quantity),
                formats.for_trend(cell.trend),
            )?;
            sheet.write_number_with_format(excel_row, value_col(index), num(cell.value), &formats.value)?;
            sheet.write_number_with_format(
                excel_row,
                percent_col(index),
                num(cell.pct_change),
                formats.for_percent(cell.pct_change),
            )?;
        }
    }

    Ok(())
}

/// Writes the totals and winst/verlies rows, returns the row after them.
fn write_totals(sheet: &mut Worksheet, view: &YearView, formats: &Formats, first_row: RowNum) -> Result<RowNum> {
    let lines = [
        ("Totaal portefeuille", 0),
        ("Verschil t.o.v. vorige maand", 1),
        ("Inleg", 2),
    ];

    for (label, offset) in lines {
        let row = first_row + offset;
        sheet.write_string_with_format(row, 0, label, &formats.total_label)?;
        for (index, period) in view.totals.iter().enumerate() {
            let amount = match offset {
                0 => period.total_value,
                1 => period.change,
                _ => period.deposits,
            };
            sheet.write_number_with_format(row, value_col(index), num(amount), &formats.total_value)?;
        }
    }

    let result_row = first_row + lines.len() as RowNum + 1;
    sheet.write_string_with_format(result_row, 0, "Winst/Verlies", &formats.summary_label)?;
    for (index, period) in view.totals.iter().enumerate() {
        sheet.write_number_with_format(
            result_row,
            value_col(index),
            num(period.profit_loss),
            &formats.summary_value,
        )?;
        sheet.write_number_with_format(
            result_row,
            percent_col(index),
            num(period.period_return),
            formats.for_percent(period.period_return),
        )?;
    }

    Ok(result_row + 1)
}

fn write_overview(
    sheet: &mut Worksheet,
    sheet_name: &str,
    view: &YearView,
    formats: &Formats,
    header_row: RowNum,
) -> Result<()> {
    let headers = ["Jaaroverzicht", "Portefeuille", "Inleg", "Winst/Verlies"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(header_row, col as ColNum, *header, &formats.overview_header)?;
    }

    let overview = view.overview();
    for (offset, line) in overview.iter().enumerate() {
        let row = header_row + 1 + offset as RowNum;
        sheet.write_string(row, 0, snapshot_label(line.date))?;
        sheet.write_number_with_format(row, 1, num(line.portfolio_value), &formats.euro)?;
        sheet.write_number_with_format(row, 2, num(line.cumulative_deposits), &formats.euro)?;
        sheet.write_number_with_format(row, 3, num(line.profit_loss), &formats.euro)?;
    }

    if overview.is_empty() {
        return Ok(());
    }

    let return_row = header_row + 1 + overview.len() as RowNum;
    let year_return = view.year_return();
    sheet.write_string_with_format(return_row, 0, format!("Rendement {}", view.year), &formats.summary_label)?;
    sheet.write_number_with_format(return_row, 1, num(year_return), formats.for_percent(year_return))?;

    let first = header_row + 1;
    let last = header_row + overview.len() as RowNum;
    let mut chart = Chart::new(ChartType::Line);
    chart.title().set_name("Jaaroverzicht");
    for col in 1..=3 {
        chart
            .add_series()
            .set_name((sheet_name, header_row, col))
            .set_categories((sheet_name, first, 0, last, 0))
            .set_values((sheet_name, first, col, last, col));
    }
    sheet.insert_chart(header_row, 5, &chart)?;

    Ok(())
}
