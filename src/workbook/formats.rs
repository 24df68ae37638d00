use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder};

use crate::portfolio::Trend;

const HEADER_COLOR: u32 = 0xECA359;
const POSITIVE_COLOR: u32 = 0xC6EFCE;
const NEGATIVE_COLOR: u32 = 0xFFC7CE;
const SUMMARY_COLOR: u32 = 0xD1CDCC;
const QUANTITY_FONT: u32 = 0x796E63;

const EURO: &str = "€ #,##0.00;(€ #,##0.00);0";

/// Cell formats shared by all sheets
pub struct Formats {
    pub title_right: Format,
    pub title_left: Format,
    pub column_header: Format,
    pub column_header_border: Format,
    pub quantity_up: Format,
    pub quantity_down: Format,
    pub quantity: Format,
    pub value: Format,
    pub percent_up: Format,
    pub percent_down: Format,
    pub percent: Format,
    pub total_label: Format,
    pub total_value: Format,
    pub summary_label: Format,
    pub summary_value: Format,
    pub overview_header: Format,
    pub euro: Format,
    /// Bold amount without a currency symbol
    pub bold_value: Format,
    pub bold: Format,
}

impl Formats {
    pub fn new() -> Self {
        let quantity = Format::new()
            .set_font_color(Color::RGB(QUANTITY_FONT))
            .set_border_left(FormatBorder::Thin);
        let percent = Format::new().set_num_format("0%");
        let column_header = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(HEADER_COLOR))
            .set_align(FormatAlign::Center);

        Self {
            title_right: Format::new().set_bold().set_font_size(24).set_align(FormatAlign::Right),
            title_left: Format::new().set_bold().set_font_size(24).set_align(FormatAlign::Left),
            column_header_border: column_header.clone().set_border_left(FormatBorder::Thin),
            column_header,
            quantity_up: quantity.clone().set_background_color(Color::RGB(POSITIVE_COLOR)),
            quantity_down: quantity.clone().set_background_color(Color::RGB(NEGATIVE_COLOR)),
            quantity,
            value: Format::new().set_num_format("#,##0.00;-#,##0.00;—;@"),
            percent_up: percent.clone().set_background_color(Color::RGB(POSITIVE_COLOR)),
            percent_down: percent.clone().set_background_color(Color::RGB(NEGATIVE_COLOR)),
            percent,
            total_label: Format::new().set_bold().set_font_size(14),
            total_value: Format::new()
                .set_bold()
                .set_font_size(14)
                .set_num_format("€ #,##0.00"),
            summary_label: Format::new()
                .set_bold()
                .set_font_size(14)
                .set_background_color(Color::RGB(SUMMARY_COLOR)),
            summary_value: Format::new()
                .set_bold()
                .set_font_size(14)
                .set_num_format(EURO)
                .set_background_color(Color::RGB(SUMMARY_COLOR)),
            overview_header: Format::new().set_background_color(Color::RGB(SUMMARY_COLOR)),
            euro: Format::new().set_num_format(EURO),
            bold_value: Format::new().set_bold().set_num_format("#,##0.00"),
            bold: Format::new().set_bold(),
        }
    }

    pub fn for_trend(&self, trend: Trend) -> &Format {
        match trend {
            Trend::Up => &self.quantity_up,
            Trend::Down => &self.quantity_down,
            Trend::Flat => &self.quantity,
        }
    }

    pub fn for_percent(&self, fraction: Decimal) -> &Format {
        if fraction > Decimal::ZERO {
            &self.percent_up
        } else if fraction < Decimal::ZERO {
            &self.percent_down
        } else {
            &self.percent
        }
    }
}

impl Default for Formats {
    fn default() -> Self {
        Self::new()
    }
}

/// Spreadsheet cells are f64; everything before this point is Decimal
pub fn num(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}
