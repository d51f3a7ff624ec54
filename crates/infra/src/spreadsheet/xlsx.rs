//! XLSX rendering of sheet layouts

use chrono::{Datelike, NaiveDateTime, Timelike};
use rust_xlsxwriter::{ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use ticketmail_core::{Cell, SheetLayout, SheetRow, SpreadsheetWriter};
use ticketmail_domain::{Result, TicketMailError};

use crate::errors::to_domain;

const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Writes layouts as single-sheet workbooks in memory
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxWriter;

impl XlsxWriter {
    pub fn new() -> Self {
        Self
    }
}

impl SpreadsheetWriter for XlsxWriter {
    fn write(&self, layout: &SheetLayout) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(&layout.sheet_name).map_err(to_domain)?;
        fill_sheet(sheet, layout)?;

        let bytes = workbook.save_to_buffer().map_err(to_domain)?;
        tracing::debug!(filename = %layout.filename, rows = layout.rows.len(), bytes = bytes.len(), "xlsx.written");
        Ok(bytes)
    }
}

fn fill_sheet(sheet: &mut Worksheet, layout: &SheetLayout) -> Result<()> {
    let title = Format::new().set_bold().set_align(FormatAlign::Center);
    let header = Format::new().set_bold().set_border_bottom(FormatBorder::Thin);
    let date = Format::new().set_num_format(DATE_FORMAT);

    for (index, column) in layout.columns.iter().enumerate() {
        sheet.set_column_width(column_number(index)?, cm_to_character_width(column.width_cm)).map_err(to_domain)?;
    }

    for (index, row) in layout.rows.iter().enumerate() {
        let row_number = u32::try_from(index)
            .map_err(|_| TicketMailError::Internal("too many spreadsheet rows".into()))?;

        match row {
            SheetRow::Title { text, span } if *span > 1 => {
                let last = column_number(span - 1)?;
                sheet.merge_range(row_number, 0, row_number, last, text, &title).map_err(to_domain)?;
            }
            SheetRow::Title { text, .. } => {
                sheet.write_string_with_format(row_number, 0, text, &title).map_err(to_domain)?;
            }
            SheetRow::Header(names) => {
                for (col, name) in names.iter().enumerate() {
                    sheet
                        .write_string_with_format(row_number, column_number(col)?, name, &header)
                        .map_err(to_domain)?;
                }
            }
            SheetRow::Data(cells) => {
                for (col, cell) in cells.iter().enumerate() {
                    write_cell(sheet, row_number, column_number(col)?, cell, &date)?;
                }
            }
            SheetRow::Summary(text) => {
                sheet.write_string(row_number, 0, text).map_err(to_domain)?;
            }
            SheetRow::Blank => {}
        }
    }
    Ok(())
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &Cell, date: &Format) -> Result<()> {
    match cell {
        Cell::Text(text) if text.is_empty() => {}
        Cell::Text(text) => {
            sheet.write_string(row, col, text).map_err(to_domain)?;
        }
        Cell::Number(number) => {
            sheet.write_number(row, col, *number).map_err(to_domain)?;
        }
        Cell::Date(value) => {
            sheet.write_datetime_with_format(row, col, &excel_datetime(value)?, date).map_err(to_domain)?;
        }
    }
    Ok(())
}

fn excel_datetime(value: &NaiveDateTime) -> Result<ExcelDateTime> {
    let year = u16::try_from(value.year())
        .map_err(|_| TicketMailError::Internal(format!("date out of range: {value}")))?;
    let excel = ExcelDateTime::from_ymd(year, value.month() as u8, value.day() as u8)
        .and_then(|date| date.and_hms(value.hour() as u16, value.minute() as u8, value.second()))
        .map_err(to_domain)?;
    Ok(excel)
}

fn column_number(index: usize) -> Result<u16> {
    u16::try_from(index).map_err(|_| TicketMailError::Internal("too many spreadsheet columns".into()))
}

/// Excel measures widths in characters of the default font, about 7 pixels
/// each plus 5 pixels of padding at 96 dpi.
fn cm_to_character_width(cm: f64) -> f64 {
    let pixels = cm / 2.54 * 96.0;
    ((pixels - 5.0) / 7.0).max(1.0)
}
