// Excel import (xlsx, xls, xlsb, ods) and xlsx export

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use namelink_recon::model::Table;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};

use crate::error::IoError;

const SHEET_NAME: &str = "Linked";

/// Import the first worksheet. Row 1 is the header row.
pub fn import(path: &Path) -> Result<Table, IoError> {
    let parse_err = |message: String| IoError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| parse_err(format!("Failed to open Excel file: {}", e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| parse_err("Excel file contains no sheets".into()))?;
    if workbook.sheet_names().len() > 1 {
        log::warn!("{} has several sheets, reading '{}'", path.display(), sheet_name);
    }

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| parse_err(format!("Failed to read sheet '{}': {}", sheet_name, e)))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|c| cell_text(c).trim().to_string()).collect(),
        None => return Err(parse_err(format!("sheet '{}' is empty", sheet_name))),
    };
    let headers = crate::dedupe_headers(headers);

    let data: Vec<(usize, Vec<String>)> = rows
        .map(|row| row.iter().map(cell_text).collect::<Vec<String>>())
        .enumerate()
        .filter(|(_, values)| values.iter().any(|v| !v.is_empty()))
        .collect();

    Ok(Table::from_numbered_rows(headers, data))
}

/// Render a cell the way it would read in a CSV export.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => format!("{}", n),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(e) => format!("#{:?}", e),
        // Serial number; dates are not name data
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Export a table to a single-sheet workbook with a bold header row.
///
/// Cells that read back identically as numbers are written as numbers, so
/// identifiers and ages stay numeric while codes like `007` stay text.
pub fn export(table: &Table, path: &Path) -> Result<(), IoError> {
    let write_err = |message: String| IoError::Write {
        path: path.to_path_buf(),
        message,
    };

    let mut xlsx_workbook = XlsxWorkbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = xlsx_workbook
        .add_worksheet()
        .set_name(SHEET_NAME)
        .map_err(|e| write_err(format!("Failed to create sheet '{}': {}", SHEET_NAME, e)))?;

    for (col, header) in table.headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, header, &header_format)
            .map_err(|e| write_err(format!("Failed to write header: {}", e)))?;
    }

    for (row_idx, record) in table.records.iter().enumerate() {
        // rust_xlsxwriter uses 0-based row/col as u32/u16; row 0 is the header
        let row32 = (row_idx + 1) as u32;
        for (col, value) in record.values.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let col16 = col as u16;
            let written = match as_number(value) {
                Some(n) => worksheet.write_number(row32, col16, n),
                None => worksheet.write_string(row32, col16, value),
            };
            written.map_err(|e| write_err(format!("Failed to write cell: {}", e)))?;
        }
    }

    xlsx_workbook
        .save(path)
        .map_err(|e| write_err(e.to_string()))?;
    Ok(())
}

/// Parse as a number only when formatting it back gives the same text.
fn as_number(value: &str) -> Option<f64> {
    let n: f64 = value.parse().ok()?;
    if !n.is_finite() {
        return None;
    }
    (format!("{}", n) == value).then_some(n)
}
