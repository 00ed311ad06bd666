use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use chrono::NaiveDate;

use super::model::{CellValue, Frame, Workbook};

// ---------------------------------------------------------------------------
// Load failures with a meaning of their own
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("workbook has no readable sheets")]
    EmptyWorkbook,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an employee workbook from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – spreadsheet workbooks
/// * `.csv` – a single-sheet workbook named after the file stem
pub fn load_file(path: &Path) -> Result<Workbook> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path),
        "csv" => load_csv(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// Read every sheet of the workbook. The first row of each sheet is the
/// header; sheets without one are skipped. A file where no sheet yields
/// a header is a fatal load error.
fn load_workbook(path: &Path) -> Result<Workbook> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let sheet_names = workbook.sheet_names().to_vec();

    let mut sheets = Vec::new();

    for name in sheet_names {
        let range = workbook
            .worksheet_range(&name)
            .with_context(|| format!("reading sheet '{name}'"))?;

        let mut rows_iter = range.rows();
        let Some(header_row) = rows_iter.next() else {
            log::warn!("Sheet '{name}' is empty, skipping");
            continue;
        };

        let columns: Vec<String> = header_row.iter().map(header_cell).collect();

        let rows: Vec<Vec<CellValue>> = rows_iter
            .map(|row| {
                let mut cells: Vec<CellValue> = row.iter().map(convert_cell).collect();
                cells.resize(columns.len(), CellValue::Null);
                cells.truncate(columns.len());
                cells
            })
            .collect();

        sheets.push((name, Frame::new(columns, rows)));
    }

    if sheets.is_empty() {
        return Err(LoadError::EmptyWorkbook.into());
    }

    Ok(Workbook { sheets })
}

fn header_cell(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Map a calamine cell to our dynamic cell type. Excel serial datetimes
/// become calendar dates; error cells read as null.
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Null
            } else {
                CellValue::String(s.clone())
            }
        }
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) => CellValue::Date(dt.date()),
            None => CellValue::Null,
        },
        Data::DateTimeIso(s) => match s.get(..10).and_then(|d| d.parse::<NaiveDate>().ok()) {
            Some(d) => CellValue::Date(d),
            None => CellValue::String(s.clone()),
        },
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(_) => CellValue::Null,
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per employee.
/// Loaded as a workbook with a single sheet named after the file stem.
fn load_csv(path: &Path) -> Result<Workbook> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;

    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let mut cells: Vec<CellValue> = record.iter().map(guess_cell_type).collect();
        cells.resize(columns.len(), CellValue::Null);
        cells.truncate(columns.len());
        rows.push(cells);
    }

    let sheet_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("sheet")
        .to_string();

    Ok(Workbook {
        sheets: vec![(sheet_name, Frame::new(columns, rows))],
    })
}

fn guess_cell_type(s: &str) -> CellValue {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return CellValue::Float(f);
    }
    if trimmed == "true" || trimmed == "false" {
        return CellValue::Bool(trimmed == "true");
    }
    for fmt in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return CellValue::Date(d);
        }
    }
    CellValue::String(s.to_string())
}
