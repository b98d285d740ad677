use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Reader};
use log::{debug, warn};

use crate::columns::{resolve_columns, CanonicalColumn, ColumnResolution};
use crate::error::{ReceivablesError, Result};
use crate::schema::InvoiceRecord;
use crate::utils::{parse_amount_lenient, parse_date_lenient};

/// A file rendered down to text: one header row plus data rows. Both the CSV
/// and the spreadsheet readers produce this shape so coercion happens in one
/// place.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    fn cell<'a>(row: &'a [String], index: usize) -> &'a str {
        row.get(index).map(String::as_str).unwrap_or("")
    }
}

/// Reads an uploaded invoice file, dispatching on extension. CSV is parsed
/// directly; xlsx/xls/xlsb/ods go through the spreadsheet reader.
pub fn read_invoice_file(path: &Path) -> Result<Vec<InvoiceRecord>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let table = match extension.as_str() {
        "csv" => read_csv_table(File::open(path)?)?,
        "xlsx" | "xls" | "xlsb" | "ods" => read_spreadsheet_table(path)?,
        other => return Err(ReceivablesError::UnsupportedFormat(other.to_string())),
    };

    build_records(&table)
}

/// Parses CSV content into a raw table. The first record is the header row.
pub fn read_csv_table<R: Read>(reader: R) -> Result<RawTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = csv_reader.records();

    let headers = match records.next() {
        Some(record) => record?.iter().map(|s| s.to_string()).collect(),
        None => return Err(ReceivablesError::EmptyInput),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    Ok(RawTable { headers, rows })
}

/// Reads the first sheet of a spreadsheet into a raw table. Typed cells are
/// rendered to text; date cells become ISO dates so the shared coercion path
/// handles them like CSV input.
pub fn read_spreadsheet_table(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ReceivablesError::EmptyInput)?;

    let range = workbook.worksheet_range(&sheet_name)?;

    let mut row_iter = range.rows();

    let headers = match row_iter.next() {
        Some(row) => row.iter().map(render_cell).collect(),
        None => return Err(ReceivablesError::EmptyInput),
    };

    let rows = row_iter
        .map(|row| row.iter().map(render_cell).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) => cell
            .as_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

/// Resolves the table's headers against the alias tables, then coerces every
/// row into a canonical record. Schema failure aborts the whole file; cell
/// coercion failures null the field and keep the row.
pub fn build_records(table: &RawTable) -> Result<Vec<InvoiceRecord>> {
    let resolution = resolve_columns(&table.headers)?;

    let records = table
        .rows
        .iter()
        .enumerate()
        .map(|(row_number, row)| coerce_row(row, row_number, &resolution))
        .collect();

    debug!("Built {} records from uploaded table", table.rows.len());

    Ok(records)
}

fn coerce_row(row: &[String], row_number: usize, resolution: &ColumnResolution) -> InvoiceRecord {
    let text = |column: CanonicalColumn| -> String {
        resolution
            .index_of(column)
            .map(|i| RawTable::cell(row, i).trim().to_string())
            .unwrap_or_default()
    };

    let date = |column: CanonicalColumn| -> Option<chrono::NaiveDate> {
        let raw = text(column);
        let parsed = parse_date_lenient(&raw);
        if parsed.is_none() && !raw.is_empty() {
            warn!(
                "Row {}: could not parse {} '{}', treating as blank",
                row_number + 1,
                column.name(),
                raw
            );
        }
        parsed
    };

    let amount = |column: CanonicalColumn| -> f64 {
        let raw = text(column);
        if raw.is_empty() {
            return 0.0;
        }
        match parse_amount_lenient(&raw) {
            Some(value) => value,
            None => {
                warn!(
                    "Row {}: could not parse {} '{}', treating as 0",
                    row_number + 1,
                    column.name(),
                    raw
                );
                0.0
            }
        }
    };

    InvoiceRecord {
        customer_name: text(CanonicalColumn::CustomerName),
        invoice_number: text(CanonicalColumn::InvoiceNumber),
        invoice_date: date(CanonicalColumn::InvoiceDate),
        due_date: date(CanonicalColumn::DueDate),
        amount: amount(CanonicalColumn::Amount),
        payment_date: date(CanonicalColumn::PaymentDate),
        payment_amount: amount(CanonicalColumn::PaymentAmount),
    }
}
