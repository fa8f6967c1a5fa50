// src/encoding.rs
//! Cell encoding for outgoing payloads.
//!
//! Spreadsheets receive dates as formatted text, bitables receive them as
//! integer epoch milliseconds. Both treat naive timestamps as UTC.

use crate::types::{CellValue, Fields, NewRecord, Table};
use chrono::NaiveTime;
use serde_json::{json, Value};

pub const SHEET_DATE_FORMAT: &str = "%Y-%m-%d";
pub const SHEET_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Encodes a cell for a spreadsheet `values_append` payload.
pub fn encode_sheet_cell(cell: &CellValue) -> Value {
    match cell {
        CellValue::Empty => Value::Null,
        CellValue::Bool(b) => json!(b),
        CellValue::Integer(i) => json!(i),
        CellValue::Float(f) => finite_number(*f),
        CellValue::Text(s) => json!(s),
        CellValue::Date(d) => json!(d.format(SHEET_DATE_FORMAT).to_string()),
        CellValue::DateTime(dt) => json!(dt.format(SHEET_DATETIME_FORMAT).to_string()),
    }
}

/// Encodes a cell for a bitable record field.
pub fn encode_bitable_cell(cell: &CellValue) -> Value {
    match cell {
        CellValue::Date(d) => json!(d.and_time(NaiveTime::MIN).and_utc().timestamp_millis()),
        CellValue::DateTime(dt) => json!(dt.and_utc().timestamp_millis()),
        other => encode_sheet_cell(other),
    }
}

/// NaN and infinities have no JSON representation.
fn finite_number(f: f64) -> Value {
    if f.is_finite() {
        json!(f)
    } else {
        Value::Null
    }
}

/// Encodes rows for a spreadsheet append.
pub fn encode_sheet_rows(rows: &[Vec<CellValue>]) -> Vec<Vec<Value>> {
    rows.iter()
        .map(|row| row.iter().map(encode_sheet_cell).collect())
        .collect()
}

/// Shapes every table row into a record with a generated identifier and
/// bitable-encoded cells.
pub fn table_to_records(table: &Table) -> Vec<NewRecord> {
    table
        .rows()
        .iter()
        .map(|row| {
            let fields: Fields = table
                .columns()
                .iter()
                .zip(row)
                .map(|(column, cell)| (column.clone(), encode_bitable_cell(cell)))
                .collect();
            NewRecord::with_generated_id(fields)
        })
        .collect()
}
