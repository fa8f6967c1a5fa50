// src/types/records.rs
//! Records, cells and tabular batches as they flow into and out of tables.

use super::{RecordId, ValidationError};
use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field name to value mapping of a single record, in field order.
pub type Fields = IndexMap<String, Value>;

/// A record as stored in a bitable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitableRecord {
    pub record_id: RecordId,
    #[serde(default)]
    pub fields: Fields,
}

/// A record about to be created. Carries an identifier only when the
/// caller wants row identity preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<RecordId>,
    pub fields: Fields,
}

impl NewRecord {
    pub fn new(fields: Fields) -> Self {
        Self {
            record_id: None,
            fields,
        }
    }

    pub fn with_generated_id(fields: Fields) -> Self {
        Self {
            record_id: Some(RecordId::generate()),
            fields,
        }
    }
}

impl From<Fields> for NewRecord {
    fn from(fields: Fields) -> Self {
        Self::new(fields)
    }
}

/// A typed cell of a tabular batch.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Converts loosely typed JSON input. Strings stay text; nested
    /// arrays and objects are kept as their JSON text.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => n.as_f64().map(Self::Float).unwrap_or(Self::Empty),
            },
            Value::String(s) => Self::Text(s),
            other => Self::Text(other.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// A rectangular batch of typed rows under named columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row; its width must match the column count.
    pub fn push_row(&mut self, row: Vec<CellValue>) -> Result<(), ValidationError> {
        if row.len() != self.columns.len() {
            return Err(ValidationError::RaggedRow {
                row: self.rows.len(),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn with_row(mut self, row: Vec<CellValue>) -> Result<Self, ValidationError> {
        self.push_row(row)?;
        Ok(self)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_rejects_ragged_rows() {
        let mut table = Table::new(["name", "score"]);
        assert!(table.push_row(vec!["ada".into(), 3i64.into()]).is_ok());
        let err = table.push_row(vec!["bob".into()]).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::RaggedRow {
                row: 1,
                expected: 2,
                actual: 1
            }
        ));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_new_record_serialization_skips_missing_id() {
        let mut fields = Fields::new();
        fields.insert("name".to_string(), json!("ada"));
        let value = serde_json::to_value(NewRecord::new(fields)).unwrap();
        assert_eq!(value, json!({"fields": {"name": "ada"}}));
    }

    #[test]
    fn test_cell_from_json() {
        assert_eq!(CellValue::from_json(json!(null)), CellValue::Empty);
        assert_eq!(CellValue::from_json(json!(7)), CellValue::Integer(7));
        assert_eq!(CellValue::from_json(json!(1.5)), CellValue::Float(1.5));
        assert_eq!(
            CellValue::from_json(json!(["a"])),
            CellValue::Text("[\"a\"]".to_string())
        );
    }

    #[test]
    fn test_bitable_record_defaults_fields() {
        let record: BitableRecord = serde_json::from_str(r#"{"record_id": "recA"}"#).unwrap();
        assert_eq!(record.record_id.as_str(), "recA");
        assert!(record.fields.is_empty());
    }
}
