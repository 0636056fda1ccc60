//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of flat objects: `[{"a":1}, {"a":2}]`
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! The keys of the first object, in source order, become the schema. Scalars are stored as their
//! text form (`null` becomes an empty cell), matching what the same data would look like in CSV.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value as JsonValue};

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, Row, Schema};

use super::csv::check_unique_columns;

/// Ingest JSON into an in-memory `DataSet`.
pub fn ingest_json_from_path(path: impl AsRef<Path>) -> IngestionResult<DataSet> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text)
}

/// Ingest JSON from an in-memory string into a [`DataSet`].
///
/// Empty input yields an empty dataset with no columns.
pub fn ingest_json_from_str(input: &str) -> IngestionResult<DataSet> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(DataSet::new(Schema::new(Vec::<String>::new()), Vec::new()));
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<JsonValue>(trimmed) {
        match v {
            JsonValue::Array(items) => ingest_json_values(&items),
            JsonValue::Object(_) => ingest_json_values(std::slice::from_ref(&v)),
            _ => Err(IngestionError::SchemaMismatch {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        }
    } else {
        // Fall back to NDJSON.
        let mut values = Vec::new();
        for line in trimmed.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            values.push(serde_json::from_str::<JsonValue>(line)?);
        }
        ingest_json_values(&values)
    }
}

fn ingest_json_values(values: &[JsonValue]) -> IngestionResult<DataSet> {
    let Some(first) = values.first() else {
        return Ok(DataSet::new(Schema::new(Vec::<String>::new()), Vec::new()));
    };
    let schema = Schema::new(as_object(first, 1)?.keys());
    check_unique_columns(&schema)?;

    let mut rows: Vec<Row> = Vec::with_capacity(values.len());
    for (idx0, v) in values.iter().enumerate() {
        let row_num = idx0 + 1;
        let obj = as_object(v, row_num)?;
        if obj.len() != schema.len() {
            return Err(IngestionError::SchemaMismatch {
                message: format!(
                    "row {row_num} has {} fields but the first row has {}",
                    obj.len(),
                    schema.len()
                ),
            });
        }

        let mut row = Vec::with_capacity(schema.len());
        for column in schema.column_names() {
            let jv = obj.get(column).ok_or_else(|| IngestionError::SchemaMismatch {
                message: format!("row {row_num} missing field '{column}'"),
            })?;
            row.push(scalar_to_text(row_num, column, jv)?);
        }
        rows.push(Row::new(row));
    }

    Ok(DataSet::new(schema, rows))
}

fn as_object(v: &JsonValue, row_num: usize) -> IngestionResult<&Map<String, JsonValue>> {
    v.as_object().ok_or_else(|| IngestionError::SchemaMismatch {
        message: format!("row {row_num} is not a json object"),
    })
}

fn scalar_to_text(row_num: usize, column: &str, v: &JsonValue) -> IngestionResult<String> {
    match v {
        JsonValue::Null => Ok(String::new()),
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Array(_) | JsonValue::Object(_) => Err(IngestionError::SchemaMismatch {
            message: format!("row {row_num} field '{column}' is not a scalar"),
        }),
    }
}
