//! CSV ingestion implementation.

use std::io::Read;
use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, Row, Schema};

/// Ingest a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - The first line is the header; its names become the [`Schema`], in order.
/// - Every following record becomes one [`Row`] of strings. No value is converted.
/// - Records must have as many fields as the header.
pub fn ingest_csv_from_path(path: impl AsRef<Path>) -> IngestionResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: Read>(rdr: &mut csv::Reader<R>) -> IngestionResult<DataSet> {
    let headers = rdr.headers()?.clone();
    let schema = Schema::new(headers.iter());
    check_unique_columns(&schema)?;

    let mut rows: Vec<Row> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(Row::new(record.iter()));
    }

    Ok(DataSet::new(schema, rows))
}

/// Ingest CSV data held in memory.
pub fn ingest_csv_from_str(input: &str) -> IngestionResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());
    ingest_csv_from_reader(&mut rdr)
}

pub(crate) fn check_unique_columns(schema: &Schema) -> IngestionResult<()> {
    for (idx, name) in schema.columns.iter().enumerate() {
        if schema.columns[..idx].contains(name) {
            return Err(IngestionError::SchemaMismatch {
                message: format!(
                    "duplicate column '{name}'. headers={:?}",
                    schema.columns
                ),
            });
        }
    }
    Ok(())
}
