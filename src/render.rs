//! Text and JSON rendering of pipeline results.
//!
//! Tables are plain text: a header line, a dashed rule under each column, then one line per row.
//! Columns are separated by two spaces. A column whose non-empty cells are all numbers is
//! right-aligned; any other column is left-aligned.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::pipeline::PipelineResult;
use crate::processing::{parse_strict_float, AggregateResult};
use crate::types::{DataSet, Row, Schema};

/// Output format for rendered results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned plain-text table.
    #[default]
    Table,
    /// JSON: an array of row objects, or a single aggregate object.
    Json,
}

/// Render a pipeline result in `format`.
///
/// Returns `None` when there is nothing to show: the input had no rows, or every row was
/// filtered out.
pub fn render_result(result: &PipelineResult, format: OutputFormat) -> serde_json::Result<Option<String>> {
    let out = match (result, format) {
        (PipelineResult::NoData, _) => return Ok(None),
        (PipelineResult::Rows(ds), _) if ds.is_empty() => return Ok(None),
        (PipelineResult::Rows(ds), OutputFormat::Table) => render_table(ds),
        (PipelineResult::Rows(ds), OutputFormat::Json) => render_rows_json(ds)?,
        (PipelineResult::Aggregate(agg), OutputFormat::Table) => render_aggregate_table(agg),
        (PipelineResult::Aggregate(agg), OutputFormat::Json) => render_aggregate_json(agg)?,
    };
    Ok(Some(out))
}

/// Render a dataset as a plain-text table.
pub fn render_table(dataset: &DataSet) -> String {
    let headers: Vec<&str> = dataset.schema.column_names().collect();
    let rows: Vec<Vec<&str>> = dataset
        .rows
        .iter()
        .map(|row| row.values().iter().map(String::as_str).collect())
        .collect();
    table(&headers, &rows)
}

/// Render an aggregate result as a two-column table: `column` and the op-named value.
pub fn render_aggregate_table(result: &AggregateResult) -> String {
    let [(k1, v1), (k2, v2)] = result.fields();
    table(&[k1, k2], &[vec![v1.as_str(), v2.as_str()]])
}

/// Render a dataset as a JSON array of objects, keys in column order.
pub fn render_rows_json(dataset: &DataSet) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&RowsView(dataset))
}

/// Render an aggregate result as a JSON object, e.g. `{"column": "price", "avg": 12.75}`.
pub fn render_aggregate_json(result: &AggregateResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

fn table(headers: &[&str], rows: &[Vec<&str>]) -> String {
    let widths: Vec<usize> = (0..headers.len())
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(headers[col].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();
    let right_align: Vec<bool> = (0..headers.len())
        .map(|col| is_numeric_column(rows.iter().filter_map(|row| row.get(col).copied())))
        .collect();

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(pad_line(headers, &widths, &right_align));
    out.push(
        widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        out.push(pad_line(row, &widths, &right_align));
    }
    out.join("\n")
}

fn pad_line(cells: &[&str], widths: &[usize], right_align: &[bool]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter().zip(right_align.iter()))
        .map(|(cell, (&width, &right))| {
            if right {
                format!("{cell:>width$}")
            } else {
                format!("{cell:<width$}")
            }
        })
        .collect();
    padded.join("  ").trim_end().to_string()
}

fn is_numeric_column<'a>(cells: impl Iterator<Item = &'a str>) -> bool {
    let mut seen = false;
    for cell in cells.filter(|c| !c.trim().is_empty()) {
        if parse_strict_float(cell).is_none() {
            return false;
        }
        seen = true;
    }
    seen
}

struct RowsView<'a>(&'a DataSet);

impl Serialize for RowsView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.row_count()))?;
        for row in &self.0.rows {
            seq.serialize_element(&RowView {
                schema: &self.0.schema,
                row,
            })?;
        }
        seq.end()
    }
}

struct RowView<'a> {
    schema: &'a Schema,
    row: &'a Row,
}

impl Serialize for RowView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.schema.len()))?;
        for (column, value) in self.schema.column_names().zip(self.row.values()) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
