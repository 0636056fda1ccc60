use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for processing operations.
pub type ProcessingResult<T> = Result<T, ProcessingError>;

/// Error type returned by ingestion functions.
///
/// Any of these means the data source could not be loaded.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV ingestion error (malformed record, unequal row length, invalid UTF-8).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON ingestion error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input has no usable shape (duplicate header names, inconsistent JSON objects, ...).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// The input format could not be determined or is not supported.
    #[error("unsupported format: {message}")]
    UnsupportedFormat { message: String },
}

/// Error type returned by the processing stages (filter, sort, aggregate).
///
/// Two variants are recoverable: [`ProcessingError::UnknownOperator`] and
/// [`ProcessingError::InvalidDirection`]. The filter and sort stages turn them into warnings and
/// pass their input through unchanged. Every other variant aborts the stage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessingError {
    /// A filter condition contains none of `<`, `>`, `=`.
    #[error("unsupported operation or malformed condition '{condition}' (expected column<value, column>value or column=value)")]
    UnknownOperator { condition: String },

    /// A sort direction other than `asc` / `desc`.
    #[error("unknown sort direction '{direction}' (expected asc or desc)")]
    InvalidDirection { direction: String },

    /// An option string does not have the `column=value` shape.
    #[error("invalid {what} '{raw}': expected exactly one '=' (column=value)")]
    InvalidSpec { what: &'static str, raw: String },

    /// The named column is not part of the schema.
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },

    /// A cell expected to be numeric could not be converted.
    #[error("could not convert value to a number at row {row} column '{column}' (raw='{raw}')")]
    NumericConversion { row: usize, column: String, raw: String },

    /// A filter operand looks numeric but is not a valid number.
    #[error("could not convert operand '{operand}' to a number")]
    InvalidOperand { operand: String },

    /// Aggregate operation outside `avg`, `min`, `max`, `median`.
    #[error("unsupported aggregate operation '{op}' (expected avg, min, max or median)")]
    UnsupportedAggregateOp { op: String },

    /// A sort column mixes numeric-looking and textual values.
    #[error("cannot sort column '{column}': it mixes numeric and text values")]
    MixedSortKeys { column: String },

    /// Aggregation over zero rows.
    #[error("cannot aggregate column '{column}': no rows")]
    EmptyAggregate { column: String },
}

impl ProcessingError {
    /// `true` for the malformed-but-recognizable inputs that degrade to a no-op with a warning.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ProcessingError::UnknownOperator { .. } | ProcessingError::InvalidDirection { .. }
        )
    }
}

/// A processing error tagged with the pipeline stage that raised it.
///
/// The stage's error is part of the message rather than a separate error source.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{stage} failed: {error}")]
pub struct PipelineError {
    pub stage: crate::pipeline::Stage,
    pub error: ProcessingError,
}
