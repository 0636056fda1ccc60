//! Core data model types.
//!
//! Ingestion produces an in-memory [`DataSet`]: a [`Schema`] (column names taken from the header
//! line) plus an ordered list of [`Row`]s. Every cell is kept as the original text; whether a
//! cell behaves as a number is decided later, per operation (see [`crate::processing::coerce`]).

use std::sync::Arc;

/// Ordered list of column names describing the shape of every row in a [`DataSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Column names in header order.
    pub columns: Vec<String>,
}

impl Schema {
    /// Create a new schema from column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Iterate column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// `true` if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One record of a [`DataSet`].
///
/// Values are positionally aligned with the dataset's [`Schema`]. Rows are immutable and cheap to
/// clone: clones share the same cell storage, so filtered or sorted datasets reference the rows of
/// the dataset they were derived from instead of copying them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    values: Arc<[String]>,
}

impl Row {
    /// Create a row from its cell values.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Cell values in schema order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Cell at position `idx`.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.values.get(idx).map(String::as_str)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `true` if both rows point at the same underlying cell storage.
    pub fn shares_storage_with(&self, other: &Row) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }
}

/// In-memory tabular dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Rows in source order (until a sort changes it).
    pub rows: Vec<Row>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    ///
    /// # Panics
    ///
    /// Panics if any row has a different length than the schema.
    pub fn new(schema: Schema, rows: Vec<Row>) -> Self {
        for (idx, row) in rows.iter().enumerate() {
            assert!(
                row.len() == schema.len(),
                "row {} has {} values but schema has {} columns",
                idx + 1,
                row.len(),
                schema.len()
            );
        }
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// `true` if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a cell by row position and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.schema.index_of(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Iterate the cells of one column, in row order. `None` if the column does not exist.
    pub fn column_values(&self, column: &str) -> Option<impl Iterator<Item = &str>> {
        let idx = self.schema.index_of(column)?;
        Some(self.rows.iter().map(move |row| row.get(idx).unwrap_or("")))
    }

    /// Create a dataset with the same schema and a different selection of rows.
    pub fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Create a new dataset containing only rows that match `predicate`.
    ///
    /// The returned dataset preserves the original schema.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&Row) -> bool,
    {
        let rows = self.rows.iter().filter(|row| predicate(row)).cloned().collect();
        self.with_rows(rows)
    }

    /// Like [`DataSet::filter_rows`], but the predicate may fail. The first error aborts the
    /// whole filter; no partially filtered dataset is returned.
    ///
    /// The predicate receives the zero-based row position alongside the row.
    pub fn try_filter_rows<F, E>(&self, mut predicate: F) -> Result<Self, E>
    where
        F: FnMut(usize, &Row) -> Result<bool, E>,
    {
        let mut rows = Vec::new();
        for (idx, row) in self.rows.iter().enumerate() {
            if predicate(idx, row)? {
                rows.push(row.clone());
            }
        }
        Ok(self.with_rows(rows))
    }
}
