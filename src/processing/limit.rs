//! Row-count limiting for [`crate::types::DataSet`].

use crate::types::DataSet;

/// Returns a new [`DataSet`] with at most the first `n` rows.
pub fn head(dataset: &DataSet, n: usize) -> DataSet {
    dataset.with_rows(dataset.rows.iter().take(n).cloned().collect())
}
