//! Errors surfaced by the aggregation entry points.
//!
//! Degenerate-but-valid inputs (an empty distribution, fewer than ten values)
//! are not errors; they follow the zero-filled policy of the decile aggregator.

use thiserror::Error;

/// Failures of the core analysis operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// An aggregation call received nothing to aggregate.
    #[error("empty input: {what}")]
    EmptyInput { what: String },

    /// The inner join of two result tables matched no (dataset, size) key.
    #[error("no matching (dataset, size) keys between result tables ({left_rows} vs {right_rows} rows)")]
    NoMatchingKeys { left_rows: usize, right_rows: usize },
}

impl AnalysisError {
    pub(crate) fn empty(what: impl Into<String>) -> Self {
        AnalysisError::EmptyInput { what: what.into() }
    }
}
