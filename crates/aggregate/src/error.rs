//! Error types produced by the aggregation crate.

use thiserror::Error;

/// Errors that can occur while aggregating canonical rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AggregateError {
    /// There are no rows to aggregate.
    #[error("dataset contains no rows to aggregate")]
    EmptyDataset,
}

impl AggregateError {
    /// Suggested HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            AggregateError::EmptyDataset => 400,
        }
    }
}
