//! Error types produced by the ingest crate.
//!
//! All errors are typed, cloneable, and comparable so callers can map them
//! to HTTP status codes and assert on them in tests. Individual malformed
//! rows are not errors — they are skipped and counted on
//! [`NormalizedDataset`](crate::NormalizedDataset) — ingest only fails when
//! the file as a whole is unusable.

use thiserror::Error;

/// Errors that can occur while normalizing a CSV export.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IngestError {
    /// No known column signature matched the header.
    #[error("CSV format not recognized. Available columns: [{0}]")]
    UnsupportedFormat(String),

    /// The header matched a known format but required columns are missing.
    #[error("missing required columns for {format} format: [{missing}]")]
    MissingColumns { format: String, missing: String },

    /// Every data row failed to parse; nothing remains to aggregate.
    #[error("no parseable rows: all {0} data rows were malformed")]
    AllRowsMalformed(usize),

    /// The file had a header but no data rows at all.
    #[error("CSV contains no data rows")]
    EmptyInput,

    /// Raw payload exceeds the configured size limit.
    #[error("payload exceeds size limit: {0}")]
    PayloadTooLarge(String),
}

impl IngestError {
    /// Suggested HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            IngestError::PayloadTooLarge(_) => 413,
            _ => 400,
        }
    }
}
