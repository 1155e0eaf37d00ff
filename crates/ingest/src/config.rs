//! Configuration for ingest normalization.

use serde::{Deserialize, Serialize};

/// Controls size limits applied before parsing.
///
/// Sales exports are small; the default limit exists to keep a mis-uploaded
/// file from being parsed row by row before anyone notices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Maximum raw payload size in bytes. `None` disables the check.
    pub max_payload_bytes: Option<usize>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: Some(10 * 1024 * 1024),
        }
    }
}
