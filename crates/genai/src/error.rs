//! Error types produced by the generation crate.
//!
//! Upstream failures are mapped into this taxonomy at the HTTP boundary so
//! the rest of the pipeline never sees raw transport errors. During a
//! stream these surface to clients as a terminal `error` event; the
//! [`http_status_code`](GenAiError::http_status_code) mapping exists for
//! non-streaming callers.

use thiserror::Error;

/// Errors that can occur while generating content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GenAiError {
    /// The upstream rejected the credential (401/403), or the key failed
    /// the local precheck.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The upstream throttled the request (429).
    #[error("rate limited by upstream: {0}")]
    RateLimit(String),

    /// The requested model does not exist or is not served (404).
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// The request or the streamed body timed out.
    #[error("upstream timed out: {0}")]
    UpstreamTimeout(String),

    /// Any other transport or upstream failure.
    #[error("upstream request failed: {0}")]
    Upstream(String),

    /// No parseable JSON object could be recovered from the model output.
    #[error("model output is not valid JSON: {0}")]
    MalformedModelOutput(String),

    /// The JSON parsed but violates the content schema.
    #[error("generated content failed validation: {0}")]
    SchemaValidation(String),
}

impl GenAiError {
    /// Suggested HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            GenAiError::Auth(_) => 401,
            GenAiError::RateLimit(_) => 429,
            GenAiError::UpstreamTimeout(_) => 504,
            GenAiError::ModelUnavailable(_)
            | GenAiError::Upstream(_)
            | GenAiError::MalformedModelOutput(_)
            | GenAiError::SchemaValidation(_) => 502,
        }
    }
}
