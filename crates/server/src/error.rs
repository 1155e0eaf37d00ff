//! HTTP error mapping.
//!
//! Every failure leaves the server as `{"detail": "<message>"}` with a
//! status code taken from the underlying error's own mapping. Pipeline
//! errors never get turned into a fabricated summary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use menupulse::PipelineError;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("File must be a CSV")]
    NotCsv,

    #[error("no file field found in the upload")]
    MissingFile,

    #[error("file content is not valid UTF-8")]
    InvalidEncoding,

    #[error("invalid multipart upload: {0}")]
    Multipart(String),
}

impl ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Pipeline(err) => StatusCode::from_u16(err.http_status_code())
                .unwrap_or(StatusCode::BAD_REQUEST),
            ServerError::NotCsv
            | ServerError::MissingFile
            | ServerError::InvalidEncoding
            | ServerError::Multipart(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.to_string();
        warn!(status = status.as_u16(), detail = %detail, "request_rejected");
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
