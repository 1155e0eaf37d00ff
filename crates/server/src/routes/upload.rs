//! CSV upload: normalize, aggregate, and summarize in one request.

use aggregate::SalesSummary;
use axum::extract::Multipart;
use axum::Json;

use crate::error::ServerError;

/// `POST /upload-csv` — multipart upload of one sales export.
///
/// The first `file` field is taken; its filename must end in `.csv` and its
/// content must be UTF-8. Returns the full [`SalesSummary`], or
/// `{"detail": …}` when the file cannot be summarized.
pub async fn upload_csv(mut multipart: Multipart) -> Result<Json<SalesSummary>, ServerError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ServerError::Multipart(err.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if !filename.to_lowercase().ends_with(".csv") {
            return Err(ServerError::NotCsv);
        }

        let data = field
            .bytes()
            .await
            .map_err(|err| ServerError::Multipart(err.to_string()))?;
        let content =
            std::str::from_utf8(&data).map_err(|_| ServerError::InvalidEncoding)?;

        let summary = menupulse::summarize_csv(content)?;
        return Ok(Json(summary));
    }

    Err(ServerError::MissingFile)
}
