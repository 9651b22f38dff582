//! Bulk upload and template download endpoints
//!
//! The HTTP layer enforces upload preconditions (size, file type, presence of
//! the `file` field) before any row reaches the import pipeline.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use pscat_common::auth::Role;
use serde::Serialize;
use tracing::{info, warn};

use super::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::models::ImportOutcome;
use crate::services::{bulk_import, download_template, TEMPLATE_FILENAME};
use crate::AppState;

/// Multipart field carrying the CSV document
pub const FILE_FIELD: &str = "file";

const ACCEPTED_CONTENT_TYPES: [&str; 2] = ["text/csv", "application/vnd.ms-excel"];

/// Body of a completed bulk upload
#[derive(Debug, Serialize)]
pub struct BulkUploadResponse {
    pub message: String,
    #[serde(flatten)]
    pub outcome: ImportOutcome,
}

/// POST /api/problem-statements/bulk-upload
pub async fn bulk_upload(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> ApiResult<Json<BulkUploadResponse>> {
    user.require_role(&Role::AUTHORS)?;

    let bytes = read_csv_field(&mut multipart, state.max_upload_bytes).await?;

    let outcome = bulk_import(&state.db, &bytes, user.id)
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    info!(
        user = %user.id,
        imported = outcome.imported,
        failed = outcome.failed,
        "Bulk upload finished"
    );

    Ok(Json(BulkUploadResponse {
        message: outcome.summary(),
        outcome,
    }))
}

async fn read_csv_field(multipart: &mut Multipart, max_bytes: usize) -> ApiResult<Bytes> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        if !is_csv(field.content_type(), field.file_name()) {
            return Err(ApiError::UnsupportedMediaType(
                "Only CSV files are accepted".to_string(),
            ));
        }

        let bytes = field.bytes().await.map_err(multipart_error)?;
        if bytes.len() > max_bytes {
            return Err(too_large(max_bytes));
        }
        return Ok(bytes);
    }

    Err(ApiError::BadRequest(format!(
        "No file uploaded; expected multipart field '{}'",
        FILE_FIELD
    )))
}

/// Accept by MIME type, or by `.csv` extension when the client sends a generic type
fn is_csv(content_type: Option<&str>, file_name: Option<&str>) -> bool {
    let mime_ok = content_type
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
        .is_some_and(|mime| ACCEPTED_CONTENT_TYPES.contains(&mime.as_str()));

    let name_ok = file_name.is_some_and(|name| name.to_ascii_lowercase().ends_with(".csv"));

    mime_ok || name_ok
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Bulk upload exceeded request body limit");
        ApiError::PayloadTooLarge("Upload exceeds the request size limit".to_string())
    } else {
        ApiError::BadRequest(err.body_text())
    }
}

fn too_large(max_bytes: usize) -> ApiError {
    ApiError::PayloadTooLarge(format!("File exceeds the {} byte upload limit", max_bytes))
}

/// GET /api/problem-statements/template
pub async fn download_template_csv(Extension(user): Extension<AuthUser>) -> ApiResult<Response> {
    user.require_role(&Role::AUTHORS)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", TEMPLATE_FILENAME),
            ),
        ],
        download_template(),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_csv() {
        assert!(is_csv(Some("text/csv"), None));
        assert!(is_csv(Some("text/csv; charset=utf-8"), Some("upload")));
        assert!(is_csv(Some("application/vnd.ms-excel"), Some("data.bin")));
        assert!(is_csv(Some("application/octet-stream"), Some("Problems.CSV")));
        assert!(!is_csv(Some("application/json"), Some("problems.json")));
        assert!(!is_csv(None, None));
    }
}
