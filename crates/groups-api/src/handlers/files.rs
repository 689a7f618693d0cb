//! Upload validation endpoint

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use groups_core::services::{FileSizeService, UploadedFile};
use groups_core::DomainError;

use crate::error::ApiError;
use crate::extract::CurrentActor;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FileInfo {
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
    pub checksum: String,
}

/// Bodies cut off by the request body limit count as oversized uploads.
fn multipart_error(part: &str, e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return DomainError::FileTooLarge.into();
    }
    ApiError::BadRequest(format!("Failed to read {}: {}", part, e))
}

/// Validate uploaded files - POST /api/v1/files
///
/// Every `file` field is checked against the MIME allow-list; the combined
/// size must stay under `uploads.max_total_bytes`.
pub async fn upload_files(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<Vec<FileInfo>>>, ApiError> {
    let mut files: Vec<UploadedFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("field", e))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = match field.content_type() {
            Some(ct) => ct.to_string(),
            None => mime_guess::from_path(&file_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        };
        let content = field
            .bytes()
            .await
            .map_err(|e| multipart_error("file", e))?
            .to_vec();

        files.push(UploadedFile {
            file_name,
            content_type,
            content,
        });
    }

    if files.is_empty() {
        return Err(ApiError::BadRequest("file required".to_string()));
    }

    FileSizeService::validate_file_types(&files)?;
    FileSizeService::validate_file_sizes(&files, state.config.uploads.max_total_bytes)?;

    let infos: Vec<FileInfo> = files
        .iter()
        .map(|f| FileInfo {
            file_name: f.file_name.clone(),
            content_type: f.content_type.clone(),
            size: f.size(),
            checksum: FileSizeService::checksum(&f.content),
        })
        .collect();

    info!(actor_id = %actor.id, files = infos.len(), "Upload validated");
    Ok(Json(ApiResponse::success(infos)))
}
