use super::app_error::AppError;
use super::state::HttpServerState;
use crate::datamodel::{ColumnSchema, DetectedSchema};
use crate::pipeline::{ImportRequest, UploadError, analyze_file, import_file};
use anyhow::anyhow;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;
use uuid::Uuid;

/// Body of an import request, sent once the user reviewed the detected schema.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ImportPayload {
    /// File content, base64-encoded. A `data:` URL prefix is accepted.
    pub file_data: String,
    pub file_name: String,
    pub file_size: u64,
    pub collection_id: Uuid,
    pub schema: Vec<ColumnSchema>,
    #[serde(default)]
    pub folder_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImportResponse {
    pub message: String,
    pub folder_id: Uuid,
    pub folder_name: String,
    pub records_imported: usize,
}

/// Decodes the base64 file content of an import payload.
pub fn decode_file_data(file_data: &str) -> Result<Vec<u8>, UploadError> {
    let encoded = match file_data.split_once(',') {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => file_data,
    };
    general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|error| {
            UploadError::InvalidPayload(format!("file_data is not valid base64: {}", error))
        })
}

/// Analyze an uploaded file
///
/// Parses a spreadsheet sent as the multipart field `file` and returns the
/// detected columns with a preview. Nothing is stored.
#[utoipa::path(
    post,
    path = "/api/upload/analyze",
    tag = "Upload",
    request_body(content_type = "multipart/form-data", description = "Field `file` with a .csv, .xlsx or .xls spreadsheet"),
    responses(
        (status = 200, description = "Detected schema", body = DetectedSchema),
        (status = 400, description = "Bad Request", body = AppError),
        (status = 500, description = "Internal Server Error", body = AppError),
    )
)]
pub async fn analyze_upload(
    State(state): State<HttpServerState>,
    mut multipart: Multipart,
) -> Result<Json<DetectedSchema>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(AppError::bad_request)? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(AppError::bad_request)?;
        debug!(%file_name, size = bytes.len(), "Received upload");

        let schema = analyze_file(&file_name, &bytes, state.limits.max_file_size)
            .await
            .map_err(AppError::from_upload)?;
        return Ok(Json(schema));
    }

    Err(AppError::bad_request(anyhow!("No file uploaded")))
}

/// Import a file into a collection
///
/// Creates a new folder in the collection and stores every row of the file,
/// converted with the reviewed schema.
#[utoipa::path(
    post,
    path = "/api/upload/import",
    tag = "Upload",
    request_body = ImportPayload,
    responses(
        (status = 200, description = "Import completed", body = ImportResponse),
        (status = 400, description = "Bad Request", body = AppError),
        (status = 500, description = "Internal Server Error", body = AppError),
    )
)]
pub async fn import_upload(
    State(state): State<HttpServerState>,
    payload: Result<Json<ImportPayload>, JsonRejection>,
) -> Result<Json<ImportResponse>, AppError> {
    let Json(payload) =
        payload.map_err(|rejection| AppError::bad_request(anyhow!(rejection.body_text())))?;

    let file_bytes = decode_file_data(&payload.file_data).map_err(AppError::from_upload)?;
    if file_bytes.len() as u64 != payload.file_size {
        return Err(AppError::from_upload(UploadError::InvalidPayload(format!(
            "file_size is {} but the decoded file has {} bytes",
            payload.file_size,
            file_bytes.len()
        ))));
    }

    let request = ImportRequest {
        file_name: payload.file_name,
        file_bytes,
        collection_id: payload.collection_id,
        schema: payload.schema,
        folder_name: payload.folder_name,
    };

    let outcome = import_file(request, state.storage.as_ref(), &state.limits)
        .await
        .map_err(AppError::from_upload)?;

    Ok(Json(ImportResponse {
        message: "Import completed".to_string(),
        folder_id: outcome.folder_id,
        folder_name: outcome.folder_name,
        records_imported: outcome.records_imported,
    }))
}
