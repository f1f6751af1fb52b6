use super::app_error::AppError;
use super::state::HttpServerState;
use crate::datamodel::Folder;
use crate::storage::StorageError;
use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

/// Get a folder
///
/// Returns the folder with its import status and record count.
#[utoipa::path(
    get,
    path = "/api/folders/{folder_id}",
    tag = "Folders",
    params(
        ("folder_id" = Uuid, Path, description = "Folder identifier")
    ),
    responses(
        (status = 200, description = "Folder", body = Folder),
        (status = 404, description = "Not Found", body = AppError),
        (status = 500, description = "Internal Server Error", body = AppError),
    )
)]
pub async fn get_folder(
    State(state): State<HttpServerState>,
    Path(folder_id): Path<Uuid>,
) -> Result<Json<Folder>, AppError> {
    match state.storage.get_folder(folder_id).await? {
        Some(folder) => Ok(Json(folder)),
        None => Err(AppError::not_found(StorageError::FolderNotFound {
            folder_id,
        })),
    }
}

/// List the folders of a collection
///
/// Newest first.
#[utoipa::path(
    get,
    path = "/api/collections/{collection_id}/folders",
    tag = "Folders",
    params(
        ("collection_id" = Uuid, Path, description = "Collection identifier")
    ),
    responses(
        (status = 200, description = "Folders of the collection", body = Vec<Folder>),
        (status = 500, description = "Internal Server Error", body = AppError),
    )
)]
pub async fn list_collection_folders(
    State(state): State<HttpServerState>,
    Path(collection_id): Path<Uuid>,
) -> Result<Json<Vec<Folder>>, AppError> {
    let folders = state.storage.list_folders(collection_id).await?;
    Ok(Json(folders))
}
