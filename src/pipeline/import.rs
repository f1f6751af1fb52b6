use super::{
    UploadError, UploadLimits,
    validate::{validate_schema, validate_upload},
};
use crate::{
    coercion::coerce_rows,
    datamodel::{ColumnSchema, FolderStatus, NewFolder, batch::into_batches},
    importers::parse_file,
    storage::StorageInstance,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// A confirmed import: the file again, the reviewed schema and where to put it.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub file_name: String,
    pub file_bytes: Vec<u8>,
    pub collection_id: Uuid,
    pub schema: Vec<ColumnSchema>,
    pub folder_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ImportOutcome {
    pub folder_id: Uuid,
    pub folder_name: String,
    pub records_imported: usize,
}

/// Label of the destination folder: the requested name, or the file name
/// without its extension.
pub fn folder_label(folder_name: Option<&str>, file_name: &str) -> String {
    if let Some(name) = folder_name.map(str::trim).filter(|name| !name.is_empty()) {
        return name.to_string();
    }
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.trim().is_empty() => stem.to_string(),
        _ => file_name.to_string(),
    }
}

/// Imports a file into a new folder of a collection.
///
/// The file is parsed again from scratch and the schema is checked against
/// its headers. Records are written in batches, each batch atomically. When
/// a batch fails the folder is marked `error` and the import stops, the
/// batches written before it stay in place.
#[instrument(
    skip(request, storage, limits),
    fields(file_name = %request.file_name, collection_id = %request.collection_id)
)]
pub async fn import_file(
    request: ImportRequest,
    storage: &dyn StorageInstance,
    limits: &UploadLimits,
) -> Result<ImportOutcome, UploadError> {
    let file_size = request.file_bytes.len() as u64;
    validate_upload(&request.file_name, file_size, limits.max_file_size)?;

    let table = parse_file(&request.file_name, &request.file_bytes).await?;
    validate_schema(&request.schema, &table.headers)?;
    let records = coerce_rows(&table.rows, &request.schema);

    let folder_name = folder_label(request.folder_name.as_deref(), &request.file_name);
    let folder = storage
        .create_folder(NewFolder {
            collection_id: request.collection_id,
            name: folder_name.clone(),
            file_name: request.file_name.clone(),
            file_size,
            schema: request.schema,
        })
        .await
        .map_err(UploadError::Storage)?;
    info!(folder_id = %folder.id, records = records.len(), "Importing records");

    let mut records_inserted = 0;
    for (batch_index, batch) in into_batches(folder.id, records, limits.batch_size)
        .into_iter()
        .enumerate()
    {
        if let Err(source) = storage.insert_batch(&batch).await {
            warn!(
                folder_id = %folder.id,
                batch_index,
                records_inserted,
                "Batch insert failed: {:#}",
                source
            );
            mark_folder_failed(storage, folder.id, records_inserted).await;
            return Err(UploadError::BatchInsert {
                folder_id: folder.id,
                batch_index,
                records_inserted,
                source,
            });
        }
        records_inserted += batch.len();
        debug!(batch_index, records_inserted, "Batch inserted");
    }

    if let Err(source) = storage
        .update_folder_status(
            folder.id,
            FolderStatus::Active,
            Some(records_inserted as u64),
        )
        .await
    {
        warn!(folder_id = %folder.id, "Failed to activate folder: {:#}", source);
        mark_folder_failed(storage, folder.id, records_inserted).await;
        return Err(UploadError::Storage(source));
    }
    info!(folder_id = %folder.id, records_inserted, "Import complete");

    Ok(ImportOutcome {
        folder_id: folder.id,
        folder_name,
        records_imported: records_inserted,
    })
}

/// Leaves the folder visibly in error with the records already committed.
async fn mark_folder_failed(
    storage: &dyn StorageInstance,
    folder_id: Uuid,
    records_inserted: usize,
) {
    if let Err(status_error) = storage
        .update_folder_status(
            folder_id,
            FolderStatus::Error,
            Some(records_inserted as u64),
        )
        .await
    {
        warn!(%folder_id, "Failed to mark folder as error: {:#}", status_error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_label() {
        assert_eq!(folder_label(Some("Safra 2025"), "a.csv"), "Safra 2025");
        assert_eq!(folder_label(Some("  "), "colheita.xlsx"), "colheita");
        assert_eq!(folder_label(None, "safra.2025.csv"), "safra.2025");
        assert_eq!(folder_label(None, ".csv"), ".csv");
        assert_eq!(folder_label(None, "csv"), "csv");
    }
}
