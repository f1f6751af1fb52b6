use crate::datamodel::{Folder, FolderStatus, NewFolder, RecordBatch};
use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;
use uuid::Uuid;

#[async_trait]
pub trait StorageInstance: Send + Sync + Debug {
    async fn create_or_migrate(&self) -> Result<()>;

    /// Creates a folder in the `processing` state.
    async fn create_folder(&self, folder: NewFolder) -> Result<Folder>;

    /// Inserts every record of the batch in a single transaction.
    ///
    /// Either the whole batch is stored or none of it is.
    async fn insert_batch(&self, batch: &RecordBatch) -> Result<()>;

    /// Sets the status of a folder, and its record count when given.
    async fn update_folder_status(
        &self,
        folder_id: Uuid,
        status: FolderStatus,
        records_count: Option<u64>,
    ) -> Result<()>;

    async fn get_folder(&self, folder_id: Uuid) -> Result<Option<Folder>>;

    /// Folders of a collection, newest first.
    async fn list_folders(&self, collection_id: Uuid) -> Result<Vec<Folder>>;

    async fn count_records(&self, folder_id: Uuid) -> Result<u64>;

    /// Health check for the storage backend
    async fn health_check(&self) -> Result<()>;

    /// Removes every folder and record, keeping the schema
    #[cfg(any(test, feature = "test-utils"))]
    async fn cleanup_test_data(&self) -> Result<()>;
}
