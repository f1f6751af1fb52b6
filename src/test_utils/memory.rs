use crate::datamodel::{Folder, FolderStatus, NewFolder, RecordBatch, TypedRecord};
use crate::storage::{StorageError, StorageInstance};
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Debug, Default)]
struct MemoryState {
    // Creation order
    folders: Vec<Folder>,
    records: HashMap<Uuid, Vec<TypedRecord>>,
}

/// Storage kept in process memory, for tests that do not need a database.
#[derive(Debug)]
pub struct MemoryStorage {
    state: Mutex<MemoryState>,
    healthy: AtomicBool,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            healthy: AtomicBool::new(true),
        }
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next health checks fail, or succeed again.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Records stored for a folder, in insertion order.
    pub fn records(&self, folder_id: Uuid) -> Result<Vec<TypedRecord>> {
        Ok(self
            .state()?
            .records
            .get(&folder_id)
            .cloned()
            .unwrap_or_default())
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("Memory storage lock poisoned"))
    }
}

#[async_trait]
impl StorageInstance for MemoryStorage {
    async fn create_or_migrate(&self) -> Result<()> {
        Ok(())
    }

    async fn create_folder(&self, new_folder: NewFolder) -> Result<Folder> {
        let folder = Folder::from_new(Uuid::new_v4(), new_folder);
        self.state()?.folders.push(folder.clone());
        Ok(folder)
    }

    async fn insert_batch(&self, batch: &RecordBatch) -> Result<()> {
        let mut state = self.state()?;
        if !state.folders.iter().any(|folder| folder.id == batch.folder_id) {
            return Err(StorageError::FolderNotFound {
                folder_id: batch.folder_id,
            }
            .into());
        }
        state
            .records
            .entry(batch.folder_id)
            .or_default()
            .extend(batch.records.iter().cloned());
        Ok(())
    }

    async fn update_folder_status(
        &self,
        folder_id: Uuid,
        status: FolderStatus,
        records_count: Option<u64>,
    ) -> Result<()> {
        let mut state = self.state()?;
        let folder = state
            .folders
            .iter_mut()
            .find(|folder| folder.id == folder_id)
            .ok_or(StorageError::FolderNotFound { folder_id })?;
        folder.status = status;
        if let Some(records_count) = records_count {
            folder.records_count = records_count;
        }
        Ok(())
    }

    async fn get_folder(&self, folder_id: Uuid) -> Result<Option<Folder>> {
        Ok(self
            .state()?
            .folders
            .iter()
            .find(|folder| folder.id == folder_id)
            .cloned())
    }

    async fn list_folders(&self, collection_id: Uuid) -> Result<Vec<Folder>> {
        Ok(self
            .state()?
            .folders
            .iter()
            .rev()
            .filter(|folder| folder.collection_id == collection_id)
            .cloned()
            .collect())
    }

    async fn count_records(&self, folder_id: Uuid) -> Result<u64> {
        Ok(self
            .state()?
            .records
            .get(&folder_id)
            .map_or(0, |records| records.len() as u64))
    }

    async fn health_check(&self) -> Result<()> {
        if !self.healthy.load(Ordering::SeqCst) {
            bail!("Memory storage is marked unhealthy");
        }
        Ok(())
    }

    async fn cleanup_test_data(&self) -> Result<()> {
        let mut state = self.state()?;
        state.folders.clear();
        state.records.clear();
        Ok(())
    }
}

/// Memory storage whose batch insert fails on one given call.
///
/// `fail_on_batch` is the 0-based index of the failing `insert_batch` call.
/// The failing batch stores nothing, like a rolled back transaction.
#[derive(Debug)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    fail_on_batch: Option<usize>,
    fail_on_activation: bool,
    batch_calls: AtomicUsize,
}

impl FlakyStorage {
    pub fn new(fail_on_batch: usize) -> Self {
        Self {
            inner: MemoryStorage::new(),
            fail_on_batch: Some(fail_on_batch),
            fail_on_activation: false,
            batch_calls: AtomicUsize::new(0),
        }
    }

    /// Stores every batch but refuses to mark a folder as active.
    pub fn failing_activation() -> Self {
        Self {
            inner: MemoryStorage::new(),
            fail_on_batch: None,
            fail_on_activation: true,
            batch_calls: AtomicUsize::new(0),
        }
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageInstance for FlakyStorage {
    async fn create_or_migrate(&self) -> Result<()> {
        self.inner.create_or_migrate().await
    }

    async fn create_folder(&self, new_folder: NewFolder) -> Result<Folder> {
        self.inner.create_folder(new_folder).await
    }

    async fn insert_batch(&self, batch: &RecordBatch) -> Result<()> {
        let call = self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if Some(call) == self.fail_on_batch {
            bail!("Simulated failure on batch {}", call);
        }
        self.inner.insert_batch(batch).await
    }

    async fn update_folder_status(
        &self,
        folder_id: Uuid,
        status: FolderStatus,
        records_count: Option<u64>,
    ) -> Result<()> {
        if self.fail_on_activation && status == FolderStatus::Active {
            bail!("Simulated failure activating folder {}", folder_id);
        }
        self.inner
            .update_folder_status(folder_id, status, records_count)
            .await
    }

    async fn get_folder(&self, folder_id: Uuid) -> Result<Option<Folder>> {
        self.inner.get_folder(folder_id).await
    }

    async fn list_folders(&self, collection_id: Uuid) -> Result<Vec<Folder>> {
        self.inner.list_folders(collection_id).await
    }

    async fn count_records(&self, folder_id: Uuid) -> Result<u64> {
        self.inner.count_records(folder_id).await
    }

    async fn health_check(&self) -> Result<()> {
        self.inner.health_check().await
    }

    async fn cleanup_test_data(&self) -> Result<()> {
        self.batch_calls.store(0, Ordering::SeqCst);
        self.inner.cleanup_test_data().await
    }
}
