use crate::importers::ParseError;
use thiserror::Error;
use uuid::Uuid;

/// Failures of the analyze and import entry points.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("The uploaded file is empty")]
    EmptyUpload,

    #[error("File too large: {size} bytes, the limit is {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Schema does not match the file: {0}")]
    SchemaMismatch(String),

    #[error("Invalid upload payload: {0}")]
    InvalidPayload(String),

    #[error("Storage error: {0}")]
    Storage(#[source] anyhow::Error),

    #[error("Failed to insert batch {batch_index} into folder {folder_id}: {source}")]
    BatchInsert {
        folder_id: Uuid,
        batch_index: usize,
        records_inserted: usize,
        #[source]
        source: anyhow::Error,
    },
}

impl UploadError {
    /// True when the request itself is at fault rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            UploadError::Parse(_)
                | UploadError::EmptyUpload
                | UploadError::FileTooLarge { .. }
                | UploadError::SchemaMismatch(_)
                | UploadError::InvalidPayload(_)
        )
    }
}
