use thiserror::Error;
use uuid::Uuid;

/// Storage-specific errors that can occur during database operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection or query execution error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The folder does not exist
    #[error("Folder not found: {folder_id}")]
    FolderNotFound { folder_id: Uuid },

    /// Invalid data format in database
    #[error("Invalid data format: {message} for folder {folder_context}")]
    InvalidDataFormat {
        message: String,
        folder_context: String,
    },

    /// Record data could not be serialized for storage
    #[error("Failed to serialize record {row_number}: {source}")]
    Serialization {
        row_number: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Create an invalid data format error with folder context
    pub fn invalid_data_format(message: &str, folder_id: Option<&str>) -> Self {
        StorageError::InvalidDataFormat {
            message: message.to_string(),
            folder_context: folder_id.unwrap_or("unknown folder").to_string(),
        }
    }

    /// True when the error comes from a folder that does not exist.
    pub fn is_not_found(error: &anyhow::Error) -> bool {
        matches!(
            error.downcast_ref::<StorageError>(),
            Some(StorageError::FolderNotFound { .. })
        )
    }
}
