pub mod analyze;
pub mod error;
pub mod import;
pub mod validate;

pub use analyze::analyze_file;
pub use error::UploadError;
pub use import::{ImportOutcome, ImportRequest, import_file};
pub use validate::{validate_schema, validate_upload};

pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Limits applied to uploads, usually taken from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    /// Largest accepted file, in bytes.
    pub max_file_size: u64,
    /// Records written per storage transaction.
    pub batch_size: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}
