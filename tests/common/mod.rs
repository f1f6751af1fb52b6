#![allow(dead_code)]

use agrodata::datamodel::DetectedSchema;
use agrodata::pipeline::{DEFAULT_MAX_FILE_SIZE, ImportRequest, analyze_file};
use anyhow::Result;
use uuid::Uuid;

pub mod fixtures;

pub use agrodata::test_utils::http::{TestApp, TestResponse};
pub use agrodata::test_utils::{FlakyStorage, MemoryStorage, TestDb};

/// Analyzes a file and builds the import request a user accepting the
/// detected schema unchanged would send.
pub async fn accept_detected_schema(
    file_name: &str,
    bytes: &[u8],
    collection_id: Uuid,
) -> Result<(DetectedSchema, ImportRequest)> {
    let detected = analyze_file(file_name, bytes, DEFAULT_MAX_FILE_SIZE).await?;
    let request = ImportRequest {
        file_name: file_name.to_string(),
        file_bytes: bytes.to_vec(),
        collection_id,
        schema: detected.columns.clone(),
        folder_name: None,
    };
    Ok((detected, request))
}
