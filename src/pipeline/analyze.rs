use super::{UploadError, validate::validate_upload};
use crate::{datamodel::DetectedSchema, importers::parse_file, infer::detect_table_schema};
use tracing::{info, instrument};

/// Validates, parses and analyses an uploaded file.
///
/// Nothing is stored: the caller gets the detected schema and sample rows
/// to review before importing.
#[instrument(skip(bytes), fields(file_size = bytes.len()))]
pub async fn analyze_file(
    file_name: &str,
    bytes: &[u8],
    max_file_size: u64,
) -> Result<DetectedSchema, UploadError> {
    let file_size = bytes.len() as u64;
    validate_upload(file_name, file_size, max_file_size)?;

    let table = parse_file(file_name, bytes).await?;
    let schema = detect_table_schema(&table, file_name, file_size);

    info!(
        columns = schema.columns.len(),
        rows = schema.total_rows,
        "Analyzed file"
    );
    Ok(schema)
}
