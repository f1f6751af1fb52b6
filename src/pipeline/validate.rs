use super::UploadError;
use crate::{datamodel::ColumnSchema, importers::FileFormat};
use std::collections::HashSet;

/// Checks an upload before it is parsed: supported extension, not empty,
/// not above `max_file_size` bytes.
pub fn validate_upload(
    file_name: &str,
    file_size: u64,
    max_file_size: u64,
) -> Result<FileFormat, UploadError> {
    let format = FileFormat::from_file_name(file_name)?;
    if file_size > max_file_size {
        return Err(UploadError::FileTooLarge {
            size: file_size,
            max: max_file_size,
        });
    }
    if file_size == 0 {
        return Err(UploadError::EmptyUpload);
    }
    Ok(format)
}

/// Checks that a submitted schema still describes the headers of the file.
///
/// Positions must be unique and point at a header with the same original
/// name. Column names must be non-empty and unique.
pub fn validate_schema(schema: &[ColumnSchema], headers: &[String]) -> Result<(), UploadError> {
    if schema.is_empty() {
        return Err(UploadError::SchemaMismatch(
            "the schema has no columns".to_string(),
        ));
    }

    let mut positions = HashSet::with_capacity(schema.len());
    let mut names = HashSet::with_capacity(schema.len());
    for column in schema {
        let position = column.position();
        let Some(header) = headers.get(position) else {
            return Err(UploadError::SchemaMismatch(format!(
                "column '{}' points at position {} but the file has {} columns",
                column.name,
                position,
                headers.len()
            )));
        };
        if header != column.original_name() {
            return Err(UploadError::SchemaMismatch(format!(
                "column at position {} is '{}' in the file, not '{}'",
                position,
                header,
                column.original_name()
            )));
        }
        if !positions.insert(position) {
            return Err(UploadError::SchemaMismatch(format!(
                "position {} is used by more than one column",
                position
            )));
        }
        if column.name.trim().is_empty() {
            return Err(UploadError::SchemaMismatch(format!(
                "column at position {} has an empty name",
                position
            )));
        }
        if !names.insert(column.name.as_str()) {
            return Err(UploadError::SchemaMismatch(format!(
                "column name '{}' is used more than once",
                column.name
            )));
        }
    }
    Ok(())
}
