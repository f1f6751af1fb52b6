use super::StorageError;
use crate::datamodel::{ColumnSchema, FolderStatus, TypedRecord};
use anyhow::{Context, Result};
use std::str::FromStr;

/// Serializes the data of a record as the JSON document stored in `data_records`.
pub fn record_data_to_json(record: &TypedRecord) -> Result<serde_json::Value, StorageError> {
    serde_json::to_value(&record.data).map_err(|source| StorageError::Serialization {
        row_number: record.row_number,
        source,
    })
}

pub fn schema_to_json(schema: &[ColumnSchema]) -> Result<serde_json::Value> {
    serde_json::to_value(schema).context("Failed to serialize folder schema")
}

pub fn parse_folder_status(status: &str, folder_id: &str) -> Result<FolderStatus> {
    FolderStatus::from_str(status)
        .map_err(|message| StorageError::invalid_data_format(&message, Some(folder_id)).into())
}

pub fn to_database_count(value: u64) -> Result<i64> {
    i64::try_from(value).context("Value too large for the database")
}

pub fn from_database_count(value: i64, folder_id: &str) -> Result<u64> {
    u64::try_from(value).map_err(|_| {
        StorageError::invalid_data_format(&format!("negative count {}", value), Some(folder_id))
            .into()
    })
}
