use super::{ColumnType, RawCell};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Declaration of one column of an uploaded dataset.
///
/// `original_name` and `position` anchor the column back to the raw file
/// and cannot be changed once the detector created the column. The other
/// fields are user-editable before import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSchema {
    pub name: String,
    original_name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub required: bool,
    position: usize,
    #[serde(default, alias = "sample_values")]
    #[schema(value_type = Object)]
    pub sample_values: Vec<RawCell>,
}

impl ColumnSchema {
    pub fn new(
        name: String,
        original_name: String,
        column_type: ColumnType,
        required: bool,
        position: usize,
        sample_values: Vec<RawCell>,
    ) -> Self {
        Self {
            name,
            original_name,
            column_type,
            required,
            position,
            sample_values,
        }
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

/// A row of the preview, keyed by sanitized column name.
pub type SampleRow = BTreeMap<String, RawCell>;

/// Result of analysing an uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetectedSchema {
    pub columns: Vec<ColumnSchema>,
    pub total_rows: usize,
    #[schema(value_type = Object)]
    pub sample_data: Vec<SampleRow>,
    pub file_name: String,
    pub file_size: u64,
}
