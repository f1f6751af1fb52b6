use serde::Serialize;
use std::collections::BTreeMap;

/// A cell converted to the type declared by its column.
///
/// Dates are kept as normalized ISO 8601 UTC timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    Null,
    Boolean(bool),
    Number(f64),
    Date(String),
    Text(String),
}

impl TypedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedRecord {
    pub data: BTreeMap<String, TypedValue>,
    /// 1-based position among the rows that survived the import filters.
    pub row_number: usize,
}

impl TypedRecord {
    pub fn is_empty(&self) -> bool {
        self.data.values().all(TypedValue::is_null)
    }
}
