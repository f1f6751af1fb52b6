use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Date,
    Boolean,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnType::Text => "text",
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::Boolean => "boolean",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_type_to_string() {
        assert_eq!(ColumnType::Text.to_string(), "text");
        assert_eq!(ColumnType::Number.to_string(), "number");
        assert_eq!(ColumnType::Date.to_string(), "date");
        assert_eq!(ColumnType::Boolean.to_string(), "boolean");
    }

    #[test]
    fn test_column_type_serde() {
        assert_eq!(
            serde_json::to_string(&ColumnType::Date).unwrap(),
            "\"date\""
        );
        let parsed: ColumnType = serde_json::from_str("\"text\"").unwrap();
        assert_eq!(parsed, ColumnType::Text);
    }
}
