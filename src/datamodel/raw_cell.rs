use serde::{Deserialize, Serialize};
use std::{borrow::Cow, fmt};

/// A cell value exactly as it was read from the uploaded file.
///
/// CSV cells are always `Text`, spreadsheet cells keep their native
/// kind. Dates read from a workbook are rendered as ISO 8601 text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawCell {
    /// A cell is blank when it is null or only contains whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Null => true,
            RawCell::Text(text) => text.trim().is_empty(),
            RawCell::Bool(_) | RawCell::Number(_) => false,
        }
    }

    /// String form of the cell, as it would be displayed to a user.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            RawCell::Text(text) => Cow::Borrowed(text.as_str()),
            other => Cow::Owned(other.to_string()),
        }
    }
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCell::Null => Ok(()),
            RawCell::Bool(value) => write!(f, "{}", value),
            // Integral floats are printed without a trailing ".0"
            RawCell::Number(value) => write!(f, "{}", value),
            RawCell::Text(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        RawCell::Text(value.to_string())
    }
}

impl From<String> for RawCell {
    fn from(value: String) -> Self {
        RawCell::Text(value)
    }
}

impl From<f64> for RawCell {
    fn from(value: f64) -> Self {
        RawCell::Number(value)
    }
}

impl From<bool> for RawCell {
    fn from(value: bool) -> Self {
        RawCell::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(RawCell::Null.is_blank());
        assert!(RawCell::from("").is_blank());
        assert!(RawCell::from("  \t ").is_blank());
        assert!(!RawCell::from(" a ").is_blank());
        assert!(!RawCell::Number(0.0).is_blank());
        assert!(!RawCell::Bool(false).is_blank());
    }

    #[test]
    fn test_as_text() {
        assert_eq!(RawCell::Number(150.0).as_text(), "150");
        assert_eq!(RawCell::Number(1.5).as_text(), "1.5");
        assert_eq!(RawCell::Number(-3.0).as_text(), "-3");
        assert_eq!(RawCell::Bool(true).as_text(), "true");
        assert_eq!(RawCell::Null.as_text(), "");
        assert_eq!(RawCell::from(" Alface ").as_text(), " Alface ");
    }

    #[test]
    fn test_json_shape() {
        let cells = vec![
            RawCell::Null,
            RawCell::Bool(true),
            RawCell::Number(42.5),
            RawCell::from("abc"),
        ];
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, r#"[null,true,42.5,"abc"]"#);

        let parsed: Vec<RawCell> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cells);
    }
}
