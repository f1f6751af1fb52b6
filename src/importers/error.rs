use thiserror::Error;

/// Errors raised while turning an uploaded file into a raw table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unsupported file format '{extension}', use .xlsx, .xls or .csv")]
    UnsupportedFormat { extension: String },

    #[error("The file is empty")]
    EmptyFile,

    #[error("No header row could be found in the file")]
    EmptySource,

    #[error("Failed to read {format} file: {message}")]
    ParseFailure { format: String, message: String },
}

impl ParseError {
    pub fn failure(format: impl Into<String>, message: impl ToString) -> Self {
        ParseError::ParseFailure {
            format: format.into(),
            message: message.to_string(),
        }
    }
}
