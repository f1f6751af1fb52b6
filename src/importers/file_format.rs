use super::ParseError;
use std::fmt;

/// Spreadsheet formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            "xlsx" => Some(FileFormat::Xlsx),
            "xls" => Some(FileFormat::Xls),
            _ => None,
        }
    }

    /// Format of a file, decided by the text after its last dot.
    ///
    /// A name without a dot is taken whole as its extension.
    pub fn from_file_name(file_name: &str) -> Result<Self, ParseError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, extension)| extension)
            .unwrap_or(file_name);
        Self::from_extension(extension).ok_or_else(|| ParseError::UnsupportedFormat {
            extension: extension.to_lowercase(),
        })
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileFormat::Csv => "csv",
            FileFormat::Xlsx => "xlsx",
            FileFormat::Xls => "xls",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_name() {
        assert_eq!(FileFormat::from_file_name("safra.csv"), Ok(FileFormat::Csv));
        assert_eq!(FileFormat::from_file_name("SAFRA.XLSX"), Ok(FileFormat::Xlsx));
        assert_eq!(
            FileFormat::from_file_name("safra.2024.xls"),
            Ok(FileFormat::Xls)
        );
        assert_eq!(
            FileFormat::from_file_name("safra.pdf"),
            Err(ParseError::UnsupportedFormat {
                extension: "pdf".to_string()
            })
        );
        assert_eq!(FileFormat::from_file_name("csv"), Ok(FileFormat::Csv));
        assert!(FileFormat::from_file_name("planilha").is_err());
        assert!(FileFormat::from_file_name("safra.").is_err());
    }
}
