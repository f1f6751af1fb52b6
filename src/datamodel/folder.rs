use super::ColumnSchema;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle of a destination folder during and after an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FolderStatus {
    Processing,
    Active,
    Error,
}

impl fmt::Display for FolderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FolderStatus::Processing => "processing",
            FolderStatus::Active => "active",
            FolderStatus::Error => "error",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for FolderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "processing" => Ok(FolderStatus::Processing),
            "active" => Ok(FolderStatus::Active),
            "error" => Ok(FolderStatus::Error),
            _ => Err(format!("Unknown folder status: {}", s)),
        }
    }
}

/// Folder to be created in a collection before its records are written.
#[derive(Debug, Clone)]
pub struct NewFolder {
    pub collection_id: Uuid,
    pub name: String,
    pub file_name: String,
    pub file_size: u64,
    pub schema: Vec<ColumnSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Folder {
    pub id: Uuid,
    pub collection_id: Uuid,
    pub name: String,
    pub file_name: String,
    pub file_size: u64,
    pub schema: Vec<ColumnSchema>,
    pub records_count: u64,
    pub status: FolderStatus,
}

impl Folder {
    pub fn from_new(id: Uuid, new_folder: NewFolder) -> Self {
        Self {
            id,
            collection_id: new_folder.collection_id,
            name: new_folder.name,
            file_name: new_folder.file_name,
            file_size: new_folder.file_size,
            schema: new_folder.schema,
            records_count: 0,
            status: FolderStatus::Processing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_status_round_trip_names() {
        for status in [
            FolderStatus::Processing,
            FolderStatus::Active,
            FolderStatus::Error,
        ] {
            assert_eq!(FolderStatus::from_str(&status.to_string()), Ok(status));
        }
        assert!(FolderStatus::from_str("archived").is_err());
    }

    #[test]
    fn test_new_folder_starts_processing() {
        let id = Uuid::new_v4();
        let folder = Folder::from_new(
            id,
            NewFolder {
                collection_id: Uuid::nil(),
                name: "safra".to_string(),
                file_name: "safra.csv".to_string(),
                file_size: 12,
                schema: vec![],
            },
        );
        assert_eq!(folder.id, id);
        assert_eq!(folder.status, FolderStatus::Processing);
        assert_eq!(folder.records_count, 0);
    }
}
