use crate::datamodel::{ColumnSchema, Folder, FolderStatus, NewFolder, RecordBatch};
use crate::storage::{
    StorageError, StorageInstance,
    common::{
        from_database_count, parse_folder_status, record_data_to_json, schema_to_json,
        to_database_count,
    },
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{SqlitePool, prelude::*};
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

const FOLDER_COLUMNS: &str =
    "id, collection_id, name, file_name, file_size, schema, records_count, status";

// SQLite implementation
#[derive(Debug)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    pub async fn connect(connection_string: &str) -> Result<Self> {
        let connect_options = SqliteConnectOptions::from_str(connection_string)
            .context("Failed to create sqlite connection options")?
            // Create the database file if it doesn't exist
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        // Every connection to an in-memory database opens a new empty one
        let pool_options = if connection_string.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .context("Failed to create sqlite pool")?;

        Ok(Self { pool })
    }
}

fn folder_from_row(row: &SqliteRow) -> Result<Folder> {
    let id: String = row.try_get("id")?;
    let collection_id: String = row.try_get("collection_id")?;
    let schema: String = row.try_get("schema")?;
    let status: String = row.try_get("status")?;
    let file_size: i64 = row.try_get("file_size")?;
    let records_count: i64 = row.try_get("records_count")?;

    let schema: Vec<ColumnSchema> = serde_json::from_str(&schema)
        .map_err(|err| StorageError::invalid_data_format(&err.to_string(), Some(&id)))?;

    Ok(Folder {
        id: Uuid::parse_str(&id).context("Failed to parse folder UUID")?,
        collection_id: Uuid::parse_str(&collection_id)
            .context("Failed to parse collection UUID")?,
        name: row.try_get("name")?,
        file_name: row.try_get("file_name")?,
        file_size: from_database_count(file_size, &id)?,
        schema,
        records_count: from_database_count(records_count, &id)?,
        status: parse_folder_status(&status, &id)?,
    })
}

#[async_trait]
impl StorageInstance for SqliteStorage {
    async fn create_or_migrate(&self) -> Result<()> {
        sqlx::migrate!("src/storage/sqlite/migrations")
            .run(&self.pool)
            .await
            .context("Failed to migrate database")?;

        Ok(())
    }

    async fn create_folder(&self, new_folder: NewFolder) -> Result<Folder> {
        let folder = Folder::from_new(Uuid::new_v4(), new_folder);
        let schema = schema_to_json(&folder.schema)?;

        sqlx::query(
            r#"
            INSERT INTO folders (id, collection_id, name, file_name, file_size, schema, records_count, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(folder.id.to_string())
        .bind(folder.collection_id.to_string())
        .bind(&folder.name)
        .bind(&folder.file_name)
        .bind(to_database_count(folder.file_size)?)
        .bind(schema.to_string())
        .bind(to_database_count(folder.records_count)?)
        .bind(folder.status.to_string())
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        Ok(folder)
    }

    async fn insert_batch(&self, batch: &RecordBatch) -> Result<()> {
        let folder_id = batch.folder_id.to_string();
        let mut transaction = self.pool.begin().await.map_err(StorageError::from)?;
        for record in batch.records.iter() {
            let data = record_data_to_json(record)?;
            let query = sqlx::query(
                r#"
                INSERT INTO data_records (folder_id, row_number, data)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(&folder_id)
            .bind(record.row_number as i64)
            .bind(data.to_string());
            query
                .execute(&mut *transaction)
                .await
                .map_err(StorageError::from)?;
        }
        transaction.commit().await.map_err(StorageError::from)?;
        Ok(())
    }

    async fn update_folder_status(
        &self,
        folder_id: Uuid,
        status: FolderStatus,
        records_count: Option<u64>,
    ) -> Result<()> {
        let records_count = records_count.map(to_database_count).transpose()?;
        let result = sqlx::query(
            r#"
            UPDATE folders
            SET status = ?,
                records_count = COALESCE(?, records_count),
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
            WHERE id = ?
            "#,
        )
        .bind(status.to_string())
        .bind(records_count)
        .bind(folder_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::FolderNotFound { folder_id }.into());
        }
        Ok(())
    }

    async fn get_folder(&self, folder_id: Uuid) -> Result<Option<Folder>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM folders WHERE id = ?",
            FOLDER_COLUMNS
        ))
        .bind(folder_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::from)?;

        row.as_ref().map(folder_from_row).transpose()
    }

    async fn list_folders(&self, collection_id: Uuid) -> Result<Vec<Folder>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM folders WHERE collection_id = ? ORDER BY created_at DESC, rowid DESC",
            FOLDER_COLUMNS
        ))
        .bind(collection_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from)?;

        rows.iter().map(folder_from_row).collect()
    }

    async fn count_records(&self, folder_id: Uuid) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM data_records WHERE folder_id = ?")
            .bind(folder_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;
        from_database_count(count, &folder_id.to_string())
    }

    /// Health check for SQLite storage
    /// Executes a simple SELECT 1 query to verify database connectivity
    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("SQLite health check failed")?;
        Ok(())
    }

    #[cfg(any(test, feature = "test-utils"))]
    async fn cleanup_test_data(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM data_records")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM folders").execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }
}
