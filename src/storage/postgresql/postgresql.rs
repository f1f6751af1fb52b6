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
use sqlx::postgres::{PgConnectOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, prelude::*};
use std::str::FromStr;
use uuid::Uuid;

const FOLDER_COLUMNS: &str =
    "id, collection_id, name, file_name, file_size, schema, records_count, status";

// PostgreSQL binds at most 65535 parameters per statement
const MAX_RECORDS_PER_STATEMENT: usize = 16_000;

#[derive(Debug)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    pub async fn connect(connection_string: &str) -> Result<Self> {
        let connect_options = PgConnectOptions::from_str(connection_string)
            .context("Failed to create postgres connection options")?;

        let pool = PgPool::connect_with(connect_options)
            .await
            .context("Failed to create postgres pool")?;

        Ok(Self { pool })
    }
}

fn folder_from_row(row: &PgRow) -> Result<Folder> {
    let id: Uuid = row.try_get("id")?;
    let folder_context = id.to_string();
    let Json(schema): Json<Vec<ColumnSchema>> = row.try_get("schema")?;
    let status: String = row.try_get("status")?;
    let file_size: i64 = row.try_get("file_size")?;
    let records_count: i64 = row.try_get("records_count")?;

    Ok(Folder {
        id,
        collection_id: row.try_get("collection_id")?,
        name: row.try_get("name")?,
        file_name: row.try_get("file_name")?,
        file_size: from_database_count(file_size, &folder_context)?,
        schema,
        records_count: from_database_count(records_count, &folder_context)?,
        status: parse_folder_status(&status, &folder_context)?,
    })
}

#[async_trait]
impl StorageInstance for PostgresStorage {
    async fn create_or_migrate(&self) -> Result<()> {
        sqlx::migrate!("src/storage/postgresql/migrations")
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
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(folder.id)
        .bind(folder.collection_id)
        .bind(&folder.name)
        .bind(&folder.file_name)
        .bind(to_database_count(folder.file_size)?)
        .bind(Json(schema))
        .bind(to_database_count(folder.records_count)?)
        .bind(folder.status.to_string())
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        Ok(folder)
    }

    async fn insert_batch(&self, batch: &RecordBatch) -> Result<()> {
        let mut rows = Vec::with_capacity(batch.len());
        for record in batch.records.iter() {
            rows.push((record.row_number as i64, record_data_to_json(record)?));
        }

        let mut transaction = self.pool.begin().await.map_err(StorageError::from)?;
        for chunk in rows.chunks(MAX_RECORDS_PER_STATEMENT) {
            let mut query_builder = QueryBuilder::<Postgres>::new(
                "INSERT INTO data_records (folder_id, row_number, data) ",
            );
            query_builder.push_values(chunk, |mut builder, (row_number, data)| {
                builder
                    .push_bind(batch.folder_id)
                    .push_bind(*row_number)
                    .push_bind(Json(data));
            });
            query_builder
                .build()
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
            SET status = $1,
                records_count = COALESCE($2, records_count),
                updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(status.to_string())
        .bind(records_count)
        .bind(folder_id)
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
            "SELECT {} FROM folders WHERE id = $1",
            FOLDER_COLUMNS
        ))
        .bind(folder_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::from)?;

        row.as_ref().map(folder_from_row).transpose()
    }

    async fn list_folders(&self, collection_id: Uuid) -> Result<Vec<Folder>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM folders WHERE collection_id = $1 ORDER BY created_at DESC, id",
            FOLDER_COLUMNS
        ))
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from)?;

        rows.iter().map(folder_from_row).collect()
    }

    async fn count_records(&self, folder_id: Uuid) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM data_records WHERE folder_id = $1")
                .bind(folder_id)
                .fetch_one(&self.pool)
                .await
                .map_err(StorageError::from)?;
        from_database_count(count, &folder_id.to_string())
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("PostgreSQL health check failed")?;
        Ok(())
    }

    #[cfg(any(test, feature = "test-utils"))]
    async fn cleanup_test_data(&self) -> Result<()> {
        sqlx::query("TRUNCATE data_records, folders")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
