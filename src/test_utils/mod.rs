//! Test utilities for AgroData tests
//!
//! Storage doubles, a database helper and an HTTP client driving the router
//! in process.

use crate::storage::{StorageInstance, storage_factory::create_storage_from_connection_string};
use anyhow::{Context, Result};
use std::sync::Arc;

pub mod http;
pub mod memory;

pub use memory::{FlakyStorage, MemoryStorage};

/// In-memory SQLite, used unless `TEST_DATABASE_URL` says otherwise
const DEFAULT_TEST_DATABASE_URL: &str = "sqlite::memory:";

/// Get the test database connection string from environment or use in-memory SQLite
pub fn get_test_database_url() -> String {
    std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| DEFAULT_TEST_DATABASE_URL.to_string())
}

/// Test database with migrations applied and no leftover data
pub struct TestDb {
    pub storage: Arc<dyn StorageInstance>,
    connection_string: String,
}

impl TestDb {
    pub async fn new() -> Result<Self> {
        Self::with_connection_string(&get_test_database_url()).await
    }

    pub async fn with_connection_string(connection_string: &str) -> Result<Self> {
        let storage = create_storage_from_connection_string(connection_string)
            .await
            .with_context(|| format!("Failed to create storage for {}", connection_string))?;

        storage
            .create_or_migrate()
            .await
            .with_context(|| format!("Failed to run migrations for {}", connection_string))?;

        storage
            .cleanup_test_data()
            .await
            .with_context(|| format!("Failed to cleanup test data for {}", connection_string))?;

        Ok(Self {
            storage,
            connection_string: connection_string.to_string(),
        })
    }

    pub fn storage(&self) -> Arc<dyn StorageInstance> {
        self.storage.clone()
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }
}
