//! Database connection
//!
//! One SQLite pool holds both the upstream analytics tables (read-only to
//! this crate) and the narrative output table.

use crate::error::{ReportError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

/// Type alias for the database connection pool
pub type DatabasePool = SqlitePool;

/// Database connection wrapper
#[derive(Clone, Debug)]
pub struct Database {
    pub(crate) pool: Arc<DatabasePool>,
}

impl Database {
    /// Connect to a sqlx SQLite URL, creating the file if it is missing.
    ///
    /// In-memory URLs are pinned to a single long-lived connection so every
    /// query sees the same database.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| ReportError::Database(format!("Invalid database URL {}: {}", url, e)))?
            .create_if_missing(true);

        let in_memory = url.contains(":memory:");
        let mut pool_options = SqlitePoolOptions::new();
        pool_options = if in_memory {
            pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(max_connections.max(1))
        };

        debug!(url = %url, "Connecting to database");
        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| ReportError::Database(format!("Failed to connect to database: {}", e)))?;

        info!(url = %url, "Database connection established");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Private in-memory database, used by tests and dry runs
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:", 1).await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Perform a health check by running a simple query
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| ReportError::Database(format!("Health check failed: {}", e)))?;

        Ok(())
    }

    /// Close the database connection
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_in_memory_health_check() {
        let db = Database::in_memory().await.unwrap();
        assert!(db.health_check().await.is_ok());
        db.close().await;
    }

    #[tokio::test]
    async fn test_in_memory_state_survives_across_queries() {
        let db = Database::in_memory().await.unwrap();

        sqlx::query("CREATE TABLE t (x INTEGER)")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query("INSERT INTO t VALUES (1)")
            .execute(db.pool())
            .await
            .unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM t")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("narratives.db");
        let url = format!("sqlite:{}", path.display());

        let db = Database::connect(&url, 3).await.unwrap();
        assert!(db.health_check().await.is_ok());
        assert!(path.exists());
        db.close().await;
    }

    #[tokio::test]
    async fn test_invalid_url_is_a_database_error() {
        let err = Database::connect("postgres://nope", 1).await.unwrap_err();
        assert!(matches!(err, ReportError::Database(_)));
    }
}
