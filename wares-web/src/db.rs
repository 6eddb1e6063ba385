//! SQLite connection management and schema setup.

use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::{WebError, WebResult};

/// Shared database handle.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database and make sure the schema exists.
    pub async fn connect(database_url: &str) -> WebResult<Self> {
        let pool = if database_url.contains(":memory:") {
            // Each pooled connection to :memory: would get its own empty
            // database; pin a single connection that never expires.
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(database_url)
                .await
                .map_err(|e| WebError::Database(format!("Failed to connect: {e}")))?
        } else {
            let path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        WebError::Database(format!("Failed to create database directory: {e}"))
                    })?;
                }
            }

            let options = SqliteConnectOptions::from_str(&format!("sqlite:{path}"))
                .map_err(|e| WebError::Database(format!("Invalid database URL: {e}")))?
                .create_if_missing(true);

            SqlitePool::connect_with(options)
                .await
                .map_err(|e| WebError::Database(format!("Failed to connect: {e}")))?
        };

        let db = Self { pool };
        db.create_tables().await?;
        info!("Database ready at {}", database_url);
        Ok(db)
    }

    /// Create tables if they don't exist
    async fn create_tables(&self) -> WebResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);

            CREATE TABLE IF NOT EXISTS products (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                price_cents INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| WebError::Database(format!("Failed to create tables: {e}")))?;

        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_connects() {
        let db = Database::connect("sqlite::memory:").await.unwrap();

        // Schema must be visible on the pinned connection.
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(row.0, 0);
    }
}
