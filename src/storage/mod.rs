//! Storage implementations.
//!
//! SQLite is the entity store. Tables are created on startup; multi-row
//! units of work go through [`sqlite::begin_immediate`] and [`sqlite::finish`].

use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::config::StorageConfig;

pub mod helpers;
pub mod schema;
pub mod sqlite;

pub use sqlite::{SqliteOrderItemStore, SqliteOrderStore, SqliteProductStore};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt value in {table}.{column}: {reason}")]
    Corrupt {
        table: &'static str,
        column: &'static str,
        reason: String,
    },
}

/// Open the configured database and make sure the schema exists.
pub async fn init_storage(config: &StorageConfig) -> Result<SqlitePool> {
    info!(path = %config.path, "storage: sqlite");

    let busy_timeout = Duration::from_secs(config.busy_timeout_secs);

    let pool = if config.is_in_memory() {
        // A private in-memory database lives exactly as long as its one
        // connection, so that connection must never be recycled.
        let opts = SqliteConnectOptions::new()
            .filename(&config.path)
            .foreign_keys(true)
            .busy_timeout(busy_timeout)
            .create_if_missing(true);
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?
    } else {
        if let Some(parent) = std::path::Path::new(&config.path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let opts = SqliteConnectOptions::new()
            .filename(&config.path)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(busy_timeout)
            .create_if_missing(true);
        SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(opts)
            .await?
    };

    init_schema(&pool).await?;
    Ok(pool)
}

/// Create tables and indexes if they do not exist yet.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    for statement in schema::CREATE_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
