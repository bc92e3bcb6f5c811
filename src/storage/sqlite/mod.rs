//! SQLite implementations of the entity stores.

use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

use super::{Result, StorageError};

mod order_item_store;
mod order_store;
mod product_store;

pub use order_item_store::SqliteOrderItemStore;
pub use order_store::SqliteOrderStore;
pub use product_store::SqliteProductStore;

/// Acquire a connection and open a write transaction on it.
///
/// BEGIN IMMEDIATE acquires the write lock upfront, so a read-check-write
/// sequence inside the transaction cannot interleave with another writer.
pub async fn begin_immediate(pool: &SqlitePool) -> Result<PoolConnection<Sqlite>> {
    let mut conn = pool.acquire().await?;
    sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
    Ok(conn)
}

/// Commit on `Ok`, roll back on `Err`, and hand the result back.
pub async fn finish<T, E>(
    conn: &mut SqliteConnection,
    result: std::result::Result<T, E>,
) -> std::result::Result<T, E>
where
    E: From<StorageError>,
{
    match result {
        Ok(value) => {
            sqlx::query("COMMIT")
                .execute(&mut *conn)
                .await
                .map_err(|e| E::from(StorageError::from(e)))?;
            Ok(value)
        }
        Err(e) => {
            let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
            Err(e)
        }
    }
}
