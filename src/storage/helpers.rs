//! Shared storage helper functions.
//!
//! Decoding of the TEXT-encoded decimal, timestamp and status columns.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{Result, StorageError};
use crate::model::OrderStatus;

/// Current time in the stored (RFC 3339) form, paired with its parsed value.
pub fn now() -> (DateTime<Utc>, String) {
    let now = Utc::now();
    (now, now.to_rfc3339())
}

pub fn decode_decimal(row: &SqliteRow, table: &'static str, column: &'static str) -> Result<Decimal> {
    let raw: String = row.try_get(column)?;
    Decimal::from_str(&raw).map_err(|e| StorageError::Corrupt {
        table,
        column,
        reason: format!("{}: {:?}", e, raw),
    })
}

pub fn decode_timestamp(
    row: &SqliteRow,
    table: &'static str,
    column: &'static str,
) -> Result<DateTime<Utc>> {
    let raw: String = row.try_get(column)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StorageError::Corrupt {
            table,
            column,
            reason: format!("{}: {:?}", e, raw),
        })
}

pub fn decode_status(row: &SqliteRow, table: &'static str, column: &'static str) -> Result<OrderStatus> {
    let raw: String = row.try_get(column)?;
    OrderStatus::from_str(&raw).map_err(|e| StorageError::Corrupt {
        table,
        column,
        reason: e.to_string(),
    })
}
