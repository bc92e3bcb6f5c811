//! SQLite order store.
//!
//! Orders are read back with their items attached. Writes through this
//! store touch only the header row; items are written by
//! [`SqliteOrderItemStore`].

use std::collections::HashMap;

use sea_query::{Expr, Order as SortOrder, Query, SqliteQueryBuilder};
use sea_query_binder::SqlxBinder;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use super::SqliteOrderItemStore;
use crate::model::{NewOrder, Order, OrderItem};
use crate::storage::helpers::{decode_decimal, decode_status, decode_timestamp, now};
use crate::storage::schema::Orders;
use crate::storage::Result;

const TABLE: &str = "orders";

const COLUMNS: [Orders; 8] = [
    Orders::Id,
    Orders::CustomerName,
    Orders::CustomerEmail,
    Orders::ShippingAddress,
    Orders::TotalAmount,
    Orders::Status,
    Orders::CreatedAt,
    Orders::UpdatedAt,
];

/// SQLite implementation of the order store.
#[derive(Clone)]
pub struct SqliteOrderStore {
    pool: SqlitePool,
}

impl SqliteOrderStore {
    /// Create a new SQLite order store.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All orders ordered by id, each with its items.
    pub async fn find_all(&self) -> Result<Vec<Order>> {
        let mut conn = self.pool.acquire().await?;

        let (sql, values) = Query::select()
            .columns(COLUMNS)
            .from(Orders::Table)
            .order_by(Orders::Id, SortOrder::Asc)
            .build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_with(&sql, values).fetch_all(&mut *conn).await?;

        let mut items_by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
        for item in SqliteOrderItemStore::find_all_in(&mut conn).await? {
            items_by_order.entry(item.order_id).or_default().push(item);
        }

        rows.iter()
            .map(|row| -> Result<Order> {
                let id: i64 = row.try_get("id")?;
                let items = items_by_order.remove(&id).unwrap_or_default();
                decode(row, items)
            })
            .collect()
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Order>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_in(&mut conn, id).await
    }

    /// Write the header columns of `order` and refresh `updated_at`.
    ///
    /// The returned order carries the items currently stored, not the ones
    /// on `order`. Returns `None` when the row no longer exists.
    pub async fn update(&self, order: &Order) -> Result<Option<Order>> {
        let mut conn = self.pool.acquire().await?;
        let (_, stamp) = now();

        let (sql, values) = Query::update()
            .table(Orders::Table)
            .values([
                (Orders::CustomerName, order.customer_name.as_str().into()),
                (Orders::CustomerEmail, order.customer_email.as_str().into()),
                (Orders::ShippingAddress, order.shipping_address.as_str().into()),
                (Orders::TotalAmount, order.total_amount.to_string().into()),
                (Orders::Status, order.status.as_str().into()),
                (Orders::UpdatedAt, stamp.into()),
            ])
            .and_where(Expr::col(Orders::Id).eq(order.id))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values).execute(&mut *conn).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Self::find_in(&mut conn, order.id).await
    }

    pub(crate) async fn find_in(conn: &mut SqliteConnection, id: i64) -> Result<Option<Order>> {
        let (sql, values) = Query::select()
            .columns(COLUMNS)
            .from(Orders::Table)
            .and_where(Expr::col(Orders::Id).eq(id))
            .build_sqlx(SqliteQueryBuilder);

        let Some(row) = sqlx::query_with(&sql, values).fetch_optional(&mut *conn).await? else {
            return Ok(None);
        };

        let items = SqliteOrderItemStore::find_by_order_in(conn, id).await?;
        decode(&row, items).map(Some)
    }

    pub(crate) async fn exists_in(conn: &mut SqliteConnection, id: i64) -> Result<bool> {
        let (sql, values) = Query::select()
            .column(Orders::Id)
            .from(Orders::Table)
            .and_where(Expr::col(Orders::Id).eq(id))
            .build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_with(&sql, values).fetch_optional(&mut *conn).await?.is_some())
    }

    /// Insert the header row only and return its id.
    pub(crate) async fn insert_header_in(conn: &mut SqliteConnection, order: &NewOrder) -> Result<i64> {
        let (_, stamp) = now();

        let (sql, values) = Query::insert()
            .into_table(Orders::Table)
            .columns([
                Orders::CustomerName,
                Orders::CustomerEmail,
                Orders::ShippingAddress,
                Orders::TotalAmount,
                Orders::Status,
                Orders::CreatedAt,
                Orders::UpdatedAt,
            ])
            .values_panic([
                order.customer_name.as_str().into(),
                order.customer_email.as_str().into(),
                order.shipping_address.as_str().into(),
                order.total_amount.to_string().into(),
                order.status.as_str().into(),
                stamp.clone().into(),
                stamp.into(),
            ])
            .build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_with(&sql, values).execute(&mut *conn).await?.last_insert_rowid())
    }

    /// Delete the order's items, then the order. Returns `false` when the
    /// order did not exist.
    pub(crate) async fn delete_in(conn: &mut SqliteConnection, id: i64) -> Result<bool> {
        SqliteOrderItemStore::delete_by_order_in(conn, id).await?;

        let (sql, values) = Query::delete()
            .from_table(Orders::Table)
            .and_where(Expr::col(Orders::Id).eq(id))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values).execute(&mut *conn).await?;
        Ok(result.rows_affected() > 0)
    }
}

fn decode(row: &SqliteRow, order_items: Vec<OrderItem>) -> Result<Order> {
    Ok(Order {
        id: row.try_get("id")?,
        customer_name: row.try_get("customer_name")?,
        customer_email: row.try_get("customer_email")?,
        shipping_address: row.try_get("shipping_address")?,
        total_amount: decode_decimal(row, TABLE, "total_amount")?,
        status: decode_status(row, TABLE, "status")?,
        order_items,
        created_at: decode_timestamp(row, TABLE, "created_at")?,
        updated_at: decode_timestamp(row, TABLE, "updated_at")?,
    })
}
