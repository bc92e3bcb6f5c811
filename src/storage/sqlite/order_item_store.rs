//! SQLite order item store.

use sea_query::{Expr, Order as SortOrder, Query, SqliteQueryBuilder};
use sea_query_binder::SqlxBinder;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::model::{NewOrderItem, OrderItem};
use crate::storage::helpers::{decode_decimal, decode_timestamp, now};
use crate::storage::schema::OrderItems;
use crate::storage::Result;

const TABLE: &str = "order_items";

const COLUMNS: [OrderItems; 8] = [
    OrderItems::Id,
    OrderItems::OrderId,
    OrderItems::ProductId,
    OrderItems::Quantity,
    OrderItems::UnitPrice,
    OrderItems::Subtotal,
    OrderItems::CreatedAt,
    OrderItems::UpdatedAt,
];

/// SQLite implementation of the order item store.
#[derive(Clone)]
pub struct SqliteOrderItemStore {
    pool: SqlitePool,
}

impl SqliteOrderItemStore {
    /// Create a new SQLite order item store.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All items across all orders, ordered by id.
    pub async fn find_all(&self) -> Result<Vec<OrderItem>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_all_in(&mut conn).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<OrderItem>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_in(&mut conn, id).await
    }

    /// Returns `false` when there was nothing to delete.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let (sql, values) = Query::delete()
            .from_table(OrderItems::Table)
            .and_where(Expr::col(OrderItems::Id).eq(id))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    pub(crate) async fn find_in(conn: &mut SqliteConnection, id: i64) -> Result<Option<OrderItem>> {
        let (sql, values) = Query::select()
            .columns(COLUMNS)
            .from(OrderItems::Table)
            .and_where(Expr::col(OrderItems::Id).eq(id))
            .build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_with(&sql, values).fetch_optional(&mut *conn).await?;
        row.as_ref().map(decode).transpose()
    }

    /// Write the references and scalar columns of `item`, refreshing
    /// `updated_at`. Returns `None` when the row no longer exists.
    pub(crate) async fn update_in(
        conn: &mut SqliteConnection,
        item: &OrderItem,
    ) -> Result<Option<OrderItem>> {
        let (updated_at, stamp) = now();

        let (sql, values) = Query::update()
            .table(OrderItems::Table)
            .values([
                (OrderItems::OrderId, item.order_id.into()),
                (OrderItems::ProductId, item.product_id.into()),
                (OrderItems::Quantity, item.quantity.into()),
                (OrderItems::UnitPrice, item.unit_price.to_string().into()),
                (OrderItems::Subtotal, item.subtotal.to_string().into()),
                (OrderItems::UpdatedAt, stamp.into()),
            ])
            .and_where(Expr::col(OrderItems::Id).eq(item.id))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values).execute(&mut *conn).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(OrderItem {
            updated_at,
            ..item.clone()
        }))
    }

    pub(crate) async fn find_all_in(conn: &mut SqliteConnection) -> Result<Vec<OrderItem>> {
        let (sql, values) = Query::select()
            .columns(COLUMNS)
            .from(OrderItems::Table)
            .order_by(OrderItems::Id, SortOrder::Asc)
            .build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_with(&sql, values).fetch_all(&mut *conn).await?;
        rows.iter().map(decode).collect()
    }

    /// Items of one order in insertion order.
    pub(crate) async fn find_by_order_in(
        conn: &mut SqliteConnection,
        order_id: i64,
    ) -> Result<Vec<OrderItem>> {
        let (sql, values) = Query::select()
            .columns(COLUMNS)
            .from(OrderItems::Table)
            .and_where(Expr::col(OrderItems::OrderId).eq(order_id))
            .order_by(OrderItems::Id, SortOrder::Asc)
            .build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_with(&sql, values).fetch_all(&mut *conn).await?;
        rows.iter().map(decode).collect()
    }

    pub(crate) async fn insert_in(
        conn: &mut SqliteConnection,
        order_id: i64,
        item: &NewOrderItem,
    ) -> Result<OrderItem> {
        let (created_at, stamp) = now();

        let (sql, values) = Query::insert()
            .into_table(OrderItems::Table)
            .columns([
                OrderItems::OrderId,
                OrderItems::ProductId,
                OrderItems::Quantity,
                OrderItems::UnitPrice,
                OrderItems::Subtotal,
                OrderItems::CreatedAt,
                OrderItems::UpdatedAt,
            ])
            .values_panic([
                order_id.into(),
                item.product_id.into(),
                item.quantity.into(),
                item.unit_price.to_string().into(),
                item.subtotal.to_string().into(),
                stamp.clone().into(),
                stamp.into(),
            ])
            .build_sqlx(SqliteQueryBuilder);

        let id = sqlx::query_with(&sql, values).execute(&mut *conn).await?.last_insert_rowid();

        Ok(OrderItem {
            id,
            order_id,
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            subtotal: item.subtotal,
            created_at,
            updated_at: created_at,
        })
    }

    pub(crate) async fn delete_by_order_in(conn: &mut SqliteConnection, order_id: i64) -> Result<u64> {
        let (sql, values) = Query::delete()
            .from_table(OrderItems::Table)
            .and_where(Expr::col(OrderItems::OrderId).eq(order_id))
            .build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_with(&sql, values).execute(&mut *conn).await?.rows_affected())
    }

    /// Number of items, in any order, that reference `product_id`.
    pub(crate) async fn count_for_product_in(
        conn: &mut SqliteConnection,
        product_id: i64,
    ) -> Result<i64> {
        let (sql, values) = Query::select()
            .expr(Expr::col(OrderItems::Id).count())
            .from(OrderItems::Table)
            .and_where(Expr::col(OrderItems::ProductId).eq(product_id))
            .build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_with(&sql, values).fetch_one(&mut *conn).await?;
        Ok(row.try_get(0)?)
    }
}

fn decode(row: &SqliteRow) -> Result<OrderItem> {
    Ok(OrderItem {
        id: row.try_get("id")?,
        order_id: row.try_get("order_id")?,
        product_id: row.try_get("product_id")?,
        quantity: row.try_get("quantity")?,
        unit_price: decode_decimal(row, TABLE, "unit_price")?,
        subtotal: decode_decimal(row, TABLE, "subtotal")?,
        created_at: decode_timestamp(row, TABLE, "created_at")?,
        updated_at: decode_timestamp(row, TABLE, "updated_at")?,
    })
}
