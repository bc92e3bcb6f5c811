//! SQLite product store.

use sea_query::{Expr, Order as SortOrder, Query, SqliteQueryBuilder};
use sea_query_binder::SqlxBinder;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::model::{NewProduct, Product};
use crate::storage::helpers::{decode_decimal, decode_timestamp, now};
use crate::storage::schema::Products;
use crate::storage::Result;

const TABLE: &str = "products";

const COLUMNS: [Products; 7] = [
    Products::Id,
    Products::Name,
    Products::Description,
    Products::Price,
    Products::Stock,
    Products::CreatedAt,
    Products::UpdatedAt,
];

/// SQLite implementation of the product store.
#[derive(Clone)]
pub struct SqliteProductStore {
    pool: SqlitePool,
}

impl SqliteProductStore {
    /// Create a new SQLite product store.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All products, ordered by id.
    pub async fn find_all(&self) -> Result<Vec<Product>> {
        let (sql, values) = Query::select()
            .columns(COLUMNS)
            .from(Products::Table)
            .order_by(Products::Id, SortOrder::Asc)
            .build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_with(&sql, values).fetch_all(&self.pool).await?;
        rows.iter().map(decode).collect()
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_in(&mut conn, id).await
    }

    pub async fn insert(&self, product: &NewProduct) -> Result<Product> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_in(&mut conn, product).await
    }

    pub(crate) async fn find_in(conn: &mut SqliteConnection, id: i64) -> Result<Option<Product>> {
        let (sql, values) = Query::select()
            .columns(COLUMNS)
            .from(Products::Table)
            .and_where(Expr::col(Products::Id).eq(id))
            .build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_with(&sql, values).fetch_optional(&mut *conn).await?;
        row.as_ref().map(decode).transpose()
    }

    pub(crate) async fn exists_in(conn: &mut SqliteConnection, id: i64) -> Result<bool> {
        let (sql, values) = Query::select()
            .column(Products::Id)
            .from(Products::Table)
            .and_where(Expr::col(Products::Id).eq(id))
            .build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_with(&sql, values).fetch_optional(&mut *conn).await?.is_some())
    }

    pub(crate) async fn insert_in(conn: &mut SqliteConnection, product: &NewProduct) -> Result<Product> {
        let (created_at, stamp) = now();

        let (sql, values) = Query::insert()
            .into_table(Products::Table)
            .columns([
                Products::Name,
                Products::Description,
                Products::Price,
                Products::Stock,
                Products::CreatedAt,
                Products::UpdatedAt,
            ])
            .values_panic([
                product.name.as_str().into(),
                product.description.clone().into(),
                product.price.to_string().into(),
                product.stock.into(),
                stamp.clone().into(),
                stamp.into(),
            ])
            .build_sqlx(SqliteQueryBuilder);

        let id = sqlx::query_with(&sql, values).execute(&mut *conn).await?.last_insert_rowid();

        Ok(Product {
            id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            stock: product.stock,
            created_at,
            updated_at: created_at,
        })
    }

    /// Write every mutable column of `product` and refresh `updated_at`.
    ///
    /// Returns `None` when the row no longer exists.
    pub(crate) async fn update_in(
        conn: &mut SqliteConnection,
        product: &Product,
    ) -> Result<Option<Product>> {
        let (updated_at, stamp) = now();

        let (sql, values) = Query::update()
            .table(Products::Table)
            .values([
                (Products::Name, product.name.as_str().into()),
                (Products::Description, product.description.clone().into()),
                (Products::Price, product.price.to_string().into()),
                (Products::Stock, product.stock.into()),
                (Products::UpdatedAt, stamp.into()),
            ])
            .and_where(Expr::col(Products::Id).eq(product.id))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values).execute(&mut *conn).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(Product {
            updated_at,
            ..product.clone()
        }))
    }

    /// Take `quantity` units out of stock, but only if that many remain.
    ///
    /// Returns `false` when the row is missing or holds fewer units; stock
    /// is left untouched in that case.
    pub(crate) async fn decrement_stock_in(
        conn: &mut SqliteConnection,
        id: i64,
        quantity: i32,
    ) -> Result<bool> {
        let (_, stamp) = now();

        let (sql, values) = Query::update()
            .table(Products::Table)
            .value(Products::Stock, Expr::col(Products::Stock).sub(quantity))
            .value(Products::UpdatedAt, stamp)
            .and_where(Expr::col(Products::Id).eq(id))
            .and_where(Expr::col(Products::Stock).gte(quantity))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values).execute(&mut *conn).await?;
        Ok(result.rows_affected() == 1)
    }

    pub(crate) async fn delete_in(conn: &mut SqliteConnection, id: i64) -> Result<bool> {
        let (sql, values) = Query::delete()
            .from_table(Products::Table)
            .and_where(Expr::col(Products::Id).eq(id))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values).execute(&mut *conn).await?;
        Ok(result.rows_affected() > 0)
    }
}

fn decode(row: &SqliteRow) -> Result<Product> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: decode_decimal(row, TABLE, "price")?,
        stock: row.try_get("stock")?,
        created_at: decode_timestamp(row, TABLE, "created_at")?,
        updated_at: decode_timestamp(row, TABLE, "updated_at")?,
    })
}
