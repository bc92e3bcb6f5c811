//! Product CRUD.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

use super::{detached, Result, ServiceError};
use crate::dto::ProductDto;
use crate::mapping::merge_product;
use crate::model::{NewProduct, Product};
use crate::storage::sqlite::{begin_immediate, finish};
use crate::storage::{SqliteOrderItemStore, SqliteProductStore};

const RESOURCE: &str = "Product";

#[derive(Clone)]
pub struct ProductService {
    pool: SqlitePool,
    products: SqliteProductStore,
}

impl ProductService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            products: SqliteProductStore::new(pool.clone()),
            pool,
        }
    }

    pub async fn find_all(&self) -> Result<Vec<ProductDto>> {
        let products = self.products.find_all().await?;
        Ok(products.iter().map(ProductDto::from).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<ProductDto> {
        self.products
            .find_by_id(id)
            .await?
            .as_ref()
            .map(ProductDto::from)
            .ok_or_else(|| ServiceError::not_found(RESOURCE, id))
    }

    pub async fn create(&self, dto: ProductDto) -> Result<ProductDto> {
        let product = self.products.insert(&NewProduct::from(dto)).await?;
        info!(product_id = product.id, name = %product.name, "product created");
        Ok(ProductDto::from(&product))
    }

    /// Overwrite the fields present in `dto`; absent fields keep their value.
    ///
    /// Read and write share one immediate transaction so a concurrent order
    /// cannot decrement stock between them.
    pub async fn update(&self, dto: ProductDto, id: i64) -> Result<ProductDto> {
        let updated = detached(update_product(self.pool.clone(), id, dto)).await?;
        info!(product_id = id, "product updated");
        Ok(ProductDto::from(&updated))
    }

    /// Delete a product no order item refers to.
    pub async fn delete(&self, id: i64) -> Result<()> {
        detached(delete_product(self.pool.clone(), id)).await?;
        info!(product_id = id, "product deleted");
        Ok(())
    }
}

async fn update_product(pool: SqlitePool, id: i64, dto: ProductDto) -> Result<Product> {
    let mut conn = begin_immediate(&pool).await?;
    let result = update_product_in(&mut conn, id, &dto).await;
    finish(&mut conn, result).await
}

async fn update_product_in(conn: &mut SqliteConnection, id: i64, dto: &ProductDto) -> Result<Product> {
    let mut product = SqliteProductStore::find_in(conn, id)
        .await?
        .ok_or_else(|| ServiceError::not_found(RESOURCE, id))?;

    merge_product(dto, &mut product);

    SqliteProductStore::update_in(conn, &product)
        .await?
        .ok_or_else(|| ServiceError::not_found(RESOURCE, id))
}

async fn delete_product(pool: SqlitePool, id: i64) -> Result<()> {
    let mut conn = begin_immediate(&pool).await?;
    let result = delete_product_in(&mut conn, id).await;
    finish(&mut conn, result).await
}

async fn delete_product_in(conn: &mut SqliteConnection, id: i64) -> Result<()> {
    let product = SqliteProductStore::find_in(conn, id)
        .await?
        .ok_or_else(|| ServiceError::not_found(RESOURCE, id))?;

    let references = SqliteOrderItemStore::count_for_product_in(conn, id).await?;
    if references > 0 {
        warn!(product_id = id, references, "product delete rejected: still referenced");
        return Err(ServiceError::BusinessRule(format!(
            "Product '{}' is referenced by {} order item(s) and cannot be deleted",
            product.name, references
        )));
    }

    SqliteProductStore::delete_in(conn, id).await?;
    Ok(())
}
