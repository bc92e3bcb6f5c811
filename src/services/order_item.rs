//! Standalone order item CRUD.
//!
//! Items created here are attached to an existing order and product. Stock
//! is not reserved; only the order creation workflow does that.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use super::{detached, Result, ServiceError};
use crate::dto::OrderItemDto;
use crate::mapping::merge_order_item;
use crate::model::{NewOrderItem, OrderItem};
use crate::storage::sqlite::{begin_immediate, finish};
use crate::storage::{SqliteOrderItemStore, SqliteOrderStore, SqliteProductStore};
use crate::validation::{errmsg, FieldViolation};

const RESOURCE: &str = "OrderItem";

#[derive(Clone)]
pub struct OrderItemService {
    pool: SqlitePool,
    items: SqliteOrderItemStore,
}

impl OrderItemService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            items: SqliteOrderItemStore::new(pool.clone()),
            pool,
        }
    }

    pub async fn find_all(&self) -> Result<Vec<OrderItemDto>> {
        let items = self.items.find_all().await?;
        Ok(items.iter().map(OrderItemDto::from).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<OrderItemDto> {
        self.items
            .find_by_id(id)
            .await?
            .as_ref()
            .map(OrderItemDto::from)
            .ok_or_else(|| ServiceError::not_found(RESOURCE, id))
    }

    /// Attach a new item to the order named by `orderId`.
    ///
    /// The order is resolved before the product; whichever is missing first
    /// is reported.
    pub async fn create(&self, dto: OrderItemDto) -> Result<OrderItemDto> {
        let order_id = dto.order_id.ok_or_else(|| {
            ServiceError::Validation(vec![FieldViolation::new("orderId", errmsg::ORDER_ID_REQUIRED)])
        })?;

        let item = NewOrderItem::from(dto);
        let created = detached(create_item(self.pool.clone(), order_id, item)).await?;
        info!(
            order_item_id = created.id,
            order_id = created.order_id,
            product_id = created.product_id,
            "order item created"
        );
        Ok(OrderItemDto::from(&created))
    }

    /// Merge present fields into the item. A present `orderId` or
    /// `productId` moves the item after the target is resolved.
    pub async fn update(&self, dto: OrderItemDto, id: i64) -> Result<OrderItemDto> {
        let updated = detached(update_item(self.pool.clone(), id, dto)).await?;
        info!(order_item_id = id, "order item updated");
        Ok(OrderItemDto::from(&updated))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.items.delete(id).await? {
            return Err(ServiceError::not_found(RESOURCE, id));
        }
        info!(order_item_id = id, "order item deleted");
        Ok(())
    }
}

async fn create_item(pool: SqlitePool, order_id: i64, item: NewOrderItem) -> Result<OrderItem> {
    let mut conn = begin_immediate(&pool).await?;
    let result = create_item_in(&mut conn, order_id, &item).await;
    finish(&mut conn, result).await
}

async fn create_item_in(
    conn: &mut SqliteConnection,
    order_id: i64,
    item: &NewOrderItem,
) -> Result<OrderItem> {
    ensure_order(conn, order_id).await?;
    ensure_product(conn, item.product_id).await?;
    Ok(SqliteOrderItemStore::insert_in(conn, order_id, item).await?)
}

async fn update_item(pool: SqlitePool, id: i64, dto: OrderItemDto) -> Result<OrderItem> {
    let mut conn = begin_immediate(&pool).await?;
    let result = update_item_in(&mut conn, id, &dto).await;
    finish(&mut conn, result).await
}

async fn update_item_in(conn: &mut SqliteConnection, id: i64, dto: &OrderItemDto) -> Result<OrderItem> {
    let mut item = SqliteOrderItemStore::find_in(conn, id)
        .await?
        .ok_or_else(|| ServiceError::not_found(RESOURCE, id))?;

    if let Some(order_id) = dto.order_id {
        ensure_order(conn, order_id).await?;
        item.order_id = order_id;
    }
    if let Some(product_id) = dto.product_id {
        ensure_product(conn, product_id).await?;
        item.product_id = product_id;
    }
    merge_order_item(dto, &mut item);

    SqliteOrderItemStore::update_in(conn, &item)
        .await?
        .ok_or_else(|| ServiceError::not_found(RESOURCE, id))
}

async fn ensure_order(conn: &mut SqliteConnection, id: i64) -> Result<()> {
    if !SqliteOrderStore::exists_in(conn, id).await? {
        return Err(ServiceError::not_found("Order", id));
    }
    Ok(())
}

async fn ensure_product(conn: &mut SqliteConnection, id: i64) -> Result<()> {
    if !SqliteProductStore::exists_in(conn, id).await? {
        return Err(ServiceError::not_found("Product", id));
    }
    Ok(())
}
