//! Orders: read, header update, delete, and the order creation workflow.
//!
//! Creating an order is one unit of work. Every referenced product is loaded
//! and its stock checked before anything is written; only when the whole
//! order can be served are stock levels decremented and the order and its
//! items inserted. Any failure rolls the transaction back, leaving the
//! database as it was.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

use super::{detached, Result, ServiceError};
use crate::dto::OrderDto;
use crate::mapping::merge_order;
use crate::model::{NewOrder, Order, Product};
use crate::storage::sqlite::{begin_immediate, finish};
use crate::storage::{SqliteOrderItemStore, SqliteOrderStore, SqliteProductStore};

const RESOURCE: &str = "Order";

pub const EMPTY_ORDER: &str = "Order must contain at least one item";

#[derive(Clone)]
pub struct OrderService {
    pool: SqlitePool,
    orders: SqliteOrderStore,
}

impl OrderService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            orders: SqliteOrderStore::new(pool.clone()),
            pool,
        }
    }

    pub async fn find_all(&self) -> Result<Vec<OrderDto>> {
        let orders = self.orders.find_all().await?;
        Ok(orders.iter().map(OrderDto::from).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<OrderDto> {
        self.orders
            .find_by_id(id)
            .await?
            .as_ref()
            .map(OrderDto::from)
            .ok_or_else(|| ServiceError::not_found(RESOURCE, id))
    }

    /// Place an order, reserving stock for every line item.
    ///
    /// Items are checked in the order given and the first failure is the one
    /// reported. Lines naming the same product draw on the same stock.
    pub async fn create(&self, dto: OrderDto) -> Result<OrderDto> {
        if dto.order_items.is_empty() {
            warn!("order rejected: no items");
            return Err(ServiceError::BusinessRule(EMPTY_ORDER.to_string()));
        }

        let order = NewOrder::from(dto);
        let items = order.order_items.len();

        let created = detached(create_order(self.pool.clone(), order)).await?;
        info!(order_id = created.id, items, total = %created.total_amount, "order created");
        Ok(OrderDto::from(&created))
    }

    /// Overwrite the header fields present in `dto`. Items and stock are
    /// left untouched.
    pub async fn update(&self, dto: OrderDto, id: i64) -> Result<OrderDto> {
        let mut order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(RESOURCE, id))?;

        merge_order(&dto, &mut order);

        let updated = self
            .orders
            .update(&order)
            .await?
            .ok_or_else(|| ServiceError::not_found(RESOURCE, id))?;
        info!(order_id = id, status = %updated.status, "order updated");
        Ok(OrderDto::from(&updated))
    }

    /// Delete an order together with all of its items. Stock is not
    /// returned to the products.
    pub async fn delete(&self, id: i64) -> Result<()> {
        detached(delete_order(self.pool.clone(), id)).await?;
        info!(order_id = id, "order deleted");
        Ok(())
    }
}

async fn create_order(pool: SqlitePool, order: NewOrder) -> Result<Order> {
    let mut conn = begin_immediate(&pool).await?;
    let result = create_order_in(&mut conn, &order).await;
    finish(&mut conn, result).await
}

async fn create_order_in(conn: &mut SqliteConnection, order: &NewOrder) -> Result<Order> {
    if order.order_items.is_empty() {
        return Err(ServiceError::BusinessRule(EMPTY_ORDER.to_string()));
    }

    // Demand per product, accumulated across lines.
    let mut reserved: HashMap<i64, (Product, i32)> = HashMap::new();

    for item in &order.order_items {
        let (product, demand) = match reserved.entry(item.product_id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let product = SqliteProductStore::find_in(conn, item.product_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("Product", item.product_id))?;
                entry.insert((product, 0))
            }
        };

        *demand = demand.saturating_add(item.quantity);
        if product.stock < *demand {
            warn!(
                product_id = product.id,
                available = product.stock,
                requested = *demand,
                "order rejected: insufficient stock"
            );
            return Err(insufficient_stock(product, *demand));
        }
    }

    for item in &order.order_items {
        if !SqliteProductStore::decrement_stock_in(conn, item.product_id, item.quantity).await? {
            // The write lock is held, so this only trips if stock moved
            // underneath the checks above.
            let current = SqliteProductStore::find_in(conn, item.product_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("Product", item.product_id))?;
            return Err(insufficient_stock(&current, item.quantity));
        }
    }

    let order_id = SqliteOrderStore::insert_header_in(conn, order).await?;
    for item in &order.order_items {
        SqliteOrderItemStore::insert_in(conn, order_id, item).await?;
    }

    SqliteOrderStore::find_in(conn, order_id)
        .await?
        .ok_or_else(|| ServiceError::Unexpected(format!("order {} missing after insert", order_id)))
}

fn insufficient_stock(product: &Product, requested: i32) -> ServiceError {
    ServiceError::BusinessRule(format!(
        "Insufficient stock for product '{}'. Available: {}, Requested: {}",
        product.name, product.stock, requested
    ))
}

async fn delete_order(pool: SqlitePool, id: i64) -> Result<()> {
    let mut conn = begin_immediate(&pool).await?;
    let result = delete_order_in(&mut conn, id).await;
    finish(&mut conn, result).await
}

async fn delete_order_in(conn: &mut SqliteConnection, id: i64) -> Result<()> {
    if !SqliteOrderStore::delete_in(conn, id).await? {
        return Err(ServiceError::not_found(RESOURCE, id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::dto::{OrderItemDto, ProductDto};
    use crate::model::OrderStatus;
    use crate::services::test_support::pool;
    use crate::services::ProductService;

    struct Fixture {
        orders: OrderService,
        products: ProductService,
    }

    async fn fixture() -> Fixture {
        let pool = pool().await;
        Fixture {
            orders: OrderService::new(pool.clone()),
            products: ProductService::new(pool),
        }
    }

    async fn product(products: &ProductService, name: &str, stock: i32) -> i64 {
        products
            .create(ProductDto {
                name: Some(name.to_string()),
                price: Some(Decimal::new(1999, 2)),
                stock: Some(stock),
                ..Default::default()
            })
            .await
            .unwrap()
            .id
            .unwrap()
    }

    fn line(product_id: i64, quantity: i32) -> OrderItemDto {
        OrderItemDto {
            product_id: Some(product_id),
            quantity: Some(quantity),
            unit_price: Some(Decimal::new(1999, 2)),
            subtotal: Some(Decimal::new(1999, 2) * Decimal::from(quantity)),
            ..Default::default()
        }
    }

    fn order(items: Vec<OrderItemDto>) -> OrderDto {
        OrderDto {
            customer_name: Some("Ada Lovelace".to_string()),
            customer_email: Some("ada@example.com".to_string()),
            shipping_address: Some("12 Analytical Row, London".to_string()),
            total_amount: Some(Decimal::new(3998, 2)),
            status: Some(OrderStatus::Pending),
            order_items: items,
            ..Default::default()
        }
    }

    async fn stock(products: &ProductService, id: i64) -> i32 {
        products.find_by_id(id).await.unwrap().stock.unwrap()
    }

    #[tokio::test]
    async fn test_create_decrements_stock_and_persists_items() {
        let f = fixture().await;
        let a = product(&f.products, "Widget", 10).await;
        let b = product(&f.products, "Gadget", 4).await;

        let created = f.orders.create(order(vec![line(a, 2), line(b, 4)])).await.unwrap();

        assert_eq!(stock(&f.products, a).await, 8);
        assert_eq!(stock(&f.products, b).await, 0);

        let id = created.id.unwrap();
        assert_eq!(created.order_items.len(), 2);
        assert_eq!(created.order_items[0].product_id, Some(a));
        assert_eq!(created.order_items[1].product_id, Some(b));
        assert!(created.order_items.iter().all(|i| i.order_id == Some(id)));
        assert_eq!(created.total_amount, Some(Decimal::new(3998, 2)));

        let stored = f.orders.find_by_id(id).await.unwrap();
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn test_insufficient_stock_leaves_store_untouched() {
        let f = fixture().await;
        let a = product(&f.products, "Widget", 100).await;
        let b = product(&f.products, "Gadget", 5).await;

        let err = f
            .orders
            .create(order(vec![line(a, 2), line(b, 10)]))
            .await
            .unwrap_err();

        match err {
            ServiceError::BusinessRule(message) => assert_eq!(
                message,
                "Insufficient stock for product 'Gadget'. Available: 5, Requested: 10"
            ),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(stock(&f.products, a).await, 100);
        assert_eq!(stock(&f.products, b).await, 5);
        assert!(f.orders.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_exact_stock_reaches_zero() {
        let f = fixture().await;
        let a = product(&f.products, "Widget", 5).await;

        f.orders.create(order(vec![line(a, 5)])).await.unwrap();

        assert_eq!(stock(&f.products, a).await, 0);
    }

    #[tokio::test]
    async fn test_missing_product_short_circuits() {
        let f = fixture().await;
        let a = product(&f.products, "Widget", 10).await;

        let err = f
            .orders
            .create(order(vec![line(a, 1), line(9999, 1)]))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Product not found with id: '9999'");
        assert_eq!(stock(&f.products, a).await, 10);
        assert!(f.orders.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_first_failing_item_is_reported() {
        let f = fixture().await;
        let a = product(&f.products, "Widget", 1).await;
        let b = product(&f.products, "Gadget", 1).await;

        let err = f
            .orders
            .create(order(vec![line(a, 3), line(b, 3)]))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("'Widget'"));
    }

    #[tokio::test]
    async fn test_repeated_product_lines_share_stock() {
        let f = fixture().await;
        let a = product(&f.products, "Widget", 5).await;

        let err = f
            .orders
            .create(order(vec![line(a, 3), line(a, 3)]))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Insufficient stock for product 'Widget'. Available: 5, Requested: 6"
        );
        assert_eq!(stock(&f.products, a).await, 5);
    }

    #[tokio::test]
    async fn test_empty_items_rejected_before_anything_else() {
        let f = fixture().await;

        let err = f.orders.create(OrderDto::default()).await.unwrap_err();

        assert!(matches!(err, ServiceError::BusinessRule(ref m) if m == EMPTY_ORDER));
        assert!(f.orders.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_touches_header_only() {
        let f = fixture().await;
        let a = product(&f.products, "Widget", 10).await;
        let created = f.orders.create(order(vec![line(a, 2)])).await.unwrap();
        let id = created.id.unwrap();

        let updated = f
            .orders
            .update(
                OrderDto {
                    status: Some(OrderStatus::Shipped),
                    order_items: vec![line(a, 7)],
                    ..Default::default()
                },
                id,
            )
            .await
            .unwrap();

        assert_eq!(updated.status, Some(OrderStatus::Shipped));
        assert_eq!(updated.customer_name, created.customer_name);
        assert_eq!(updated.order_items, created.order_items);
        assert_eq!(stock(&f.products, a).await, 8);
    }

    #[tokio::test]
    async fn test_delete_removes_items_but_not_products() {
        let f = fixture().await;
        let a = product(&f.products, "Widget", 10).await;
        let b = product(&f.products, "Gadget", 10).await;
        let id = f
            .orders
            .create(order(vec![line(a, 1), line(b, 1)]))
            .await
            .unwrap()
            .id
            .unwrap();

        f.orders.delete(id).await.unwrap();

        let items = SqliteOrderItemStore::new(f.orders.pool.clone());
        assert!(items.find_all().await.unwrap().is_empty());
        assert!(f.products.find_by_id(a).await.is_ok());
        assert!(f.products.find_by_id(b).await.is_ok());
        assert!(matches!(
            f.orders.find_by_id(id).await.unwrap_err(),
            ServiceError::NotFound { resource: "Order", .. }
        ));
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let f = fixture().await;

        let err = f.orders.delete(31).await.unwrap_err();
        assert_eq!(err.to_string(), "Order not found with id: '31'");
    }

    #[tokio::test]
    async fn test_referenced_product_cannot_be_deleted() {
        let f = fixture().await;
        let a = product(&f.products, "Widget", 10).await;
        f.orders.create(order(vec![line(a, 1)])).await.unwrap();

        let err = f.products.delete(a).await.unwrap_err();

        assert!(matches!(err, ServiceError::BusinessRule(_)));
        assert!(f.products.find_by_id(a).await.is_ok());
    }
}
