//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::SqlitePool;

use storefront::api::{router, AppState};
use storefront::config::StorageConfig;
use storefront::dto::{OrderDto, OrderItemDto, ProductDto};
use storefront::model::OrderStatus;
use storefront::storage::init_storage;

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Fresh in-memory database with the schema applied.
pub async fn memory_pool() -> SqlitePool {
    init_storage(&StorageConfig::in_memory()).await.unwrap()
}

/// File-backed database under `dir` with a pool of `max_connections`.
pub async fn file_pool(dir: &tempfile::TempDir, max_connections: u32) -> SqlitePool {
    let config = StorageConfig {
        path: dir.path().join("store.db").to_string_lossy().into_owned(),
        max_connections,
        busy_timeout_secs: 30,
    };
    init_storage(&config).await.unwrap()
}

pub fn product(name: &str, price: &str, stock: i32) -> ProductDto {
    ProductDto {
        name: Some(name.to_string()),
        description: Some(format!("{} description", name)),
        price: Some(dec(price)),
        stock: Some(stock),
        ..Default::default()
    }
}

pub fn line(product_id: i64, quantity: i32, unit_price: &str) -> OrderItemDto {
    let unit_price = dec(unit_price);
    OrderItemDto {
        product_id: Some(product_id),
        quantity: Some(quantity),
        unit_price: Some(unit_price),
        subtotal: Some(unit_price * Decimal::from(quantity)),
        ..Default::default()
    }
}

pub fn order(items: Vec<OrderItemDto>) -> OrderDto {
    let total: Decimal = items.iter().filter_map(|i| i.subtotal).sum();
    OrderDto {
        customer_name: Some("John Doe".to_string()),
        customer_email: Some("john.doe@example.com".to_string()),
        shipping_address: Some("123 Main St, Anytown".to_string()),
        total_amount: Some(total),
        status: Some(OrderStatus::Pending),
        order_items: items,
        ..Default::default()
    }
}

/// Start the API on an ephemeral port and return its base URL.
pub async fn spawn_server(pool: SqlitePool) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(AppState::new(pool));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
