//! SQLite storage integration tests.
//!
//! Uses an in-memory database unless a test needs a file.

mod common;

use storefront::dto::ProductDto;
use storefront::model::NewProduct;
use storefront::services::{OrderService, ProductService, ServiceError};
use storefront::storage::{
    init_schema, SqliteOrderItemStore, SqliteOrderStore, SqliteProductStore, StorageError,
};

use common::{dec, file_pool, line, memory_pool, order, product};

fn new_product(name: &str, price: &str, stock: i32) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: None,
        price: dec(price),
        stock,
    }
}

#[tokio::test]
async fn test_product_round_trip_keeps_decimal_scale() {
    let pool = memory_pool().await;
    let store = SqliteProductStore::new(pool);

    let inserted = store.insert(&new_product("Notebook", "19.90", 3)).await.unwrap();
    let loaded = store.find_by_id(inserted.id).await.unwrap().unwrap();

    assert_eq!(loaded, inserted);
    assert_eq!(loaded.price.to_string(), "19.90");
    assert_eq!(loaded.description, None);
    assert!(store.find_by_id(inserted.id + 1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_text_with_quotes_backslashes_and_nul_round_trips() {
    let pool = memory_pool().await;
    let store = SqliteProductStore::new(pool);
    let name = "O'Brien's \\ \"lamp\"\0 ');DROP TABLE products;--";
    let description = "line one\nit's 100% \\x27 \0 end".to_string();

    let inserted = store
        .insert(&NewProduct {
            description: Some(description.clone()),
            ..new_product(name, "4.00", 3)
        })
        .await
        .unwrap();
    let loaded = store.find_by_id(inserted.id).await.unwrap().unwrap();

    assert_eq!(loaded.name, name);
    assert_eq!(loaded.description, Some(description));
    assert_eq!(store.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_product_update_refreshes_updated_at_only() {
    let pool = memory_pool().await;
    let store = SqliteProductStore::new(pool.clone());
    let product = store.insert(&new_product("Notebook", "4.00", 3)).await.unwrap();

    let updated = ProductService::new(pool)
        .update(
            ProductDto {
                stock: Some(9),
                ..Default::default()
            },
            product.id,
        )
        .await
        .unwrap();

    assert_eq!(updated.stock, Some(9));
    assert_eq!(updated.created_at, Some(product.created_at));
    assert!(updated.updated_at >= Some(product.updated_at));
    let stored = store.find_by_id(product.id).await.unwrap().unwrap();
    assert_eq!(stored.stock, 9);
    assert_eq!(Some(stored.updated_at), updated.updated_at);
}

#[tokio::test]
async fn test_negative_stock_rejected_by_schema() {
    let pool = memory_pool().await;
    let store = SqliteProductStore::new(pool.clone());
    let product = store.insert(&new_product("Notebook", "4.00", 3)).await.unwrap();

    let err = ProductService::new(pool)
        .update(
            ProductDto {
                stock: Some(-1),
                ..Default::default()
            },
            product.id,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Storage(StorageError::Database(_))));
    assert_eq!(store.find_by_id(product.id).await.unwrap().unwrap().stock, 3);
}

#[tokio::test]
async fn test_orders_are_loaded_with_their_own_items() {
    let pool = memory_pool().await;
    let products = ProductService::new(pool.clone());
    let orders = OrderService::new(pool.clone());

    let a = products.create(product("Pen", "1.50", 50)).await.unwrap().id.unwrap();
    let b = products.create(product("Ink", "7.25", 50)).await.unwrap().id.unwrap();

    let first = orders
        .create(order(vec![line(a, 2, "1.50"), line(b, 1, "7.25")]))
        .await
        .unwrap();
    let second = orders.create(order(vec![line(b, 3, "7.25")])).await.unwrap();

    let store = SqliteOrderStore::new(pool.clone());
    let all = store.find_all().await.unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(Some(all[0].id), first.id);
    assert_eq!(Some(all[1].id), second.id);
    let first_products: Vec<_> = all[0].order_items.iter().map(|i| i.product_id).collect();
    assert_eq!(first_products, vec![a, b]);
    assert_eq!(all[1].order_items.len(), 1);
    assert_eq!(all[1].order_items[0].quantity, 3);

    let items = SqliteOrderItemStore::new(pool);
    assert_eq!(items.find_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_schema_init_is_idempotent() {
    let pool = memory_pool().await;
    let store = SqliteProductStore::new(pool.clone());
    store.insert(&new_product("Notebook", "4.00", 3)).await.unwrap();

    init_schema(&pool).await.unwrap();

    assert_eq!(store.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let pool = file_pool(&dir, 2).await;
    let id = SqliteProductStore::new(pool.clone())
        .insert(&new_product("Notebook", "4.00", 3))
        .await
        .unwrap()
        .id;
    pool.close().await;

    let reopened = file_pool(&dir, 2).await;
    let loaded = SqliteProductStore::new(reopened).find_by_id(id).await.unwrap();
    assert_eq!(loaded.map(|p| p.name), Some("Notebook".to_string()));
}
