//! REST API.
//!
//! Endpoints:
//! - `GET /health` liveness check
//! - `GET /v3/api-docs` OpenAPI document
//! - `/api/products`, `/api/orders`, `/api/order-items`: list and create
//! - `/api/{collection}/{id}`: read, update and delete one resource

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{middleware, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::services::{OrderItemService, OrderService, ProductService, ServiceError};
use crate::utils::bootstrap::shutdown_signal;

pub mod docs;
pub mod error;
pub mod extract;
mod order_items;
mod orders;
mod products;

pub use error::{ApiError, ErrorResponse};
pub use extract::{Id, ValidatedJson};

pub const PRODUCTS_PATH: &str = "/api/products";
pub const ORDERS_PATH: &str = "/api/orders";
pub const ORDER_ITEMS_PATH: &str = "/api/order-items";
pub const API_DOCS_PATH: &str = "/v3/api-docs";

/// Shared state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
    pub orders: OrderService,
    pub order_items: OrderItemService,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            products: ProductService::new(pool.clone()),
            orders: OrderService::new(pool.clone()),
            order_items: OrderItemService::new(pool),
        }
    }
}

/// Serve the API on an already bound listener until shutdown is requested.
///
/// Binding is left to the caller so a port of 0 can be resolved first.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = listener.local_addr()?;
    info!(%addr, "storefront REST API listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Build the axum router (separated for testing).
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(API_DOCS_PATH, get(docs::api_docs))
        .route(PRODUCTS_PATH, get(products::find_all).post(products::create))
        .route(
            "/api/products/{id}",
            get(products::find_by_id)
                .put(products::update)
                .delete(products::delete),
        )
        .route(ORDERS_PATH, get(orders::find_all).post(orders::create))
        .route(
            "/api/orders/{id}",
            get(orders::find_by_id)
                .put(orders::update)
                .delete(orders::delete),
        )
        .route(
            ORDER_ITEMS_PATH,
            get(order_items::find_all).post(order_items::create),
        )
        .route(
            "/api/order-items/{id}",
            get(order_items::find_by_id)
                .put(order_items::update)
                .delete(order_items::delete),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(error::render_error_body)),
        )
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Id of a freshly stored resource; a store that returned none is a bug.
fn assigned_id(id: Option<i64>) -> Result<i64, ApiError> {
    id.ok_or_else(|| ServiceError::Unexpected("stored resource has no id".to_string()).into())
}

/// `201 Created` with a `Location` header for the new resource.
fn created<T: Serialize>(collection: &str, id: i64, body: T) -> Response {
    let location = format!("{}/{}", collection, id);
    (StatusCode::CREATED, [(header::LOCATION, location)], Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_sets_location_from_id() {
        let response = created(PRODUCTS_PATH, 5, serde_json::json!({ "id": 5 }));

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::LOCATION], "/api/products/5");
    }

    #[test]
    fn test_missing_id_is_an_unexpected_error() {
        let err = assigned_id(None).unwrap_err();

        assert!(matches!(err, ApiError::Service(ServiceError::Unexpected(_))));
        assert_eq!(assigned_id(Some(7)).unwrap(), 7);
    }
}
