//! OpenAPI document for the REST surface.

use axum::Json;
use utoipa::OpenApi;

use super::{order_items, orders, products, ErrorResponse};
use crate::dto::{OrderDto, OrderItemDto, ProductDto};
use crate::model::OrderStatus;
use crate::validation::FieldViolation;

pub const TITLE: &str = "E-Commerce API";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "E-Commerce API",
        description = "Products, orders and order items with stock reservation on order placement"
    ),
    paths(
        products::find_all,
        products::find_by_id,
        products::create,
        products::update,
        products::delete,
        orders::find_all,
        orders::find_by_id,
        orders::create,
        orders::update,
        orders::delete,
        order_items::find_all,
        order_items::find_by_id,
        order_items::create,
        order_items::update,
        order_items::delete,
    ),
    components(schemas(
        ProductDto,
        OrderDto,
        OrderItemDto,
        OrderStatus,
        ErrorResponse,
        FieldViolation
    )),
    tags(
        (name = "products", description = "Product catalog"),
        (name = "orders", description = "Orders and stock reservation"),
        (name = "order-items", description = "Line items of existing orders")
    )
)]
pub struct ApiDoc;

pub(super) async fn api_docs() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_covers_every_collection() {
        let doc = ApiDoc::openapi();

        assert_eq!(doc.info.title, TITLE);
        for path in [
            "/api/products",
            "/api/products/{id}",
            "/api/orders",
            "/api/orders/{id}",
            "/api/order-items",
            "/api/order-items/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_schemas_use_wire_names() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schemas = &json["components"]["schemas"];

        assert!(schemas["OrderDto"]["properties"]["orderItems"].is_object());
        assert!(schemas["OrderItemDto"]["properties"]["unitPrice"].is_object());
        assert_eq!(schemas["OrderStatus"]["enum"][0], "PENDING");
    }
}
