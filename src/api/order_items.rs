//! Standalone order item endpoints. POST needs `orderId` in the body.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use super::{
    assigned_id, created, ApiError, AppState, ErrorResponse, Id, ValidatedJson, ORDER_ITEMS_PATH,
};
use crate::dto::OrderItemDto;

#[utoipa::path(
    get,
    path = "/api/order-items",
    tag = "order-items",
    responses((status = 200, description = "All order items in id order", body = [OrderItemDto]))
)]
pub(super) async fn find_all(State(state): State<AppState>) -> Result<Json<Vec<OrderItemDto>>, ApiError> {
    Ok(Json(state.order_items.find_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/order-items/{id}",
    tag = "order-items",
    params(("id" = i64, Path, description = "Order item id")),
    responses(
        (status = 200, description = "The order item", body = OrderItemDto),
        (status = 400, description = "Non-numeric id", body = ErrorResponse),
        (status = 404, description = "No order item with this id", body = ErrorResponse),
    )
)]
pub(super) async fn find_by_id(
    State(state): State<AppState>,
    Id(id): Id,
) -> Result<Json<OrderItemDto>, ApiError> {
    Ok(Json(state.order_items.find_by_id(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/order-items",
    tag = "order-items",
    request_body = OrderItemDto,
    responses(
        (status = 201, description = "Order item created", body = OrderItemDto),
        (status = 400, description = "Validation failed or missing orderId", body = ErrorResponse),
        (status = 404, description = "Referenced order or product not found", body = ErrorResponse),
    )
)]
pub(super) async fn create(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<OrderItemDto>,
) -> Result<Response, ApiError> {
    let item = state.order_items.create(dto).await?;
    let id = assigned_id(item.id)?;
    Ok(created(ORDER_ITEMS_PATH, id, item))
}

#[utoipa::path(
    put,
    path = "/api/order-items/{id}",
    tag = "order-items",
    params(("id" = i64, Path, description = "Order item id")),
    request_body = OrderItemDto,
    responses(
        (status = 200, description = "Order item updated", body = OrderItemDto),
        (status = 400, description = "Validation failed or product does not exist", body = ErrorResponse),
        (status = 404, description = "No order item with this id", body = ErrorResponse),
    )
)]
pub(super) async fn update(
    State(state): State<AppState>,
    Id(id): Id,
    ValidatedJson(dto): ValidatedJson<OrderItemDto>,
) -> Result<Json<OrderItemDto>, ApiError> {
    Ok(Json(state.order_items.update(dto, id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/order-items/{id}",
    tag = "order-items",
    params(("id" = i64, Path, description = "Order item id")),
    responses(
        (status = 204, description = "Order item deleted"),
        (status = 404, description = "No order item with this id", body = ErrorResponse),
    )
)]
pub(super) async fn delete(State(state): State<AppState>, Id(id): Id) -> Result<StatusCode, ApiError> {
    state.order_items.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
