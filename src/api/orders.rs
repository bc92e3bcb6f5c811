//! Order endpoints. POST places the order and reserves stock; PUT changes
//! header fields only.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use super::{
    assigned_id, created, ApiError, AppState, ErrorResponse, Id, ValidatedJson, ORDERS_PATH,
};
use crate::dto::OrderDto;

#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "orders",
    responses((status = 200, description = "All orders in id order", body = [OrderDto]))
)]
pub(super) async fn find_all(State(state): State<AppState>) -> Result<Json<Vec<OrderDto>>, ApiError> {
    Ok(Json(state.orders.find_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "The order", body = OrderDto),
        (status = 400, description = "Non-numeric id", body = ErrorResponse),
        (status = 404, description = "No order with this id", body = ErrorResponse),
    )
)]
pub(super) async fn find_by_id(
    State(state): State<AppState>,
    Id(id): Id,
) -> Result<Json<OrderDto>, ApiError> {
    Ok(Json(state.orders.find_by_id(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "orders",
    request_body = OrderDto,
    responses(
        (status = 201, description = "Order created", body = OrderDto),
        (status = 400, description = "Invalid body, or stock cannot cover the order", body = ErrorResponse),
        (status = 404, description = "Referenced product not found", body = ErrorResponse),
    )
)]
pub(super) async fn create(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<OrderDto>,
) -> Result<Response, ApiError> {
    let order = state.orders.create(dto).await?;
    let id = assigned_id(order.id)?;
    Ok(created(ORDERS_PATH, id, order))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "Order id")),
    request_body = OrderDto,
    responses(
        (status = 200, description = "Order updated", body = OrderDto),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "No order with this id", body = ErrorResponse),
    )
)]
pub(super) async fn update(
    State(state): State<AppState>,
    Id(id): Id,
    ValidatedJson(dto): ValidatedJson<OrderDto>,
) -> Result<Json<OrderDto>, ApiError> {
    Ok(Json(state.orders.update(dto, id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 404, description = "No order with this id", body = ErrorResponse),
    )
)]
pub(super) async fn delete(State(state): State<AppState>, Id(id): Id) -> Result<StatusCode, ApiError> {
    state.orders.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
