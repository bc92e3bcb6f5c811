use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use super::{
    assigned_id, created, ApiError, AppState, ErrorResponse, Id, ValidatedJson, PRODUCTS_PATH,
};
use crate::dto::ProductDto;

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "products",
    responses((status = 200, description = "All products in id order", body = [ProductDto]))
)]
pub(super) async fn find_all(State(state): State<AppState>) -> Result<Json<Vec<ProductDto>>, ApiError> {
    Ok(Json(state.products.find_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "The product", body = ProductDto),
        (status = 400, description = "Non-numeric id", body = ErrorResponse),
        (status = 404, description = "No product with this id", body = ErrorResponse),
    )
)]
pub(super) async fn find_by_id(
    State(state): State<AppState>,
    Id(id): Id,
) -> Result<Json<ProductDto>, ApiError> {
    Ok(Json(state.products.find_by_id(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "products",
    request_body = ProductDto,
    responses(
        (status = 201, description = "Product created", body = ProductDto),
        (status = 400, description = "Validation failed", body = ErrorResponse),
    )
)]
pub(super) async fn create(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ProductDto>,
) -> Result<Response, ApiError> {
    let product = state.products.create(dto).await?;
    let id = assigned_id(product.id)?;
    Ok(created(PRODUCTS_PATH, id, product))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    request_body = ProductDto,
    responses(
        (status = 200, description = "Product updated", body = ProductDto),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "No product with this id", body = ErrorResponse),
    )
)]
pub(super) async fn update(
    State(state): State<AppState>,
    Id(id): Id,
    ValidatedJson(dto): ValidatedJson<ProductDto>,
) -> Result<Json<ProductDto>, ApiError> {
    Ok(Json(state.products.update(dto, id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, description = "Product is still referenced by order items", body = ErrorResponse),
        (status = 404, description = "No product with this id", body = ErrorResponse),
    )
)]
pub(super) async fn delete(State(state): State<AppState>, Id(id): Id) -> Result<StatusCode, ApiError> {
    state.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
