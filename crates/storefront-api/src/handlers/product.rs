//! Product CRUD handlers. Request bodies are a bare JSON string.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::info;

use storefront_core::error::AppError;
use storefront_core::types::ProductId;
use storefront_entity::Product;

use crate::dto::ApiResponse;
use crate::error::{ApiError, ProblemDetails};
use crate::extractors::{ApiJson, IdPath};
use crate::state::AppState;

/// GET /api/product
#[utoipa::path(
    get,
    path = "/api/product",
    tag = "product",
    responses((status = 200, description = "Every product", body = [Product]))
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    let products = state.product_service.list_products().await?;
    info!(count = products.len(), "Listed products");
    Ok(Json(ApiResponse::list(products)))
}

/// GET /api/product/{id}
#[utoipa::path(
    get,
    path = "/api/product/{id}",
    tag = "product",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "The product", body = Product),
        (status = 404, description = "No such product", body = ProblemDetails)
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    IdPath(id): IdPath<ProductId>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    let product = state
        .product_service
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
    info!(product_id = %id, "Fetched product");
    Ok(Json(ApiResponse::ok(product)))
}

/// POST /api/product
#[utoipa::path(
    post,
    path = "/api/product",
    tag = "product",
    request_body(content = String, description = "Product description"),
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Missing description", body = ProblemDetails)
    )
)]
pub async fn add_product(
    State(state): State<AppState>,
    ApiJson(description): ApiJson<String>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), ApiError> {
    let product = state.product_service.add_product(description).await?;
    info!(product_id = %product.id, "Posted product");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(product))))
}

/// PUT /api/product/{id}
#[utoipa::path(
    put,
    path = "/api/product/{id}",
    tag = "product",
    params(("id" = i64, Path, description = "Product id")),
    request_body(content = String, description = "New product description"),
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Missing description", body = ProblemDetails),
        (status = 404, description = "No such product", body = ProblemDetails)
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    IdPath(id): IdPath<ProductId>,
    ApiJson(description): ApiJson<String>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    let product = state.product_service.update_product(id, description).await?;
    info!(product_id = %id, "Put product");
    Ok(Json(ApiResponse::ok(product)))
}

/// DELETE /api/product/{id}
#[utoipa::path(
    delete,
    path = "/api/product/{id}",
    tag = "product",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product and its orders deleted"),
        (status = 404, description = "No such product", body = ProblemDetails)
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    IdPath(id): IdPath<ProductId>,
) -> Result<StatusCode, ApiError> {
    state.product_service.delete_product(id).await?;
    info!(product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
