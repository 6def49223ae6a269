//! Order CRUD handlers. Every order returned has its customer and product
//! loaded.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::info;

use storefront_core::error::AppError;
use storefront_core::types::OrderId;
use storefront_entity::{Order, OrderDto};

use crate::dto::ApiResponse;
use crate::error::{ApiError, ProblemDetails};
use crate::extractors::{ApiJson, IdPath};
use crate::state::AppState;

/// GET /api/order
#[utoipa::path(
    get,
    path = "/api/order",
    tag = "order",
    responses((status = 200, description = "Every order", body = [Order]))
)]
pub async fn list_orders(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Order>>>, ApiError> {
    let orders = state.order_service.list_orders().await?;
    info!(count = orders.len(), "Listed orders");
    Ok(Json(ApiResponse::list(orders)))
}

/// GET /api/order/{id}
#[utoipa::path(
    get,
    path = "/api/order/{id}",
    tag = "order",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "The order", body = Order),
        (status = 404, description = "No such order", body = ProblemDetails)
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    IdPath(id): IdPath<OrderId>,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
    let order = state
        .order_service
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    info!(order_id = %id, "Fetched order");
    Ok(Json(ApiResponse::ok(order)))
}

/// POST /api/order
#[utoipa::path(
    post,
    path = "/api/order",
    tag = "order",
    request_body = OrderDto,
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 400, description = "Unknown customer or product", body = ProblemDetails)
    )
)]
pub async fn add_order(
    State(state): State<AppState>,
    ApiJson(dto): ApiJson<OrderDto>,
) -> Result<(StatusCode, Json<ApiResponse<Order>>), ApiError> {
    let order = state.order_service.add_order(dto).await?;
    info!(order_id = %order.id, "Posted order");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(order))))
}

/// PUT /api/order/{id}
#[utoipa::path(
    put,
    path = "/api/order/{id}",
    tag = "order",
    params(("id" = i64, Path, description = "Order id")),
    request_body = OrderDto,
    responses(
        (status = 200, description = "Order updated", body = Order),
        (status = 400, description = "Unknown customer or product", body = ProblemDetails),
        (status = 404, description = "No such order", body = ProblemDetails)
    )
)]
pub async fn update_order(
    State(state): State<AppState>,
    IdPath(id): IdPath<OrderId>,
    ApiJson(dto): ApiJson<OrderDto>,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
    let order = state.order_service.update_order(id, dto).await?;
    info!(order_id = %id, "Put order");
    Ok(Json(ApiResponse::ok(order)))
}

/// DELETE /api/order/{id}
#[utoipa::path(
    delete,
    path = "/api/order/{id}",
    tag = "order",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 404, description = "No such order", body = ProblemDetails)
    )
)]
pub async fn delete_order(
    State(state): State<AppState>,
    IdPath(id): IdPath<OrderId>,
) -> Result<StatusCode, ApiError> {
    state.order_service.delete_order(id).await?;
    info!(order_id = %id, "Order deleted");
    Ok(StatusCode::NO_CONTENT)
}
