//! Customer CRUD handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::info;

use storefront_core::error::AppError;
use storefront_core::types::CustomerId;
use storefront_entity::{Customer, CustomerDto};

use crate::dto::ApiResponse;
use crate::error::{ApiError, ProblemDetails};
use crate::extractors::{IdPath, ValidatedJson};
use crate::state::AppState;

/// GET /api/customer
#[utoipa::path(
    get,
    path = "/api/customer",
    tag = "customer",
    responses((status = 200, description = "Every customer", body = [Customer]))
)]
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Customer>>>, ApiError> {
    let customers = state.customer_service.list_customers().await?;
    info!(count = customers.len(), "Listed customers");
    Ok(Json(ApiResponse::list(customers)))
}

/// GET /api/customer/{id}
#[utoipa::path(
    get,
    path = "/api/customer/{id}",
    tag = "customer",
    params(("id" = i64, Path, description = "Customer id")),
    responses(
        (status = 200, description = "The customer", body = Customer),
        (status = 404, description = "No such customer", body = ProblemDetails)
    )
)]
pub async fn get_customer(
    State(state): State<AppState>,
    IdPath(id): IdPath<CustomerId>,
) -> Result<Json<ApiResponse<Customer>>, ApiError> {
    let customer = state
        .customer_service
        .get_customer(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Customer {id} not found")))?;
    info!(customer_id = %id, "Fetched customer");
    Ok(Json(ApiResponse::ok(customer)))
}

/// POST /api/customer
#[utoipa::path(
    post,
    path = "/api/customer",
    tag = "customer",
    request_body = CustomerDto,
    responses(
        (status = 201, description = "Customer created", body = Customer),
        (status = 400, description = "Invalid body", body = ProblemDetails)
    )
)]
pub async fn add_customer(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CustomerDto>,
) -> Result<(StatusCode, Json<ApiResponse<Customer>>), ApiError> {
    let customer = state.customer_service.add_customer(dto).await?;
    info!(customer_id = %customer.id, "Posted customer");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(customer))))
}

/// PUT /api/customer/{id}
#[utoipa::path(
    put,
    path = "/api/customer/{id}",
    tag = "customer",
    params(("id" = i64, Path, description = "Customer id")),
    request_body = CustomerDto,
    responses(
        (status = 200, description = "Customer updated", body = Customer),
        (status = 400, description = "Invalid body", body = ProblemDetails),
        (status = 404, description = "No such customer", body = ProblemDetails)
    )
)]
pub async fn update_customer(
    State(state): State<AppState>,
    IdPath(id): IdPath<CustomerId>,
    ValidatedJson(dto): ValidatedJson<CustomerDto>,
) -> Result<Json<ApiResponse<Customer>>, ApiError> {
    let customer = state.customer_service.update_customer(id, dto).await?;
    info!(customer_id = %id, "Put customer");
    Ok(Json(ApiResponse::ok(customer)))
}

/// DELETE /api/customer/{id}
#[utoipa::path(
    delete,
    path = "/api/customer/{id}",
    tag = "customer",
    params(("id" = i64, Path, description = "Customer id")),
    responses(
        (status = 204, description = "Customer and their orders deleted"),
        (status = 404, description = "No such customer", body = ProblemDetails)
    )
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    IdPath(id): IdPath<CustomerId>,
) -> Result<StatusCode, ApiError> {
    state.customer_service.delete_customer(id).await?;
    info!(customer_id = %id, "Customer deleted");
    Ok(StatusCode::NO_CONTENT)
}
