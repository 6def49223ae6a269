//! Route definitions for the Storefront HTTP API.
//!
//! Entity routes are mounted under `/api`; the health check and the
//! OpenAPI document sit at the root.

use axum::{
    Router, middleware as axum_middleware,
    routing::get,
};

use crate::handlers;
use crate::middleware;
use crate::openapi;
use crate::state::AppState;

/// Build the Axum router with every route and the per-request middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(customer_routes())
        .merge(product_routes())
        .merge(order_routes());

    Router::new()
        .nest("/api", api_routes)
        .route("/heartbeat", get(handlers::health::heartbeat))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::problem::problem_details,
        ))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Customer CRUD
fn customer_routes() -> Router<AppState> {
    use handlers::customer::*;

    Router::new()
        .route("/customer", get(list_customers).post(add_customer))
        .route(
            "/customer/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

/// Product CRUD
fn product_routes() -> Router<AppState> {
    use handlers::product::*;

    Router::new()
        .route("/product", get(list_products).post(add_product))
        .route(
            "/product/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// Order CRUD
fn order_routes() -> Router<AppState> {
    use handlers::order::*;

    Router::new()
        .route("/order", get(list_orders).post(add_order))
        .route(
            "/order/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
}
