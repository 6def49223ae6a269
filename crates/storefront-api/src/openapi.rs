//! OpenAPI document for the HTTP surface.

use axum::Json;
use utoipa::OpenApi;

use storefront_entity::{Customer, CustomerDto, Order, OrderDto, Product};

use crate::error::ProblemDetails;
use crate::handlers::{customer, health, order, product};

/// Generated OpenAPI 3 description of every route.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        description = "CRUD over customers, products and the orders linking them"
    ),
    paths(
        customer::list_customers,
        customer::get_customer,
        customer::add_customer,
        customer::update_customer,
        customer::delete_customer,
        product::list_products,
        product::get_product,
        product::add_product,
        product::update_product,
        product::delete_product,
        order::list_orders,
        order::get_order,
        order::add_order,
        order::update_order,
        order::delete_order,
        health::heartbeat,
    ),
    components(schemas(Customer, CustomerDto, Product, Order, OrderDto, ProblemDetails)),
    tags(
        (name = "customer", description = "Customers"),
        (name = "product", description = "Products"),
        (name = "order", description = "Orders, always returned with customer and product"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/customer",
            "/api/customer/{id}",
            "/api/product",
            "/api/product/{id}",
            "/api/order",
            "/api/order/{id}",
            "/heartbeat",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
