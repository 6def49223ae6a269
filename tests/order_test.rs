//! Integration tests for the order endpoints.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use storefront_entity::Order;

#[tokio::test]
async fn test_orders_are_hydrated() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/order", None).await;
    assert_eq!(response.status, StatusCode::OK);

    let orders: Vec<Order> = serde_json::from_value(response.body["data"].clone()).unwrap();
    assert_eq!(orders.len(), 3);
    assert!(orders.iter().all(Order::is_hydrated));
    assert!(orders.iter().all(|o| o.created_on.is_some()));

    let third = &orders[2];
    assert_eq!(third.customer.as_ref().unwrap().first_name, "Donna");
    assert_eq!(third.product.as_ref().unwrap().description, "tablet");
}

#[tokio::test]
async fn test_add_order() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/order",
            Some(json!({ "customerId": 3, "productId": 1 })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
    let data = &response.body["data"];
    assert_eq!(data["id"], 4);
    assert_eq!(data["customer"]["surname"], "Conner");
    assert_eq!(data["product"]["productDescription"], "laptop");
    assert_eq!(app.count("/api/order").await, 4);
}

#[tokio::test]
async fn test_add_order_unknown_customer() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/order",
            Some(json!({ "customerId": 99, "productId": 1 })),
        )
        .await;

    response.assert_problem(StatusCode::BAD_REQUEST);
    assert_eq!(response.body["title"], "Customer 99 does not exist");
    assert_eq!(response.body["instance"], "/api/order");
    assert_eq!(app.count("/api/order").await, 3);
}

#[tokio::test]
async fn test_update_order_unknown_product() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "PUT",
            "/api/order/1",
            Some(json!({ "customerId": 1, "productId": 42 })),
        )
        .await;

    response.assert_problem(StatusCode::BAD_REQUEST);

    let unchanged = app.request("GET", "/api/order/1", None).await;
    assert_eq!(unchanged.body["data"]["productId"], 1);
}

#[tokio::test]
async fn test_update_order_moves_customer() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "PUT",
            "/api/order/2",
            Some(json!({ "customerId": 3, "productId": 2 })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.text);
    assert_eq!(response.body["data"]["customerId"], 3);
    assert_eq!(response.body["data"]["customer"]["firstName"], "Mark");
}

#[tokio::test]
async fn test_delete_order() {
    let app = helpers::TestApp::new().await;

    let deleted = app.request("DELETE", "/api/order/3", None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let again = app.request("DELETE", "/api/order/3", None).await;
    again.assert_problem(StatusCode::NOT_FOUND);

    assert_eq!(app.count("/api/customer").await, 3);
    assert_eq!(app.count("/api/product").await, 3);
}
