//! In-process tests for the JSON route table.
//!
//! Each test builds the router over a fresh in-memory store and drives it
//! with `oneshot` requests.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use shoplite_integration_tests::test_app;

/// Issue a GET and return (status, parsed body).
///
/// Error responses carry plain-text bodies; those come back as JSON strings.
async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_response(response).await
}

/// Issue a POST with a JSON body and return (status, parsed body).
async fn post(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read_response(response).await
}

async fn read_response(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

#[tokio::test]
async fn test_create_shop_and_fetch_it_back() {
    let app = test_app().await;

    let (status, body) = post(&app, "/shop", &json!({"name": "Acme"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1}));

    let (status, body) = get(&app, "/shop/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": 1, "name": "Acme", "products": [], "orders": []})
    );
}

#[tokio::test]
async fn test_duplicate_shop_name_is_a_conflict() {
    let app = test_app().await;

    let (status, _) = post(&app, "/shop", &json!({"name": "Acme"})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post(&app, "/shop", &json!({"name": "Acme"})).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_product_links_it_to_the_shop() {
    let app = test_app().await;
    post(&app, "/shop", &json!({"name": "Acme"})).await;

    let (status, body) = post(
        &app,
        "/product",
        &json!({"name": "Widget", "price": 10, "shopId": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"product": 1, "link": 1}));

    let (status, body) = get(&app, "/shop/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"], json!([1]));
    assert_eq!(body["orders"], json!([]));
}

#[tokio::test]
async fn test_create_product_against_missing_shop_is_a_conflict() {
    let app = test_app().await;

    let (status, _) = post(
        &app,
        "/product",
        &json!({"name": "Widget", "price": 10, "shopId": 99}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_order_links_it_to_the_shop() {
    let app = test_app().await;
    post(&app, "/shop", &json!({"name": "Acme"})).await;

    let (status, body) = post(&app, "/order", &json!({"shopId": 1})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"order": 1, "link": 1}));

    // No line items yet: the derived value stays null, not zero.
    let (status, body) = get(&app, "/order/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "value": null}));
}

#[tokio::test]
async fn test_line_items_price_the_order() {
    let app = test_app().await;
    post(&app, "/shop", &json!({"name": "Acme"})).await;
    post(
        &app,
        "/product",
        &json!({"name": "Widget", "price": 10, "shopId": 1}),
    )
    .await;
    post(&app, "/order", &json!({"shopId": 1})).await;

    let (status, body) = post(
        &app,
        "/lineItem",
        &json!({"productId": 1, "orderId": 1, "quantity": 3}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1}));

    let (_, body) = get(&app, "/order/1").await;
    assert_eq!(body["value"], json!(30));

    let (_, body) = get(&app, "/lineItems").await;
    assert_eq!(
        body,
        json!([{
            "id": 1,
            "product_id": 1,
            "order_id": 1,
            "quantity": 3,
            "value": 30
        }])
    );

    let (_, body) = get(&app, "/product/1").await;
    assert_eq!(body["line_item_ids"], json!([1]));
}

#[tokio::test]
async fn test_line_item_with_dangling_references_is_a_conflict() {
    let app = test_app().await;

    let (status, _) = post(
        &app,
        "/lineItem",
        &json!({"productId": 1, "orderId": 1, "quantity": 2}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_missing_entities_return_404() {
    let app = test_app().await;

    for uri in ["/product/5", "/order/5", "/shop/5"] {
        let (status, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "GET {uri}");
    }
}

#[tokio::test]
async fn test_product_without_line_items_lists_an_empty_id_list() {
    let app = test_app().await;
    post(&app, "/shop", &json!({"name": "Acme"})).await;
    post(
        &app,
        "/product",
        &json!({"name": "Widget", "price": 10, "shopId": 1}),
    )
    .await;

    let (status, body) = get(&app, "/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"id": 1, "name": "Widget", "price": 10, "line_item_ids": []}])
    );
}

#[tokio::test]
async fn test_product_listing_pages_cap_at_twenty_rows() {
    let app = test_app().await;
    post(&app, "/shop", &json!({"name": "Acme"})).await;

    for n in 0..25 {
        let (status, _) = post(
            &app,
            "/product",
            &json!({"name": format!("Product {n}"), "price": n, "shopId": 1}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = get(&app, "/products").await;
    let first = body.as_array().unwrap();
    assert_eq!(first.len(), 20);
    assert_eq!(first[0]["id"], json!(1));
    assert_eq!(first[19]["id"], json!(20));

    let (_, body) = get(&app, "/products?page=1").await;
    let second = body.as_array().unwrap();
    assert_eq!(second.len(), 5);
    assert_eq!(second[0]["id"], json!(21));
}
