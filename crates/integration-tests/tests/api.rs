//! Routing, catalog and error-shape tests against the in-process router.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use ecoquest_integration_tests::{TestApp, decimal};
use ecoquest_storefront::feed::{FeedError, FeedProduct, ProductFeed};

struct DownFeed;

impl ProductFeed for DownFeed {
    async fn fetch(&self) -> Result<Vec<FeedProduct>, FeedError> {
        Err(FeedError::Status(503))
    }
}

fn ids(list: &Value) -> Vec<i64> {
    list["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_owned()));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = TestApp::new().await;
    let (_, headers, _) = app.request(Method::GET, "/health", None).await;
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_products_are_enriched() {
    let app = TestApp::new().await;
    let (status, list) = app.get("/products").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 3);
    assert_eq!(ids(&list), vec![1, 2, 3]);

    let lamp = &list["products"][0];
    assert_eq!(lamp["title"], "Eco Desk Lamp");
    assert_eq!(lamp["ecoCategory"], "home-automation");
    assert_eq!(decimal(&lamp["price"]), decimal(&json!("100000")));
    assert_eq!(lamp["ecoBenefits"].as_array().unwrap().len(), 3);

    assert_eq!(decimal(&list["priceRange"]["min"]), decimal(&json!("50000")));
    assert_eq!(decimal(&list["priceRange"]["max"]), decimal(&json!("250000")));
}

#[tokio::test]
async fn test_product_filters() {
    let app = TestApp::new().await;

    let (_, list) = app.get("/products?category=home-automation").await;
    assert_eq!(ids(&list), vec![1]);

    let (_, list) = app.get("/products?inStock=true").await;
    assert_eq!(ids(&list), vec![1, 3]);

    let (_, list) = app.get("/products?minPrice=60000").await;
    assert_eq!(ids(&list), vec![1, 2]);

    let (_, list) = app.get("/products?searchQuery=RECYCLED").await;
    assert_eq!(ids(&list), vec![3]);

    let (_, list) = app.get("/products?sortBy=priceHigh").await;
    assert_eq!(ids(&list), vec![2, 1, 3]);

    // Slider defaults do not narrow the list
    let (_, list) = app.get("/products?minRating=0&maxPrice=0&ecoMinimum=0").await;
    assert_eq!(list["total"], 3);
}

#[tokio::test]
async fn test_product_detail_and_not_found() {
    let app = TestApp::new().await;

    let (status, product) = app.get("/products/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["ecoCategory"], "eco-monitoring");

    let (status, body) = app.get("/products/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("999"));
}

#[tokio::test]
async fn test_categories() {
    let app = TestApp::new().await;
    let (status, categories) = app.get("/categories").await;

    assert_eq!(status, StatusCode::OK);
    let categories = categories.as_array().unwrap();
    assert_eq!(categories.len(), 10);
    assert_eq!(categories[0]["id"], "smart-waste");
}

#[tokio::test]
async fn test_feed_outage_is_bad_gateway() {
    let app = TestApp::with_feed(&DownFeed).await;

    let (status, body) = app.get("/products").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "External service error");

    // Categories are static and still served
    let (status, _) = app.get("/categories").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_account_requires_login() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/account").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = app.get("/quests").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_login_logout() {
    let app = TestApp::new().await;

    let user = app.register("ranger", "ranger@forest.example").await;
    assert_eq!(user["username"], "ranger");
    assert_eq!(user["coins"], 0);
    assert!(user.get("password").is_none());

    let (status, _) = app
        .post(
            "/auth/register",
            &json!({ "username": "other", "email": "RANGER@forest.example", "password": "x" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, _) = app.request(Method::POST, "/auth/logout", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.get("/account").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post(
            "/auth/login",
            &json!({ "email": "ranger@forest.example", "password": "wrong" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, user) = app
        .post(
            "/auth/login",
            &json!({ "email": "ranger@forest.example", "password": "correct horse" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["email"], "ranger@forest.example");
}

#[tokio::test]
async fn test_profile_and_top_up() {
    let app = TestApp::new().await;
    app.register("ranger", "ranger@forest.example").await;
    app.register("other", "other@forest.example").await;

    let (status, _) = app
        .post("/account/profile", &json!({ "email": "ranger@forest.example" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, user) = app
        .post(
            "/account/profile",
            &json!({ "name": "Robin", "email": "robin@forest.example" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["name"], "Robin");

    let (status, _) = app.post("/account/topup", &json!({ "amount": "0" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, user) = app
        .post("/account/topup", &json!({ "amount": "150000" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&user["balance"]), decimal(&json!("150000")));
}

#[tokio::test]
async fn test_cart_endpoints() {
    let app = TestApp::new().await;

    let (status, cart) = app
        .post("/cart/add", &json!({ "productId": 1, "quantity": 2 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["totalItems"], 2);
    assert_eq!(decimal(&cart["totalPrice"]), decimal(&json!("180000")));

    // Quantity is clamped to stock
    let (_, cart) = app
        .post("/cart/add", &json!({ "productId": 1, "quantity": 10 }))
        .await;
    assert_eq!(cart["items"][0]["quantity"], 5);

    let (status, _) = app.post("/cart/add", &json!({ "productId": 2 })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.post("/cart/add", &json!({ "productId": 42 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, cart) = app
        .post("/cart/update", &json!({ "productId": 1, "quantity": 1 }))
        .await;
    assert_eq!(cart["totalItems"], 1);

    let (status, _) = app
        .post("/cart/update", &json!({ "productId": 3, "quantity": 1 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, cart) = app
        .post("/cart/update", &json!({ "productId": 1, "quantity": 0 }))
        .await;
    assert_eq!(cart["items"], json!([]));

    app.post("/cart/add", &json!({ "productId": 3 })).await;
    let (_, cart) = app.post("/cart/remove", &json!({ "productId": 3 })).await;
    assert_eq!(cart["totalItems"], 0);

    app.post("/cart/add", &json!({ "productId": 3, "quantity": 4 })).await;
    let (status, cart) = app.post("/cart/clear", &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["totalItems"], 0);

    let (_, cart) = app.get("/cart").await;
    assert_eq!(cart["items"], json!([]));
}
