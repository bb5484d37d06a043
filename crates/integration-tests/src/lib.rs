//! Integration tests for Eco Quest.
//!
//! Tests drive the storefront router in-process with
//! `tower::ServiceExt::oneshot`, over an in-memory store and a static
//! product feed. No network or files are touched.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ecoquest-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `api` - Routing, catalog endpoints, error responses
//! - `checkout_flow` - Register, fill the cart, pay
//! - `quest_flow` - Quest lifecycle and coin rewards

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

use ecoquest_storefront::config::StorefrontConfig;
use ecoquest_storefront::feed::{FeedProduct, ProductFeed, StaticProductFeed};
use ecoquest_storefront::services::Catalog;
use ecoquest_storefront::state::AppState;
use ecoquest_storefront::store::{KeyValueStore, MemoryStore};

/// Largest response body the helpers will read.
const MAX_BODY: usize = 1 << 20;

/// Raw feed products behind every test app.
///
/// After enrichment (prices ×10 000):
/// - `1`: Rp 100.000, 10% off, stock 5
/// - `2`: Rp 250.000, stock 0
/// - `3`: Rp 50.000, stock 20
#[must_use]
pub fn feed_products() -> Vec<FeedProduct> {
    vec![
        FeedProduct {
            id: 1,
            title: "Desk Lamp".to_owned(),
            description: "Lights up your desk.".to_owned(),
            price: 10.0,
            discount_percentage: 10.0,
            rating: 4.6,
            stock: 5,
            brand: Some("Lumen".to_owned()),
            category: "lighting".to_owned(),
            thumbnail: "https://cdn.example/lamp.png".to_owned(),
            images: Vec::new(),
        },
        FeedProduct {
            id: 2,
            title: "Compost Bin".to_owned(),
            description: "Turns scraps into soil.".to_owned(),
            price: 25.0,
            discount_percentage: 0.0,
            rating: 4.1,
            stock: 0,
            brand: None,
            category: "groceries".to_owned(),
            thumbnail: "https://cdn.example/bin.png".to_owned(),
            images: Vec::new(),
        },
        FeedProduct {
            id: 3,
            title: "Phone Case".to_owned(),
            description: "Made from recycled plastic.".to_owned(),
            price: 5.0,
            discount_percentage: 0.0,
            rating: 3.8,
            stock: 20,
            brand: Some("Shell".to_owned()),
            category: "smartphones".to_owned(),
            thumbnail: "https://cdn.example/case.png".to_owned(),
            images: Vec::new(),
        },
    ]
}

/// A storefront over an in-memory store.
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    /// App with the standard test catalog.
    pub async fn new() -> Self {
        Self::with_feed(&StaticProductFeed::new(feed_products())).await
    }

    /// App whose catalog is loaded from `feed`.
    pub async fn with_feed<F: ProductFeed>(feed: &F) -> Self {
        let store = MemoryStore::new();
        let catalog = Catalog::load(feed, &store).await;
        let store: Arc<dyn KeyValueStore> = Arc::new(store);
        let config = StorefrontConfig::from_lookup(|_| None).expect("default config");
        let state = AppState::new(config, store, catalog);

        Self {
            router: ecoquest_storefront::app(state.clone()),
            state,
        }
    }

    /// Send a request and return the raw response parts.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<&Value>,
    ) -> (StatusCode, axum::http::HeaderMap, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), MAX_BODY)
            .await
            .expect("readable body");
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        (status, headers, value)
    }

    /// `GET` returning status and JSON body.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let (status, _, body) = self.request(Method::GET, uri, None).await;
        (status, body)
    }

    /// `POST` a JSON body, returning status and JSON body.
    pub async fn post(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        let (status, _, body) = self.request(Method::POST, uri, Some(body)).await;
        (status, body)
    }

    /// Register and log in a user.
    ///
    /// # Panics
    ///
    /// Panics if registration does not succeed.
    pub async fn register(&self, username: &str, email: &str) -> Value {
        let (status, user) = self
            .post(
                "/auth/register",
                &serde_json::json!({
                    "username": username,
                    "email": email,
                    "password": "correct horse",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {user}");
        user
    }
}

/// Parse a serialized price or other decimal field.
///
/// # Panics
///
/// Panics if the value is not a decimal string or number.
#[must_use]
pub fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().expect("decimal string"),
        Value::Number(n) => n.to_string().parse().expect("decimal number"),
        other => panic!("not a decimal: {other}"),
    }
}
