//! Eco Quest storefront library.
//!
//! A themed storefront over a single-user key-value store: an enriched
//! product catalog, a cart with coupon and eco-coin pricing, a quest system
//! that pays coins, and mock authentication. [`app`] builds the JSON API
//! router; the binary adds Sentry and serves it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod feed;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use axum::{Router, extract::Request};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the application router with request tracing.
pub fn app(state: AppState) -> Router {
    routes::routes()
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
                user_id = tracing::field::Empty,
            )
        }))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
