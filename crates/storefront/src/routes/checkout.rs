//! Checkout route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::instrument;

use ecoquest_core::PriceBreakdown;

use crate::error::{Result, add_breadcrumb};
use crate::services::{CheckoutReceipt, CheckoutRequest};
use crate::state::AppState;

/// Quote request body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteRequest {
    pub coupon: Option<String>,
    pub coins: u32,
}

/// Price the current cart with an optional coupon and coins.
#[instrument(skip(state))]
pub async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<PriceBreakdown>> {
    let breakdown = state
        .checkout()
        .quote(request.coupon.as_deref(), request.coins)?;
    Ok(Json(breakdown))
}

/// Place an order for the current cart.
#[instrument(skip(state))]
pub async fn place_order(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutReceipt>)> {
    let receipt = state
        .blocking(move |state| Ok(state.checkout().place_order(&request)?))
        .await?;

    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_number", receipt.order.order_number.as_str())]),
    );

    Ok((StatusCode::CREATED, Json(receipt)))
}
