//! Cart route handlers.
//!
//! Every mutation answers with the updated cart and its totals, and runs
//! on the blocking pool via [`AppState::blocking`].

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use ecoquest_core::ProductId;

use crate::error::{AppError, Result};
use crate::models::CartSummary;
use crate::state::AppState;

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Quantity update request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    /// Zero or negative removes the line.
    pub quantity: i64,
}

/// Remove-from-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
}

/// Current cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartSummary> {
    Json(state.cart().summary())
}

/// Add a catalog product to the cart.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartSummary>> {
    let summary = state
        .blocking(move |state| {
            let product = state
                .catalog()
                .get(request.product_id)
                .ok_or_else(|| AppError::NotFound(format!("product {}", request.product_id)))?;
            Ok(state.cart().add(product, request.quantity)?)
        })
        .await?;
    Ok(Json(summary))
}

/// Set a line's quantity.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartSummary>> {
    let summary = state
        .blocking(move |state| {
            Ok(state
                .cart()
                .update_quantity(request.product_id, request.quantity)?)
        })
        .await?;
    Ok(Json(summary))
}

/// Remove a line.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartSummary>> {
    let summary = state
        .blocking(move |state| Ok(state.cart().remove(request.product_id)?))
        .await?;
    Ok(Json(summary))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Json<CartSummary>> {
    let summary = state
        .blocking(|state| {
            let cart = state.cart();
            cart.clear()?;
            Ok(cart.summary())
        })
        .await?;
    Ok(Json(summary))
}
