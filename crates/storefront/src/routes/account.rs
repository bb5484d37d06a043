//! Account route handlers (require a logged-in user).

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use ecoquest_core::Price;

use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::{Order, User};
use crate::state::AppState;

/// Profile update request body.
#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
}

/// Balance top-up request body.
#[derive(Debug, Deserialize)]
pub struct TopUpRequest {
    /// Rupiah to add.
    pub amount: Decimal,
}

/// The logged-in user.
#[instrument(skip_all)]
pub async fn index(RequireUser(user): RequireUser) -> Json<User> {
    Json(user)
}

/// Update name and email.
#[instrument(skip(state, _user))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<User>> {
    let user = state
        .blocking(move |state| {
            Ok(state
                .auth()
                .update_profile(request.name.as_deref(), &request.email)?)
        })
        .await?;
    Ok(Json(user))
}

/// Add to the spending balance.
#[instrument(skip(state, _user))]
pub async fn top_up(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    Json(request): Json<TopUpRequest>,
) -> Result<Json<User>> {
    if request.amount <= Decimal::ZERO {
        return Err(AppError::BadRequest("amount must be positive".to_string()));
    }
    let amount = Price::new(request.amount);
    let user = state
        .blocking(move |state| Ok(state.auth().add_balance(amount)?))
        .await?;
    Ok(Json(user))
}

/// Purchase history, newest first.
#[instrument(skip_all)]
pub async fn orders(RequireUser(user): RequireUser) -> Json<Vec<Order>> {
    Json(user.purchase_history)
}
