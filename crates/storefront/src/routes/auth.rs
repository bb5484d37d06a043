//! Authentication route handlers.
//!
//! Mock email/password login. A successful register or login makes the user
//! the store's current user.

use axum::{Json, extract::State, http::StatusCode};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::models::User;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: SecretString,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: SecretString,
}

/// Register and log in.
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let user = state
        .blocking(move |state| {
            Ok(state
                .auth()
                .register(&request.username, &request.email, &request.password)?)
        })
        .await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in.
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<User>> {
    let user = state
        .blocking(move |state| Ok(state.auth().login(&request.email, &request.password)?))
        .await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(Json(user))
}

/// Log out.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Result<StatusCode> {
    state
        .blocking(|state| Ok(state.auth().logout()?))
        .await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}
