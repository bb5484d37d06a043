//! Authentication extractor.
//!
//! The logged-in user is the store's `user` record; there are no tokens or
//! cookies to check.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::{AppError, set_sentry_user};
use crate::models::User;
use crate::services::AuthError;
use crate::state::AppState;

/// Extractor that requires a logged-in user.
///
/// Rejects with `401 Unauthorized` when nobody is logged in. On success the
/// user is attached to the Sentry scope.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.display_name())
/// }
/// ```
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = state
            .auth()
            .current_user()
            .ok_or(AppError::Auth(AuthError::NotAuthenticated))?;

        set_sentry_user(&user.id, Some(user.email.as_str()));
        tracing::Span::current().record("user_id", tracing::field::display(&user.id));

        Ok(Self(user))
    }
}
