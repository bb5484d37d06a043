//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::{AuthError, CartError, CheckoutError, QuestError};
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Key-value store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication or account operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Quest operation failed.
    #[error("Quest error: {0}")]
    Quest(#[from] QuestError),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// The product feed could not be loaded.
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::CatalogUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Auth(err) => auth_status(err),
            Self::Cart(err) => cart_status(err),
            Self::Quest(err) => quest_status(err),
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart | CheckoutError::Pricing(_) => StatusCode::BAD_REQUEST,
                CheckoutError::InsufficientCoins { .. } | CheckoutError::InsufficientBalance => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                CheckoutError::Auth(err) => auth_status(err),
                CheckoutError::Cart(err) => cart_status(err),
                CheckoutError::Quest(err) => quest_status(err),
            },
        }
    }

    fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

const fn auth_status(err: &AuthError) -> StatusCode {
    match err {
        AuthError::InvalidCredentials | AuthError::NotAuthenticated => StatusCode::UNAUTHORIZED,
        AuthError::UserAlreadyExists | AuthError::EmailTaken => StatusCode::CONFLICT,
        AuthError::InvalidEmail(_) | AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AuthError::UserNotFound(_) => StatusCode::NOT_FOUND,
        AuthError::InsufficientBalance => StatusCode::UNPROCESSABLE_ENTITY,
        AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

const fn cart_status(err: &CartError) -> StatusCode {
    match err {
        CartError::OutOfStock(_) => StatusCode::CONFLICT,
        CartError::NotInCart(_) => StatusCode::NOT_FOUND,
        CartError::InvalidQuantity => StatusCode::BAD_REQUEST,
        CartError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

const fn quest_status(err: &QuestError) -> StatusCode {
    match err {
        QuestError::NotFound(_) => StatusCode::NOT_FOUND,
        QuestError::AlreadyCompleted(_) => StatusCode::CONFLICT,
        QuestError::NotActive(_) | QuestError::ProgressIncomplete(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        QuestError::NoRequirement(_) | QuestError::InvalidAmount => StatusCode::BAD_REQUEST,
        QuestError::Auth(err) => auth_status(err),
        QuestError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::CatalogUnavailable(_) => "External service error".to_string(),
            _ if self.is_server_error() => "Internal server error".to_string(),
            Self::Auth(err) => err.to_string(),
            Self::Cart(err) => err.to_string(),
            Self::Quest(err) => err.to_string(),
            Self::Checkout(err) => err.to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after login or registration to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("quest", "Quest completed", Some(&[("quest_id", "q2")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use ecoquest_core::{PricingError, ProductId, QuestId};

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::UserAlreadyExists)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::CatalogUnavailable("timeout".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_nested_errors_map_through() {
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::Pricing(
                PricingError::InvalidCoupon("NOPE".to_string())
            ))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::Auth(
                AuthError::NotAuthenticated
            ))),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Quest(QuestError::NotFound(QuestId::from("q9")))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Cart(CartError::OutOfStock(ProductId::new(1)))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Quest(QuestError::Store(StoreError::Poisoned))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
