//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::services::{AuthService, CartService, Catalog, CheckoutService};
use crate::store::KeyValueStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// key-value store, the loaded catalog, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Arc<dyn KeyValueStore>,
    catalog: Catalog,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `store` - Key-value store all services read and write
    /// * `catalog` - Product catalog loaded at startup
    #[must_use]
    pub fn new(config: StorefrontConfig, store: Arc<dyn KeyValueStore>, catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                catalog,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the key-value store.
    #[must_use]
    pub fn store(&self) -> &dyn KeyValueStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Authentication service over the shared store.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.store())
    }

    /// Cart service over the shared store.
    #[must_use]
    pub fn cart(&self) -> CartService<'_> {
        CartService::new(self.store())
    }

    /// Checkout service using the configured shipping policy.
    #[must_use]
    pub fn checkout(&self) -> CheckoutService<'_> {
        CheckoutService::new(self.store(), &self.inner.config.shipping)
    }

    /// Run store work on the blocking pool.
    ///
    /// Store calls are synchronous: they take the store's mutation lock
    /// and a file-backed store writes to disk. Mutating handlers go through
    /// here so neither happens on a runtime worker.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or `AppError::Internal` if it panicked.
    pub async fn blocking<T, F>(&self, work: F) -> Result<T, AppError>
    where
        F: FnOnce(&Self) -> Result<T, AppError> + Send + 'static,
        T: Send + 'static,
    {
        let state = self.clone();
        let span = tracing::Span::current();
        tokio::task::spawn_blocking(move || span.in_scope(|| work(&state)))
            .await
            .map_err(|e| AppError::Internal(format!("store task failed: {e}")))?
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::services::CartError;
    use crate::store::MemoryStore;

    fn state() -> AppState {
        let config = StorefrontConfig::from_lookup(|_| None).unwrap();
        AppState::new(config, Arc::new(MemoryStore::new()), Catalog::default())
    }

    #[tokio::test]
    async fn test_blocking_returns_work_result() {
        let state = state();
        let user = state
            .blocking(|state| {
                let password = SecretString::from("correct horse".to_owned());
                Ok(state
                    .auth()
                    .register("ranger", "ranger@forest.example", &password)?)
            })
            .await
            .unwrap();

        assert_eq!(state.auth().current_user().unwrap().id, user.id);
    }

    #[tokio::test]
    async fn test_blocking_maps_errors_and_panics() {
        let state = state();

        let err = state
            .blocking(|_| -> Result<(), AppError> { Err(CartError::InvalidQuantity.into()) })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Cart(CartError::InvalidQuantity)));

        let err = state
            .blocking(|_| -> Result<(), AppError> { panic!("store exploded") })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
