//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATA_PATH` - Store file (default: data/storefront.json)
//! - `PRODUCT_FEED_URL` - Product feed endpoint (default: dummyjson, 100 products)
//! - `PRODUCT_FEED_TIMEOUT_SECS` - Feed request timeout (default: 10)
//! - `FREE_SHIPPING_OVER` - Whole-rupiah subtotal above which shipping is free
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use ecoquest_core::{Price, ShippingPolicy};
use thiserror::Error;
use url::Url;

/// Default product feed endpoint.
pub const DEFAULT_FEED_URL: &str = "https://dummyjson.com/products?limit=100";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// File the key-value store is persisted to
    pub data_path: PathBuf,
    /// Product feed configuration
    pub feed: FeedConfig,
    /// Shipping rule applied at checkout
    pub shipping: ShippingPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Product feed configuration.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Endpoint returning `{ "products": [...] }`
    pub url: Url,
    /// Request timeout
    pub timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// Unset or blank variables take their documented defaults, so
    /// `from_lookup(|_| None)` yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let host = env.parse("STOREFRONT_HOST", "127.0.0.1")?;
        let port = env.parse("STOREFRONT_PORT", "3000")?;
        let data_path = PathBuf::from(env.get_or_default(
            "STOREFRONT_DATA_PATH",
            "data/storefront.json",
        ));

        let feed = FeedConfig {
            url: env.parse("PRODUCT_FEED_URL", DEFAULT_FEED_URL)?,
            timeout: Duration::from_secs(env.parse("PRODUCT_FEED_TIMEOUT_SECS", "10")?),
        };

        let free_over = env
            .optional("FREE_SHIPPING_OVER")
            .map(|raw| {
                raw.parse::<i64>().map(Price::from_rupiah).map_err(|e| {
                    ConfigError::InvalidEnvVar("FREE_SHIPPING_OVER".to_string(), e.to_string())
                })
            })
            .transpose()?;
        let shipping = ShippingPolicy {
            free_over,
            ..ShippingPolicy::default()
        };

        Ok(Self {
            host,
            port,
            data_path,
            feed,
            shipping,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable source with the blank-means-unset rule applied.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable, treating empty values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable (or its default) into `T`.
    fn parse<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        parse_value(key, &self.get_or_default(key, default))
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn defaults() -> StorefrontConfig {
        StorefrontConfig::from_lookup(|_| None).unwrap()
    }

    #[test]
    fn test_default_feed_url_parses() {
        let feed = defaults().feed;
        assert_eq!(feed.url.host_str(), Some("dummyjson.com"));
        assert_eq!(feed.url.query(), Some("limit=100"));
        assert_eq!(feed.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_lookup_overrides_and_blanks() {
        let config = StorefrontConfig::from_lookup(|key| match key {
            "STOREFRONT_PORT" => Some("8081".to_owned()),
            "FREE_SHIPPING_OVER" => Some("500000".to_owned()),
            "SENTRY_DSN" => Some("   ".to_owned()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.port, 8081);
        assert_eq!(config.shipping.free_over, Some(Price::from_rupiah(500_000)));
        assert_eq!(config.sentry_dsn, None);
        assert_eq!(config.data_path, PathBuf::from("data/storefront.json"));
    }

    #[test]
    fn test_lookup_rejects_bad_values() {
        let err = StorefrontConfig::from_lookup(|key| {
            (key == "FREE_SHIPPING_OVER").then(|| "lots".to_owned())
        })
        .unwrap_err();
        assert!(err.to_string().contains("FREE_SHIPPING_OVER"));

        let err = StorefrontConfig::from_lookup(|key| {
            (key == "PRODUCT_FEED_URL").then(|| "not a url".to_owned())
        })
        .unwrap_err();
        assert!(err.to_string().contains("PRODUCT_FEED_URL"));
    }

    #[test]
    fn test_parse_value_reports_key() {
        let err = parse_value::<u16>("STOREFRONT_PORT", "not-a-port").unwrap_err();
        assert!(err.to_string().contains("STOREFRONT_PORT"));
    }

    #[test]
    fn test_parse_value_url() {
        let url: Url = parse_value("PRODUCT_FEED_URL", "http://localhost:9000/feed").unwrap();
        assert_eq!(url.port(), Some(9000));
        assert!(parse_value::<Url>("PRODUCT_FEED_URL", "not a url").is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            port: 8080,
            ..defaults()
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_default_shipping_has_no_threshold() {
        let config = defaults();
        assert_eq!(config.shipping.free_over, None);
        assert_eq!(config.shipping.flat_rate, Price::from_rupiah(50_000));
    }
}
