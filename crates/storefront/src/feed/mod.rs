//! External product feed client and catalog enrichment.
//!
//! # Architecture
//!
//! - The feed is a read-only JSON endpoint (`{ "products": [...] }`)
//! - [`ProductFeed`] is the seam: [`HttpProductFeed`] talks to the real
//!   endpoint, tests supply a static list
//! - [`enrich`] turns raw feed products into eco-themed catalog products,
//!   deterministically per product ID
//!
//! # Example
//!
//! ```rust,ignore
//! use ecoquest_storefront::feed::{HttpProductFeed, ProductFeed, enrich};
//!
//! let feed = HttpProductFeed::new(&config.feed)?;
//! let products: Vec<_> = feed.fetch().await?.into_iter().map(enrich).collect();
//! ```

mod client;
mod enrich;
mod types;

use std::future::Future;

pub use client::HttpProductFeed;
pub use enrich::enrich;
pub use types::{FeedProduct, FeedResponse};

use thiserror::Error;

/// Errors that can occur when fetching the product feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed answered with a non-success status.
    #[error("feed returned HTTP {0}")]
    Status(u16),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A source of raw products.
pub trait ProductFeed: Send + Sync {
    /// Fetch every product the feed offers.
    fn fetch(&self) -> impl Future<Output = Result<Vec<FeedProduct>, FeedError>> + Send;
}

/// A fixed product list, for seeding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticProductFeed {
    products: Vec<FeedProduct>,
}

impl StaticProductFeed {
    #[must_use]
    pub const fn new(products: Vec<FeedProduct>) -> Self {
        Self { products }
    }
}

impl ProductFeed for StaticProductFeed {
    async fn fetch(&self) -> Result<Vec<FeedProduct>, FeedError> {
        Ok(self.products.clone())
    }
}
