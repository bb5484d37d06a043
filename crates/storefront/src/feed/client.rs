//! HTTP client for the external product feed.

use tracing::{debug, instrument};
use url::Url;

use super::{FeedError, FeedProduct, FeedResponse, ProductFeed};
use crate::config::FeedConfig;

/// Fetches products from a JSON endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpProductFeed {
    client: reqwest::Client,
    url: Url,
}

impl HttpProductFeed {
    /// Create a feed client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::Http` if the HTTP client cannot be built.
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("ecoquest-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

impl ProductFeed for HttpProductFeed {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Vec<FeedProduct>, FeedError> {
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Product feed returned non-success status"
            );
            return Err(FeedError::Status(status.as_u16()));
        }

        let page: FeedResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse product feed response"
            );
            FeedError::Parse(e)
        })?;

        debug!(count = page.products.len(), total = page.total, "Fetched product feed");
        Ok(page.products)
    }
}
