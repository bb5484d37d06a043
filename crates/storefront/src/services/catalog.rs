//! Product catalog.
//!
//! The catalog is fetched from the product feed once, enriched, and cached
//! under `envirProductsCache`. Later loads read the cache and never touch the
//! feed. Filtering and sorting run over the in-memory list.

use std::cmp::Ordering;

use tracing::instrument;

use ecoquest_core::{Price, ProductId};

use crate::feed::{ProductFeed, enrich};
use crate::models::{ECO_CATEGORIES, EcoCategory, FilterOptions, Product, SortBy};
use crate::store::{KeyValueStore, keys, load_json, save_json};

/// The loaded product catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    error: Option<String>,
}

impl Catalog {
    /// Load the catalog from the cache, falling back to the feed.
    ///
    /// A feed failure yields an empty catalog carrying the error message.
    #[instrument(skip_all)]
    pub async fn load<F: ProductFeed>(feed: &F, store: &dyn KeyValueStore) -> Self {
        if let Some(products) = load_json::<Vec<Product>>(store, keys::PRODUCTS_CACHE) {
            tracing::info!(count = products.len(), "Catalog loaded from cache");
            return Self::from_products(products);
        }

        let raw = match feed.fetch().await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch products");
                return Self {
                    products: Vec::new(),
                    error: Some("Failed to fetch products".to_owned()),
                };
            }
        };

        let products: Vec<Product> = raw.into_iter().map(enrich).collect();
        if let Err(e) = save_json(store, keys::PRODUCTS_CACHE, &products) {
            tracing::warn!(error = %e, "Failed to cache products");
        }

        tracing::info!(count = products.len(), "Catalog loaded from feed");
        Self::from_products(products)
    }

    /// A catalog over an already-enriched product list.
    #[must_use]
    pub const fn from_products(products: Vec<Product>) -> Self {
        Self {
            products,
            error: None,
        }
    }

    /// Every product, in feed order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Why the catalog failed to load, if it did.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// The eco categories products are grouped under.
    #[must_use]
    pub const fn categories() -> &'static [EcoCategory] {
        &ECO_CATEGORIES
    }

    /// Lowest and highest undiscounted price, or `None` when empty.
    #[must_use]
    pub fn price_range(&self) -> Option<(Price, Price)> {
        let min = self.products.iter().map(|p| p.price).min()?;
        let max = self.products.iter().map(|p| p.price).max()?;
        Some((min, max))
    }

    /// Products matching `options`, sorted as requested.
    ///
    /// Without a sort order, feed order is kept.
    #[must_use]
    pub fn filter(&self, options: &FilterOptions) -> Vec<Product> {
        let query = options
            .search_query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        let mut matched: Vec<Product> = self
            .products
            .iter()
            .filter(|p| matches(p, options))
            .filter(|p| query.as_deref().is_none_or(|q| search_matches(p, q)))
            .cloned()
            .collect();

        if let Some(sort_by) = options.sort_by {
            matched.sort_by(|a, b| compare(a, b, sort_by));
        }
        matched
    }
}

fn matches(product: &Product, options: &FilterOptions) -> bool {
    let category_ok = options
        .category
        .as_deref()
        .filter(|c| !c.is_empty())
        .is_none_or(|c| product.eco_category == c);
    let rating_ok = options
        .min_rating
        .filter(|r| *r > 0.0)
        .is_none_or(|r| product.rating >= r);
    let min_price_ok = options
        .min_price
        .filter(|p| *p > 0)
        .is_none_or(|p| product.price >= Price::from_rupiah(p));
    let max_price_ok = options
        .max_price
        .filter(|p| *p > 0)
        .is_none_or(|p| product.price <= Price::from_rupiah(p));
    let stock_ok = !options.in_stock || product.in_stock();
    let eco_ok = options
        .eco_minimum
        .filter(|m| *m > 0)
        .is_none_or(|m| product.eco_impact >= m);

    category_ok && rating_ok && min_price_ok && max_price_ok && stock_ok && eco_ok
}

/// Case-insensitive match over title, description, brand, eco category and
/// benefits. `query` is already lowercased.
fn search_matches(product: &Product, query: &str) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(query);

    contains(product.title.as_str())
        || contains(product.description.as_str())
        || product.brand.as_deref().is_some_and(contains)
        || contains(product.eco_category.as_str())
        || product.eco_benefits.iter().any(|b| contains(b.as_str()))
}

fn compare(a: &Product, b: &Product, sort_by: SortBy) -> Ordering {
    match sort_by {
        // No review counts in the feed; rating stands in
        SortBy::Rating | SortBy::Reviews => b.rating.total_cmp(&a.rating),
        SortBy::Discount => b.discount_percentage.cmp(&a.discount_percentage),
        SortBy::PriceHigh => b.price.cmp(&a.price),
        SortBy::PriceLow => a.price.cmp(&b.price),
        SortBy::Stock => b.stock.cmp(&a.stock),
        SortBy::EcoImpact => b.eco_impact.cmp(&a.eco_impact),
    }
}
