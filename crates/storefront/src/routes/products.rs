//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use tracing::instrument;

use ecoquest_core::{Price, ProductId};

use crate::error::{AppError, Result};
use crate::models::{EcoCategory, FilterOptions, Product};
use crate::services::Catalog;
use crate::state::AppState;

/// Filtered product list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductList {
    pub products: Vec<Product>,
    pub total: usize,
    /// Price bounds across the whole catalog, for filter sliders.
    pub price_range: Option<PriceRange>,
}

#[derive(Debug, Serialize)]
pub struct PriceRange {
    pub min: Price,
    pub max: Price,
}

/// The catalog, or a gateway error if the feed never loaded.
fn catalog(state: &AppState) -> Result<&Catalog> {
    let catalog = state.catalog();
    match catalog.error() {
        Some(message) if catalog.products().is_empty() => {
            Err(AppError::CatalogUnavailable(message.to_owned()))
        }
        _ => Ok(catalog),
    }
}

/// List products matching the query filters.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(options): Query<FilterOptions>,
) -> Result<Json<ProductList>> {
    let catalog = catalog(&state)?;
    let products = catalog.filter(&options);

    Ok(Json(ProductList {
        total: products.len(),
        products,
        price_range: catalog
            .price_range()
            .map(|(min, max)| PriceRange { min, max }),
    }))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Product>> {
    catalog(&state)?
        .get(ProductId::new(id))
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// The eco categories.
pub async fn categories() -> Json<&'static [EcoCategory]> {
    Json(Catalog::categories())
}
