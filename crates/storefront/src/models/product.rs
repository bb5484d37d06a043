//! Product domain types and catalog filters.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ecoquest_core::{Price, ProductId};

/// An enriched catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    /// Undiscounted price in rupiah.
    pub price: Price,
    /// Discount in percent, `0..=100`.
    pub discount_percentage: Decimal,
    pub rating: f64,
    pub stock: u32,
    #[serde(default)]
    pub brand: Option<String>,
    pub category: String,
    pub thumbnail: String,
    #[serde(default)]
    pub images: Vec<String>,
    /// ID of one of [`ECO_CATEGORIES`].
    pub eco_category: String,
    pub eco_benefits: Vec<String>,
    /// Environmental impact score, 1-10.
    pub eco_impact: u8,
    /// Estimated CO2 reduction in kg.
    pub carbon_reduction: u32,
}

impl Product {
    /// Price after the product's own discount.
    #[must_use]
    pub fn discounted_price(&self) -> Price {
        self.price.discounted(self.discount_percentage)
    }

    /// Whether at least one unit is in stock.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// An IoT eco category shown in the shop sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EcoCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
}

/// The ten eco categories, in display order.
pub const ECO_CATEGORIES: [EcoCategory; 10] = [
    EcoCategory { id: "smart-waste", name: "Smart Waste Management", icon: "🗑️" },
    EcoCategory { id: "water-conservation", name: "Water Conservation", icon: "💧" },
    EcoCategory { id: "energy-efficiency", name: "Energy Efficiency", icon: "⚡" },
    EcoCategory { id: "air-quality", name: "Air Quality Monitoring", icon: "🌬️" },
    EcoCategory { id: "sustainable-gardening", name: "Sustainable Gardening", icon: "🌱" },
    EcoCategory { id: "home-automation", name: "Home Automation", icon: "🏠" },
    EcoCategory { id: "wearable-eco-tech", name: "Wearable Eco-Tech", icon: "⌚" },
    EcoCategory { id: "renewable-energy", name: "Renewable Energy", icon: "☀️" },
    EcoCategory { id: "recycling-tools", name: "Recycling Tools", icon: "♻️" },
    EcoCategory { id: "eco-monitoring", name: "Eco Monitoring", icon: "📊" },
];

/// Sort order for filtered product lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    Rating,
    Discount,
    PriceHigh,
    PriceLow,
    Stock,
    /// No review counts in the feed; sorts by rating.
    Reviews,
    EcoImpact,
}

/// Product list filters.
///
/// Zero-valued numeric filters are treated as unset, so a shop page can
/// send its slider defaults without narrowing the list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterOptions {
    /// Eco category ID.
    pub category: Option<String>,
    pub min_rating: Option<f64>,
    /// Whole rupiah.
    pub min_price: Option<i64>,
    /// Whole rupiah.
    pub max_price: Option<i64>,
    pub in_stock: bool,
    pub search_query: Option<String>,
    pub sort_by: Option<SortBy>,
    pub eco_minimum: Option<u8>,
}
