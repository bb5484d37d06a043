//! Feed product to catalog product conversion.
//!
//! Adds the eco attributes the feed lacks. Every derived value depends only
//! on the product's ID and category, so re-enriching the same feed yields the
//! same catalog.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use ecoquest_core::{Price, ProductId};

use super::FeedProduct;
use crate::models::{ECO_CATEGORIES, Product};

/// Feed price units are scaled by this factor into rupiah.
const PRICE_SCALE: i64 = 10_000;

const TITLE_PREFIXES: [&str; 10] = [
    "Smart",
    "Eco",
    "Green",
    "Sustainable",
    "Intelligent",
    "Connected",
    "IoT",
    "Automated",
    "Solar",
    "Energy-Efficient",
];

const DEFAULT_BENEFITS: [&str; 3] = [
    "Contributes to environmental sustainability",
    "Reduces carbon footprint",
    "Promotes eco-friendly practices",
];

/// Eco categories a feed category can map to.
fn category_options(category: &str) -> Option<&'static [&'static str]> {
    let options: &'static [&'static str] = match category {
        "smartphones" => &["wearable-eco-tech", "eco-monitoring"],
        "laptops" => &["energy-efficiency", "eco-monitoring"],
        "fragrances" => &["air-quality"],
        "skincare" | "groceries" => &["sustainable-gardening"],
        "home-decoration" => &["home-automation"],
        "furniture" | "tops" | "womens-dresses" | "womens-shoes" | "mens-shirts"
        | "mens-shoes" | "womens-bags" | "womens-jewellery" => &["recycling-tools"],
        "mens-watches" | "womens-watches" | "sunglasses" => &["wearable-eco-tech"],
        "automotive" | "motorcycle" => &["energy-efficiency"],
        "lighting" => &["energy-efficiency", "home-automation"],
        _ => return None,
    };
    Some(options)
}

/// Benefits advertised for an eco category.
fn eco_benefits(eco_category: &str) -> [&'static str; 3] {
    match eco_category {
        "smart-waste" => [
            "Reduces landfill waste by 30%",
            "Optimizes waste collection routes",
            "Monitors fill levels in real-time",
        ],
        "water-conservation" => [
            "Saves up to 70% of water usage",
            "Detects leaks instantly",
            "Smart irrigation based on weather",
        ],
        "energy-efficiency" => [
            "Reduces energy consumption by 25%",
            "Smart power management",
            "Energy usage analytics",
        ],
        "air-quality" => [
            "Monitors indoor air pollutants",
            "Alerts for unhealthy air conditions",
            "Automated air purification",
        ],
        "sustainable-gardening" => [
            "Promotes biodiversity",
            "Reduces water usage in gardening",
            "Monitors soil health",
        ],
        "home-automation" => [
            "Reduces overall energy usage",
            "Smart scheduling of appliances",
            "Occupancy-based energy management",
        ],
        "wearable-eco-tech" => [
            "Tracks personal carbon footprint",
            "Encourages sustainable habits",
            "Energy harvesting technology",
        ],
        "renewable-energy" => [
            "Solar power integration",
            "Energy storage solutions",
            "Sustainable power generation",
        ],
        "recycling-tools" => [
            "Improves recycling accuracy",
            "Reduces contamination in recycling",
            "Tracks recycling metrics",
        ],
        "eco-monitoring" => [
            "Environmental data collection",
            "Ecosystem health monitoring",
            "Climate change impact analysis",
        ],
        _ => DEFAULT_BENEFITS,
    }
}

/// Pick `items[id mod len]`.
fn pick<T: Copy>(items: &[T], id: i32) -> Option<T> {
    let len = i32::try_from(items.len()).ok()?;
    let index = usize::try_from(id.rem_euclid(len)).ok()?;
    items.get(index).copied()
}

/// Map a feed category onto one of the eco categories.
#[must_use]
pub fn eco_category_for(category: &str, id: i32) -> &'static str {
    let fallback = || pick(&ECO_CATEGORIES, id).map_or("eco-monitoring", |c| c.id);
    category_options(category)
        .and_then(|options| pick(options, id))
        .unwrap_or_else(fallback)
}

fn decimal_from_f64(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or_default()
}

/// Convert a raw feed product into an eco catalog product.
#[must_use]
pub fn enrich(raw: FeedProduct) -> Product {
    let eco_category = eco_category_for(&raw.category, raw.id);
    let benefits = eco_benefits(eco_category);

    let mut rng = StdRng::seed_from_u64(u64::from(raw.id.unsigned_abs()));
    let eco_impact: u8 = rng.random_range(5..=9);
    let carbon_reduction: u32 = rng.random_range(50..=249);

    let prefix = pick(&TITLE_PREFIXES, raw.id).unwrap_or("Eco");
    let title = if raw.title.contains(prefix) {
        raw.title
    } else {
        format!("{prefix} {}", raw.title)
    };

    let lowered = raw.description.to_lowercase();
    let description = format!(
        "This innovative IoT device {}. {}.",
        lowered.trim_end_matches('.'),
        benefits[0]
    );

    let price = (decimal_from_f64(raw.price) * Decimal::from(PRICE_SCALE)).round();
    let discount_percentage = decimal_from_f64(raw.discount_percentage)
        .round_dp(2)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);

    Product {
        id: ProductId::new(raw.id),
        title,
        description,
        price: Price::new(price),
        discount_percentage,
        rating: raw.rating,
        stock: u32::try_from(raw.stock.max(0)).unwrap_or(u32::MAX),
        brand: raw.brand,
        category: raw.category,
        thumbnail: raw.thumbnail,
        images: raw.images,
        eco_category: eco_category.to_owned(),
        eco_benefits: benefits.iter().map(|b| (*b).to_owned()).collect(),
        eco_impact,
        carbon_reduction,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn raw(id: i32, category: &str) -> FeedProduct {
        FeedProduct {
            id,
            title: "Desk Lamp".to_owned(),
            description: "Lights Up Your Desk.".to_owned(),
            price: 9.99,
            discount_percentage: 12.5,
            rating: 4.2,
            stock: 7,
            brand: Some("Lumen".to_owned()),
            category: category.to_owned(),
            thumbnail: "thumb.png".to_owned(),
            images: vec!["a.png".to_owned()],
        }
    }

    #[test]
    fn test_mapped_category_uses_id_modulo() {
        assert_eq!(eco_category_for("smartphones", 4), "wearable-eco-tech");
        assert_eq!(eco_category_for("smartphones", 5), "eco-monitoring");
        assert_eq!(eco_category_for("fragrances", 11), "air-quality");
    }

    #[test]
    fn test_unmapped_category_cycles_all_categories() {
        assert_eq!(eco_category_for("beauty", 0), "smart-waste");
        assert_eq!(eco_category_for("beauty", 13), "air-quality");
    }

    #[test]
    fn test_enrich_is_deterministic() {
        let a = enrich(raw(21, "lighting"));
        let b = enrich(raw(21, "lighting"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_enrich_ranges() {
        for id in 1..=60 {
            let product = enrich(raw(id, "groceries"));
            assert!((5..=9).contains(&product.eco_impact));
            assert!((50..=249).contains(&product.carbon_reduction));
        }
    }

    #[test]
    fn test_enrich_rewrites_copy_and_price() {
        let product = enrich(raw(1, "lighting"));
        assert_eq!(product.title, "Eco Desk Lamp");
        assert_eq!(product.eco_category, "home-automation");
        assert_eq!(
            product.description,
            "This innovative IoT device lights up your desk. Reduces overall energy usage."
        );
        assert_eq!(product.price, Price::from_rupiah(99_900));
        assert_eq!(product.discount_percentage, Decimal::new(125, 1));
        assert_eq!(product.eco_benefits.len(), 3);
    }

    #[test]
    fn test_prefix_not_duplicated() {
        let mut feed = raw(2, "lighting");
        feed.title = "Green Tea".to_owned();
        assert_eq!(enrich(feed).title, "Green Tea");
    }

    #[test]
    fn test_negative_stock_clamps_to_zero() {
        let mut feed = raw(3, "tops");
        feed.stock = -4;
        assert_eq!(enrich(feed).stock, 0);
    }
}
