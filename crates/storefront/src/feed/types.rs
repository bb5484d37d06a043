//! Raw product feed payload.

use serde::{Deserialize, Serialize};

/// Paginated feed response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedResponse {
    pub products: Vec<FeedProduct>,
    pub total: u32,
    pub skip: u32,
    pub limit: u32,
}

/// A product exactly as the feed returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedProduct {
    pub id: i32,
    pub title: String,
    pub description: String,
    /// Price in the feed's currency units (dollars).
    pub price: f64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: i64,
    pub brand: Option<String>,
    pub category: String,
    pub thumbnail: String,
    pub images: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed_page() {
        let json = r#"{
            "products": [{
                "id": 1,
                "title": "Essence Mascara Lash Princess",
                "description": "A popular mascara.",
                "category": "beauty",
                "price": 9.99,
                "discountPercentage": 7.17,
                "rating": 4.94,
                "stock": 5,
                "tags": ["beauty"],
                "brand": "Essence",
                "thumbnail": "https://cdn.example/1/thumbnail.png",
                "images": ["https://cdn.example/1/1.png"]
            }],
            "total": 194, "skip": 0, "limit": 1
        }"#;

        let page: FeedResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.total, 194);
        let product = page.products.first().unwrap();
        assert_eq!(product.id, 1);
        assert_eq!(product.brand.as_deref(), Some("Essence"));
        assert!((product.discount_percentage - 7.17).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_fields_default() {
        let product: FeedProduct = serde_json::from_str(r#"{"id": 3, "title": "Lamp"}"#).unwrap();
        assert_eq!(product.stock, 0);
        assert!(product.images.is_empty());
        assert_eq!(product.brand, None);
    }
}
