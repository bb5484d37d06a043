//! Cart domain types.

use serde::{Deserialize, Serialize};

use ecoquest_core::{Price, PricingLine};

use super::Product;

/// A product in the cart and how many of it.
///
/// The product is a snapshot taken when it was added. `quantity` is always
/// in `1..=product.stock`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Discounted unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.pricing_line().line_total()
    }

    /// This line as input to the pricing calculator.
    #[must_use]
    pub fn pricing_line(&self) -> PricingLine {
        PricingLine {
            unit_price: self.product.price,
            discount_percentage: self.product.discount_percentage,
            quantity: self.quantity,
        }
    }
}

/// Cart contents with derived totals, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub items: Vec<CartItem>,
    pub total_items: u32,
    pub total_price: Price,
}
