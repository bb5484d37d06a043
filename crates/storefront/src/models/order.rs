//! Order (purchase record) domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ecoquest_core::{Coupon, OrderId, OrderStatus, PaymentMethod, Price, ProductId};

use super::CartItem;

/// One purchased line, frozen at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub title: String,
    /// Undiscounted unit price.
    pub price: Price,
    pub discount_percentage: Decimal,
    pub quantity: u32,
    pub thumbnail: String,
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product.id,
            title: item.product.title.clone(),
            price: item.product.price,
            discount_percentage: item.product.discount_percentage,
            quantity: item.quantity,
            thumbnail: item.product.thumbnail.clone(),
        }
    }
}

/// A placed order, kept in the user's purchase history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Human-facing number, e.g. `ECO-0042`.
    pub order_number: String,
    pub date: DateTime<Utc>,
    pub status: OrderStatus,
    pub items: Vec<OrderLine>,
    pub subtotal: Price,
    pub shipping: Price,
    #[serde(default)]
    pub coupon: Option<Coupon>,
    pub coupon_discount: Price,
    pub coins_used: u32,
    pub coin_discount: Price,
    pub total_amount: Price,
    pub payment_method: PaymentMethod,
}

/// Format an order number from a number in `0..10000`.
#[must_use]
pub fn format_order_number(n: u16) -> String {
    format!("ECO-{n:04}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_is_zero_padded() {
        assert_eq!(format_order_number(42), "ECO-0042");
        assert_eq!(format_order_number(9999), "ECO-9999");
    }
}
