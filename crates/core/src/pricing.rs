//! Cart pricing: subtotal, shipping, coupons, and eco-coin discounts.
//!
//! [`price_cart`] is a pure function over the cart lines. It never looks at
//! the user's coin balance; callers check that the applied coins are owned
//! before pricing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Price;

/// Rupiah knocked off per applied eco coin (10 coins = Rp 5.000).
pub const COIN_DISCOUNT_PER_COIN: i64 = 500;

/// Flat shipping charged on any non-empty cart.
pub const FLAT_SHIPPING_RUPIAH: i64 = 50_000;

/// Errors raised while pricing a cart.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PricingError {
    /// The coupon code is not one the store recognizes.
    #[error("invalid coupon code: {0}")]
    InvalidCoupon(String),
}

/// A coupon the store accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coupon {
    /// `ECO2023`: 10% off the subtotal.
    #[serde(rename = "ECO2023")]
    Eco2023,
    /// `FIRSTBUY`: flat Rp 50.000 off.
    #[serde(rename = "FIRSTBUY")]
    FirstBuy,
}

impl Coupon {
    /// Parse a coupon code, case-insensitively.
    ///
    /// A blank code means "no coupon" and yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidCoupon`] for unknown codes.
    pub fn parse(code: &str) -> Result<Option<Self>, PricingError> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(None);
        }
        match code.to_ascii_lowercase().as_str() {
            "eco2023" => Ok(Some(Self::Eco2023)),
            "firstbuy" => Ok(Some(Self::FirstBuy)),
            _ => Err(PricingError::InvalidCoupon(code.to_owned())),
        }
    }

    /// The canonical code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Eco2023 => "ECO2023",
            Self::FirstBuy => "FIRSTBUY",
        }
    }

    /// Discount this coupon grants on the given subtotal.
    #[must_use]
    pub fn discount(self, subtotal: Price) -> Price {
        match self {
            Self::Eco2023 => subtotal.percent(Decimal::TEN),
            Self::FirstBuy => Price::from_rupiah(50_000),
        }
    }
}

/// Shipping rule: a flat rate, optionally waived above a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    pub flat_rate: Price,
    /// Subtotals strictly above this ship free.
    pub free_over: Option<Price>,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            flat_rate: Price::from_rupiah(FLAT_SHIPPING_RUPIAH),
            free_over: None,
        }
    }
}

impl ShippingPolicy {
    /// Shipping charged for a cart with the given subtotal.
    #[must_use]
    pub fn charge(&self, subtotal: Price) -> Price {
        if subtotal.is_zero() {
            return Price::ZERO;
        }
        match self.free_over {
            Some(threshold) if subtotal > threshold => Price::ZERO,
            _ => self.flat_rate,
        }
    }
}

/// One cart line as seen by the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingLine {
    pub unit_price: Price,
    pub discount_percentage: Decimal,
    pub quantity: u32,
}

impl PricingLine {
    /// Discounted unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.discounted(self.discount_percentage) * self.quantity
    }
}

/// Result of pricing a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub subtotal: Price,
    pub shipping: Price,
    pub coupon: Option<Coupon>,
    pub coupon_discount: Price,
    pub coins_applied: u32,
    pub coin_discount: Price,
    /// `subtotal + shipping − coupon − coins`, floored at zero.
    pub total: Price,
}

/// Rupiah discount for a number of applied eco coins.
#[must_use]
pub fn coin_discount(coins: u32) -> Price {
    Price::new(Decimal::from(coins) * Decimal::from(COIN_DISCOUNT_PER_COIN))
}

/// Price a cart.
///
/// ```
/// use ecoquest_core::{Price, PricingLine, ShippingPolicy, price_cart};
/// use rust_decimal::Decimal;
///
/// let lines = [PricingLine {
///     unit_price: Price::from_rupiah(100_000),
///     discount_percentage: Decimal::TEN,
///     quantity: 2,
/// }];
/// let breakdown = price_cart(&lines, None, 0, &ShippingPolicy::default());
/// assert_eq!(breakdown.subtotal, Price::from_rupiah(180_000));
/// assert_eq!(breakdown.total, Price::from_rupiah(230_000));
/// ```
#[must_use]
pub fn price_cart(
    lines: &[PricingLine],
    coupon: Option<Coupon>,
    coins: u32,
    shipping: &ShippingPolicy,
) -> PriceBreakdown {
    let subtotal: Price = lines.iter().map(PricingLine::line_total).sum();
    let shipping_charge = shipping.charge(subtotal);
    let coupon_discount = coupon.map_or(Price::ZERO, |c| c.discount(subtotal));
    let coins_discount = coin_discount(coins);

    let total = (subtotal + shipping_charge) - coupon_discount - coins_discount;

    PriceBreakdown {
        subtotal,
        shipping: shipping_charge,
        coupon,
        coupon_discount,
        coins_applied: coins,
        coin_discount: coins_discount,
        total,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(price: i64, discount: i64, quantity: u32) -> PricingLine {
        PricingLine {
            unit_price: Price::from_rupiah(price),
            discount_percentage: Decimal::from(discount),
            quantity,
        }
    }

    #[test]
    fn test_subtotal_applies_discount_per_unit() {
        let breakdown = price_cart(&[line(100_000, 10, 2)], None, 0, &ShippingPolicy::default());
        assert_eq!(breakdown.subtotal, Price::from_rupiah(180_000));
        assert_eq!(breakdown.shipping, Price::from_rupiah(50_000));
        assert_eq!(breakdown.total, Price::from_rupiah(230_000));
    }

    #[test]
    fn test_empty_cart_ships_free() {
        let breakdown = price_cart(&[], None, 0, &ShippingPolicy::default());
        assert_eq!(breakdown.shipping, Price::ZERO);
        assert_eq!(breakdown.total, Price::ZERO);
    }

    #[test]
    fn test_free_shipping_threshold() {
        let policy = ShippingPolicy {
            free_over: Some(Price::from_rupiah(150_000)),
            ..ShippingPolicy::default()
        };
        assert_eq!(policy.charge(Price::from_rupiah(150_000)), policy.flat_rate);
        assert_eq!(policy.charge(Price::from_rupiah(150_001)), Price::ZERO);
    }

    #[test]
    fn test_eco2023_takes_ten_percent_of_subtotal() {
        let coupon = Coupon::parse("eco2023").unwrap();
        let breakdown = price_cart(&[line(200_000, 0, 1)], coupon, 0, &ShippingPolicy::default());
        assert_eq!(breakdown.coupon_discount, Price::from_rupiah(20_000));
        assert_eq!(breakdown.total, Price::from_rupiah(230_000));
    }

    #[test]
    fn test_firstbuy_is_flat() {
        let coupon = Coupon::parse("FirstBuy").unwrap();
        assert_eq!(coupon, Some(Coupon::FirstBuy));
        let breakdown = price_cart(&[line(80_000, 0, 1)], coupon, 0, &ShippingPolicy::default());
        assert_eq!(breakdown.coupon_discount, Price::from_rupiah(50_000));
        assert_eq!(breakdown.total, Price::from_rupiah(80_000));
    }

    #[test]
    fn test_unknown_coupon_is_rejected() {
        assert_eq!(
            Coupon::parse("FREESTUFF"),
            Err(PricingError::InvalidCoupon("FREESTUFF".to_owned()))
        );
        assert_eq!(Coupon::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_coin_discount_rate() {
        assert_eq!(coin_discount(10), Price::from_rupiah(5_000));
        assert_eq!(coin_discount(0), Price::ZERO);

        let breakdown = price_cart(&[line(100_000, 0, 1)], None, 20, &ShippingPolicy::default());
        assert_eq!(breakdown.coin_discount, Price::from_rupiah(10_000));
        assert_eq!(breakdown.total, Price::from_rupiah(140_000));
    }

    #[test]
    fn test_total_never_negative() {
        let coupon = Some(Coupon::FirstBuy);
        let breakdown = price_cart(&[line(1_000, 0, 1)], coupon, 500, &ShippingPolicy::default());
        assert_eq!(breakdown.total, Price::ZERO);
    }
}
