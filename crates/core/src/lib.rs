//! Eco Quest Core - Shared types library.
//!
//! This crate provides the types and pure arithmetic used across the Eco Quest
//! components:
//! - `storefront` - Storefront state stores, services and JSON API
//! - `integration-tests` - Cross-service flows
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses
//! - [`pricing`] - Cart totals, coupons, shipping and eco-coin discounts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod pricing;
pub mod types;

pub use pricing::{
    COIN_DISCOUNT_PER_COIN, Coupon, FLAT_SHIPPING_RUPIAH, PriceBreakdown, PricingError,
    PricingLine, ShippingPolicy, coin_discount, price_cart,
};
pub use types::*;
