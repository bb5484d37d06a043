//! Business logic services for the storefront.
//!
//! Services borrow the key-value store and are cheap to construct, so
//! handlers build one per request.
//!
//! # Services
//!
//! - `auth` - Mock registration/login and account mutations
//! - `catalog` - Product catalog loading, filtering, and sorting
//! - `cart` - Cart lines and totals
//! - `quests` - Per-user quest state machine and rewards
//! - `checkout` - Pricing and order placement

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod quests;

pub use auth::{AuthError, AuthService};
pub use cart::{CartError, CartService};
pub use catalog::Catalog;
pub use checkout::{CheckoutError, CheckoutReceipt, CheckoutRequest, CheckoutService};
pub use quests::{QuestError, QuestService, QuestUpdate};
