//! Domain models for the storefront.
//!
//! These are the JSON shapes persisted in the store and returned by the
//! API. Field names are camelCase to match the stored blobs.

pub mod cart;
pub mod order;
pub mod product;
pub mod quest;
pub mod user;

pub use cart::{CartItem, CartSummary};
pub use order::{Order, OrderLine, format_order_number};
pub use product::{ECO_CATEGORIES, EcoCategory, FilterOptions, Product, SortBy};
pub use quest::{QUEST_TEMPLATES, Quest, QuestTemplate, seed_quests};
pub use user::{StoredUser, User};
