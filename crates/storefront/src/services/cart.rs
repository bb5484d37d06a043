//! Cart service.
//!
//! The cart is a list of product snapshots with quantities under the `cart`
//! key. Quantities are kept in `1..=stock` for every line.

use thiserror::Error;
use tracing::instrument;

use ecoquest_core::{Price, ProductId};

use crate::models::{CartItem, CartSummary, Product};
use crate::store::{KeyValueStore, StoreError, keys, load_json, save_json};

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product has no stock.
    #[error("product {0} is out of stock")]
    OutOfStock(ProductId),

    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Adding zero units.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// Store read/write error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Cart service.
pub struct CartService<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Current cart lines. An unreadable cart is treated as empty.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        load_json(self.store, keys::CART).unwrap_or_default()
    }

    /// Cart lines with derived totals.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        summarize(self.items())
    }

    /// Total units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        total_items(&self.items())
    }

    /// Sum of discounted line totals.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items().iter().map(CartItem::line_total).sum()
    }

    /// Add units of a product, merging with an existing line.
    ///
    /// The resulting quantity is clamped to the product's stock.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutOfStock` if the product has no stock.
    /// Returns `CartError::InvalidQuantity` if `quantity` is zero.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add(&self, product: &Product, quantity: u32) -> Result<CartSummary, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        if !product.in_stock() {
            return Err(CartError::OutOfStock(product.id));
        }

        let _lock = self.store.lock();
        let mut items = self.items();
        match items.iter_mut().find(|item| item.product.id == product.id) {
            Some(item) => {
                // Refresh the snapshot so the clamp uses current stock
                item.product = product.clone();
                item.quantity = item.quantity.saturating_add(quantity).min(product.stock);
            }
            None => items.push(CartItem {
                product: product.clone(),
                quantity: quantity.min(product.stock),
            }),
        }

        self.save(items)
    }

    /// Set a line's quantity.
    ///
    /// A quantity of zero or less removes the line; anything else is clamped
    /// to `1..=stock`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotInCart` if the product has no line.
    #[instrument(skip(self))]
    pub fn update_quantity(
        &self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<CartSummary, CartError> {
        let _lock = self.store.lock();
        let mut items = self.items();
        let Some(position) = items.iter().position(|item| item.product.id == product_id) else {
            return Err(CartError::NotInCart(product_id));
        };

        if quantity <= 0 {
            items.remove(position);
        } else if let Some(item) = items.get_mut(position) {
            let stock = i64::from(item.product.stock.max(1));
            // Clamped into 1..=stock, which always fits in u32
            item.quantity = u32::try_from(quantity.clamp(1, stock)).unwrap_or(1);
        }

        self.save(items)
    }

    /// Remove a product's line. Removing a missing product is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if the cart cannot be written.
    #[instrument(skip(self))]
    pub fn remove(&self, product_id: ProductId) -> Result<CartSummary, CartError> {
        let _lock = self.store.lock();
        let mut items = self.items();
        items.retain(|item| item.product.id != product_id);
        self.save(items)
    }

    /// Empty the cart, snapshotting its lines to `lastCheckedOutItems`.
    ///
    /// Returns the removed lines.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if the snapshot or cart cannot be written.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<Vec<CartItem>, CartError> {
        let _lock = self.store.lock();
        let items = self.items();
        save_json(self.store, keys::LAST_CHECKED_OUT, &items)?;
        save_json(self.store, keys::CART, &Vec::<CartItem>::new())?;
        Ok(items)
    }

    /// Lines captured by the last [`clear`](Self::clear).
    #[must_use]
    pub fn last_checked_out(&self) -> Vec<CartItem> {
        load_json(self.store, keys::LAST_CHECKED_OUT).unwrap_or_default()
    }

    fn save(&self, items: Vec<CartItem>) -> Result<CartSummary, CartError> {
        save_json(self.store, keys::CART, &items)?;
        Ok(summarize(items))
    }
}

fn total_items(items: &[CartItem]) -> u32 {
    items
        .iter()
        .fold(0_u32, |total, item| total.saturating_add(item.quantity))
}

fn summarize(items: Vec<CartItem>) -> CartSummary {
    CartSummary {
        total_items: total_items(&items),
        total_price: items.iter().map(CartItem::line_total).sum(),
        items,
    }
}
