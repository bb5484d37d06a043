//! Checkout service.
//!
//! Prices the current cart and turns it into an order for the logged-in
//! user: coins and balance are deducted, the order is prepended to the
//! purchase history, active purchase quests complete, and the cart is
//! cleared. The whole order runs under the store's mutation lock.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use ecoquest_core::{
    Coupon, OrderId, OrderStatus, PaymentMethod, PriceBreakdown, PricingError, ShippingPolicy,
    price_cart,
};

use crate::models::{CartItem, Order, OrderLine, User, format_order_number};
use crate::services::auth::{AuthError, AuthService};
use crate::services::cart::{CartError, CartService};
use crate::services::quests::{QuestError, QuestService, QuestUpdate};
use crate::store::KeyValueStore;

/// Errors from checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to buy.
    #[error("cart is empty")]
    EmptyCart,

    /// More coins applied than the user holds.
    #[error("cannot apply {requested} coins, only {available} available")]
    InsufficientCoins { requested: u32, available: u32 },

    /// The balance does not cover the total.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// Unknown coupon.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Account error (including not being logged in).
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Quest(#[from] QuestError),
}

/// What the user asked to pay with.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutRequest {
    pub coupon: Option<String>,
    pub coins: u32,
    pub payment_method: PaymentMethod,
}

/// A placed order and its side effects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub order: Order,
    /// The user after payment and rewards.
    pub user: User,
    pub quests_completed: Vec<QuestUpdate>,
}

/// Checkout service.
pub struct CheckoutService<'a> {
    store: &'a dyn KeyValueStore,
    shipping: &'a ShippingPolicy,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore, shipping: &'a ShippingPolicy) -> Self {
        Self { store, shipping }
    }

    /// Price the current cart.
    ///
    /// Applying coins requires a logged-in user holding at least that many.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Pricing` for an unknown coupon.
    /// Returns `CheckoutError::InsufficientCoins` if the coins are not owned.
    #[instrument(skip(self))]
    pub fn quote(&self, coupon: Option<&str>, coins: u32) -> Result<PriceBreakdown, CheckoutError> {
        let coupon = parse_coupon(coupon)?;
        if coins > 0 {
            let user = AuthService::new(self.store).require_user()?;
            check_coins(&user, coins)?;
        }
        let items = CartService::new(self.store).items();
        Ok(self.price(&items, coupon, coins))
    }

    /// Place an order for the current cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Auth` if nobody is logged in.
    /// Returns `CheckoutError::EmptyCart` if the cart is empty.
    /// Returns `CheckoutError::InsufficientCoins` or
    /// `CheckoutError::InsufficientBalance` if the user cannot pay.
    #[instrument(skip(self, request), fields(coins = request.coins, payment = %request.payment_method))]
    pub fn place_order(&self, request: &CheckoutRequest) -> Result<CheckoutReceipt, CheckoutError> {
        let _lock = self.store.lock();
        let auth = AuthService::new(self.store);
        let cart = CartService::new(self.store);

        let user = auth.require_user()?;
        let items = cart.items();
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let coupon = parse_coupon(request.coupon.as_deref())?;
        check_coins(&user, request.coins)?;
        let breakdown = self.price(&items, coupon, request.coins);

        if request.payment_method == PaymentMethod::Balance {
            if user.balance < breakdown.total {
                return Err(CheckoutError::InsufficientBalance);
            }
            auth.charge_balance(breakdown.total)?;
        }
        if request.coins > 0 && !auth.use_coins(request.coins)? {
            return Err(CheckoutError::InsufficientCoins {
                requested: request.coins,
                available: user.coins,
            });
        }

        let order = build_order(&items, &breakdown, request.payment_method);
        auth.add_purchase_record(order.clone())?;

        let quests_completed = QuestService::new(self.store, user.id).complete_purchase_quests()?;
        cart.clear()?;

        let user = auth.require_user()?;
        tracing::info!(
            order_number = %order.order_number,
            total = %order.total_amount,
            "Order placed"
        );

        Ok(CheckoutReceipt {
            order,
            user,
            quests_completed,
        })
    }

    fn price(&self, items: &[CartItem], coupon: Option<Coupon>, coins: u32) -> PriceBreakdown {
        let lines: Vec<_> = items.iter().map(CartItem::pricing_line).collect();
        price_cart(&lines, coupon, coins, self.shipping)
    }
}

fn parse_coupon(code: Option<&str>) -> Result<Option<Coupon>, PricingError> {
    code.map_or(Ok(None), Coupon::parse)
}

const fn check_coins(user: &User, coins: u32) -> Result<(), CheckoutError> {
    if coins > user.coins {
        return Err(CheckoutError::InsufficientCoins {
            requested: coins,
            available: user.coins,
        });
    }
    Ok(())
}

fn build_order(
    items: &[CartItem],
    breakdown: &PriceBreakdown,
    payment_method: PaymentMethod,
) -> Order {
    let number: u16 = rand::rng().random_range(0..10_000);

    Order {
        id: OrderId::generate(),
        order_number: format_order_number(number),
        date: Utc::now(),
        status: OrderStatus::Confirmed,
        items: items.iter().map(OrderLine::from).collect(),
        subtotal: breakdown.subtotal,
        shipping: breakdown.shipping,
        coupon: breakdown.coupon,
        coupon_discount: breakdown.coupon_discount,
        coins_used: breakdown.coins_applied,
        coin_discount: breakdown.coin_discount,
        total_amount: breakdown.total,
        payment_method,
    }
}
