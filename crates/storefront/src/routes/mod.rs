//! HTTP route handlers for storefront.
//!
//! All handlers speak JSON. Errors are `{ "error": "..." }` with the status
//! from [`AppError`](crate::error::AppError).
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Health check
//!
//! # Products
//! GET  /products                   - Filtered product list (query: FilterOptions)
//! GET  /products/{id}              - Product detail
//! GET  /categories                 - Eco categories
//!
//! # Cart
//! GET  /cart                       - Cart with totals
//! POST /cart/add                   - Add a product
//! POST /cart/update                - Set a line's quantity (<= 0 removes)
//! POST /cart/remove                - Remove a line
//! POST /cart/clear                 - Empty the cart
//!
//! # Checkout
//! POST /checkout/quote             - Price breakdown for the cart
//! POST /checkout                   - Place an order (requires auth)
//!
//! # Auth
//! POST /auth/register              - Register and log in
//! POST /auth/login                 - Log in
//! POST /auth/logout                - Log out
//!
//! # Account (requires auth)
//! GET  /account                    - Current user
//! POST /account/profile            - Update name and email
//! POST /account/topup              - Add to balance
//! GET  /account/orders             - Purchase history
//!
//! # Quests (requires auth)
//! GET  /quests                     - Quest board and coins
//! POST /quests/{id}/start          - Start a quest
//! POST /quests/{id}/progress       - Record progress
//! POST /quests/{id}/complete       - Complete a quest
//! POST /quests/reset-daily         - Reset daily quests
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod products;
pub mod quests;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::place_order))
        .route("/quote", post(checkout::quote))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/profile", post(account::update_profile))
        .route("/topup", post(account::top_up))
        .route("/orders", get(account::orders))
}

/// Create the quest routes router.
pub fn quest_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(quests::index))
        .route("/reset-daily", post(quests::reset_daily))
        .route("/{id}/start", post(quests::start))
        .route("/{id}/progress", post(quests::progress))
        .route("/{id}/complete", post(quests::complete))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/products", product_routes())
        .route("/categories", get(products::categories))
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/auth", auth_routes())
        .nest("/account", account_routes())
        .nest("/quests", quest_routes())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
