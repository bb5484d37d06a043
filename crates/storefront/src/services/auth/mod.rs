//! Authentication and account service.
//!
//! Mock authentication over the key-value store: registered users live in
//! the `users` list with plaintext passwords, and the logged-in user is the
//! `user` record. Every account mutation rewrites both, under the store's
//! mutation lock.

mod error;

pub use error::AuthError;

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use ecoquest_core::{Email, Price, UserId};

use crate::models::{Order, StoredUser, User};
use crate::store::{KeyValueStore, keys, load_json, save_json};

/// Authentication service.
///
/// Handles registration, login, and mutations of the logged-in user.
pub struct AuthService<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Register a new user and log them in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidInput` if the username or password is blank.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip(self, password))]
    pub fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::InvalidInput("username cannot be empty".to_owned()));
        }
        if password.expose_secret().is_empty() {
            return Err(AuthError::InvalidInput("password cannot be empty".to_owned()));
        }

        let _lock = self.store.lock();
        let mut users = self.users();
        if users.iter().any(|u| u.user.email == email) {
            return Err(AuthError::UserAlreadyExists);
        }

        let user = User {
            id: UserId::generate(),
            username: username.to_owned(),
            name: None,
            email,
            balance: Price::ZERO,
            coins: 0,
            purchase_history: Vec::new(),
        };

        users.push(StoredUser {
            user: user.clone(),
            password: password.expose_secret().to_owned(),
        });
        save_json(self.store, keys::USERS, &users)?;
        save_json(self.store, keys::CURRENT_USER, &user)?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[instrument(skip(self, password))]
    pub fn login(&self, email: &str, password: &SecretString) -> Result<User, AuthError> {
        // A malformed email cannot match any account
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let _lock = self.store.lock();
        let user = self
            .users()
            .into_iter()
            .find(|u| u.user.email == email && u.password == password.expose_secret())
            .map(|u| u.user)
            .ok_or(AuthError::InvalidCredentials)?;

        save_json(self.store, keys::CURRENT_USER, &user)?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    /// End the current session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the session record cannot be removed.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), AuthError> {
        self.store.remove(keys::CURRENT_USER)?;
        Ok(())
    }

    /// The logged-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        load_json(self.store, keys::CURRENT_USER)
    }

    /// The logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if nobody is logged in.
    pub fn require_user(&self) -> Result<User, AuthError> {
        self.current_user().ok_or(AuthError::NotAuthenticated)
    }

    // =========================================================================
    // Account Mutations
    // =========================================================================

    /// Update the display name and email.
    ///
    /// A blank name clears it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::EmailTaken` if another user owns the email.
    #[instrument(skip(self))]
    pub fn update_profile(&self, name: Option<&str>, email: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        let _lock = self.store.lock();
        let current = self.require_user()?;

        let taken = self
            .users()
            .iter()
            .any(|u| u.user.email == email && u.user.id != current.id);
        if taken {
            return Err(AuthError::EmailTaken);
        }

        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_owned);
        self.update(|user| {
            user.name = name;
            user.email = email;
            Ok(())
        })
    }

    /// Grant eco coins to the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if nobody is logged in.
    #[instrument(skip(self))]
    pub fn add_coins(&self, amount: u32) -> Result<User, AuthError> {
        self.update(|user| {
            user.coins = user.coins.saturating_add(amount);
            Ok(())
        })
    }

    /// Grant eco coins to a user who need not be logged in.
    ///
    /// The session record is refreshed too when it belongs to that user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no registered user has this ID.
    #[instrument(skip(self))]
    pub fn credit_coins(&self, user_id: &UserId, amount: u32) -> Result<User, AuthError> {
        self.update_user(user_id, |user| {
            user.coins = user.coins.saturating_add(amount);
            Ok(())
        })
    }

    /// Spend eco coins.
    ///
    /// Returns `false` and leaves the balance unchanged when the user holds
    /// fewer than `amount` coins. The check and the deduction happen under
    /// one lock, so concurrent spends cannot overdraw.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if nobody is logged in.
    #[instrument(skip(self))]
    pub fn use_coins(&self, amount: u32) -> Result<bool, AuthError> {
        let _lock = self.store.lock();
        if self.require_user()?.coins < amount {
            return Ok(false);
        }

        let mut spent = false;
        self.update(|user| {
            if let Some(left) = user.coins.checked_sub(amount) {
                user.coins = left;
                spent = true;
            }
            Ok(())
        })?;
        Ok(spent)
    }

    /// Add or subtract coins, flooring the balance at zero.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if nobody is logged in.
    #[instrument(skip(self))]
    pub fn adjust_coins(&self, delta: i64) -> Result<User, AuthError> {
        self.update(|user| {
            let adjusted = i64::from(user.coins).saturating_add(delta).max(0);
            user.coins = u32::try_from(adjusted).unwrap_or(u32::MAX);
            Ok(())
        })
    }

    /// Top up the spending balance.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidInput` if the amount is zero.
    /// Returns `AuthError::NotAuthenticated` if nobody is logged in.
    #[instrument(skip(self, amount), fields(amount = %amount))]
    pub fn add_balance(&self, amount: Price) -> Result<User, AuthError> {
        if amount.is_zero() {
            return Err(AuthError::InvalidInput("top-up amount must be positive".to_owned()));
        }
        self.update(|user| {
            user.balance += amount;
            Ok(())
        })
    }

    /// Charge the spending balance.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InsufficientBalance` if the balance is too low.
    /// Returns `AuthError::NotAuthenticated` if nobody is logged in.
    #[instrument(skip(self, amount), fields(amount = %amount))]
    pub fn charge_balance(&self, amount: Price) -> Result<User, AuthError> {
        self.update(|user| {
            if user.balance < amount {
                return Err(AuthError::InsufficientBalance);
            }
            user.balance = user.balance - amount;
            Ok(())
        })
    }

    /// Prepend an order to the purchase history.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if nobody is logged in.
    #[instrument(skip(self, order), fields(order_number = %order.order_number))]
    pub fn add_purchase_record(&self, order: Order) -> Result<User, AuthError> {
        self.update(|user| {
            user.purchase_history.insert(0, order);
            Ok(())
        })
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn users(&self) -> Vec<StoredUser> {
        load_json(self.store, keys::USERS).unwrap_or_default()
    }

    /// Apply `mutate` to the logged-in user.
    fn update<F>(&self, mutate: F) -> Result<User, AuthError>
    where
        F: FnOnce(&mut User) -> Result<(), AuthError>,
    {
        let _lock = self.store.lock();
        let user_id = self.require_user()?.id;
        self.update_user(&user_id, mutate)
    }

    /// Apply `mutate` to a user and persist the result to the `users` list,
    /// and to the session record when it is that user's.
    fn update_user<F>(&self, user_id: &UserId, mutate: F) -> Result<User, AuthError>
    where
        F: FnOnce(&mut User) -> Result<(), AuthError>,
    {
        let _lock = self.store.lock();
        let session = self.current_user().filter(|u| &u.id == user_id);
        let mut users = self.users();
        let listed = users.iter().position(|u| &u.user.id == user_id);

        let mut user = match (session.clone(), listed.and_then(|i| users.get(i))) {
            (Some(user), _) => user,
            (None, Some(stored)) => stored.user.clone(),
            (None, None) => return Err(AuthError::UserNotFound(user_id.clone())),
        };
        mutate(&mut user)?;

        match listed.and_then(|i| users.get_mut(i)) {
            Some(stored) => stored.user = user.clone(),
            None => tracing::warn!(%user_id, "Session user missing from users list"),
        }
        save_json(self.store, keys::USERS, &users)?;
        if session.is_some() {
            save_json(self.store, keys::CURRENT_USER, &user)?;
        }

        Ok(user)
    }
}
