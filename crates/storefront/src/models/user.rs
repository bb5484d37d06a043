//! User domain types.

use serde::{Deserialize, Serialize};

use ecoquest_core::{Email, Price, UserId};

use super::Order;

/// A storefront user as held by the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login handle chosen at registration.
    pub username: String,
    /// Display name set from the profile page.
    #[serde(default)]
    pub name: Option<String>,
    /// User's email address (unique across users).
    pub email: Email,
    /// Topped-up spending balance.
    #[serde(default)]
    pub balance: Price,
    /// Eco coins earned from quests.
    #[serde(default)]
    pub coins: u32,
    /// Orders, newest first.
    #[serde(default)]
    pub purchase_history: Vec<Order>,
}

impl User {
    /// Name to greet the user with.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.username)
    }
}

/// A user entry in the global `users` list.
///
/// Passwords are kept in plaintext; this store has no authentication
/// security. `Debug` redacts the password.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoredUser {
    #[serde(flatten)]
    pub user: User,
    pub password: String,
}

impl std::fmt::Debug for StoredUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredUser")
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: UserId::from("u1"),
            username: "ranger".to_owned(),
            name: None,
            email: Email::parse("ranger@forest.example").unwrap(),
            balance: Price::ZERO,
            coins: 0,
            purchase_history: Vec::new(),
        }
    }

    #[test]
    fn test_display_name_prefers_name() {
        let mut u = user();
        assert_eq!(u.display_name(), "ranger");
        u.name = Some("Robin".to_owned());
        assert_eq!(u.display_name(), "Robin");
    }

    #[test]
    fn test_stored_user_flattens_and_redacts() {
        let stored = StoredUser {
            user: user(),
            password: "hunter22".to_owned(),
        };

        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["username"], "ranger");
        assert_eq!(json["password"], "hunter22");
        assert_eq!(json["purchaseHistory"], serde_json::json!([]));

        let debug = format!("{stored:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter22"));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{"id":"u9","username":"x","email":"x@y.example"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.coins, 0);
        assert!(user.purchase_history.is_empty());
    }
}
