//! Newtype IDs for type-safe entity references.
//!
//! Numeric IDs come from the product feed and use `define_id!`. IDs minted
//! by the storefront itself (users, orders) or taken from static templates
//! (quests) are strings and use `define_key!`. Both prevent accidentally
//! mixing IDs from different entity types.

/// Macro to define a numeric ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>` and `Into<i32>` implementations
///
/// # Example
///
/// ```rust
/// # use ecoquest_core::define_id;
/// define_id!(ReviewId);
/// define_id!(BrandId);
///
/// let review_id = ReviewId::new(1);
/// let brand_id = BrandId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: ReviewId = brand_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

/// Macro to define a string-backed key wrapper.
///
/// Creates a newtype wrapper around `String` with `Display`, `AsRef<str>`,
/// `From<&str>`/`From<String>` and transparent serde.
#[macro_export]
macro_rules! define_key {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a key from any string-like value.
            #[must_use]
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Returns the key as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self(key.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(key: String) -> Self {
                Self(key)
            }
        }
    };
}

define_id!(ProductId);

define_key!(UserId);
define_key!(QuestId);
define_key!(OrderId);

impl UserId {
    /// Mint a fresh, unique user ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }
}

impl OrderId {
    /// Mint a fresh, unique order ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_roundtrips_through_i32() {
        let id = ProductId::new(42);
        assert_eq!(i32::from(id), 42);
        assert_eq!(ProductId::from(42), id);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_product_id_serializes_transparently() {
        let json = serde_json::to_string(&ProductId::new(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn test_generated_user_ids_are_unique() {
        let a = UserId::generate();
        let b = UserId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn test_quest_id_from_str() {
        let id = QuestId::from("q1");
        assert_eq!(id.as_str(), "q1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"q1\"");
    }
}
