//! Status enums for orders, payments, and quests.

use serde::{Deserialize, Serialize};

/// Order status.
///
/// Orders are created as `Confirmed` at checkout; the later states exist
/// for order history display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

/// How an order was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Charged against the user's topped-up balance.
    Balance,
    /// Paid on delivery; nothing is charged at checkout.
    #[default]
    CashOnDelivery,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Balance => write!(f, "balance"),
            Self::CashOnDelivery => write!(f, "cash_on_delivery"),
        }
    }
}

/// Kind of eco quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestKind {
    Recycle,
    Dispose,
    Purchase,
    /// Resets once per calendar day.
    Daily,
}

impl std::fmt::Display for QuestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Recycle => write!(f, "recycle"),
            Self::Dispose => write!(f, "dispose"),
            Self::Purchase => write!(f, "purchase"),
            Self::Daily => write!(f, "daily"),
        }
    }
}

impl std::str::FromStr for QuestKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recycle" => Ok(Self::Recycle),
            "dispose" => Ok(Self::Dispose),
            "purchase" => Ok(Self::Purchase),
            "daily" => Ok(Self::Daily),
            _ => Err(format!("invalid quest kind: {s}")),
        }
    }
}

/// Lifecycle state of a quest for one user.
///
/// ```text
/// Available --start--> Active --progress/complete--> Completed
///     ^                                                  |
///     +------------- daily reset (daily quests) ---------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    #[default]
    Available,
    Active,
    Completed,
}
