//! Type-safe rupiah price representation using decimal arithmetic.
//!
//! The storefront sells in Indonesian rupiah only, so a [`Price`] is a plain
//! decimal amount with rupiah formatting. Discount math stays in `Decimal`
//! so `100000 × 0.9 × 2` is exactly `180000`.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A non-negative amount in rupiah.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero rupiah.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price, flooring negative amounts at zero.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self(amount.max(Decimal::ZERO))
    }

    /// Create a price from a whole rupiah amount.
    #[must_use]
    pub fn from_rupiah(amount: i64) -> Self {
        Self::new(Decimal::from(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Apply a percentage discount: `price × (1 − pct/100)`.
    ///
    /// The percentage is clamped into `[0, 100]`, so the result is never
    /// negative and never above the original price.
    #[must_use]
    pub fn discounted(&self, percentage: Decimal) -> Self {
        let pct = percentage.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        Self::new(self.0 - self.0 * pct / Decimal::ONE_HUNDRED)
    }

    /// Percentage of this price, e.g. `percent(10)` of 200 is 20.
    #[must_use]
    pub fn percent(&self, percentage: Decimal) -> Self {
        Self::new(self.0 * percentage / Decimal::ONE_HUNDRED)
    }

    /// Subtract, flooring the result at zero.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        Self::new(self.0 - other.0)
    }

    /// Format for display, e.g. `Rp 180.000` or `Rp 1.234,50`.
    ///
    /// Uses the Indonesian convention of `.` for thousands and `,` for
    /// decimals. Fractions are rounded to two places and omitted when zero.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self.0.round_dp(2);
        let whole = rounded.trunc();
        let fraction = ((rounded - whole) * Decimal::ONE_HUNDRED).trunc();

        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        if fraction.is_zero() {
            format!("Rp {grouped}")
        } else {
            format!("Rp {grouped},{:0>2}", fraction.to_string())
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

/// Saturating: a price never goes below zero.
impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.saturating_sub(rhs)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
