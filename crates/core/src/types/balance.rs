//! Account balance using decimal arithmetic.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Store credit held on a user account.
///
/// Always held in cents (scale 2), matching the `NUMERIC(12, 2)` column.
/// Serialized as a decimal string (`"12.50"`) so no precision is lost in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(transparent))]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Balance(Decimal);

impl Balance {
    /// A zero balance, the value new accounts start with.
    pub const ZERO: Self = Self(Decimal::from_parts(0, 0, 0, false, 2));

    /// Create a balance from a decimal amount, rounded to cents.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        let mut amount = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        amount.rescale(2);
        Self(amount)
    }

    /// Largest magnitude a `NUMERIC(12, 2)` column accepts, exclusive.
    const COLUMN_LIMIT: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

    /// Whether the amount fits the storage column (below 10^10 in magnitude).
    #[must_use]
    pub fn fits_column(&self) -> bool {
        self.0.abs() < Self::COLUMN_LIMIT
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl Default for Balance {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<Decimal> for Balance {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl From<Balance> for Decimal {
    fn from(balance: Balance) -> Self {
        balance.0
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
