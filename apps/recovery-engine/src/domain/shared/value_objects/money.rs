//! Money value object for currency amounts.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places carried by settled amounts.
const CENT_SCALE: u32 = 2;

/// A monetary amount in the account currency.
///
/// Represented as a Decimal for precise financial calculations.
/// Settled amounts are rounded half-up to cents; intermediate values keep
/// full precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Create a new Money value from a Decimal.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Get the inner Decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Round to cents, ties away from zero (0.125 settles at 0.13).
    #[must_use]
    pub fn round_to_cents(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(CENT_SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Multiply a per-share price by a share count, `None` on overflow.
    #[must_use]
    pub fn checked_times(&self, shares: u64) -> Option<Self> {
        self.0.checked_mul(Decimal::from(shares)).map(Self)
    }

    /// Add two amounts, `None` on overflow.
    #[must_use]
    pub fn checked_add(&self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }
}
