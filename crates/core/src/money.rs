//! Money amounts.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Non-negative amount of money in the smallest currency unit (cents).
///
/// Prices arrive as decimals (`12.99`) from seed data and the knowledge store;
/// they are rounded to the nearest cent on the way in so comparisons against a
/// budget are exact.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Convert a decimal amount in major units (e.g. dollars).
    pub fn from_major(amount: f64) -> DomainResult<Self> {
        if !amount.is_finite() {
            return Err(DomainError::validation("amount must be a finite number"));
        }
        if amount < 0.0 {
            return Err(DomainError::validation("amount cannot be negative"));
        }
        Ok(Self((amount * 100.0).round() as u64))
    }

    pub fn cents(&self) -> u64 {
        self.0
    }

    pub fn as_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn from_major_rounds_to_cents() {
        assert_eq!(Money::from_major(12.99).unwrap().cents(), 1299);
        assert_eq!(Money::from_major(0.005).unwrap().cents(), 1);
        assert_eq!(Money::from_major(10.0).unwrap().to_string(), "10.00");
    }

    #[test]
    fn from_major_rejects_negative_and_nan() {
        assert!(Money::from_major(-0.01).is_err());
        assert!(Money::from_major(f64::NAN).is_err());
        assert!(Money::from_major(f64::INFINITY).is_err());
    }

    #[test]
    fn subtraction_never_goes_below_zero() {
        let ten = Money::from_cents(1000);
        let twelve = Money::from_cents(1200);
        assert_eq!(ten.checked_sub(twelve), None);
        assert_eq!(ten.saturating_sub(twelve), Money::ZERO);
        assert_eq!(twelve.checked_sub(ten), Some(Money::from_cents(200)));
    }

    proptest! {
        /// Property: cents survive a trip through the decimal representation.
        #[test]
        fn cents_survive_major_units(cents in 0u64..100_000_000u64) {
            let money = Money::from_cents(cents);
            prop_assert_eq!(Money::from_major(money.as_major()).unwrap(), money);
        }
    }
}
