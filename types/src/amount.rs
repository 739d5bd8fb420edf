//! Coin amounts.
//!
//! Amounts are fixed-point integers in the ledger's smallest unit to avoid
//! floating-point errors. One coin is [`Amount::UNITS_PER_COIN`] units.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Self = Self(0);

    /// Peercoin uses six decimal places.
    pub const UNITS_PER_COIN: u64 = 1_000_000;

    pub const fn new(units: u64) -> Self {
        Self(units)
    }

    pub const fn units(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Convert a decimal coin value as reported by JSON APIs, rounding to the
    /// nearest unit. Negative and non-finite inputs map to zero.
    pub fn from_coins(coins: f64) -> Self {
        if !coins.is_finite() || coins <= 0.0 {
            return Self::ZERO;
        }
        Self((coins * Self::UNITS_PER_COIN as f64).round() as u64)
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl Add for Amount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, a| acc + a)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:06}",
            self.0 / Self::UNITS_PER_COIN,
            self.0 % Self::UNITS_PER_COIN
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_coins_rounds_to_units() {
        assert_eq!(Amount::from_coins(0.01), Amount::new(10_000));
        assert_eq!(Amount::from_coins(1.5), Amount::new(1_500_000));
        assert_eq!(Amount::from_coins(-3.0), Amount::ZERO);
        assert_eq!(Amount::from_coins(f64::NAN), Amount::ZERO);
    }

    #[test]
    fn display_has_six_decimals() {
        assert_eq!(Amount::new(10_000).to_string(), "0.010000");
        assert_eq!(Amount::new(2_000_001).to_string(), "2.000001");
    }

    #[test]
    fn sum_and_checked_sub() {
        let total: Amount = [Amount::new(5), Amount::new(7)].into_iter().sum();
        assert_eq!(total, Amount::new(12));
        assert_eq!(Amount::new(3).checked_sub(Amount::new(4)), None);
        assert_eq!(Amount::new(3).saturating_sub(Amount::new(4)), Amount::ZERO);
    }
}
