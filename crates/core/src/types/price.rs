//! Type-safe Pi amounts using decimal arithmetic.
//!
//! Menu prices, cart totals and payment amounts are all denominated in Pi.
//! They travel as JSON numbers (`15.99`) because that is what both the
//! browser and the Pi platform speak, but are held as [`Decimal`] so totals
//! never drift.

use std::iter::Sum;
use std::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount of Pi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PiAmount(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl PiAmount {
    /// Zero Pi.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create an amount from a decimal.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create an amount from an integer number of hundredths (`1599` is `π15.99`).
    #[must_use]
    pub fn from_hundredths(hundredths: i64) -> Self {
        Self(Decimal::new(hundredths, 2))
    }

    /// Get the underlying decimal.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

/// Formats as `π15.99`.
impl std::fmt::Display for PiAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "π{:.2}", self.0)
    }
}

impl From<Decimal> for PiAmount {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for PiAmount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for PiAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for PiAmount {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
