//! Monetary amounts for agreement pricing.

use super::AgreementDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const CENTS_PER_DOLLAR: u64 = 100;

/// Non-negative monetary amount in US cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u64", into = "u64")]
pub struct Amount(u64);

impl Amount {
    /// Largest amount representable in the current `PostgreSQL` schema.
    const MAX_PERSISTED_CENTS: u64 = i64::MAX.unsigned_abs();

    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from a number of cents.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementDomainError::AmountOutOfRange`] when the value
    /// exceeds the schema-backed maximum (`i64::MAX`).
    pub const fn from_cents(cents: u64) -> Result<Self, AgreementDomainError> {
        if cents > Self::MAX_PERSISTED_CENTS {
            return Err(AgreementDomainError::AmountOutOfRange(cents));
        }
        Ok(Self(cents))
    }

    /// Creates an amount from whole dollars.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementDomainError::AmountOutOfRange`] when the converted
    /// value does not fit.
    pub const fn from_dollars(dollars: u64) -> Result<Self, AgreementDomainError> {
        match dollars.checked_mul(CENTS_PER_DOLLAR) {
            Some(cents) => Self::from_cents(cents),
            None => Err(AgreementDomainError::AmountOutOfRange(u64::MAX)),
        }
    }

    /// Returns the amount in cents.
    #[must_use]
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Returns whether the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Formats the amount with exactly two decimal places (`$500.00`).
    #[must_use]
    pub fn to_fixed_string(self) -> String {
        let dollars = self.0.div_euclid(CENTS_PER_DOLLAR);
        let cents = self.0.rem_euclid(CENTS_PER_DOLLAR);
        format!("${dollars}.{cents:02}")
    }

    /// Adds two amounts.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementDomainError::TotalOverflow`] when the sum leaves
    /// the supported range.
    pub const fn checked_add(self, other: Self) -> Result<Self, AgreementDomainError> {
        match self.0.checked_add(other.0) {
            Some(sum) if sum <= Self::MAX_PERSISTED_CENTS => Ok(Self(sum)),
            _ => Err(AgreementDomainError::TotalOverflow),
        }
    }
}

impl TryFrom<u64> for Amount {
    type Error = AgreementDomainError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::from_cents(value)
    }
}

impl From<Amount> for u64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

/// Formats as dollars, omitting the fraction when the amount is whole
/// (`$550`, `$550.25`).
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dollars = self.0.div_euclid(CENTS_PER_DOLLAR);
        let cents = self.0.rem_euclid(CENTS_PER_DOLLAR);
        if cents == 0 {
            write!(f, "${dollars}")
        } else {
            write!(f, "${dollars}.{cents:02}")
        }
    }
}
