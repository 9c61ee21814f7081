//! Positive item counts.

use core::num::NonZeroU32;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// A strictly positive quantity of a product.
///
/// A `Quantity` can never be zero, so a cart entry holding one is never empty.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    pub const ONE: Quantity = Quantity(NonZeroU32::MIN);

    /// Validate a raw (possibly negative) quantity.
    pub fn new(raw: i64) -> DomainResult<Self> {
        if raw <= 0 {
            return Err(DomainError::invalid_quantity(format!(
                "quantity must be a positive integer, got {raw}"
            )));
        }
        u32::try_from(raw)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Quantity)
            .ok_or_else(|| DomainError::invalid_quantity(format!("quantity {raw} is too large")))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    pub fn checked_add(self, other: Quantity) -> DomainResult<Self> {
        self.0
            .checked_add(other.get())
            .map(Quantity)
            .ok_or_else(|| DomainError::invalid_quantity("quantity is too large"))
    }

    pub fn saturating_add(self, other: Quantity) -> Self {
        Quantity(self.0.saturating_add(other.get()))
    }
}

impl ValueObject for Quantity {}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Quantity::new(i64::from(value))
    }
}

impl From<Quantity> for u32 {
    fn from(value: Quantity) -> Self {
        value.get()
    }
}

impl FromStr for Quantity {
    type Err = DomainError;

    /// Parses user input; fractional or non-numeric text is an invalid quantity.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let raw: i64 = s.parse().map_err(|_| {
            DomainError::invalid_quantity(format!("'{s}' is not a whole number"))
        })?;
        Quantity::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_and_negative() {
        assert!(Quantity::new(0).unwrap_err().is_invalid_quantity());
        assert!(Quantity::new(-4).unwrap_err().is_invalid_quantity());
    }

    #[test]
    fn rejects_values_beyond_u32() {
        assert!(Quantity::new(i64::from(u32::MAX) + 1).is_err());
        assert_eq!(Quantity::new(i64::from(u32::MAX)).unwrap().get(), u32::MAX);
    }

    #[test]
    fn parses_whole_numbers_only() {
        assert_eq!("3".parse::<Quantity>().unwrap().get(), 3);
        assert!("2.5".parse::<Quantity>().unwrap_err().is_invalid_quantity());
        assert!("two".parse::<Quantity>().unwrap_err().is_invalid_quantity());
        assert!("0".parse::<Quantity>().unwrap_err().is_invalid_quantity());
    }

    #[test]
    fn checked_add_detects_overflow() {
        let max = Quantity::new(i64::from(u32::MAX)).unwrap();
        assert!(max.checked_add(Quantity::ONE).is_err());
        assert_eq!(Quantity::ONE.checked_add(Quantity::ONE).unwrap().get(), 2);
    }

    #[test]
    fn serde_rejects_zero() {
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert_eq!(serde_json::from_str::<Quantity>("7").unwrap().get(), 7);
    }
}
