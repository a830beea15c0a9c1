//! Value objects: equality by value, not identity.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. Orders are value
/// objects: two orders with the same fields are the same purchase record, and
/// nothing edits an order once it is emitted.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// Calendar month, 1 through 12.
///
/// Serialized as its number so persisted order columns hold plain integers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(u8);

impl Month {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 12;

    pub fn new(number: u8) -> DomainResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&number) {
            Ok(Self(number))
        } else {
            Err(DomainError::invalid_config(format!(
                "month must be within 1..=12 (got {number})"
            )))
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// English month name ("January", ...).
    pub fn name(self) -> &'static str {
        chrono::Month::try_from(self.0)
            .map(|m| m.name())
            .unwrap_or("?")
    }

    /// All twelve months in calendar order.
    pub fn calendar() -> impl Iterator<Item = Month> + Clone {
        (Self::MIN..=Self::MAX).map(Month)
    }
}

impl ValueObject for Month {}

impl TryFrom<u8> for Month {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(value: Month) -> Self {
        value.0
    }
}

impl core::fmt::Display for Month {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Inclusive integer range used by generation settings (`{"min": .., "max": ..}`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: u32,
    pub max: u32,
}

impl Bounds {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Reject inverted ranges; `what` names the setting in the error message.
    pub fn check(self, what: &str) -> DomainResult<Self> {
        if self.min > self.max {
            return Err(DomainError::invalid_config(format!(
                "{what}: min ({}) exceeds max ({})",
                self.min, self.max
            )));
        }
        Ok(self)
    }

    pub fn contains(self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn inclusive(self) -> core::ops::RangeInclusive<u32> {
        self.min..=self.max
    }
}

impl ValueObject for Bounds {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_rejects_out_of_range() {
        assert!(Month::new(0).is_err());
        assert!(Month::new(13).is_err());
        assert_eq!(Month::new(12).unwrap().number(), 12);
    }

    #[test]
    fn month_names_follow_calendar() {
        assert_eq!(Month::new(1).unwrap().name(), "January");
        assert_eq!(Month::new(12).unwrap().name(), "December");
    }

    #[test]
    fn calendar_is_ordered_and_complete() {
        let months: Vec<u8> = Month::calendar().map(Month::number).collect();
        assert_eq!(months, (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        match Bounds::new(5, 1).check("quantity_range") {
            Err(DomainError::InvalidConfiguration(msg)) if msg.contains("quantity_range") => {}
            other => panic!("Expected InvalidConfiguration, got {other:?}"),
        }
        assert!(Bounds::new(3, 3).check("x").unwrap().contains(3));
    }

    #[test]
    fn deserializing_invalid_month_fails() {
        assert!(serde_json::from_str::<Month>("13").is_err());
        assert_eq!(serde_json::from_str::<Month>("3").unwrap().number(), 3);
    }
}
