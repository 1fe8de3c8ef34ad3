//! Prices

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors that can occur while constructing a [`Price`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The supplied amount was zero or negative.
    #[error("price must be positive, got {0}")]
    NotPositive(Decimal),
}

/// A strictly positive monetary amount.
///
/// Rendered as two-decimal fixed point (`"10.00"`, `"5.50"`) both in
/// [`Display`] and in serialized form, matching what existing clients of the
/// shop expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(Decimal);

impl Price {
    /// Creates a new price.
    ///
    /// # Errors
    ///
    /// - [`PriceError::NotPositive`]: The amount was zero or negative.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive(amount));
        }

        Ok(Self(amount))
    }

    /// Returns the underlying decimal amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Returns the total for `quantity` units at this price.
    #[must_use]
    pub fn line_total(self, quantity: u32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut fixed = self.0;
        fixed.rescale(2);
        write!(f, "{fixed}")
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Serde helper rendering a plain [`Decimal`] total as two-decimal fixed
/// point, used by the order view types.
pub(crate) mod fixed2 {
    use rust_decimal::Decimal;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(total: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        let mut fixed = *total;
        fixed.rescale(2);
        serializer.collect_str(&fixed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_price_accepts_positive_amount() {
        let price = Price::new(Decimal::new(1050, 2)).unwrap();

        assert_eq!(price.amount(), Decimal::new(1050, 2));
    }

    #[test]
    fn new_price_rejects_zero() {
        let result = Price::new(Decimal::ZERO);

        assert_eq!(result, Err(PriceError::NotPositive(Decimal::ZERO)));
    }

    #[test]
    fn new_price_rejects_negative() {
        let amount = Decimal::new(-100, 2);

        assert_eq!(Price::new(amount), Err(PriceError::NotPositive(amount)));
    }

    #[test]
    fn display_is_two_decimal_fixed_point() {
        let whole = Price::new(Decimal::from(10u32)).unwrap();
        let fractional = Price::new(Decimal::new(550, 2)).unwrap();

        assert_eq!(whole.to_string(), "10.00");
        assert_eq!(fractional.to_string(), "5.50");
    }

    #[test]
    fn line_total_multiplies_by_quantity() {
        let price = Price::new(Decimal::new(1000, 2)).unwrap();

        assert_eq!(price.line_total(2), Decimal::new(2000, 2));
    }
}
