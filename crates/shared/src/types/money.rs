//! Fixed-point monetary amounts.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount is held as a `rust_decimal::Decimal` rounded to two
//! decimal places before it is compared or stored.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};

/// Number of decimal places kept for every amount.
pub const SCALE: u32 = 2;

/// A monetary amount with exactly two decimal places.
///
/// Construction always rounds (midpoint away from zero), so two amounts that
/// print the same also compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::from_parts(0, 0, 0, false, SCALE));

    /// Creates an amount, rounding to two decimal places.
    #[must_use]
    pub fn new(value: Decimal) -> Self {
        let mut rounded = value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(SCALE);
        Self(rounded)
    }

    /// Creates an amount from a count of hundredths (e.g. cents or satang).
    #[must_use]
    pub fn from_minor(minor: i64) -> Self {
        Self(Decimal::new(minor, SCALE))
    }

    /// Returns the underlying decimal value.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns true if the amount is strictly below zero.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the larger of `self` and zero.
    #[must_use]
    pub fn clamp_zero(self) -> Self {
        if self.is_negative() { Self::ZERO } else { self }
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.0 - rhs.0)
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(Decimal::from_str_exact(s.trim())?))
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[rstest]
    #[case(dec!(10.005), dec!(10.01))]
    #[case(dec!(10.004), dec!(10.00))]
    #[case(dec!(-10.005), dec!(-10.01))]
    #[case(dec!(4000), dec!(4000.00))]
    fn test_new_rounds_to_two_places(#[case] input: Decimal, #[case] expected: Decimal) {
        let amount = Amount::new(input);
        assert_eq!(amount.value(), expected);
        assert_eq!(amount.value().scale(), SCALE);
    }

    #[test]
    fn test_arithmetic_stays_rounded() {
        let a = Amount::new(dec!(0.1));
        let b = Amount::new(dec!(0.2));
        assert_eq!(a + b, Amount::new(dec!(0.3)));
        assert_eq!(b - a, Amount::from_minor(10));
        assert_eq!(-a, Amount::new(dec!(-0.1)));
    }

    #[test]
    fn test_sum() {
        let total: Amount = [dec!(1.10), dec!(2.20), dec!(3.30)]
            .into_iter()
            .map(Amount::new)
            .sum();
        assert_eq!(total, Amount::new(dec!(6.60)));
    }

    #[test]
    fn test_sign_helpers() {
        assert!(Amount::from_minor(1).is_positive());
        assert!(Amount::ZERO.is_zero());
        assert!(!Amount::ZERO.is_positive());
        assert!(Amount::from_minor(-1).is_negative());
        assert_eq!(Amount::from_minor(-500).clamp_zero(), Amount::ZERO);
    }

    #[test]
    fn test_display_keeps_two_places() {
        assert_eq!(Amount::new(dec!(7000)).to_string(), "7000.00");
        assert_eq!(Amount::from_minor(1).to_string(), "0.01");
    }

    #[test]
    fn test_zero_keeps_two_places() {
        assert_eq!(Amount::ZERO.value().scale(), SCALE);
        assert_eq!(Amount::ZERO.to_string(), "0.00");
        assert_eq!(Amount::from_minor(-1).clamp_zero().to_string(), "0.00");
        assert_eq!(Amount::default().to_string(), "0.00");
        assert_eq!(serde_json::to_string(&Amount::ZERO).unwrap(), "\"0.00\"");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Amount::from_str("12.345").unwrap(), Amount::new(dec!(12.35)));
        assert!(Amount::from_str("abc").is_err());
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let from_number: Amount = serde_json::from_str("4000").unwrap();
        let from_string: Amount = serde_json::from_str("\"4000.00\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(serde_json::to_string(&from_number).unwrap(), "\"4000.00\"");
    }
}
