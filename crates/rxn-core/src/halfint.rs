//! Exact half-integer arithmetic for spins, isospins and their projections.

use std::fmt::{self, Display};
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, RxnError};

/// A value from the lattice `{..., -1, -1/2, 0, 1/2, 1, ...}` stored as twice its value.
///
/// Numerically equal values compare and hash equal no matter how they were written
/// (`1`, `1.0` and `2/2` are all the same value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct HalfInteger(i32);

impl HalfInteger {
    /// Zero.
    pub const ZERO: HalfInteger = HalfInteger(0);
    /// One half.
    pub const HALF: HalfInteger = HalfInteger(1);
    /// One.
    pub const ONE: HalfInteger = HalfInteger(2);

    /// Creates a value from its doubled integer representation.
    pub const fn from_doubled(doubled: i32) -> Self {
        Self(doubled)
    }

    /// Creates a value from a plain integer.
    pub const fn from_int(value: i32) -> Self {
        Self(value * 2)
    }

    /// Returns twice the value.
    pub const fn doubled(self) -> i32 {
        self.0
    }

    /// Returns `true` when the value has no half part.
    pub const fn is_integer(self) -> bool {
        self.0 % 2 == 0
    }

    /// Returns `true` when the value is an odd integer.
    pub const fn is_odd_integer(self) -> bool {
        self.0 % 4 == 2 || self.0 % 4 == -2
    }

    /// Returns the integer value, if the value is integral.
    pub const fn as_int(self) -> Option<i32> {
        if self.is_integer() {
            Some(self.0 / 2)
        } else {
            None
        }
    }

    /// Returns the absolute value.
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Converts the value to a float. Only used at reporting boundaries.
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 2.0
    }

    /// Returns all values from `low` to `high` inclusive in unit steps, ascending.
    ///
    /// Returns an empty list when `high < low`.
    pub fn unit_range(low: HalfInteger, high: HalfInteger) -> Vec<HalfInteger> {
        let mut values = Vec::new();
        let mut current = low;
        while current <= high {
            values.push(current);
            current = current + HalfInteger::ONE;
        }
        values
    }

    /// Returns all values from `low` to `high` inclusive in half steps, ascending.
    pub fn half_range(low: HalfInteger, high: HalfInteger) -> Vec<HalfInteger> {
        (low.0..=high.0).map(HalfInteger).collect()
    }
}

impl Add for HalfInteger {
    type Output = HalfInteger;

    fn add(self, rhs: Self) -> Self::Output {
        HalfInteger(self.0 + rhs.0)
    }
}

impl Sub for HalfInteger {
    type Output = HalfInteger;

    fn sub(self, rhs: Self) -> Self::Output {
        HalfInteger(self.0 - rhs.0)
    }
}

impl Neg for HalfInteger {
    type Output = HalfInteger;

    fn neg(self) -> Self::Output {
        HalfInteger(-self.0)
    }
}

impl std::iter::Sum for HalfInteger {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(HalfInteger::ZERO, |acc, value| acc + value)
    }
}

impl From<i32> for HalfInteger {
    fn from(value: i32) -> Self {
        HalfInteger::from_int(value)
    }
}

impl From<HalfInteger> for f64 {
    fn from(value: HalfInteger) -> Self {
        value.as_f64()
    }
}

impl TryFrom<f64> for HalfInteger {
    type Error = RxnError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let doubled = value * 2.0;
        if !doubled.is_finite() || doubled.fract() != 0.0 || doubled.abs() > f64::from(i32::MAX) {
            return Err(RxnError::Serde(
                ErrorInfo::new("not-half-integer", "value is not a multiple of 1/2")
                    .with_context("value", value.to_string()),
            ));
        }
        Ok(HalfInteger(doubled as i32))
    }
}

impl FromStr for HalfInteger {
    type Err = RxnError;

    /// Parses `"3/2"`, `"-1/2"`, `"1"` or `"0.5"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || {
            RxnError::Serde(
                ErrorInfo::new("not-half-integer", "cannot parse half-integer")
                    .with_context("value", trimmed),
            )
        };
        if let Some((numerator, denominator)) = trimmed.split_once('/') {
            let numerator: i32 = numerator.trim().parse().map_err(|_| invalid())?;
            return match denominator.trim() {
                "1" => Ok(HalfInteger::from_int(numerator)),
                "2" => Ok(HalfInteger(numerator)),
                _ => Err(invalid()),
            };
        }
        let value: f64 = trimmed.parse().map_err(|_| invalid())?;
        HalfInteger::try_from(value)
    }
}

impl Display for HalfInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.0 / 2)
        } else {
            write!(f, "{}/2", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_integer_detection_handles_negative_values() {
        assert!(HalfInteger::from_int(-3).is_odd_integer());
        assert!(HalfInteger::from_int(1).is_odd_integer());
        assert!(!HalfInteger::from_int(-2).is_odd_integer());
        assert!(!HalfInteger::HALF.is_odd_integer());
    }

    #[test]
    fn display_uses_fractions() {
        assert_eq!(HalfInteger::from_doubled(-3).to_string(), "-3/2");
        assert_eq!(HalfInteger::from_int(2).to_string(), "2");
    }
}
