//! Spin and parity value types.

use std::fmt::{self, Display};
use std::ops::{Mul, Neg};

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, RxnError};
use crate::halfint::HalfInteger;

/// A spin-like quantity: a magnitude together with one of its projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "SpinRepr")]
pub struct Spin {
    magnitude: HalfInteger,
    projection: HalfInteger,
}

#[derive(Deserialize)]
struct SpinRepr {
    magnitude: HalfInteger,
    projection: HalfInteger,
}

impl TryFrom<SpinRepr> for Spin {
    type Error = RxnError;

    fn try_from(repr: SpinRepr) -> Result<Self, Self::Error> {
        Spin::new(repr.magnitude, repr.projection)
    }
}

impl Spin {
    /// Creates a spin, validating that the projection is reachable from the magnitude.
    pub fn new(magnitude: HalfInteger, projection: HalfInteger) -> Result<Self, RxnError> {
        if magnitude < HalfInteger::ZERO
            || projection.abs() > magnitude
            || !(magnitude - projection).is_integer()
        {
            return Err(RxnError::Config(
                ErrorInfo::new("invalid-spin", "spin projection does not fit the magnitude")
                    .with_context("magnitude", magnitude.to_string())
                    .with_context("projection", projection.to_string()),
            ));
        }
        Ok(Self {
            magnitude,
            projection,
        })
    }

    /// Returns the magnitude.
    pub fn magnitude(&self) -> HalfInteger {
        self.magnitude
    }

    /// Returns the projection.
    pub fn projection(&self) -> HalfInteger {
        self.projection
    }
}

impl Display for Spin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.magnitude, self.projection)
    }
}

/// Returns the projections `-s, -s+1, ..., s` of a magnitude in ascending order.
pub fn spin_projections(magnitude: HalfInteger) -> Vec<HalfInteger> {
    HalfInteger::unit_range(-magnitude, magnitude)
}

/// Intrinsic, C or G parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Parity {
    /// Eigenvalue -1.
    Minus,
    /// Eigenvalue +1.
    Plus,
}

impl Parity {
    /// Both eigenvalues in ascending order.
    pub const ALL: [Parity; 2] = [Parity::Minus, Parity::Plus];

    /// Returns `(-1)^exponent`.
    pub fn from_exponent(exponent: i32) -> Parity {
        if exponent.rem_euclid(2) == 0 {
            Parity::Plus
        } else {
            Parity::Minus
        }
    }

    /// Returns `(-1)^exponent` for an integral half-integer, `None` otherwise.
    pub fn from_half_exponent(exponent: HalfInteger) -> Option<Parity> {
        exponent.as_int().map(Parity::from_exponent)
    }

    /// Returns the eigenvalue as an integer.
    pub fn value(self) -> i8 {
        match self {
            Parity::Minus => -1,
            Parity::Plus => 1,
        }
    }

    /// Multiplies all parities of an iterator; the empty product is `+1`.
    pub fn product<I: IntoIterator<Item = Parity>>(iter: I) -> Parity {
        iter.into_iter().fold(Parity::Plus, |acc, parity| acc * parity)
    }
}

impl Mul for Parity {
    type Output = Parity;

    fn mul(self, rhs: Self) -> Self::Output {
        if self == rhs {
            Parity::Plus
        } else {
            Parity::Minus
        }
    }
}

impl Neg for Parity {
    type Output = Parity;

    fn neg(self) -> Self::Output {
        self * Parity::Minus
    }
}

impl From<Parity> for i8 {
    fn from(value: Parity) -> Self {
        value.value()
    }
}

impl TryFrom<i8> for Parity {
    type Error = RxnError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Parity::Minus),
            1 => Ok(Parity::Plus),
            other => Err(RxnError::Serde(
                ErrorInfo::new("invalid-parity", "parity must be -1 or +1")
                    .with_context("value", other.to_string()),
            )),
        }
    }
}

impl Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parity::Minus => write!(f, "-1"),
            Parity::Plus => write!(f, "+1"),
        }
    }
}
