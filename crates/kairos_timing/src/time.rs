//! Scalar time values with NaN-as-invalid semantics.
//!
//! [`Time`] wraps an `f32` where NaN means "no value": an unconstrained
//! lookup, an absent tag, an unreachable path. Arithmetic propagates NaN and
//! the comparison operators are IEEE partial comparisons (`a < b` and
//! `a > b` are both `false` whenever either side is invalid), which the tag
//! folding rules rely on to make an invalid incumbent always lose.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// A time value in the caller's unit (conventionally nanoseconds).
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Time(f32);

impl Time {
    /// The invalid (NaN) time.
    pub const INVALID: Self = Time(f32::NAN);

    /// Zero time.
    pub const ZERO: Self = Time(0.0);

    /// Creates a time from a raw value.
    pub fn new(value: f32) -> Self {
        Time(value)
    }

    /// Returns the raw value (NaN if invalid).
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns `false` iff the value is NaN.
    pub fn valid(self) -> bool {
        !self.0.is_nan()
    }

    /// Returns the value if valid, zero otherwise.
    ///
    /// Used where an unspecified constraint quantity (source latency, clock
    /// uncertainty) contributes nothing rather than poisoning a sum.
    pub fn valid_or_zero(self) -> Time {
        if self.valid() {
            self
        } else {
            Time::ZERO
        }
    }
}

impl From<f32> for Time {
    fn from(value: f32) -> Self {
        Time(value)
    }
}

impl Add for Time {
    type Output = Time;

    fn add(self, rhs: Time) -> Time {
        Time(self.0 + rhs.0)
    }
}

impl Sub for Time {
    type Output = Time;

    fn sub(self, rhs: Time) -> Time {
        Time(self.0 - rhs.0)
    }
}

impl Neg for Time {
    type Output = Time;

    fn neg(self) -> Time {
        Time(-self.0)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity() {
        assert!(Time::new(1.5).valid());
        assert!(Time::ZERO.valid());
        assert!(!Time::INVALID.valid());
        assert!(!Time::new(f32::NAN).valid());
        assert!(Time::new(f32::INFINITY).valid());
    }

    #[test]
    fn arithmetic() {
        let a = Time::new(1.0);
        let b = Time::new(0.25);
        assert_eq!((a + b).value(), 1.25);
        assert_eq!((a - b).value(), 0.75);
        assert_eq!((-a).value(), -1.0);
    }

    #[test]
    fn nan_propagates_through_arithmetic() {
        let t = Time::new(2.0);
        assert!(!(t + Time::INVALID).valid());
        assert!(!(Time::INVALID - t).valid());
        assert!(!(-Time::INVALID).valid());
    }

    #[test]
    fn comparisons_false_when_invalid() {
        let t = Time::new(1.0);
        assert!(!(Time::INVALID > t));
        assert!(!(Time::INVALID < t));
        assert!(!(t > Time::INVALID));
        assert!(!(t < Time::INVALID));
        assert!(Time::new(2.0) > t);
        assert!(t < Time::new(2.0));
    }

    #[test]
    fn valid_or_zero() {
        assert_eq!(Time::new(3.0).valid_or_zero().value(), 3.0);
        assert_eq!(Time::INVALID.valid_or_zero().value(), 0.0);
    }

    #[test]
    fn display() {
        assert_eq!(Time::new(1.5).to_string(), "1.5");
        assert_eq!(Time::new(-0.25).to_string(), "-0.25");
    }

    #[test]
    fn serde_roundtrip() {
        let t = Time::new(4.25);
        let json = serde_json::to_string(&t).unwrap();
        let restored: Time = serde_json::from_str(&json).unwrap();
        assert_eq!(t, restored);
    }
}
