//! Numeric primitives
//!
//! `ShortFloat` is the fixed-precision representation used for every value
//! in [0, 1] that the reasoner tracks: truth components, budget components,
//! and the quantities derived from them. Values are stored at four-digit
//! precision (scale 10000), which makes equality exact and keeps the
//! containers hashable.

use std::fmt;
use thiserror::Error;

/// Fixed-point scale: four decimal digits.
const SCALE: f32 = 10_000.0;

/// A value outside the unit interval was handed to a `ShortFloat`.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("value {0} is outside [0, 1]")]
pub struct RangeError(pub f32);

/// A fixed-precision value in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShortFloat(u16);

impl ShortFloat {
    /// Create a new value, panicking when it falls outside [0, 1].
    ///
    /// Callers holding unchecked input must clamp first or go through
    /// [`ShortFloat::try_new`].
    pub fn new(value: f32) -> Self {
        Self::try_new(value).expect("ShortFloat out of range")
    }

    /// Create a new value, reporting a [`RangeError`] when it falls
    /// outside [0, 1].
    pub fn try_new(value: f32) -> Result<Self, RangeError> {
        if !(0.0..=1.0).contains(&value) || value.is_nan() {
            return Err(RangeError(value));
        }
        Ok(ShortFloat((value * SCALE).round() as u16))
    }

    /// Read back as a float.
    pub fn value(&self) -> f32 {
        self.0 as f32 / SCALE
    }

    /// Replace the stored value, panicking when out of range.
    pub fn set(&mut self, value: f32) {
        *self = ShortFloat::new(value);
    }
}

impl fmt::Display for ShortFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.value())
    }
}

impl From<ShortFloat> for f32 {
    fn from(sf: ShortFloat) -> f32 {
        sf.value()
    }
}

/// Probabilistic OR of two values.
///
/// Commutative and monotone: the result is never below either argument.
pub fn or(a: f32, b: f32) -> f32 {
    1.0 - (1.0 - a) * (1.0 - b)
}

/// Probabilistic AND of two values.
pub fn and(a: f32, b: f32) -> f32 {
    a * b
}

/// Probabilistic OR over a slice.
pub fn or_all(values: &[f32]) -> f32 {
    1.0 - values.iter().fold(1.0, |acc, v| acc * (1.0 - v))
}

/// Arithmetic mean of two values.
pub fn average(a: f32, b: f32) -> f32 {
    (a + b) / 2.0
}

/// Arithmetic mean over a slice.
pub fn average_all(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding() {
        let sf = ShortFloat::new(0.12345);
        assert_eq!(sf.value(), 0.1235);
        assert_eq!(ShortFloat::new(1.0).value(), 1.0);
        assert_eq!(ShortFloat::new(0.0).value(), 0.0);
    }

    #[test]
    fn test_equality_is_exact() {
        assert_eq!(ShortFloat::new(0.5), ShortFloat::new(0.50004));
        assert_ne!(ShortFloat::new(0.5), ShortFloat::new(0.5001));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_new_rejects_out_of_range() {
        let _ = ShortFloat::new(1.5);
    }

    #[test]
    fn test_try_new_reports_range_error() {
        assert_eq!(ShortFloat::try_new(1.5), Err(RangeError(1.5)));
        assert_eq!(ShortFloat::try_new(-0.1), Err(RangeError(-0.1)));
        assert!(ShortFloat::try_new(0.7).is_ok());
    }

    #[test]
    fn test_or_commutative_and_monotone() {
        for &(a, b) in &[(0.2, 0.9), (0.0, 0.0), (1.0, 0.3), (0.5, 0.5)] {
            let left = or(a, b);
            let right = or(b, a);
            assert!((left - right).abs() < 1e-6);
            assert!(left >= a.max(b) - 1e-6);
        }
    }

    #[test]
    fn test_and_or_bounds() {
        assert!((or(0.5, 0.5) - 0.75).abs() < 1e-6);
        assert!((and(0.5, 0.5) - 0.25).abs() < 1e-6);
        assert!((or_all(&[0.5, 0.5, 0.5]) - 0.875).abs() < 1e-6);
        assert!((average(0.2, 0.8) - 0.5).abs() < 1e-6);
        assert!((average_all(&[0.0, 0.5, 1.0]) - 0.5).abs() < 1e-6);
    }
}
