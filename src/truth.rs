//! Truth values
//!
//! A truth value pairs a frequency (how often the statement held in the
//! evidence) with a confidence (how much evidence there is), relative to an
//! evidential horizon `k`. Both components are stored as fixed-precision
//! [`ShortFloat`]s.

use std::fmt;

use crate::config::HORIZON;
use crate::num::ShortFloat;

/// Confidence never reaches 1: a full-confidence value would carry
/// infinite evidence weight.
const MAX_CONFIDENCE: f32 = 0.9999;

/// A truth value: frequency, confidence, and evidential horizon.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Truth {
    frequency: ShortFloat,
    confidence: ShortFloat,
    horizon: f32,
}

impl Truth {
    /// Create a truth value with the default horizon. Inputs are clamped
    /// into range.
    pub fn new(frequency: f32, confidence: f32) -> Self {
        Truth::with_horizon(frequency, confidence, HORIZON)
    }

    /// Create a truth value with an explicit horizon.
    pub fn with_horizon(frequency: f32, confidence: f32, horizon: f32) -> Self {
        Truth {
            frequency: ShortFloat::new(frequency.clamp(0.0, 1.0)),
            confidence: ShortFloat::new(confidence.clamp(0.0, MAX_CONFIDENCE)),
            horizon: horizon.max(1.0),
        }
    }

    /// Recover a truth value from evidence weights.
    pub fn from_weight(positive: f32, total: f32, horizon: f32) -> Self {
        let frequency = if total == 0.0 { 0.5 } else { positive / total };
        let confidence = if total == 0.0 {
            0.0
        } else {
            total / (total + horizon)
        };
        Truth::with_horizon(frequency, confidence, horizon)
    }

    pub fn frequency(&self) -> f32 {
        self.frequency.value()
    }

    pub fn confidence(&self) -> f32 {
        self.confidence.value()
    }

    pub fn horizon(&self) -> f32 {
        self.horizon
    }

    /// Expectation: `c * (f - 0.5) + 0.5`.
    pub fn expectation(&self) -> f32 {
        self.confidence() * (self.frequency() - 0.5) + 0.5
    }

    /// Positive evidence weight `k * f * c / (1 - c)`.
    pub fn weight_positive(&self) -> f32 {
        self.horizon * self.frequency() * self.confidence() / (1.0 - self.confidence())
    }

    /// Negative evidence weight `k * (1 - f) * c / (1 - c)`.
    pub fn weight_negative(&self) -> f32 {
        self.horizon * (1.0 - self.frequency()) * self.confidence() / (1.0 - self.confidence())
    }

    /// Total evidence weight.
    pub fn weight(&self) -> f32 {
        self.weight_positive() + self.weight_negative()
    }

    /// Combine two independently evidenced truths by weight addition.
    pub fn revision(a: &Truth, b: &Truth) -> Truth {
        let positive = a.weight_positive() + b.weight_positive();
        let total = a.weight() + b.weight();
        Truth::from_weight(positive, total, a.horizon)
    }

    /// Move a temporal truth to the atemporal layer; confidence strictly
    /// decreases.
    pub fn eternalize(&self) -> Truth {
        let c = self.confidence();
        Truth::with_horizon(self.frequency(), c / (c + self.horizon), self.horizon)
    }

    /// Project this truth from its source time onto a target time, as seen
    /// from the current time. Distance discounts confidence only.
    pub fn projection(&self, source: i64, current: i64, target: i64) -> Truth {
        let v = (source - target).abs() as f32;
        if v == 0.0 {
            return *self;
        }
        let (lo, hi) = (source.min(target), source.max(target));
        let s = if (lo..=hi).contains(&current) {
            0.5
        } else {
            (source - current).abs().min((target - current).abs()) as f32
        };
        let factor = (2.0 * s) / (2.0 * s + v);
        Truth::with_horizon(self.frequency(), self.confidence() * factor, self.horizon)
    }

    /// Budget quality of a conclusion carrying this truth.
    pub fn quality(&self) -> f32 {
        let e = self.expectation();
        e.max((1.0 - e) * 0.75)
    }
}

impl fmt::Display for Truth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.frequency(), self.confidence())
    }
}

impl PartialEq for Truth {
    fn eq(&self, other: &Self) -> bool {
        self.frequency == other.frequency && self.confidence == other.confidence
    }
}

impl Eq for Truth {}
