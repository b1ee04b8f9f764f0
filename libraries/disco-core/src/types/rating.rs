//! Album rating

use crate::error::{DiscoError, Result};
use serde::{Deserialize, Serialize};

/// A rating between 0 and 5 stars in half-star steps.
///
/// 0 means "not rated yet".
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(f64);

impl Rating {
    pub const MAX: f64 = 5.0;
    pub const STEP: f64 = 0.5;

    /// Validate and wrap a rating value
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || !(0.0..=Self::MAX).contains(&value) {
            return Err(DiscoError::validation(format!(
                "rating must be between 0 and {}, got {value}",
                Self::MAX
            )));
        }
        if (value / Self::STEP).fract() != 0.0 {
            return Err(DiscoError::validation(format!(
                "rating must be a multiple of {}, got {value}",
                Self::STEP
            )));
        }
        Ok(Self(value))
    }

    /// Coerce a stored value onto the rating scale.
    ///
    /// Rows written before ratings were validated may hold anything; they
    /// are clamped and rounded to the nearest half star.
    #[must_use]
    pub fn saturating(value: f64) -> Self {
        if !value.is_finite() {
            return Self(0.0);
        }
        let clamped = value.clamp(0.0, Self::MAX);
        Self((clamped / Self::STEP).round() * Self::STEP)
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn is_rated(self) -> bool {
        self.0 > 0.0
    }
}

impl TryFrom<f64> for Rating {
    type Error = DiscoError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/5", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_half_step() {
        for step in 0..=10 {
            let value = f64::from(step) * 0.5;
            assert_eq!(Rating::new(value).unwrap().value(), value);
        }
    }

    #[test]
    fn rejects_out_of_range_and_off_step() {
        for value in [-0.5, 5.5, 0.25, 3.7, f64::NAN, f64::INFINITY] {
            let err = Rating::new(value).unwrap_err();
            assert!(err.is_validation(), "{value} should be rejected");
        }
    }

    #[test]
    fn saturating_rounds_legacy_values() {
        assert_eq!(Rating::saturating(3.7).value(), 3.5);
        assert_eq!(Rating::saturating(9.0).value(), 5.0);
        assert_eq!(Rating::saturating(-1.0).value(), 0.0);
        assert_eq!(Rating::saturating(f64::NAN).value(), 0.0);
    }

    #[test]
    fn deserialization_validates() {
        assert!(serde_json::from_str::<Rating>("4.5").is_ok());
        assert!(serde_json::from_str::<Rating>("4.2").is_err());
    }
}
