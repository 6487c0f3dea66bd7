//! Validated linear dimensions

use super::unit::LengthUnit;
use serde::{Deserialize, Serialize};
use sheetweight_types::{Error, Result};

/// Reject negative, NaN and infinite inputs. Zero is allowed.
pub fn validate_dimension(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::InvalidDimension(format!(
            "{} must be a finite number (got {})",
            name, value
        )));
    }
    if value < 0.0 {
        return Err(Error::InvalidDimension(format!(
            "{} must not be negative (got {})",
            name, value
        )));
    }
    Ok(value)
}

/// A length in a declared unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    pub fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    pub fn cm(value: f64) -> Self {
        Self::new(value, LengthUnit::Centimeter)
    }

    /// Validate under `name` and normalize to centimeters
    pub fn to_cm_checked(&self, name: &str) -> Result<f64> {
        validate_dimension(name, self.value).map(|v| self.unit.to_cm(v))
    }
}

impl std::fmt::Display for Length {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}
