//! Pixel-to-real-world scale calibration

use crate::model::{validate_dimension, LengthUnit};
use serde::{Deserialize, Serialize};
use sheetweight_types::{Error, Result};

/// Real length per pixel, always stored as cm/px
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRatio {
    pub cm_per_px: f64,
}

impl CalibrationRatio {
    /// Ratio from a reference object of known width.
    ///
    /// The real width is normalized to cm first, so the ratio (and every
    /// area derived from it) is in cm regardless of `unit`.
    pub fn from_reference(real_width: f64, unit: LengthUnit, pixel_width: f64) -> Result<Self> {
        if !real_width.is_finite() || real_width <= 0.0 {
            return Err(Error::InvalidCalibration(format!(
                "reference width must be positive (got {} {})",
                real_width, unit
            )));
        }
        if !pixel_width.is_finite() || pixel_width <= 0.0 {
            return Err(Error::InvalidCalibration(format!(
                "reference pixel width must be positive (got {} px)",
                pixel_width
            )));
        }
        Ok(Self {
            cm_per_px: unit.to_cm(real_width) / pixel_width,
        })
    }

    /// Ratio from a user-supplied scale
    pub fn from_cm_per_px(cm_per_px: f64) -> Result<Self> {
        if !cm_per_px.is_finite() || cm_per_px <= 0.0 {
            return Err(Error::InvalidCalibration(format!(
                "scale must be positive (got {} cm/px)",
                cm_per_px
            )));
        }
        Ok(Self { cm_per_px })
    }

    /// Scale factor for areas, cm² per px²
    pub fn area_factor(&self) -> f64 {
        self.cm_per_px * self.cm_per_px
    }

    /// Convert a pixel area (px²) to cm²
    pub fn apply(&self, pixel_area: f64) -> Result<f64> {
        let pixel_area = validate_dimension("pixel area", pixel_area)?;
        Ok(pixel_area * self.area_factor())
    }
}
