//! Regions produced by image analysis

use serde::{Deserialize, Serialize};

/// A foreground region measured in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectedRegion {
    /// Enclosed area in px²
    pub pixel_area: f64,
    /// Horizontal bounding extent in px
    pub pixel_width: f64,
    /// Vertical bounding extent in px
    pub pixel_height: f64,
    /// Detector confidence (0.0 - 1.0), absent for thresholded regions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl DetectedRegion {
    pub fn new(pixel_area: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            pixel_area,
            pixel_width,
            pixel_height,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// Output of a region estimator: the sheet and, when found, the reference object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSet {
    pub sheet: DetectedRegion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<DetectedRegion>,
}

impl RegionSet {
    pub fn sheet_only(sheet: DetectedRegion) -> Self {
        Self {
            sheet,
            reference: None,
        }
    }

    pub fn with_reference(mut self, reference: DetectedRegion) -> Self {
        self.reference = Some(reference);
        self
    }
}
