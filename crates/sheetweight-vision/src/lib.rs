//! Vision module - sheet area estimation from photos
//!
//! Two estimators sit behind [`RegionEstimator`]:
//! - [`ThresholdEstimator`]: grayscale threshold + external contours
//! - [`CommandDetector`]: an external object-detection command returning boxes

pub mod binarize;
pub mod contours;
pub mod detector;
pub mod threshold;

pub use binarize::{binarize, luma, Polarity};
pub use contours::{external_regions, polygon_area};
pub use detector::{BoxPolicy, CommandDetector, Detection};
pub use threshold::ThresholdEstimator;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sheetweight_domain::RegionSet;
use sheetweight_types::{Error, Result};
use std::path::Path;

/// Default grayscale threshold
pub const DEFAULT_THRESHOLD: u8 = 150;

/// Supported upload extensions
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Finds the sheet (and optionally a reference object) in an image
pub trait RegionEstimator {
    fn estimate(&self, image_path: &Path) -> Result<RegionSet>;
}

/// How the pixel scale is established
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferencePolicy {
    /// Second-largest thresholded region is the reference object
    #[default]
    SecondLargest,
    /// External detector reports the sheet and a labelled reference marker
    Detector,
    /// No reference object; a fixed cm/px scale is supplied
    FixedScale,
}

impl std::fmt::Display for ReferencePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferencePolicy::SecondLargest => write!(f, "second-largest"),
            ReferencePolicy::Detector => write!(f, "detector"),
            ReferencePolicy::FixedScale => write!(f, "fixed-scale"),
        }
    }
}

/// Check if a path is a supported image file
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Validate an image file exists, has a supported extension and decodes
pub fn validate_image(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }

    if !path.is_file() {
        return Err(Error::InvalidImageFormat(format!(
            "{} is not a file",
            path.display()
        )));
    }

    if !is_supported_image(path) {
        return Err(Error::InvalidImageFormat(format!(
            "Unsupported image format: {}",
            path.display()
        )));
    }

    image::open(path)?;

    Ok(())
}
