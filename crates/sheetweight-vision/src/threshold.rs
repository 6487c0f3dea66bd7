//! Threshold-based region estimator

use crate::binarize::{binarize, Polarity};
use crate::contours::external_regions;
use crate::{RegionEstimator, DEFAULT_THRESHOLD};
use image::DynamicImage;
use sheetweight_domain::RegionSet;
use sheetweight_types::{Error, Result};
use std::path::Path;
use tracing::debug;

/// Binarizes the image and takes the largest external region as the sheet.
/// With `with_reference`, the second-largest region is reported as the
/// reference object.
#[derive(Debug, Clone)]
pub struct ThresholdEstimator {
    pub threshold: u8,
    pub polarity: Polarity,
    pub with_reference: bool,
}

impl Default for ThresholdEstimator {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            polarity: Polarity::default(),
            with_reference: true,
        }
    }
}

impl ThresholdEstimator {
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn with_reference(mut self, with_reference: bool) -> Self {
        self.with_reference = with_reference;
        self
    }

    pub fn estimate_image(&self, image: &DynamicImage) -> Result<RegionSet> {
        let mask = binarize(image, self.threshold, self.polarity);
        let regions = external_regions(&mask);

        debug!(
            threshold = self.threshold,
            polarity = %self.polarity,
            count = regions.len(),
            "external regions found"
        );

        let mut ranked = regions.into_iter();
        let sheet = match ranked.next() {
            Some(region) if region.pixel_area > 0.0 => region,
            _ => return Err(Error::RegionNotFound),
        };

        let mut set = RegionSet::sheet_only(sheet);
        if self.with_reference {
            if let Some(reference) = ranked.next() {
                set = set.with_reference(reference);
            }
        }

        Ok(set)
    }
}

impl RegionEstimator for ThresholdEstimator {
    fn estimate(&self, image_path: &Path) -> Result<RegionSet> {
        let image = image::open(image_path)?;
        debug!(
            path = %image_path.display(),
            width = image.width(),
            height = image.height(),
            "image decoded"
        );
        self.estimate_image(&image)
    }
}
