//! Weight Service - core use case for sheet weight estimation
//!
//! Regular shapes: shape area → weight.
//! Photos:
//! 1. Validate the thickness and the image
//! 2. Estimate the sheet region (and reference object) in pixels
//! 3. Calibrate pixels to cm
//! 4. Calculate weight from density × thickness × area

use crate::config::Config;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sheetweight_domain::service::{calculate_weight_from_spec, CalibrationRatio, WeightResult};
use sheetweight_domain::{
    DensityTable, Length, LengthUnit, MassUnit, Material, MaterialSpec, RegionSet, Shape,
};
use sheetweight_types::{Error, Result};
use sheetweight_vision::{
    validate_image, CommandDetector, RegionEstimator, ReferencePolicy, ThresholdEstimator,
};
use std::path::PathBuf;
use tracing::{debug, info};

/// Weight request for a regular shape
#[derive(Debug, Clone)]
pub struct RegularRequest {
    pub material: Material,
    pub thickness: Length,
    pub shape: Shape,
    /// Unit of the shape's dimensions
    pub unit: LengthUnit,
}

/// Weight request for a photo of an irregular sheet
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub material: Material,
    pub thickness: Length,
    pub image: PathBuf,
    pub policy: ReferencePolicy,
    /// Real width of the reference object
    pub reference_width: Option<Length>,
    /// cm per pixel for the fixed-scale policy
    pub scale_cm_per_px: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Regular,
    Image,
}

/// How the image area was scaled
#[derive(Debug, Clone, Serialize)]
pub struct CalibrationReport {
    pub policy: ReferencePolicy,
    pub cm_per_px: f64,
    pub sheet_pixel_area: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_pixel_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_width_cm: Option<f64>,
}

/// Result of one weight computation
#[derive(Debug, Clone, Serialize)]
pub struct WeightReport {
    pub method: Method,
    pub material: Material,
    pub material_name: String,
    /// g/cm³
    pub density: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
    pub thickness_cm: f64,
    pub area_cm2: f64,
    pub weight: f64,
    pub mass_unit: MassUnit,
    pub weight_grams: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration: Option<CalibrationReport>,
    pub computed_at: DateTime<Utc>,
}

impl WeightReport {
    pub fn weight_label(&self) -> String {
        WeightResult::from_grams(self.weight_grams).format(self.mass_unit)
    }
}

/// Build the estimator a policy needs
pub fn build_estimator(config: &Config, policy: ReferencePolicy) -> Result<Box<dyn RegionEstimator>> {
    match policy {
        ReferencePolicy::SecondLargest | ReferencePolicy::FixedScale => Ok(Box::new(
            ThresholdEstimator::default()
                .with_threshold(config.threshold)
                .with_polarity(config.polarity)
                .with_reference(policy == ReferencePolicy::SecondLargest),
        )),
        ReferencePolicy::Detector => {
            let command = config
                .detector_command
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .ok_or_else(|| {
                    Error::ExternalDetectionFailure(
                        "detector policy selected but no detector command is configured"
                            .to_string(),
                    )
                })?;
            Ok(Box::new(
                CommandDetector::new(command)
                    .with_min_confidence(config.detector_min_conf)
                    .with_reference_label(config.reference_label.clone())
                    .with_box_policy(config.box_policy),
            ))
        }
    }
}

/// Stateless weight computation over a density table
#[derive(Debug, Clone)]
pub struct WeightService {
    densities: DensityTable,
    mass_unit: MassUnit,
}

impl Default for WeightService {
    fn default() -> Self {
        Self::new(DensityTable::default(), MassUnit::default())
    }
}

impl WeightService {
    pub fn new(densities: DensityTable, mass_unit: MassUnit) -> Self {
        Self {
            densities,
            mass_unit,
        }
    }

    pub fn with_mass_unit(mut self, mass_unit: MassUnit) -> Self {
        self.mass_unit = mass_unit;
        self
    }

    pub fn material_specs(&self) -> Vec<MaterialSpec> {
        self.densities.specs()
    }

    fn report(
        &self,
        method: Method,
        spec: MaterialSpec,
        thickness_cm: f64,
        area_cm2: f64,
    ) -> Result<WeightReport> {
        let result = calculate_weight_from_spec(&spec, thickness_cm, area_cm2)?;

        info!(
            material = spec.material.code(),
            thickness_cm,
            area_cm2,
            grams = result.grams,
            "weight calculated"
        );

        Ok(WeightReport {
            method,
            material: spec.material,
            material_name: spec.name,
            density: spec.density,
            shape: None,
            thickness_cm,
            area_cm2,
            weight: result.in_unit(self.mass_unit),
            mass_unit: self.mass_unit,
            weight_grams: result.grams,
            calibration: None,
            computed_at: Utc::now(),
        })
    }

    pub fn compute_regular(&self, request: &RegularRequest) -> Result<WeightReport> {
        let thickness_cm = request.thickness.to_cm_checked("thickness")?;
        let area_cm2 = request.shape.area_cm2(request.unit)?;
        debug!(shape = request.shape.name(), area_cm2, "regular area");

        let spec = self.densities.spec(request.material);
        let mut report = self.report(Method::Regular, spec, thickness_cm, area_cm2)?;
        report.shape = Some(request.shape);
        Ok(report)
    }

    /// Calibrate a region set and compute weight. Pure; no image access.
    pub fn compute_from_regions(
        &self,
        request: &ImageRequest,
        regions: &RegionSet,
    ) -> Result<WeightReport> {
        let thickness_cm = request.thickness.to_cm_checked("thickness")?;

        let (ratio, calibration) = match request.policy {
            ReferencePolicy::FixedScale => {
                let scale = request.scale_cm_per_px.ok_or_else(|| {
                    Error::InvalidCalibration("fixed-scale policy needs a cm/px scale".to_string())
                })?;
                let ratio = CalibrationRatio::from_cm_per_px(scale)?;
                (ratio, None)
            }
            ReferencePolicy::SecondLargest | ReferencePolicy::Detector => {
                let real = request.reference_width.ok_or_else(|| {
                    Error::InvalidCalibration(
                        "a reference width is required to calibrate the image".to_string(),
                    )
                })?;
                let reference = regions.reference.ok_or_else(|| {
                    Error::InvalidCalibration("no reference object found in the image".to_string())
                })?;
                let ratio =
                    CalibrationRatio::from_reference(real.value, real.unit, reference.pixel_width)?;
                (ratio, Some((reference.pixel_width, real.unit.to_cm(real.value))))
            }
        };

        let area_cm2 = ratio.apply(regions.sheet.pixel_area)?;
        debug!(
            policy = %request.policy,
            cm_per_px = ratio.cm_per_px,
            pixel_area = regions.sheet.pixel_area,
            area_cm2,
            "image area calibrated"
        );

        let spec = self.densities.spec(request.material);
        let mut report = self.report(Method::Image, spec, thickness_cm, area_cm2)?;
        report.calibration = Some(CalibrationReport {
            policy: request.policy,
            cm_per_px: ratio.cm_per_px,
            sheet_pixel_area: regions.sheet.pixel_area,
            reference_pixel_width: calibration.map(|(px, _)| px),
            reference_width_cm: calibration.map(|(_, cm)| cm),
        });
        Ok(report)
    }

    pub fn compute_image(
        &self,
        request: &ImageRequest,
        estimator: &dyn RegionEstimator,
    ) -> Result<WeightReport> {
        // Reject bad thickness before touching the image
        request.thickness.to_cm_checked("thickness")?;
        validate_image(&request.image)?;

        let regions = estimator.estimate(&request.image)?;
        self.compute_from_regions(request, &regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use image::{Rgb, RgbImage};
    use sheetweight_domain::DetectedRegion;
    use std::cell::Cell;
    use std::path::Path;

    struct StubEstimator {
        result: fn() -> Result<RegionSet>,
        calls: Cell<usize>,
    }

    impl StubEstimator {
        fn new(result: fn() -> Result<RegionSet>) -> Self {
            Self {
                result,
                calls: Cell::new(0),
            }
        }
    }

    impl RegionEstimator for StubEstimator {
        fn estimate(&self, _image_path: &Path) -> Result<RegionSet> {
            self.calls.set(self.calls.get() + 1);
            (self.result)()
        }
    }

    fn image_request(policy: ReferencePolicy) -> ImageRequest {
        ImageRequest {
            material: Material::MildSteel,
            thickness: Length::cm(0.2),
            image: PathBuf::from("unused.png"),
            policy,
            reference_width: Some(Length::cm(5.0)),
            scale_cm_per_px: None,
        }
    }

    fn regions_with_reference() -> RegionSet {
        RegionSet::sheet_only(DetectedRegion::new(2000.0, 60.0, 40.0))
            .with_reference(DetectedRegion::new(400.0, 50.0, 50.0))
    }

    #[test]
    fn test_regular_rectangle_in_grams() {
        let service = WeightService::default().with_mass_unit(MassUnit::Grams);
        let report = service
            .compute_regular(&RegularRequest {
                material: Material::MildSteel,
                thickness: Length::new(2.0, LengthUnit::Millimeter),
                shape: Shape::Rectangle { length: 10.0, width: 10.0 },
                unit: LengthUnit::Centimeter,
            })
            .unwrap();

        assert_eq!(report.method, Method::Regular);
        assert_relative_eq!(report.area_cm2, 100.0);
        assert_relative_eq!(report.weight, 157.0, epsilon = 1e-9);
        assert_eq!(report.weight_label(), "157.00 g");
    }

    #[test]
    fn test_regular_stainless_circle_in_kg() {
        let service = WeightService::default();
        let report = service
            .compute_regular(&RegularRequest {
                material: Material::StainlessSteel,
                thickness: Length::cm(1.0),
                shape: Shape::Circle { radius: 10.0 },
                unit: LengthUnit::Centimeter,
            })
            .unwrap();

        // 8.00 x 1 x π x 100 = 2513.27g
        assert_relative_eq!(report.weight, 8.0 * std::f64::consts::PI * 100.0 / 1000.0, epsilon = 1e-9);
        assert_eq!(report.mass_unit, MassUnit::Kilograms);
    }

    #[test]
    fn test_regular_negative_thickness() {
        let err = WeightService::default()
            .compute_regular(&RegularRequest {
                material: Material::MildSteel,
                thickness: Length::cm(-1.0),
                shape: Shape::Square { side: 4.0 },
                unit: LengthUnit::Centimeter,
            })
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDimension(_)));
    }

    #[test]
    fn test_density_override_flows_into_report() {
        let mut table = DensityTable::default();
        table.set(Material::MildSteel, 10.0);
        let service = WeightService::new(table, MassUnit::Grams);
        let report = service
            .compute_regular(&RegularRequest {
                material: Material::MildSteel,
                thickness: Length::cm(1.0),
                shape: Shape::Square { side: 1.0 },
                unit: LengthUnit::Centimeter,
            })
            .unwrap();
        assert_relative_eq!(report.weight, 10.0);
        assert_relative_eq!(report.density, 10.0);
    }

    #[test]
    fn test_from_regions_reference_calibration() {
        let service = WeightService::default().with_mass_unit(MassUnit::Grams);
        let report = service
            .compute_from_regions(&image_request(ReferencePolicy::SecondLargest), &regions_with_reference())
            .unwrap();

        // 5cm / 50px = 0.1 cm/px; 2000px² → 20cm²; 20 x 0.2 x 7.85 = 31.4g
        assert_relative_eq!(report.area_cm2, 20.0, epsilon = 1e-9);
        assert_relative_eq!(report.weight, 31.4, epsilon = 1e-9);

        let calibration = report.calibration.unwrap();
        assert_relative_eq!(calibration.cm_per_px, 0.1);
        assert_eq!(calibration.reference_pixel_width, Some(50.0));
    }

    #[test]
    fn test_from_regions_missing_reference() {
        let regions = RegionSet::sheet_only(DetectedRegion::new(2000.0, 60.0, 40.0));
        let err = WeightService::default()
            .compute_from_regions(&image_request(ReferencePolicy::SecondLargest), &regions)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCalibration(_)));
    }

    #[test]
    fn test_from_regions_zero_pixel_reference() {
        let regions = RegionSet::sheet_only(DetectedRegion::new(2000.0, 60.0, 40.0))
            .with_reference(DetectedRegion::new(0.0, 0.0, 0.0));
        let err = WeightService::default()
            .compute_from_regions(&image_request(ReferencePolicy::Detector), &regions)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCalibration(_)));
    }

    #[test]
    fn test_from_regions_missing_reference_width() {
        let mut request = image_request(ReferencePolicy::SecondLargest);
        request.reference_width = None;
        let err = WeightService::default()
            .compute_from_regions(&request, &regions_with_reference())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCalibration(_)));
    }

    #[test]
    fn test_from_regions_fixed_scale() {
        let mut request = image_request(ReferencePolicy::FixedScale);
        request.reference_width = None;
        request.scale_cm_per_px = Some(0.1);

        let regions = RegionSet::sheet_only(DetectedRegion::new(10000.0, 100.0, 100.0));
        let report = WeightService::default()
            .with_mass_unit(MassUnit::Grams)
            .compute_from_regions(&request, &regions)
            .unwrap();

        assert_relative_eq!(report.area_cm2, 100.0, epsilon = 1e-9);
        assert_relative_eq!(report.weight, 157.0, epsilon = 1e-9);
        assert!(report.calibration.unwrap().reference_pixel_width.is_none());
    }

    #[test]
    fn test_from_regions_fixed_scale_requires_scale() {
        let regions = RegionSet::sheet_only(DetectedRegion::new(10000.0, 100.0, 100.0));
        let err = WeightService::default()
            .compute_from_regions(&image_request(ReferencePolicy::FixedScale), &regions)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCalibration(_)));
    }

    #[test]
    fn test_compute_image_rejects_thickness_before_estimating() {
        let stub = StubEstimator::new(|| Ok(regions_with_reference()));
        let mut request = image_request(ReferencePolicy::SecondLargest);
        request.thickness = Length::cm(-0.5);

        let err = WeightService::default().compute_image(&request, &stub).unwrap_err();
        assert!(matches!(err, Error::InvalidDimension(_)));
        assert_eq!(stub.calls.get(), 0);
    }

    #[test]
    fn test_compute_image_propagates_region_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.png");
        RgbImage::from_pixel(8, 8, Rgb([0, 0, 0])).save(&path).unwrap();

        let stub = StubEstimator::new(|| Err(Error::RegionNotFound));
        let mut request = image_request(ReferencePolicy::SecondLargest);
        request.image = path;

        let err = WeightService::default().compute_image(&request, &stub).unwrap_err();
        assert!(matches!(err, Error::RegionNotFound));
        assert_eq!(stub.calls.get(), 1);
    }

    #[test]
    fn test_compute_image_with_threshold_estimator() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.png");

        // Sheet: 100x50 px = 5000px². Reference: 26px wide.
        let mut img = RgbImage::from_pixel(200, 100, Rgb([0, 0, 0]));
        for y in 10..60 {
            for x in 10..110 {
                img.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        for y in 20..46 {
            for x in 150..176 {
                img.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        img.save(&path).unwrap();

        let config = Config::default();
        let estimator = build_estimator(&config, ReferencePolicy::SecondLargest).unwrap();

        let mut request = image_request(ReferencePolicy::SecondLargest);
        request.image = path;
        request.reference_width = Some(Length::cm(2.6));

        let report = WeightService::default()
            .with_mass_unit(MassUnit::Grams)
            .compute_image(&request, estimator.as_ref())
            .unwrap();

        // 2.6cm / 26px = 0.1 cm/px → 5000 x 0.01 = 50cm²; x 0.2 x 7.85 = 78.5g
        assert_relative_eq!(report.area_cm2, 50.0, epsilon = 1e-9);
        assert_relative_eq!(report.weight, 78.5, epsilon = 1e-9);
    }

    #[test]
    fn test_detector_policy_needs_command() {
        let config = Config::default();
        let err = build_estimator(&config, ReferencePolicy::Detector).err().unwrap();
        assert!(matches!(err, Error::ExternalDetectionFailure(_)));
    }

    #[test]
    fn test_report_serializes() {
        let report = WeightService::default()
            .compute_from_regions(&image_request(ReferencePolicy::SecondLargest), &regions_with_reference())
            .unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["method"], "image");
        assert_eq!(json["material"], "mild-steel");
        assert_eq!(json["mass_unit"], "kg");
        assert_eq!(json["calibration"]["policy"], "second-largest");
        assert!(json.get("shape").is_none());
    }
}
