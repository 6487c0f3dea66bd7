//! Weight calculation for flat sheets
//!
//! Formula: weight = density × thickness × area
//!
//! Density is in g/cm³, thickness in cm and area in cm², so the product is
//! grams. Conversion to kilograms happens only at presentation time through
//! [`WeightResult::in_unit`].

use crate::model::{validate_dimension, MassUnit, MaterialSpec};
use serde::{Deserialize, Serialize};
use sheetweight_types::Result;

/// Calculate weight in grams with explicit density.
///
/// All three factors must be finite and non-negative; zero yields zero.
pub fn calculate_weight(density: f64, thickness_cm: f64, area_cm2: f64) -> Result<f64> {
    let density = validate_dimension("density", density)?;
    let thickness_cm = validate_dimension("thickness", thickness_cm)?;
    let area_cm2 = validate_dimension("area", area_cm2)?;
    Ok(density * thickness_cm * area_cm2)
}

pub fn calculate_weight_from_spec(
    spec: &MaterialSpec,
    thickness_cm: f64,
    area_cm2: f64,
) -> Result<WeightResult> {
    calculate_weight(spec.density, thickness_cm, area_cm2).map(WeightResult::from_grams)
}

/// A computed mass, stored in grams
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightResult {
    pub grams: f64,
}

impl WeightResult {
    pub fn from_grams(grams: f64) -> Self {
        Self { grams }
    }

    pub fn in_unit(&self, unit: MassUnit) -> f64 {
        unit.from_grams(self.grams)
    }

    /// Two-decimal display with unit label, e.g. `157.00 g`
    pub fn format(&self, unit: MassUnit) -> String {
        format!("{:.2} {}", self.in_unit(unit), unit.symbol())
    }
}
