//! Regular sheet shapes with closed-form areas

use super::dimensions::validate_dimension;
use super::unit::LengthUnit;
use serde::{Deserialize, Serialize};
use sheetweight_types::Result;
use std::f64::consts::PI;

/// Regular shape, dimensions in the accompanying [`LengthUnit`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Shape {
    Rectangle { length: f64, width: f64 },
    Square { side: f64 },
    Circle { radius: f64 },
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Rectangle { .. } => "rectangle",
            Shape::Square { .. } => "square",
            Shape::Circle { .. } => "circle",
        }
    }

    /// Area in cm². Each linear dimension is normalized to cm before use.
    pub fn area_cm2(&self, unit: LengthUnit) -> Result<f64> {
        let cm = |name: &str, value: f64| validate_dimension(name, value).map(|v| unit.to_cm(v));
        let area = match *self {
            Shape::Rectangle { length, width } => cm("length", length)? * cm("width", width)?,
            Shape::Square { side } => {
                let side = cm("side", side)?;
                side * side
            }
            Shape::Circle { radius } => {
                let radius = cm("radius", radius)?;
                PI * radius * radius
            }
        };
        Ok(area)
    }
}
