//! Length and mass units

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Linear unit for dimensions and reference widths
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
pub enum LengthUnit {
    #[value(name = "mm", alias = "millimeter")]
    #[serde(rename = "mm", alias = "millimeter")]
    Millimeter,
    #[default]
    #[value(name = "cm", alias = "centimeter")]
    #[serde(rename = "cm", alias = "centimeter")]
    Centimeter,
    #[value(name = "in", alias = "inch")]
    #[serde(rename = "in", alias = "inch")]
    Inch,
}

impl LengthUnit {
    /// Multiplicative factor to centimeters
    pub fn cm_factor(&self) -> f64 {
        match self {
            LengthUnit::Millimeter => 0.1,
            LengthUnit::Centimeter => 1.0,
            LengthUnit::Inch => 2.54,
        }
    }

    pub fn to_cm(&self, value: f64) -> f64 {
        value * self.cm_factor()
    }

    pub fn from_cm(&self, value_cm: f64) -> f64 {
        value_cm / self.cm_factor()
    }

    /// Convert a value expressed in `self` into `target`
    pub fn convert(&self, value: f64, target: LengthUnit) -> f64 {
        target.from_cm(self.to_cm(value))
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            LengthUnit::Millimeter => "mm",
            LengthUnit::Centimeter => "cm",
            LengthUnit::Inch => "in",
        }
    }
}

impl std::fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Unit for the reported weight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
pub enum MassUnit {
    #[value(name = "g", alias = "grams")]
    #[serde(rename = "g", alias = "grams")]
    Grams,
    #[default]
    #[value(name = "kg", alias = "kilograms")]
    #[serde(rename = "kg", alias = "kilograms")]
    Kilograms,
}

impl MassUnit {
    pub fn from_grams(&self, grams: f64) -> f64 {
        match self {
            MassUnit::Grams => grams,
            MassUnit::Kilograms => grams / 1000.0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            MassUnit::Grams => "g",
            MassUnit::Kilograms => "kg",
        }
    }
}

impl std::fmt::Display for MassUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
