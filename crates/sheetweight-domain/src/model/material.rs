//! Material-related type definitions

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mild steel density in g/cm³
pub const MILD_STEEL_DENSITY: f64 = 7.85;

/// Stainless steel density in g/cm³
pub const STAINLESS_STEEL_DENSITY: f64 = 8.00;

/// Sheet material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Material {
    #[value(alias = "ms", alias = "mildsteel")]
    #[serde(alias = "ms", alias = "MS")]
    MildSteel,
    #[value(alias = "ss", alias = "stainlesssteel")]
    #[serde(alias = "ss", alias = "SS")]
    StainlessSteel,
}

impl Material {
    pub const ALL: [Material; 2] = [Material::MildSteel, Material::StainlessSteel];

    /// Built-in density in g/cm³
    pub fn density(&self) -> f64 {
        match self {
            Material::MildSteel => MILD_STEEL_DENSITY,
            Material::StainlessSteel => STAINLESS_STEEL_DENSITY,
        }
    }

    /// Short trade code
    pub fn code(&self) -> &'static str {
        match self {
            Material::MildSteel => "MS",
            Material::StainlessSteel => "SS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Material::MildSteel => "Mild Steel",
            Material::StainlessSteel => "Stainless Steel",
        }
    }

    /// Resolve a material from its code or name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();
        match normalized.as_str() {
            "ms" | "mildsteel" => Some(Material::MildSteel),
            "ss" | "stainlesssteel" => Some(Material::StainlessSteel),
            _ => None,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Material::MildSteel
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label(), self.code())
    }
}

/// Material properties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialSpec {
    pub material: Material,
    /// Display name
    pub name: String,
    /// Density in g/cm³
    pub density: f64,
}

/// Density lookup, seeded with the built-in constants
#[derive(Debug, Clone)]
pub struct DensityTable {
    densities: HashMap<Material, f64>,
}

impl Default for DensityTable {
    fn default() -> Self {
        Self {
            densities: Material::ALL
                .iter()
                .map(|m| (*m, m.density()))
                .collect(),
        }
    }
}

impl DensityTable {
    /// Replace the density for one material.
    ///
    /// Non-positive or non-finite values are ignored and `false` is returned.
    pub fn set(&mut self, material: Material, density: f64) -> bool {
        if !density.is_finite() || density <= 0.0 {
            return false;
        }
        self.densities.insert(material, density);
        true
    }

    pub fn density(&self, material: Material) -> f64 {
        self.densities
            .get(&material)
            .copied()
            .unwrap_or_else(|| material.density())
    }

    pub fn spec(&self, material: Material) -> MaterialSpec {
        MaterialSpec {
            material,
            name: material.label().to_string(),
            density: self.density(material),
        }
    }

    /// All specs in declaration order
    pub fn specs(&self) -> Vec<MaterialSpec> {
        Material::ALL.iter().map(|m| self.spec(*m)).collect()
    }
}
