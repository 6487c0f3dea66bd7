//! Material density table with optional TOML overrides
//!
//! `densities.toml` next to the config file may override built-in values:
//!
//! ```toml
//! [densities]
//! ms = 7.87
//! stainless-steel = 8.03
//! ```

use crate::config::Config;
use serde::Deserialize;
use sheetweight_domain::{DensityTable, Material};
use sheetweight_types::{ConfigError, Error, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Container for parsing densities.toml
#[derive(Debug, Deserialize)]
struct DensityOverrides {
    #[serde(default)]
    densities: HashMap<String, f64>,
}

/// Apply overrides from TOML text to the built-in table
pub fn parse_density_overrides(toml_content: &str) -> Result<DensityTable> {
    let overrides: DensityOverrides = toml::from_str(toml_content).map_err(|e| {
        Error::Config(ConfigError::ParseError(format!(
            "Failed to parse density TOML: {}",
            e
        )))
    })?;

    let mut table = DensityTable::default();
    for (name, density) in overrides.densities {
        let material = Material::from_name(&name).ok_or_else(|| {
            ConfigError::InvalidValue(format!("unknown material '{}' in density table", name))
        })?;
        if !table.set(material, density) {
            return Err(ConfigError::InvalidValue(format!(
                "density for '{}' must be positive (got {})",
                name, density
            ))
            .into());
        }
        debug!(material = material.code(), density, "density override applied");
    }

    Ok(table)
}

/// Load a density table from a TOML file, or built-ins if the file is absent
pub fn load_density_table(path: &Path) -> Result<DensityTable> {
    if !path.exists() {
        return Ok(DensityTable::default());
    }
    let content = std::fs::read_to_string(path)?;
    parse_density_overrides(&content)
}

/// Density table from the default config directory
pub fn density_table() -> Result<DensityTable> {
    load_density_table(&Config::config_dir()?.join("densities.toml"))
}
