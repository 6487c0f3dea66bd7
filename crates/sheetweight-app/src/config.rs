//! Configuration management for sheetweight
//!
//! Config stored at: ~/.config/sheetweight/config.json

use serde::{Deserialize, Serialize};
use sheetweight_domain::{LengthUnit, MassUnit, Material};
use sheetweight_types::{ConfigError, OutputFormat, Result};
use sheetweight_vision::{BoxPolicy, Polarity, ReferencePolicy, DEFAULT_THRESHOLD};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default material
    #[serde(default)]
    pub material: Material,

    /// Default length unit for dimensions
    #[serde(default)]
    pub unit: LengthUnit,

    /// Unit for reported weights
    #[serde(default)]
    pub mass_unit: MassUnit,

    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Grayscale threshold for binarization
    #[serde(default = "default_threshold")]
    pub threshold: u8,

    /// Which side of the threshold is the sheet
    #[serde(default)]
    pub polarity: Polarity,

    /// How the pixel scale is established
    #[serde(default)]
    pub reference_policy: ReferencePolicy,

    /// cm per pixel used by the fixed-scale policy
    #[serde(default = "default_fixed_scale")]
    pub fixed_scale_cm_per_px: f64,

    /// External detection command
    #[serde(default)]
    pub detector_command: Option<String>,

    /// Minimum detector confidence (0.0-1.0)
    #[serde(default = "default_detector_min_conf")]
    pub detector_min_conf: f64,

    /// Label the detector uses for the reference marker
    #[serde(default = "default_reference_label")]
    pub reference_label: String,

    /// How detector sheet boxes become one area
    #[serde(default)]
    pub box_policy: BoxPolicy,
}

fn default_threshold() -> u8 {
    DEFAULT_THRESHOLD
}

fn default_fixed_scale() -> f64 {
    // 0.01 cm² per px²
    0.1
}

fn default_detector_min_conf() -> f64 {
    0.25
}

fn default_reference_label() -> String {
    sheetweight_vision::detector::DEFAULT_REFERENCE_LABEL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            material: Material::default(),
            unit: LengthUnit::default(),
            mass_unit: MassUnit::default(),
            output_format: OutputFormat::default(),
            threshold: default_threshold(),
            polarity: Polarity::default(),
            reference_policy: ReferencePolicy::default(),
            fixed_scale_cm_per_px: default_fixed_scale(),
            detector_command: None,
            detector_min_conf: default_detector_min_conf(),
            reference_label: default_reference_label(),
            box_policy: BoxPolicy::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("sheetweight");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from the default location, or defaults if absent
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.fixed_scale_cm_per_px.is_finite() || self.fixed_scale_cm_per_px <= 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "fixed_scale_cm_per_px must be positive (got {})",
                self.fixed_scale_cm_per_px
            ))
            .into());
        }
        if !(0.0..=1.0).contains(&self.detector_min_conf) {
            return Err(ConfigError::InvalidValue(format!(
                "detector_min_conf must be within 0.0-1.0 (got {})",
                self.detector_min_conf
            ))
            .into());
        }
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Sheetweight Configuration")?;
        writeln!(f, "=========================")?;
        writeln!(f)?;
        writeln!(f, "Material:         {}", self.material)?;
        writeln!(f, "Length unit:      {}", self.unit)?;
        writeln!(f, "Mass unit:        {}", self.mass_unit)?;
        writeln!(f, "Output format:    {}", self.output_format)?;
        writeln!(f, "Threshold:        {}", self.threshold)?;
        writeln!(f, "Polarity:         {}", self.polarity)?;
        writeln!(f, "Reference policy: {}", self.reference_policy)?;
        writeln!(f, "Fixed scale:      {} cm/px", self.fixed_scale_cm_per_px)?;
        writeln!(
            f,
            "Detector command: {}",
            self.detector_command.as_deref().unwrap_or("(not set)")
        )?;
        writeln!(f, "Detector min conf: {:.2}", self.detector_min_conf)?;
        writeln!(f, "Reference label:  {}", self.reference_label)?;
        writeln!(f, "Box policy:       {}", self.box_policy)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:      {}", path.display())?;
        }

        Ok(())
    }
}
