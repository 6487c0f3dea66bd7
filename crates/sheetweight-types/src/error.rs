//! Error types for sheetweight

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid image format: {0}")]
    InvalidImageFormat(String),

    /// Negative, NaN or infinite dimension
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    /// No foreground region in the binarized image
    #[error("Could not detect a sheet in the image")]
    RegionNotFound,

    #[error("Invalid calibration: {0}")]
    InvalidCalibration(String),

    #[error("External detection failed: {0}")]
    ExternalDetectionFailure(String),
}

pub type Result<T> = std::result::Result<T, Error>;
