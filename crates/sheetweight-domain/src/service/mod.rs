//! Domain services

pub mod calibration;
pub mod weight_calculator;

pub use calibration::CalibrationRatio;
pub use weight_calculator::{calculate_weight, calculate_weight_from_spec, WeightResult};
