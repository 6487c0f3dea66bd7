//! Use cases

pub mod weight_service;

pub use weight_service::{
    build_estimator, CalibrationReport, ImageRequest, Method, RegularRequest, WeightReport,
    WeightService,
};
