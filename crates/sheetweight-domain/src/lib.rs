//! Domain layer for sheet weight estimation
//!
//! Pure types and arithmetic: materials, units, shapes, calibration and the
//! weight formula. Nothing in here touches the filesystem or images.

pub mod model;
pub mod service;

pub use model::*;
