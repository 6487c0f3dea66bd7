//! Application service layer - use cases, config, density tables

pub mod app;
pub mod config;
pub mod constants;
