//! Constants for weight estimation

pub mod materials;

pub use materials::{density_table, load_density_table, parse_density_overrides};
