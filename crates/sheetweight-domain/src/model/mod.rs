//! Domain model types

pub mod dimensions;
pub mod material;
pub mod region;
pub mod shape;
pub mod unit;

pub use dimensions::{validate_dimension, Length};
pub use material::{DensityTable, Material, MaterialSpec};
pub use region::{DetectedRegion, RegionSet};
pub use shape::Shape;
pub use unit::{LengthUnit, MassUnit};
