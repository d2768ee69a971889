//! Procedural terrain height

pub mod height;
pub use height::{HeightParams, NoiseHeightField};
