//! Sward - paged procedural grass geometry with generated vertex programs

pub mod core;
pub mod math;
pub mod field;
pub mod grass;
pub mod shader;
pub mod render;
pub mod scene;
pub mod terrain;
