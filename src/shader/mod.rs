//! Generated grass vertex programs
//!
//! Each distinct combination of layer rendering options gets one vertex
//! program, assembled from per-language fragments and compiled through the
//! render backend. Layers draw with a copy of their base material bound to
//! that program.

pub mod assembler;
pub mod cache;
pub mod fragments;
pub mod material;
pub mod options;

pub use cache::{ShaderVariant, ShaderVariantCache};
pub use material::{Material, MaterialLibrary, ParamSource, ParamValue};
pub use options::{ShaderLanguage, ShaderOptions};
