//! Core types and utilities

pub mod types;
pub mod error;
pub mod logging;
pub mod ids;

pub use types::*;
pub use error::Error;
pub use ids::IdGenerator;
