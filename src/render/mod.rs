//! Rendering backend seam

pub mod backend;

pub use backend::{BackendKind, Capabilities, HeadlessBackend, ProgramHandle, RenderBackend};
