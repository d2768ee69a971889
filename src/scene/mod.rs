//! Host scene integration
//!
//! Generated meshes are handed to a [`SceneHost`]; [`EntityGraph`] is the
//! in-memory implementation.

pub mod graph;
pub mod host;
pub mod node;

pub use graph::EntityGraph;
pub use host::SceneHost;
pub use node::{EntityId, LocalTransform, SceneEntity};
