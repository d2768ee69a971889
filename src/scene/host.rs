//! Interface the grass system uses to register meshes with a host scene.

use std::sync::Arc;

use super::node::{EntityId, LocalTransform};
use crate::grass::GrassMesh;

/// Scene graph that renders generated grass meshes.
pub trait SceneHost {
    /// Register `mesh` as a renderable object and return its handle.
    fn attach(&mut self, mesh: Arc<GrassMesh>, transform: LocalTransform, tint: Option<[u8; 4]>) -> EntityId;

    /// Remove a previously attached entity. Unknown ids are ignored.
    fn detach(&mut self, id: EntityId);

    fn set_visible(&mut self, id: EntityId, visible: bool);
}
