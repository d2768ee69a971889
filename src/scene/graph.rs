//! Entity graph: a flat, in-memory scene host.
//!
//! Keeps every attached grass mesh keyed by id. Used by the `build_page`
//! tool and by tests in place of an engine scene graph.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::host::SceneHost;
use super::node::{EntityId, LocalTransform, SceneEntity};
use crate::core::IdGenerator;
use crate::grass::GrassMesh;

/// Flat collection of attached entities.
#[derive(Debug, Default)]
pub struct EntityGraph {
    entities: BTreeMap<EntityId, SceneEntity>,
    ids: IdGenerator,
}

impl EntityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&SceneEntity> {
        self.entities.get(&id)
    }

    /// Entities in attach order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneEntity> {
        self.entities.values()
    }

    pub fn visible_count(&self) -> usize {
        self.entities.values().filter(|e| e.visible).count()
    }

    /// Total vertices across visible entities.
    pub fn visible_vertices(&self) -> usize {
        self.entities
            .values()
            .filter(|e| e.visible)
            .map(|e| e.mesh.vertex_count())
            .sum()
    }
}

impl SceneHost for EntityGraph {
    fn attach(&mut self, mesh: Arc<GrassMesh>, transform: LocalTransform, tint: Option<[u8; 4]>) -> EntityId {
        let id = EntityId(self.ids.next_id());
        log::trace!("Attached {} as entity {}", mesh.name, id.0);
        self.entities.insert(id, SceneEntity::new(id, mesh, transform, tint));
        id
    }

    fn detach(&mut self, id: EntityId) {
        if self.entities.remove(&id).is_none() {
            log::debug!("Detach of unknown entity {}", id.0);
        }
    }

    fn set_visible(&mut self, id: EntityId, visible: bool) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.visible = visible;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grass::layer::RenderTechnique;
    use crate::grass::mesh::IndexBuffer;
    use crate::grass::vertex::{GrassVertex, VertexData};
    use crate::math::Aabb;
    use glam::Vec3;

    fn mesh(vertices: usize) -> Arc<GrassMesh> {
        Arc::new(GrassMesh {
            name: "GrassLD0".into(),
            technique: RenderTechnique::FlatQuad,
            material: "grass".into(),
            vertices: VertexData::Quads(vec![GrassVertex::default(); vertices]),
            indices: Arc::new(IndexBuffer::for_quads(vertices / 4)),
            index_count: vertices / 4 * 6,
            bounds: Aabb::new(Vec3::ZERO, Vec3::ONE),
            bounding_radius: 0.0,
        })
    }

    #[test]
    fn test_attach_detach() {
        let mut graph = EntityGraph::new();
        let a = graph.attach(mesh(4), LocalTransform::identity(), None);
        let b = graph.attach(mesh(8), LocalTransform::from_position(Vec3::X), Some([255, 0, 0, 255]));
        assert_ne!(a, b);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.visible_vertices(), 12);

        graph.detach(a);
        assert_eq!(graph.len(), 1);
        assert!(graph.get(a).is_none());
        assert_eq!(graph.get(b).unwrap().tint, Some([255, 0, 0, 255]));

        // Second detach is a no-op
        graph.detach(a);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_visibility() {
        let mut graph = EntityGraph::new();
        let a = graph.attach(mesh(4), LocalTransform::identity(), None);
        graph.attach(mesh(4), LocalTransform::identity(), None);
        graph.set_visible(a, false);
        assert_eq!(graph.visible_count(), 1);
        assert_eq!(graph.visible_vertices(), 4);
    }

    #[test]
    fn test_world_center() {
        let mut graph = EntityGraph::new();
        let id = graph.attach(mesh(4), LocalTransform::from_position(Vec3::new(10.0, 0.0, 20.0)), None);
        let center = graph.get(id).unwrap().world_center();
        assert!((center - Vec3::new(10.5, 0.5, 20.5)).length() < 1e-5);
    }
}
