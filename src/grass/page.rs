//! Pages: the rectangular world tiles grass is generated for.

use std::sync::Arc;

use glam::Vec3;

use super::mesh::GrassMesh;
use crate::math::Rect;
use crate::scene::{EntityId, LocalTransform, SceneHost};

/// A mesh attached to the host on behalf of one layer.
#[derive(Clone, Debug)]
pub struct PageMesh {
    /// Index of the layer in the loader at build time.
    pub layer: usize,
    pub mesh: Arc<GrassMesh>,
    pub entity: EntityId,
}

/// One loaded tile and the grass meshes generated for it.
#[derive(Debug)]
pub struct GrassPage {
    bounds: Rect,
    center: Vec3,
    meshes: Vec<PageMesh>,
    visible: bool,
}

impl GrassPage {
    /// A page centred on its bounds at height 0.
    pub fn new(bounds: Rect) -> Self {
        let center = Vec3::new(
            (bounds.left + bounds.right) * 0.5,
            0.0,
            (bounds.top + bounds.bottom) * 0.5,
        );
        Self::with_center(bounds, center)
    }

    /// A page with an explicit centre; vertices are stored relative to it.
    pub fn with_center(bounds: Rect, center: Vec3) -> Self {
        Self {
            bounds,
            center,
            meshes: Vec::new(),
            visible: true,
        }
    }

    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn meshes(&self) -> &[PageMesh] {
        &self.meshes
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_loaded(&self) -> bool {
        !self.meshes.is_empty()
    }

    /// Hand `mesh` to the host at the page centre and keep its handle.
    pub fn attach(&mut self, host: &mut dyn SceneHost, layer: usize, mesh: GrassMesh) -> EntityId {
        let mesh = Arc::new(mesh);
        let entity = host.attach(Arc::clone(&mesh), LocalTransform::from_position(self.center), None);
        if !self.visible {
            host.set_visible(entity, false);
        }
        self.meshes.push(PageMesh { layer, mesh, entity });
        entity
    }

    /// Detach every mesh from the host and release them.
    pub fn detach_all(&mut self, host: &mut dyn SceneHost) {
        for page_mesh in self.meshes.drain(..) {
            host.detach(page_mesh.entity);
        }
    }

    pub fn set_visible(&mut self, host: &mut dyn SceneHost, visible: bool) {
        self.visible = visible;
        for page_mesh in &self.meshes {
            host.set_visible(page_mesh.entity, visible);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grass::layer::RenderTechnique;
    use crate::grass::mesh::IndexBuffer;
    use crate::grass::vertex::VertexData;
    use crate::math::Aabb;
    use crate::scene::EntityGraph;

    fn mesh() -> GrassMesh {
        GrassMesh {
            name: "GrassLD7".into(),
            technique: RenderTechnique::FlatQuad,
            material: "grass".into(),
            vertices: VertexData::Quads(Vec::new()),
            indices: Arc::new(IndexBuffer::for_quads(0)),
            index_count: 0,
            bounds: Aabb::default(),
            bounding_radius: 0.0,
        }
    }

    #[test]
    fn test_center() {
        let page = GrassPage::new(Rect::new(100.0, 200.0, 164.0, 264.0));
        assert_eq!(page.center(), Vec3::new(132.0, 0.0, 232.0));
    }

    #[test]
    fn test_attach_places_at_center() {
        let mut host = EntityGraph::new();
        let mut page = GrassPage::with_center(Rect::new(0.0, 0.0, 10.0, 10.0), Vec3::new(5.0, 2.0, 5.0));
        let id = page.attach(&mut host, 0, mesh());
        assert_eq!(host.get(id).unwrap().transform.position, Vec3::new(5.0, 2.0, 5.0));
        assert!(page.is_loaded());
    }

    #[test]
    fn test_visibility_and_detach() {
        let mut host = EntityGraph::new();
        let mut page = GrassPage::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        page.attach(&mut host, 0, mesh());
        page.attach(&mut host, 1, mesh());

        page.set_visible(&mut host, false);
        assert_eq!(host.visible_count(), 0);

        // Meshes attached while hidden stay hidden
        page.attach(&mut host, 2, mesh());
        assert_eq!(host.visible_count(), 0);

        page.detach_all(&mut host);
        assert!(host.is_empty());
        assert!(page.meshes().is_empty());
    }
}
