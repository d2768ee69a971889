//! Scene entity types
//!
//! Entity IDs, transforms and the entity record the host keeps per attached mesh.

use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};

use crate::grass::GrassMesh;

/// Unique identifier for an attached entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

/// Placement of an entity in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl LocalTransform {
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a translation-only transform.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// A renderable grass mesh registered with the host.
#[derive(Clone, Debug)]
pub struct SceneEntity {
    pub id: EntityId,
    pub mesh: Arc<GrassMesh>,
    pub transform: LocalTransform,
    /// Multiplied into vertex colors by the host, if set.
    pub tint: Option<[u8; 4]>,
    pub visible: bool,
}

impl SceneEntity {
    pub fn new(id: EntityId, mesh: Arc<GrassMesh>, transform: LocalTransform, tint: Option<[u8; 4]>) -> Self {
        Self {
            id,
            mesh,
            transform,
            tint,
            visible: true,
        }
    }

    /// Mesh bounds translated into world space.
    pub fn world_center(&self) -> Vec3 {
        self.transform.to_mat4().transform_point3(self.mesh.bounds.center())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_transform_identity() {
        let t = LocalTransform::identity();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.to_mat4(), Mat4::IDENTITY);
    }

    #[test]
    fn test_local_transform_from_position() {
        let pos = Vec3::new(10.0, 5.0, -3.0);
        let m = LocalTransform::from_position(pos).to_mat4();
        let (_, _, translation) = m.to_scale_rotation_translation();
        assert!((translation - pos).length() < 1e-5);
    }

    #[test]
    fn test_entity_id_ordering() {
        assert!(EntityId(1) < EntityId(2));
        assert_eq!(EntityId(3), EntityId(3));
    }
}
