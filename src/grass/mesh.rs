//! Generated grass meshes and the index pattern they share.

use std::sync::Arc;

use super::layer::RenderTechnique;
use super::vertex::VertexData;
use crate::math::Aabb;

/// Triangle-list indices, two triangles per quad.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexBuffer {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl IndexBuffer {
    /// Indices for `quads` quads of four vertices each, wound 0-2-1, 1-2-3.
    pub fn for_quads(quads: usize) -> Self {
        let pattern = (0..quads).flat_map(|q| {
            let o = q * 4;
            [o, o + 2, o + 1, o + 1, o + 2, o + 3]
        });
        if quads * 4 <= u16::MAX as usize + 1 {
            Self::U16(pattern.map(|i| i as u16).collect())
        } else {
            Self::U32(pattern.map(|i| i as u32).collect())
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::U16(v) => v.len(),
            Self::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of quads the pattern covers.
    pub fn quads(&self) -> usize {
        self.len() / 6
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        match self {
            Self::U16(v) => v.get(index).map(|&i| i as u32),
            Self::U32(v) => v.get(index).copied(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::U16(v) => bytemuck::cast_slice(v),
            Self::U32(v) => bytemuck::cast_slice(v),
        }
    }
}

/// One index pattern reused by every mesh, grown on demand.
#[derive(Debug, Default)]
pub struct SharedIndices {
    buffer: Option<Arc<IndexBuffer>>,
}

impl SharedIndices {
    /// A buffer covering at least `quads` quads.
    pub fn acquire(&mut self, quads: usize) -> Arc<IndexBuffer> {
        match &self.buffer {
            Some(buffer) if buffer.quads() >= quads => Arc::clone(buffer),
            _ => {
                let covered = self.buffer.as_ref().map_or(0, |b| b.quads());
                let buffer = Arc::new(IndexBuffer::for_quads(quads.max(covered)));
                log::debug!("Grew shared grass index buffer to {} quads", buffer.quads());
                self.buffer = Some(Arc::clone(&buffer));
                buffer
            }
        }
    }
}

/// Geometry for one (page, layer) pair, in page-local coordinates.
#[derive(Clone, Debug)]
pub struct GrassMesh {
    pub name: String,
    pub technique: RenderTechnique,
    pub material: String,
    pub vertices: VertexData,
    pub indices: Arc<IndexBuffer>,
    /// Indices this mesh draws from the front of `indices`.
    pub index_count: usize,
    pub bounds: Aabb,
    pub bounding_radius: f32,
}

impl GrassMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn quad_count(&self) -> usize {
        self.index_count / 6
    }

    /// The slice of the shared pattern this mesh draws.
    pub fn index(&self, i: usize) -> Option<u32> {
        if i < self.index_count {
            self.indices.get(i)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winding() {
        let ib = IndexBuffer::for_quads(2);
        let expected = [0, 2, 1, 1, 2, 3, 4, 6, 5, 5, 6, 7];
        for (i, e) in expected.iter().enumerate() {
            assert_eq!(ib.get(i), Some(*e));
        }
        assert_eq!(ib.quads(), 2);
    }

    #[test]
    fn test_format_switch() {
        assert!(matches!(IndexBuffer::for_quads(16_384), IndexBuffer::U16(_)));
        let big = IndexBuffer::for_quads(16_385);
        assert!(matches!(big, IndexBuffer::U32(_)));
        assert_eq!(big.get(big.len() - 1), Some(16_385 * 4 - 1));
    }

    #[test]
    fn test_shared_indices_reused() {
        let mut shared = SharedIndices::default();
        let a = shared.acquire(10);
        let b = shared.acquire(5);
        assert!(Arc::ptr_eq(&a, &b));
        let c = shared.acquire(20);
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(c.quads(), 20);
        assert_eq!(a.quads(), 10);
    }
}
