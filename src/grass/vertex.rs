//! GPU vertex layouts for generated grass meshes.
//!
//! Quads bake their corners into `position`. Sprites store the shared centre
//! in `position` and each corner's offset in `billboard_offset`; the vertex
//! program turns the offset towards the camera.

use bytemuck::{Pod, Zeroable};

/// Quad corner vertex (24 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GrassVertex {
    pub position: [f32; 3],
    /// RGBA8
    pub color: [u8; 4],
    pub uv: [f32; 2],
}

/// Billboard corner vertex (40 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 3],
    /// (horizontal offset, vertical offset, 0, 0)
    pub billboard_offset: [f32; 4],
    pub color: [u8; 4],
    pub uv: [f32; 2],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexSemantic {
    Position,
    BillboardOffset,
    Color,
    TexCoord0,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexFormat {
    Float2,
    Float3,
    Float4,
    Unorm8x4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    pub semantic: VertexSemantic,
    pub format: VertexFormat,
    pub offset: usize,
}

pub const GRASS_VERTEX_LAYOUT: &[VertexAttribute] = &[
    VertexAttribute { semantic: VertexSemantic::Position, format: VertexFormat::Float3, offset: 0 },
    VertexAttribute { semantic: VertexSemantic::Color, format: VertexFormat::Unorm8x4, offset: 12 },
    VertexAttribute { semantic: VertexSemantic::TexCoord0, format: VertexFormat::Float2, offset: 16 },
];

pub const SPRITE_VERTEX_LAYOUT: &[VertexAttribute] = &[
    VertexAttribute { semantic: VertexSemantic::Position, format: VertexFormat::Float3, offset: 0 },
    VertexAttribute { semantic: VertexSemantic::BillboardOffset, format: VertexFormat::Float4, offset: 12 },
    VertexAttribute { semantic: VertexSemantic::Color, format: VertexFormat::Unorm8x4, offset: 28 },
    VertexAttribute { semantic: VertexSemantic::TexCoord0, format: VertexFormat::Float2, offset: 32 },
];

/// Typed vertex storage for one mesh.
#[derive(Clone, Debug, PartialEq)]
pub enum VertexData {
    Quads(Vec<GrassVertex>),
    Sprites(Vec<SpriteVertex>),
}

impl VertexData {
    pub fn len(&self) -> usize {
        match self {
            Self::Quads(v) => v.len(),
            Self::Sprites(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn layout(&self) -> &'static [VertexAttribute] {
        match self {
            Self::Quads(_) => GRASS_VERTEX_LAYOUT,
            Self::Sprites(_) => SPRITE_VERTEX_LAYOUT,
        }
    }

    /// Bytes per vertex.
    pub fn stride(&self) -> usize {
        match self {
            Self::Quads(_) => std::mem::size_of::<GrassVertex>(),
            Self::Sprites(_) => std::mem::size_of::<SpriteVertex>(),
        }
    }

    /// Raw bytes ready for a vertex buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Quads(v) => bytemuck::cast_slice(v),
            Self::Sprites(v) => bytemuck::cast_slice(v),
        }
    }

    /// Position attribute of vertex `index`.
    pub fn position(&self, index: usize) -> Option<[f32; 3]> {
        match self {
            Self::Quads(v) => v.get(index).map(|v| v.position),
            Self::Sprites(v) => v.get(index).map(|v| v.position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_sizes() {
        assert_eq!(std::mem::size_of::<GrassVertex>(), 24);
        assert_eq!(std::mem::size_of::<SpriteVertex>(), 40);
    }

    #[test]
    fn test_layout_offsets_match_structs() {
        assert_eq!(std::mem::offset_of!(GrassVertex, color), GRASS_VERTEX_LAYOUT[1].offset);
        assert_eq!(std::mem::offset_of!(GrassVertex, uv), GRASS_VERTEX_LAYOUT[2].offset);
        assert_eq!(std::mem::offset_of!(SpriteVertex, billboard_offset), SPRITE_VERTEX_LAYOUT[1].offset);
        assert_eq!(std::mem::offset_of!(SpriteVertex, color), SPRITE_VERTEX_LAYOUT[2].offset);
        assert_eq!(std::mem::offset_of!(SpriteVertex, uv), SPRITE_VERTEX_LAYOUT[3].offset);
    }

    #[test]
    fn test_as_bytes() {
        let data = VertexData::Quads(vec![GrassVertex::default(); 3]);
        assert_eq!(data.as_bytes().len(), 72);
        assert_eq!(data.stride(), 24);
        assert_eq!(data.layout().len(), 3);

        let sprites = VertexData::Sprites(vec![SpriteVertex::default(); 2]);
        assert_eq!(sprites.as_bytes().len(), 80);
    }

    #[test]
    fn test_color_bytes_little_end_first() {
        let v = GrassVertex {
            position: [0.0; 3],
            color: [1, 2, 3, 4],
            uv: [0.0; 2],
        };
        let bytes = bytemuck::bytes_of(&v);
        assert_eq!(&bytes[12..16], &[1, 2, 3, 4]);
    }
}
