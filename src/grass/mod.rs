//! Paged procedural grass.
//!
//! A [`GrassLoader`] owns an ordered list of [`GrassLayer`]s. When the host
//! pages a tile in, each layer samples instances over the tile
//! ([`placement`]), turns them into a packed mesh with one of the render
//! techniques ([`geometry`]) and hands the mesh to the host scene. Layers
//! that animate, fade or light their grass draw with a generated vertex
//! program from [`crate::shader`].

pub mod config;
pub mod geometry;
pub mod ground;
pub mod layer;
pub mod loader;
pub mod mesh;
pub mod page;
pub mod placement;
pub mod sampler;
pub mod vertex;

pub use config::{GrassConfig, LayerSettings};
pub use geometry::{GeometryBuilder, GeometryStrategy, MAX_QUADS};
pub use ground::{Ground, HeightFn};
pub use layer::{Animation, FadeTechnique, GrassLayer, HeightRange, LayerParams, RenderTechnique};
pub use loader::{GrassLoader, LayerBuildState, PageLoadReport};
pub use mesh::{GrassMesh, IndexBuffer};
pub use page::GrassPage;
pub use placement::{Instance, MAX_INSTANCES};
pub use sampler::DeterministicSampler;
pub use vertex::{GrassVertex, SpriteVertex, VertexData};
