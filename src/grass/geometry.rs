//! Turns sampled instances into packed grass meshes.
//!
//! Every render technique shares the per-instance attribute extraction
//! (size, facing, color) in [`Blade`], then emits its own corners through a
//! [`GeometryStrategy`]. Vertices are written relative to the page centre so
//! precision holds far from the world origin.

use glam::{Vec2, Vec3};

use super::ground::Ground;
use super::layer::{GrassLayer, LayerParams, RenderTechnique};
use super::mesh::{GrassMesh, SharedIndices};
use super::page::GrassPage;
use super::placement::{Instance, MAX_INSTANCES};
use super::sampler::DeterministicSampler;
use super::vertex::{GrassVertex, SpriteVertex, VertexData};
use crate::core::{Error, IdGenerator, Result};
use crate::field::color::WHITE;
use crate::math::Aabb;

/// Largest quad count a single mesh may hold.
pub const MAX_QUADS: usize = u16::MAX as usize;

/// Attributes shared by every technique for one instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blade {
    pub center: Vec2,
    pub half_width: f32,
    pub height: f32,
    /// Unit facing vector (cos, sin) of the instance angle.
    pub facing: Vec2,
    pub color: [u8; 4],
}

impl Blade {
    pub fn from_instance(instance: &Instance, params: &LayerParams) -> Self {
        let width = params.min_width() + (params.max_width() - params.min_width()) * instance.size;
        let height = params.min_height() + (params.max_height() - params.min_height()) * instance.size;
        let color = params.color_field.as_ref().map_or(WHITE, |field| {
            field.sample(instance.x, instance.z, &params.map_bounds, params.color_filter)
        });
        Self {
            center: Vec2::new(instance.x, instance.z),
            half_width: width * 0.5,
            height,
            facing: Vec2::from_angle(instance.angle),
            color,
        }
    }
}

/// Output state threaded through one build.
pub struct EmitContext<'a> {
    pub ground: Ground<'a>,
    pub max_slope: f32,
    /// Page centre subtracted from every vertex.
    pub origin: Vec3,
    pub sampler: &'a mut DeterministicSampler,
    pub vertices: VertexData,
    pub min_y: f32,
    pub max_y: f32,
}

impl EmitContext<'_> {
    /// Ground corners of a base edge running `center ± offset`. The second
    /// corner collapses onto the first when the edge is steeper than allowed.
    pub fn base_edge(&self, center: Vec2, offset: Vec2) -> (Vec3, Vec3) {
        let a = center - offset;
        let b = center + offset;
        if !self.ground.has_terrain() {
            return (Vec3::new(a.x, 0.0, a.y), Vec3::new(b.x, 0.0, b.y));
        }

        let ya = self.ground.height(a.x, a.y);
        let yb = self.ground.height(b.x, b.y);
        let first = Vec3::new(a.x, ya, a.y);
        let slope = (ya - yb).abs() / (offset.length() * 2.0);
        if slope > self.max_slope {
            (first, first)
        } else {
            (first, Vec3::new(b.x, yb, b.y))
        }
    }

    fn track_y(&mut self, y: f32) {
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    /// Emit a vertical quad standing on a base edge.
    pub fn push_quad(&mut self, base_a: Vec3, base_b: Vec3, height: f32, color: [u8; 4]) {
        let a = base_a - self.origin;
        let b = base_b - self.origin;
        let up = Vec3::Y * height;
        let corners = [
            (a + up, [0.0, 0.0]),
            (b + up, [1.0, 0.0]),
            (a, [0.0, 1.0]),
            (b, [1.0, 1.0]),
        ];

        for (p, _) in &corners {
            self.track_y(p.y);
        }
        if let VertexData::Quads(out) = &mut self.vertices {
            out.extend(corners.iter().map(|&(p, uv)| GrassVertex {
                position: p.to_array(),
                color,
                uv,
            }));
        }
    }

    /// Emit a camera-facing sprite; corners are resolved by the vertex program.
    pub fn push_sprite(&mut self, center: Vec3, half_width: f32, height: f32, color: [u8; 4], mirrored: bool) {
        let c = (center - self.origin).to_array();
        let (left, right) = if mirrored { (1.0, 0.0) } else { (0.0, 1.0) };
        let corners = [
            ([-half_width, height, 0.0, 0.0], [left, 0.0]),
            ([half_width, height, 0.0, 0.0], [right, 0.0]),
            ([-half_width, 0.0, 0.0, 0.0], [left, 1.0]),
            ([half_width, 0.0, 0.0, 0.0], [right, 1.0]),
        ];

        self.track_y(c[1]);
        self.track_y(c[1] + height);
        if let VertexData::Sprites(out) = &mut self.vertices {
            out.extend(corners.iter().map(|&(offset, uv)| SpriteVertex {
                position: c,
                billboard_offset: offset,
                color,
                uv,
            }));
        }
    }
}

/// One way of turning a blade into quads.
pub trait GeometryStrategy {
    fn quads_per_instance(&self) -> usize;

    /// Empty vertex storage in the layout this strategy writes.
    fn vertex_storage(&self, quads: usize) -> VertexData;

    fn emit(&self, blade: &Blade, ctx: &mut EmitContext<'_>);
}

/// One vertical quad per instance.
pub struct FlatQuad;

/// Two perpendicular quads per instance.
pub struct CrossedQuads;

/// One camera-facing billboard per instance.
pub struct Sprite;

impl GeometryStrategy for FlatQuad {
    fn quads_per_instance(&self) -> usize {
        1
    }

    fn vertex_storage(&self, quads: usize) -> VertexData {
        VertexData::Quads(Vec::with_capacity(quads * 4))
    }

    fn emit(&self, blade: &Blade, ctx: &mut EmitContext<'_>) {
        let (a, b) = ctx.base_edge(blade.center, blade.facing * blade.half_width);
        ctx.push_quad(a, b, blade.height, blade.color);
    }
}

impl GeometryStrategy for CrossedQuads {
    fn quads_per_instance(&self) -> usize {
        2
    }

    fn vertex_storage(&self, quads: usize) -> VertexData {
        VertexData::Quads(Vec::with_capacity(quads * 4))
    }

    fn emit(&self, blade: &Blade, ctx: &mut EmitContext<'_>) {
        // Each quad gets its own slope test and its own bounds contribution
        for facing in [blade.facing, blade.facing.perp()] {
            let (a, b) = ctx.base_edge(blade.center, facing * blade.half_width);
            ctx.push_quad(a, b, blade.height, blade.color);
        }
    }
}

impl GeometryStrategy for Sprite {
    fn quads_per_instance(&self) -> usize {
        1
    }

    fn vertex_storage(&self, quads: usize) -> VertexData {
        VertexData::Sprites(Vec::with_capacity(quads * 4))
    }

    fn emit(&self, blade: &Blade, ctx: &mut EmitContext<'_>) {
        let y = ctx.ground.height(blade.center.x, blade.center.y);
        let mirrored = ctx.sampler.unit() < 0.5;
        let center = Vec3::new(blade.center.x, y, blade.center.y);
        ctx.push_sprite(center, blade.half_width, blade.height, blade.color, mirrored);
    }
}

impl RenderTechnique {
    pub fn strategy(self) -> &'static dyn GeometryStrategy {
        match self {
            Self::FlatQuad => &FlatQuad,
            Self::CrossedQuads => &CrossedQuads,
            Self::Sprite => &Sprite,
        }
    }
}

/// Builds meshes and owns the index pattern they share.
#[derive(Debug, Default)]
pub struct GeometryBuilder {
    indices: SharedIndices,
}

impl GeometryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the mesh for `instances` of `layer` on `page`.
    ///
    /// Returns `Ok(None)` when there is nothing to draw and
    /// [`Error::CapacityExceeded`] when the instance or quad count does not
    /// fit a 16-bit index space.
    pub fn build(
        &mut self,
        page: &GrassPage,
        layer: &mut GrassLayer,
        instances: &[Instance],
        ground: Ground<'_>,
        ids: &IdGenerator,
    ) -> Result<Option<GrassMesh>> {
        if instances.is_empty() {
            return Ok(None);
        }

        let material = layer.active_material().to_string();
        let (params, sampler) = layer.parts_mut();
        let technique = params.render_technique;
        let strategy = technique.strategy();

        if instances.len() > MAX_INSTANCES {
            return Err(Error::CapacityExceeded {
                what: "instance",
                requested: instances.len(),
                limit: MAX_INSTANCES,
            });
        }
        let quads = instances.len() * strategy.quads_per_instance();
        if quads > MAX_QUADS {
            return Err(Error::CapacityExceeded {
                what: "quad",
                requested: quads,
                limit: MAX_QUADS,
            });
        }

        let origin = page.center();
        let mut ctx = EmitContext {
            ground,
            max_slope: params.max_slope,
            origin,
            sampler,
            vertices: strategy.vertex_storage(quads),
            min_y: f32::INFINITY,
            max_y: f32::NEG_INFINITY,
        };
        for instance in instances {
            let blade = Blade::from_instance(instance, params);
            strategy.emit(&blade, &mut ctx);
        }

        let bounds = page.bounds();
        let aabb = Aabb::new(
            Vec3::new(bounds.left - origin.x, ctx.min_y, bounds.top - origin.z),
            Vec3::new(bounds.right - origin.x, ctx.max_y, bounds.bottom - origin.z),
        );
        let mesh = GrassMesh {
            name: ids.unique_name("GrassLD"),
            technique,
            material,
            vertices: ctx.vertices,
            indices: self.indices.acquire(quads),
            index_count: quads * 6,
            bounding_radius: aabb.bounding_radius(),
            bounds: aabb,
        };
        log::debug!(
            "Built {} ({}): {} quads, y {:.2}..{:.2}",
            mesh.name,
            technique,
            quads,
            aabb.min.y,
            aabb.max.y
        );
        Ok(Some(mesh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{ColorField, MapFilter};
    use crate::math::Rect;
    use std::sync::Arc;

    fn page() -> GrassPage {
        GrassPage::new(Rect::new(0.0, 0.0, 100.0, 100.0))
    }

    fn instance(x: f32, z: f32, angle: f32) -> Instance {
        Instance { x, z, size: 0.5, angle }
    }

    fn build(layer: &mut GrassLayer, instances: &[Instance], ground: Ground<'_>) -> Result<Option<GrassMesh>> {
        GeometryBuilder::new().build(&page(), layer, instances, ground, &IdGenerator::new())
    }

    fn quads(mesh: &GrassMesh) -> &[GrassVertex] {
        match &mesh.vertices {
            VertexData::Quads(v) => v,
            VertexData::Sprites(_) => panic!("expected quads"),
        }
    }

    #[test]
    fn test_empty_builds_nothing() {
        let mut layer = GrassLayer::new("grass", 1);
        assert!(build(&mut layer, &[], Ground::flat()).unwrap().is_none());
    }

    #[test]
    fn test_flat_quad_layout() {
        let mut layer = GrassLayer::new("grass", 1);
        layer.set_minimum_size(1.0, 1.0);
        layer.set_maximum_size(3.0, 2.0);
        let mesh = build(&mut layer, &[instance(60.0, 50.0, 0.0)], Ground::flat())
            .unwrap()
            .unwrap();

        let v = quads(&mesh);
        assert_eq!(v.len(), 4);
        // width 2, height 1.5, page centre (50, 0, 50)
        assert_eq!(v[0].position, [9.0, 1.5, 0.0]);
        assert_eq!(v[1].position, [11.0, 1.5, 0.0]);
        assert_eq!(v[2].position, [9.0, 0.0, 0.0]);
        assert_eq!(v[3].position, [11.0, 0.0, 0.0]);
        assert_eq!(v[2].uv, [0.0, 1.0]);
        assert_eq!(v[0].color, WHITE);
        assert_eq!(mesh.index_count, 6);
        assert_eq!(mesh.bounds.min.y, 0.0);
        assert_eq!(mesh.bounds.max.y, 1.5);
        assert_eq!(mesh.bounds.min.x, -50.0);
        assert_eq!(mesh.bounds.max.z, 50.0);
    }

    #[test]
    fn test_steep_quad_degenerates() {
        let mut layer = GrassLayer::new("grass", 1);
        layer.set_max_slope(0.5);
        let steep = |x: f32, _z: f32| x * 2.0;
        let mesh = build(&mut layer, &[instance(20.0, 20.0, 0.0)], Ground::from_fn(&steep))
            .unwrap()
            .unwrap();
        let v = quads(&mesh);
        assert_eq!(v[2].position, v[3].position);
        assert_eq!(v[0].position, v[1].position);
    }

    #[test]
    fn test_gentle_quad_kept() {
        let mut layer = GrassLayer::new("grass", 1);
        layer.set_max_slope(0.5);
        let gentle = |x: f32, _z: f32| x * 0.25;
        let mesh = build(&mut layer, &[instance(20.0, 20.0, 0.0)], Ground::from_fn(&gentle))
            .unwrap()
            .unwrap();
        let v = quads(&mesh);
        assert_ne!(v[2].position, v[3].position);
        assert!((v[3].position[1] - v[2].position[1] - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_crossed_quads_each_tested() {
        let mut layer = GrassLayer::new("grass", 1);
        layer.set_render_technique(RenderTechnique::CrossedQuads, false);
        layer.set_max_slope(0.5);
        // Slope only along X: the first quad (facing X) is steep, the second is flat
        let ramp = |x: f32, _z: f32| x * 2.0;
        let mesh = build(&mut layer, &[instance(20.0, 20.0, 0.0)], Ground::from_fn(&ramp))
            .unwrap()
            .unwrap();
        let v = quads(&mesh);
        assert_eq!(v.len(), 8);
        assert_eq!(mesh.index_count, 12);
        assert_eq!(v[2].position, v[3].position);
        assert_ne!(v[6].position, v[7].position);
    }

    #[test]
    fn test_crossed_quads_bounds_cover_second_quad() {
        let mut layer = GrassLayer::new("grass", 1);
        layer.set_render_technique(RenderTechnique::CrossedQuads, false);
        // Height rises along Z only, so the first quad sits flat at y=10
        let ramp = |_x: f32, z: f32| z * 0.5;
        let mesh = build(&mut layer, &[instance(20.0, 20.0, 0.0)], Ground::from_fn(&ramp))
            .unwrap()
            .unwrap();
        let v = quads(&mesh);
        let lowest = v.iter().map(|v| v.position[1]).fold(f32::INFINITY, f32::min);
        let highest = v.iter().map(|v| v.position[1]).fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(mesh.bounds.min.y, lowest);
        assert_eq!(mesh.bounds.max.y, highest);
        assert!(lowest < 10.0);
    }

    #[test]
    fn test_sprite_offsets() {
        let mut layer = GrassLayer::new("grass", 1);
        layer.set_render_technique(RenderTechnique::Sprite, false);
        let hill = |_x: f32, _z: f32| 4.0;
        let mesh = build(&mut layer, &[instance(50.0, 50.0, 1.0)], Ground::from_fn(&hill))
            .unwrap()
            .unwrap();
        let VertexData::Sprites(v) = &mesh.vertices else {
            panic!("expected sprites");
        };
        assert_eq!(v.len(), 4);
        assert!(v.iter().all(|v| v.position == [0.0, 4.0, 0.0]));
        assert_eq!(v[0].billboard_offset, [-0.5, 1.0, 0.0, 0.0]);
        assert_eq!(v[3].billboard_offset, [0.5, 0.0, 0.0, 0.0]);
        assert_eq!(v[0].uv[0], v[2].uv[0]);
        assert_eq!(v[0].uv[0] + v[1].uv[0], 1.0);
        assert_eq!(mesh.bounds.min.y, 4.0);
        assert_eq!(mesh.bounds.max.y, 5.0);
    }

    #[test]
    fn test_sprite_mirroring_draws_once_per_instance() {
        let mut layer = GrassLayer::new("grass", 9);
        layer.set_render_technique(RenderTechnique::Sprite, false);
        let instances: Vec<Instance> = (0..64).map(|i| instance(i as f32, 10.0, 0.0)).collect();
        let mesh = build(&mut layer, &instances, Ground::flat()).unwrap().unwrap();
        assert_eq!(layer.parts_mut().1.draws(), 64);

        let VertexData::Sprites(v) = &mesh.vertices else {
            panic!("expected sprites");
        };
        let mirrored: Vec<bool> = v.chunks(4).map(|quad| quad[0].uv[0] == 1.0).collect();
        assert!(mirrored.iter().any(|&m| m));
        assert!(mirrored.iter().any(|&m| !m));

        // Same seed replays the same flips
        let mut replay = DeterministicSampler::new(9);
        let expected: Vec<bool> = (0..64).map(|_| replay.unit() < 0.5).collect();
        assert_eq!(mirrored, expected);
    }

    #[test]
    fn test_color_field_tints() {
        let mut layer = GrassLayer::new("grass", 1);
        layer.set_map_bounds(Rect::new(0.0, 0.0, 100.0, 100.0));
        layer.set_color_field(Some(Arc::new(ColorField::from_rgba(1, 1, &[10, 120, 30, 255]).unwrap())));
        layer.set_color_filter(MapFilter::Bilinear);
        let mesh = build(&mut layer, &[instance(5.0, 5.0, 0.0)], Ground::flat())
            .unwrap()
            .unwrap();
        assert!(quads(&mesh).iter().all(|v| v.color == [10, 120, 30, 255]));
    }

    #[test]
    fn test_quad_limit_boundary() {
        let mut layer = GrassLayer::new("grass", 1);
        let at_limit = vec![instance(10.0, 10.0, 0.0); MAX_QUADS];
        let mesh = build(&mut layer, &at_limit, Ground::flat()).unwrap().unwrap();
        assert_eq!(mesh.quad_count(), MAX_QUADS);
        assert_eq!(mesh.vertex_count(), MAX_QUADS * 4);

        let over = vec![instance(10.0, 10.0, 0.0); MAX_QUADS + 1];
        let err = build(&mut layer, &over, Ground::flat()).unwrap_err();
        assert!(matches!(err, Error::CapacityExceeded { requested: 65_536, .. }));
    }

    #[test]
    fn test_crossed_quad_limit() {
        let mut layer = GrassLayer::new("grass", 1);
        layer.set_render_technique(RenderTechnique::CrossedQuads, false);
        let over = vec![instance(10.0, 10.0, 0.0); 32_768];
        let err = build(&mut layer, &over, Ground::flat()).unwrap_err();
        assert!(matches!(err, Error::CapacityExceeded { what: "quad", requested: 65_536, .. }));
    }

    #[test]
    fn test_unique_names() {
        let mut builder = GeometryBuilder::new();
        let ids = IdGenerator::new();
        let mut layer = GrassLayer::new("grass", 1);
        let page = page();
        let one = [instance(1.0, 1.0, 0.0)];
        let a = builder.build(&page, &mut layer, &one, Ground::flat(), &ids).unwrap().unwrap();
        let b = builder.build(&page, &mut layer, &one, Ground::flat(), &ids).unwrap().unwrap();
        assert_ne!(a.name, b.name);
        assert!(Arc::ptr_eq(&a.indices, &b.indices));
    }
}
