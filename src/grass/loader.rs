//! Grass loader: the paging hooks that tie layers, placement, geometry and
//! shader variants together.
//!
//! Pages are built layer by layer in declaration order. A failure on one
//! (page, layer) pair is logged and reported but never stops its siblings.

use std::sync::Arc;

use glam::{Vec3, Vec4};

use super::config::GrassConfig;
use super::geometry::GeometryBuilder;
use super::ground::{Ground, HeightFn};
use super::layer::GrassLayer;
use super::page::GrassPage;
use super::placement::{self, MAX_INSTANCES};
use crate::core::{Error, IdGenerator, Result};
use crate::render::backend::RenderBackend;
use crate::scene::{EntityId, SceneHost};
use crate::shader::{MaterialLibrary, ParamValue, ShaderVariantCache};
use crate::terrain::NoiseHeightField;

/// Outcome of building one layer on one page.
#[derive(Clone, Debug, PartialEq)]
pub enum LayerBuildState {
    /// The page lies outside the layer's map bounds. No random draws were made.
    NotIntersecting,
    /// Sampling kept no instances.
    Empty,
    Attached { entity: EntityId, quads: usize },
    /// The pair produced nothing; see the log for details.
    Rejected { reason: String },
}

/// Per-layer results of [`GrassLoader::load_page`], in layer order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageLoadReport {
    pub states: Vec<LayerBuildState>,
}

impl PageLoadReport {
    pub fn attached(&self) -> usize {
        self.states
            .iter()
            .filter(|s| matches!(s, LayerBuildState::Attached { .. }))
            .count()
    }

    pub fn quads(&self) -> usize {
        self.states
            .iter()
            .map(|s| match s {
                LayerBuildState::Attached { quads, .. } => *quads,
                _ => 0,
            })
            .sum()
    }
}

/// Owns the grass layers and generates their geometry for loaded pages.
pub struct GrassLoader<B: RenderBackend> {
    backend: B,
    materials: MaterialLibrary,
    shaders: ShaderVariantCache,
    shaders_enabled: bool,
    ids: Arc<IdGenerator>,
    builder: GeometryBuilder,
    layers: Vec<GrassLayer>,
    height_fn: Option<HeightFn>,
    density_factor: f32,
    far_view_distance: f32,
    wind_direction: Vec3,
    next_seed: u64,
}

impl<B: RenderBackend> GrassLoader<B> {
    pub fn new(backend: B, materials: MaterialLibrary) -> Self {
        let defaults = GrassConfig::default();
        Self {
            shaders: ShaderVariantCache::new(backend.capabilities(), defaults.shaders_enabled),
            shaders_enabled: defaults.shaders_enabled,
            backend,
            materials,
            ids: Arc::new(IdGenerator::new()),
            builder: GeometryBuilder::new(),
            layers: Vec::new(),
            height_fn: None,
            density_factor: defaults.density_factor,
            far_view_distance: defaults.far_view_distance,
            wind_direction: Vec3::from_array(defaults.wind_direction),
            next_seed: defaults.seed,
        }
    }

    /// Build a loader and its layers from validated configuration.
    pub fn from_config(config: &GrassConfig, backend: B, materials: MaterialLibrary) -> Result<Self> {
        config.validate()?;

        let mut loader = Self::new(backend, materials);
        loader.next_seed = config.seed;
        loader.density_factor = config.density_factor;
        loader.far_view_distance = config.far_view_distance;
        loader.wind_direction = Vec3::from_array(config.wind_direction);
        loader.set_shaders_enabled(config.shaders_enabled);
        if let Some(terrain) = &config.terrain {
            loader.set_height_function(NoiseHeightField::new(terrain.clone()).into_height_fn());
        }

        for settings in &config.layers {
            let layer = loader.add_layer(&settings.material)?;
            settings.apply(layer);
        }
        log::info!("Grass loader configured with {} layers", loader.layers.len());
        Ok(loader)
    }

    /// Share an id source with other loaders so names never collide.
    pub fn with_ids(mut self, ids: Arc<IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn materials(&self) -> &MaterialLibrary {
        &self.materials
    }

    pub fn shader_cache(&self) -> &ShaderVariantCache {
        &self.shaders
    }

    pub fn set_height_function(&mut self, height_fn: HeightFn) {
        self.height_fn = Some(height_fn);
    }

    /// Back to flat ground at height 0.
    pub fn clear_height_function(&mut self) {
        self.height_fn = None;
    }

    /// Append a layer drawn with `material`.
    ///
    /// Fails with [`Error::MaterialNotFound`] if the library has no such
    /// material.
    pub fn add_layer(&mut self, material: &str) -> Result<&mut GrassLayer> {
        self.materials.get(material)?;

        let seed = self.next_seed;
        self.next_seed = self.next_seed.wrapping_add(1);
        self.layers.push(GrassLayer::new(material, seed));
        log::debug!("Added grass layer {} ({material})", self.layers.len() - 1);
        let index = self.layers.len() - 1;
        Ok(&mut self.layers[index])
    }

    /// Remove a layer. Meshes already attached to pages are not touched.
    pub fn remove_layer(&mut self, index: usize) -> Option<GrassLayer> {
        (index < self.layers.len()).then(|| self.layers.remove(index))
    }

    pub fn layers(&self) -> &[GrassLayer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&GrassLayer> {
        self.layers.get(index)
    }

    /// Layer settings take effect on the next page load.
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut GrassLayer> {
        self.layers.get_mut(index)
    }

    pub fn set_layer_material(&mut self, index: usize, material: &str) -> Result<()> {
        self.materials.get(material)?;
        let layer = self
            .layers
            .get_mut(index)
            .ok_or_else(|| Error::Config(format!("no grass layer {index}")))?;
        layer.set_material(material);
        Ok(())
    }

    pub fn density_factor(&self) -> f32 {
        self.density_factor
    }

    pub fn set_density_factor(&mut self, factor: f32) {
        self.density_factor = factor.max(0.0);
    }

    pub fn wind_direction(&self) -> Vec3 {
        self.wind_direction
    }

    pub fn set_wind_direction(&mut self, direction: Vec3) {
        self.wind_direction = direction;
    }

    pub fn far_view_distance(&self) -> f32 {
        self.far_view_distance
    }

    /// The fade range depends on this, so every layer's shader is regenerated.
    pub fn set_far_view_distance(&mut self, distance: f32) {
        if self.far_view_distance != distance {
            self.far_view_distance = distance;
            self.layers.iter_mut().for_each(GrassLayer::mark_shader_dirty);
        }
    }

    pub fn set_shaders_enabled(&mut self, enabled: bool) {
        if self.shaders_enabled != enabled {
            self.shaders_enabled = enabled;
            self.shaders = ShaderVariantCache::new(self.backend.capabilities(), enabled);
            self.layers.iter_mut().for_each(GrassLayer::mark_shader_dirty);
        }
    }

    /// Resolve the material of every layer whose shader options changed.
    ///
    /// A layer whose program fails to compile falls back to its base material.
    pub fn refresh_materials(&mut self) {
        for layer in self.layers.iter_mut().filter(|l| l.is_shader_dirty()) {
            let base = layer.params().material.clone();
            let resolved = self.shaders.material_for(
                layer.params(),
                self.far_view_distance,
                &mut self.backend,
                &mut self.materials,
            );
            match resolved {
                Ok(name) => layer.set_active_material(name),
                Err(err) => {
                    log::warn!("Grass material for {base} unavailable, using base: {err}");
                    layer.set_active_material(base);
                }
            }
            layer.clear_shader_dirty();
        }
    }

    /// Generate and attach grass for every layer on `page`.
    ///
    /// A page that is already loaded is cleared and rebuilt.
    pub fn load_page(&mut self, page: &mut GrassPage, host: &mut dyn SceneHost) -> PageLoadReport {
        if page.is_loaded() {
            log::debug!("Grass page {:?} already loaded, rebuilding", page.bounds());
            page.detach_all(host);
        }
        self.refresh_materials();

        let ground = Ground::new(self.height_fn.as_deref());
        let mut report = PageLoadReport::default();

        for (index, layer) in self.layers.iter_mut().enumerate() {
            let bounds = *page.bounds();
            if !bounds.intersects(&layer.params().map_bounds) {
                report.states.push(LayerBuildState::NotIntersecting);
                continue;
            }

            let budget = placement::instance_budget(layer.params(), &bounds, self.density_factor);
            let instances = {
                let (params, sampler) = layer.parts_mut();
                placement::sample(&bounds, params, budget, ground, sampler)
            };

            let built = if budget > MAX_INSTANCES {
                Err(Error::CapacityExceeded {
                    what: "instance",
                    requested: budget,
                    limit: MAX_INSTANCES,
                })
            } else {
                self.builder.build(page, layer, &instances, ground, &self.ids)
            };

            let state = match built {
                Ok(Some(mesh)) => {
                    let quads = mesh.quad_count();
                    let entity = page.attach(host, index, mesh);
                    LayerBuildState::Attached { entity, quads }
                }
                Ok(None) => LayerBuildState::Empty,
                Err(err) => {
                    log::warn!("Grass layer {index} skipped on page {bounds:?}: {err}");
                    LayerBuildState::Rejected {
                        reason: err.to_string(),
                    }
                }
            };
            report.states.push(state);
        }

        log::debug!(
            "Loaded grass page {:?}: {} meshes, {} quads",
            page.bounds(),
            report.attached(),
            report.quads()
        );
        report
    }

    /// Detach and release everything generated for `page`.
    pub fn unload_page(&self, page: &mut GrassPage, host: &mut dyn SceneHost) {
        page.detach_all(host);
    }

    /// Advance sway clocks and push animation constants to layer materials.
    pub fn frame_update(&mut self, elapsed_secs: f32) {
        for layer in &mut self.layers {
            let time = layer.advance_wave(elapsed_secs);
            let animation = layer.params().animation;
            if !animation.enabled {
                continue;
            }

            let Ok(material) = self.materials.get_mut(layer.active_material()) else {
                continue;
            };
            let direction = sway_direction(self.wind_direction, animation.magnitude);
            material.set_param("time", ParamValue::Float(time));
            material.set_param("frequency", ParamValue::Float(animation.frequency));
            material.set_param("direction", ParamValue::Vec4(direction));
        }
    }
}

/// Wind vector pushed to animated layers as the `direction` constant.
pub fn sway_direction(wind: Vec3, magnitude: f32) -> Vec4 {
    (wind * magnitude).extend(0.0)
}
