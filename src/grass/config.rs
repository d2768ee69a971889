//! Grass configuration (loader globals plus per-layer settings).
//!
//! Everything here is plain data that round-trips through JSON. Density and
//! color fields are not part of it; they are attached to layers at runtime.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::layer::{Animation, FadeTechnique, GrassLayer, RenderTechnique};
use crate::core::{Error, Result};
use crate::field::MapFilter;
use crate::math::Rect;
use crate::terrain::HeightParams;

/// Loader-wide configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrassConfig {
    /// Seed for the first layer; later layers use consecutive seeds.
    pub seed: u64,
    /// Global multiplier on every layer's density.
    pub density_factor: f32,
    /// Distance at which pages leave view. Drives the shader fade range.
    pub far_view_distance: f32,
    /// Wind direction in world space. Scaled by each layer's sway length.
    pub wind_direction: [f32; 3],
    /// Master switch for generated vertex programs.
    pub shaders_enabled: bool,
    /// Optional noise terrain, used by tools without a host height source.
    pub terrain: Option<HeightParams>,
    /// Layers in draw and build order.
    pub layers: Vec<LayerSettings>,
}

impl Default for GrassConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            density_factor: 1.0,
            far_view_distance: 100.0,
            wind_direction: [1.0, 0.0, 0.0],
            shaders_enabled: true,
            terrain: None,
            layers: Vec::new(),
        }
    }
}

/// Persistent settings of one layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerSettings {
    pub material: String,
    pub density: f32,
    /// (width, height)
    pub min_size: [f32; 2],
    /// (width, height)
    pub max_size: [f32; 2],
    /// Lowest ground height grass grows at. 0 = no limit.
    pub min_y: f32,
    /// Highest ground height grass grows at. 0 = no limit.
    pub max_y: f32,
    pub max_slope: f32,
    /// Area the layer covers. Absent = everywhere.
    pub map_bounds: Option<Rect>,
    pub render_technique: RenderTechnique,
    pub blend: bool,
    pub fade_technique: FadeTechnique,
    pub lighting: bool,
    pub animation: Animation,
    pub density_filter: MapFilter,
    pub color_filter: MapFilter,
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            material: String::new(),
            density: 1.0,
            min_size: [1.0, 1.0],
            max_size: [1.0, 1.0],
            min_y: 0.0,
            max_y: 0.0,
            max_slope: 1000.0,
            map_bounds: None,
            render_technique: RenderTechnique::FlatQuad,
            blend: false,
            fade_technique: FadeTechnique::Alpha,
            lighting: false,
            animation: Animation::default(),
            density_filter: MapFilter::Nearest,
            color_filter: MapFilter::Nearest,
        }
    }
}

impl LayerSettings {
    pub fn new(material: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            ..Default::default()
        }
    }

    /// Push these settings onto `layer` through its setters.
    pub fn apply(&self, layer: &mut GrassLayer) {
        layer.set_density(self.density);
        layer.set_minimum_size(self.min_size[0], self.min_size[1]);
        layer.set_maximum_size(self.max_size[0], self.max_size[1]);
        layer.set_height_range(self.min_y, self.max_y);
        layer.set_max_slope(self.max_slope);
        layer.set_map_bounds(self.map_bounds.unwrap_or(Rect::UNBOUNDED));
        layer.set_render_technique(self.render_technique, self.blend);
        layer.set_fade_technique(self.fade_technique);
        layer.set_lighting_enabled(self.lighting);
        layer.set_animation_enabled(self.animation.enabled);
        layer.set_sway_length(self.animation.magnitude);
        layer.set_sway_speed(self.animation.speed);
        layer.set_sway_distribution(self.animation.frequency);
        layer.set_density_filter(self.density_filter);
        layer.set_color_filter(self.color_filter);
    }

    fn validate(&self, index: usize) -> Result<()> {
        let fail = |msg: String| Err(Error::Config(format!("layer {index} ({}): {msg}", self.material)));

        if self.material.is_empty() {
            return fail("material name is empty".into());
        }
        if !(self.density >= 0.0) {
            return fail(format!("density {} is negative", self.density));
        }
        if self.min_size[0] > self.max_size[0] || self.min_size[1] > self.max_size[1] {
            return fail(format!(
                "minimum size {:?} exceeds maximum size {:?}",
                self.min_size, self.max_size
            ));
        }
        if self.min_y != 0.0 && self.max_y != 0.0 && self.min_y > self.max_y {
            return fail(format!("height range {}..{} is empty", self.min_y, self.max_y));
        }
        if !(self.max_slope >= 0.0) {
            return fail(format!("max slope {} is negative", self.max_slope));
        }
        Ok(())
    }
}

impl GrassConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.density_factor >= 0.0) {
            return Err(Error::Config(format!(
                "density factor {} is negative",
                self.density_factor
            )));
        }
        if !(self.far_view_distance > 0.0) {
            return Err(Error::Config(format!(
                "far view distance {} must be positive",
                self.far_view_distance
            )));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            layer.validate(i)?;
        }
        Ok(())
    }
}
