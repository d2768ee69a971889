//! Grass layers: one configured species of grass each.
//!
//! A layer owns its placement/appearance parameters, its random stream and
//! the name of the material currently bound to it. Setters that change
//! generated shader code raise a dirty flag that the loader consumes the next
//! time it refreshes materials.

use std::f32::consts::{PI, TAU};
use std::fmt;
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::sampler::DeterministicSampler;
use crate::field::{ColorField, DensityField, MapFilter};
use crate::math::Rect;

/// Geometric representation of one grass instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderTechnique {
    #[default]
    FlatQuad,
    CrossedQuads,
    Sprite,
}

impl RenderTechnique {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FlatQuad => "quad",
            Self::CrossedQuads => "crossquads",
            Self::Sprite => "sprite",
        }
    }
}

impl fmt::Display for RenderTechnique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How distant grass is hidden.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FadeTechnique {
    None,
    #[default]
    Alpha,
    Grow,
    AlphaGrow,
}

impl FadeTechnique {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Alpha => "alpha",
            Self::Grow => "grow",
            Self::AlphaGrow => "alphagrow",
        }
    }

    pub fn fades_alpha(self) -> bool {
        matches!(self, Self::Alpha | Self::AlphaGrow)
    }

    pub fn grows(self) -> bool {
        matches!(self, Self::Grow | Self::AlphaGrow)
    }
}

impl fmt::Display for FadeTechnique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wind sway settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Animation {
    pub enabled: bool,
    /// Sway length in world units.
    pub magnitude: f32,
    /// Sway cycles per second, in half turns.
    pub speed: f32,
    /// Spatial frequency of the sway wave along X.
    pub frequency: f32,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            enabled: false,
            magnitude: 1.0,
            speed: 1.0,
            frequency: 1.0,
        }
    }
}

/// Absolute height band grass may grow in. `None` is an open side.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeightRange {
    pub min: Option<f32>,
    pub max: Option<f32>,
}

impl HeightRange {
    /// Build from the 0-means-unlimited convention.
    pub fn from_limits(min_y: f32, max_y: f32) -> Self {
        Self {
            min: (min_y != 0.0).then_some(min_y),
            max: (max_y != 0.0).then_some(max_y),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, y: f32) -> bool {
        y >= self.min.unwrap_or(f32::NEG_INFINITY) && y <= self.max.unwrap_or(f32::INFINITY)
    }
}

/// Placement and appearance parameters of a layer.
#[derive(Clone, Debug)]
pub struct LayerParams {
    /// Base material name.
    pub material: String,
    /// Instances per square unit, before the loader's density factor.
    pub density: f32,
    /// Smallest (width, height).
    pub min_size: Vec2,
    /// Largest (width, height).
    pub max_size: Vec2,
    pub height_range: HeightRange,
    /// Largest |dy| / width a flat quad may span before it is collapsed.
    pub max_slope: f32,
    /// Region the layer covers; fields are stretched over it.
    pub map_bounds: Rect,
    pub render_technique: RenderTechnique,
    pub fade_technique: FadeTechnique,
    /// Blend the base of nearby grass into the ground.
    pub blend: bool,
    pub lighting: bool,
    pub animation: Animation,
    pub density_field: Option<Arc<DensityField>>,
    pub density_filter: MapFilter,
    pub color_field: Option<Arc<ColorField>>,
    pub color_filter: MapFilter,
}

impl LayerParams {
    fn new(material: String) -> Self {
        Self {
            material,
            density: 1.0,
            min_size: Vec2::ONE,
            max_size: Vec2::ONE,
            height_range: HeightRange::default(),
            max_slope: 1000.0,
            map_bounds: Rect::UNBOUNDED,
            render_technique: RenderTechnique::FlatQuad,
            fade_technique: FadeTechnique::Alpha,
            blend: false,
            lighting: false,
            animation: Animation::default(),
            density_field: None,
            density_filter: MapFilter::Nearest,
            color_field: None,
            color_filter: MapFilter::Nearest,
        }
    }

    pub fn min_width(&self) -> f32 {
        self.min_size.x
    }

    pub fn max_width(&self) -> f32 {
        self.max_size.x
    }

    pub fn min_height(&self) -> f32 {
        self.min_size.y
    }

    pub fn max_height(&self) -> f32 {
        self.max_size.y
    }

    /// Attached fields that can never be sampled because the map bounds
    /// are not finite.
    pub fn unmapped_fields(&self) -> Vec<&'static str> {
        if self.map_bounds.is_finite() {
            return Vec::new();
        }
        let mut fields = Vec::new();
        if self.density_field.is_some() {
            fields.push("density");
        }
        if self.color_field.is_some() {
            fields.push("color");
        }
        fields
    }
}

/// One grass species with its own material, size range and options.
pub struct GrassLayer {
    params: LayerParams,
    sampler: DeterministicSampler,
    active_material: String,
    wave_phase: f32,
    shader_dirty: bool,
}

impl GrassLayer {
    pub(crate) fn new(material: impl Into<String>, seed: u64) -> Self {
        let material = material.into();
        Self {
            active_material: material.clone(),
            params: LayerParams::new(material),
            sampler: DeterministicSampler::new(seed),
            wave_phase: 0.0,
            shader_dirty: true,
        }
    }

    pub fn params(&self) -> &LayerParams {
        &self.params
    }

    /// Parameters together with the random stream, for a build pass.
    pub(crate) fn parts_mut(&mut self) -> (&LayerParams, &mut DeterministicSampler) {
        (&self.params, &mut self.sampler)
    }

    /// Material meshes of this layer are drawn with.
    pub fn active_material(&self) -> &str {
        &self.active_material
    }

    pub(crate) fn set_active_material(&mut self, name: String) {
        self.active_material = name;
    }

    pub fn wave_phase(&self) -> f32 {
        self.wave_phase
    }

    /// Advance the sway clock, wrapping at a full turn.
    pub(crate) fn advance_wave(&mut self, elapsed_secs: f32) -> f32 {
        let step = elapsed_secs * self.params.animation.speed * PI;
        self.wave_phase = (self.wave_phase + step).rem_euclid(TAU);
        self.wave_phase
    }

    pub fn is_shader_dirty(&self) -> bool {
        self.shader_dirty
    }

    pub(crate) fn mark_shader_dirty(&mut self) {
        self.shader_dirty = true;
    }

    pub(crate) fn clear_shader_dirty(&mut self) {
        self.shader_dirty = false;
    }

    pub(crate) fn set_material(&mut self, name: impl Into<String>) {
        self.params.material = name.into();
        self.shader_dirty = true;
    }

    pub fn set_density(&mut self, density: f32) {
        self.params.density = density.max(0.0);
    }

    pub fn set_minimum_size(&mut self, width: f32, height: f32) {
        self.params.min_size = Vec2::new(width, height);
    }

    /// Max height feeds the grow-fade shader constant.
    pub fn set_maximum_size(&mut self, width: f32, height: f32) {
        let grows = self.params.fade_technique.grows();
        if grows && self.params.max_size.y != height {
            self.shader_dirty = true;
        }
        self.params.max_size = Vec2::new(width, height);
    }

    /// Restrict placement to `min_y..=max_y`; 0 leaves that side open.
    pub fn set_height_range(&mut self, min_y: f32, max_y: f32) {
        self.params.height_range = HeightRange::from_limits(min_y, max_y);
    }

    pub fn set_max_slope(&mut self, max_slope: f32) {
        self.params.max_slope = max_slope;
    }

    pub fn set_map_bounds(&mut self, bounds: Rect) {
        self.params.map_bounds = bounds;
        self.warn_unmapped();
    }

    /// Replace the density field; the previous one is released.
    ///
    /// The field is stretched over the map bounds, so set finite bounds
    /// first. Without them no placement candidate passes the density test.
    pub fn set_density_field(&mut self, field: Option<Arc<DensityField>>) {
        self.params.density_field = field;
        self.warn_unmapped();
    }

    pub fn set_density_filter(&mut self, filter: MapFilter) {
        self.params.density_filter = filter;
    }

    /// Replace the color field; the previous one is released.
    pub fn set_color_field(&mut self, field: Option<Arc<ColorField>>) {
        self.params.color_field = field;
        self.warn_unmapped();
    }

    fn warn_unmapped(&self) {
        let fields = self.params.unmapped_fields();
        if !fields.is_empty() {
            log::warn!(
                "Grass layer {} has a {} field but unbounded map bounds; the field is never sampled",
                self.params.material,
                fields.join(" and ")
            );
        }
    }

    pub fn set_color_filter(&mut self, filter: MapFilter) {
        self.params.color_filter = filter;
    }

    pub fn set_render_technique(&mut self, technique: RenderTechnique, blend_base: bool) {
        if self.params.render_technique != technique || self.params.blend != blend_base {
            self.params.render_technique = technique;
            self.params.blend = blend_base;
            self.shader_dirty = true;
        }
    }

    pub fn set_fade_technique(&mut self, technique: FadeTechnique) {
        if self.params.fade_technique != technique {
            self.params.fade_technique = technique;
            self.shader_dirty = true;
        }
    }

    pub fn set_lighting_enabled(&mut self, enabled: bool) {
        if self.params.lighting != enabled {
            self.params.lighting = enabled;
            self.shader_dirty = true;
        }
    }

    pub fn set_animation_enabled(&mut self, enabled: bool) {
        if self.params.animation.enabled != enabled {
            self.params.animation.enabled = enabled;
            self.shader_dirty = true;
        }
    }

    pub fn set_sway_length(&mut self, magnitude: f32) {
        self.params.animation.magnitude = magnitude;
    }

    pub fn set_sway_speed(&mut self, speed: f32) {
        self.params.animation.speed = speed;
    }

    pub fn set_sway_distribution(&mut self, frequency: f32) {
        self.params.animation.frequency = frequency;
    }
}
