//! Procedural placement of grass instances over a page.
//!
//! Candidates are drawn uniformly over the page and then filtered by the
//! layer's density field (or, without one, by the color field's footprint)
//! and by its height band. Every candidate consumes the same number of
//! random values whether it survives or not, so the stream stays aligned
//! between rebuilds and between filtering variants.

use std::f32::consts::TAU;

use super::ground::Ground;
use super::layer::LayerParams;
use super::sampler::DeterministicSampler;
use crate::math::Rect;

/// Largest instance count a single (page, layer) mesh may hold.
pub const MAX_INSTANCES: usize = u16::MAX as usize;

/// One sampled grass instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Instance {
    pub x: f32,
    pub z: f32,
    /// Shared by width and height so the aspect ratio holds.
    pub size: f32,
    /// Rotation about Y in radians, [0, 2π).
    pub angle: f32,
}

/// Upper bound on instances for a page: density × area × global factor.
pub fn instance_budget(params: &LayerParams, bounds: &Rect, density_factor: f32) -> usize {
    let count = params.density * density_factor * bounds.area();
    if count.is_finite() && count > 0.0 {
        count as usize
    } else {
        0
    }
}

/// Sample up to `max_count` instances inside `bounds`.
///
/// The returned length is the number of kept instances and is what callers
/// must size buffers by.
pub fn sample(
    bounds: &Rect,
    params: &LayerParams,
    max_count: usize,
    ground: Ground<'_>,
    sampler: &mut DeterministicSampler,
) -> Vec<Instance> {
    if max_count == 0 {
        return Vec::new();
    }

    sampler.reset();
    let mut instances = Vec::with_capacity(max_count);

    for _ in 0..max_count {
        let x = sampler.range(bounds.left, bounds.right);
        let z = sampler.range(bounds.top, bounds.bottom);

        let mut keep = match &params.density_field {
            Some(field) => {
                let roll = sampler.unit();
                roll < field.sample(x, z, &params.map_bounds, params.density_filter)
            }
            // The color field's footprint masks placement when there is no density field
            None => params.color_field.is_none() || params.map_bounds.contains(x, z),
        };

        let size = sampler.unit();
        let angle = sampler.range(0.0, TAU);

        if keep && !params.height_range.is_unbounded() {
            keep = params.height_range.contains(ground.height(x, z));
        }

        if keep {
            instances.push(Instance { x, z, size, angle });
        }
    }

    log::trace!("Placed {}/{} grass instances", instances.len(), max_count);
    instances
}
