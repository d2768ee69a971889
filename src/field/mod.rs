//! Density and color fields stretched over a layer's map bounds.
//!
//! Both fields are plain texel grids. Lookups map a world XZ position into
//! the grid through the bounds they are sampled against, then read one texel
//! (nearest) or blend four (bilinear).

pub mod color;
pub mod density;

pub use color::ColorField;
pub use density::DensityField;

use serde::{Deserialize, Serialize};

use crate::math::Rect;

/// Texel filtering used for field lookups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapFilter {
    #[default]
    Nearest,
    Bilinear,
}

/// Which channel of an RGBA source feeds a density field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapChannel {
    Red,
    Green,
    Blue,
    #[default]
    Alpha,
    /// Mean of red, green and blue.
    Color,
}

/// Continuous texel coordinates of a world position, or `None` when it falls
/// outside `bounds` (right and bottom edges exclusive).
pub(crate) fn locate(x: f32, z: f32, bounds: &Rect, width: usize, height: usize) -> Option<(f32, f32)> {
    if !bounds.is_finite() || bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return None;
    }
    if x < bounds.left || x >= bounds.right || z < bounds.top || z >= bounds.bottom {
        return None;
    }
    let u = (x - bounds.left) / bounds.width() * width as f32;
    let v = (z - bounds.top) / bounds.height() * height as f32;
    Some((u, v))
}

/// Index of the texel containing `(u, v)`.
pub(crate) fn nearest_index(u: f32, v: f32, width: usize, height: usize) -> usize {
    let xi = (u as usize).min(width - 1);
    let zi = (v as usize).min(height - 1);
    zi * width + xi
}

/// Four texel indices and weights for a bilinear tap centred on texel centres.
/// Edges clamp to the border texels.
pub(crate) fn bilinear_taps(u: f32, v: f32, width: usize, height: usize) -> [(usize, f32); 4] {
    let fx = (u - 0.5).clamp(0.0, (width - 1) as f32);
    let fz = (v - 0.5).clamp(0.0, (height - 1) as f32);
    let x0 = fx.floor() as usize;
    let z0 = fz.floor() as usize;
    let x1 = (x0 + 1).min(width - 1);
    let z1 = (z0 + 1).min(height - 1);
    let tx = fx - x0 as f32;
    let tz = fz - z0 as f32;

    [
        (z0 * width + x0, (1.0 - tx) * (1.0 - tz)),
        (z0 * width + x1, tx * (1.0 - tz)),
        (z1 * width + x0, (1.0 - tx) * tz),
        (z1 * width + x1, tx * tz),
    ]
}
