//! Noise-based ground height provider

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::grass::HeightFn;

/// Parameters controlling the height field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightParams {
    pub seed: u32,
    pub scale: f32,        // Horizontal scale (larger = smoother)
    pub height_scale: f32, // Vertical scale (max height)
    pub octaves: u32,      // FBM octaves (detail levels)
    pub persistence: f32,  // FBM persistence (0.5 typical)
    pub lacunarity: f32,   // FBM lacunarity (2.0 typical)
}

impl Default for HeightParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            scale: 100.0,
            height_scale: 16.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Rolling terrain from fractal Brownian motion over Perlin noise
pub struct NoiseHeightField {
    params: HeightParams,
    noise: Fbm<Perlin>,
}

impl NoiseHeightField {
    pub fn new(params: HeightParams) -> Self {
        let noise = Fbm::<Perlin>::new(params.seed)
            .set_octaves(params.octaves as usize)
            .set_persistence(params.persistence as f64)
            .set_lacunarity(params.lacunarity as f64);

        Self { params, noise }
    }

    pub fn params(&self) -> &HeightParams {
        &self.params
    }

    /// Ground height at world position (x, z), in `[0, height_scale]`
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let nx = (x / self.params.scale) as f64;
        let nz = (z / self.params.scale) as f64;

        // Noise is roughly [-1, 1]
        let normalized = ((self.noise.get([nx, nz]) + 1.0) / 2.0).clamp(0.0, 1.0);
        (normalized * self.params.height_scale as f64) as f32
    }

    /// Box the field as a loader height callback.
    pub fn into_height_fn(self) -> HeightFn {
        Box::new(move |x, z| self.height_at(x, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_in_range() {
        let field = NoiseHeightField::new(HeightParams::default());
        for (x, z) in [(0.0, 0.0), (37.5, 12.25), (100.0, 100.0), (-50.0, -80.0)] {
            let h = field.height_at(x, z);
            assert!((0.0..=16.0).contains(&h), "height {h} at ({x}, {z})");
            assert_eq!(h, field.height_at(x, z));
        }
    }

    #[test]
    fn test_different_seeds() {
        let a = NoiseHeightField::new(HeightParams { seed: 1, ..Default::default() });
        let b = NoiseHeightField::new(HeightParams { seed: 2, ..Default::default() });
        assert_ne!(a.height_at(50.0, 50.0), b.height_at(50.0, 50.0));
    }

    #[test]
    fn test_height_fn_matches_field() {
        let field = NoiseHeightField::new(HeightParams::default());
        let expected = field.height_at(12.0, 34.0);
        let f = field.into_height_fn();
        assert_eq!(f(12.0, 34.0), expected);
    }
}
