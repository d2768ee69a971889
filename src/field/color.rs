//! RGBA color field used to tint grass to match the ground.

use image::DynamicImage;

use super::{bilinear_taps, locate, nearest_index, MapFilter};
use crate::core::{Error, Result};
use crate::math::Rect;

/// Opaque white, used wherever no color applies.
pub const WHITE: [u8; 4] = [255, 255, 255, 255];

#[derive(Clone, Debug)]
pub struct ColorField {
    width: usize,
    height: usize,
    texels: Vec<[u8; 4]>,
}

impl ColorField {
    /// Build from RGBA8 pixels, row-major.
    pub fn from_rgba(width: usize, height: usize, rgba: &[u8]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Field(format!("color field must not be empty ({width}x{height})")));
        }
        if rgba.len() != width * height * 4 {
            return Err(Error::Field(format!(
                "color field {width}x{height} needs {} bytes, got {}",
                width * height * 4,
                rgba.len()
            )));
        }
        let texels = rgba
            .chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
            .collect();
        Ok(Self { width, height, texels })
    }

    pub fn from_image(image: &DynamicImage) -> Result<Self> {
        let rgba = image.to_rgba8();
        let (w, h) = rgba.dimensions();
        Self::from_rgba(w as usize, h as usize, rgba.as_raw())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// RGBA color at a world position, opaque white outside `bounds`.
    pub fn sample(&self, x: f32, z: f32, bounds: &Rect, filter: MapFilter) -> [u8; 4] {
        let Some((u, v)) = locate(x, z, bounds, self.width, self.height) else {
            return WHITE;
        };
        match filter {
            MapFilter::Nearest => self.texels[nearest_index(u, v, self.width, self.height)],
            MapFilter::Bilinear => {
                let mut acc = [0.0f32; 4];
                for (idx, w) in bilinear_taps(u, v, self.width, self.height) {
                    let texel = self.texels[idx];
                    for (sum, c) in acc.iter_mut().zip(texel) {
                        *sum += c as f32 * w;
                    }
                }
                acc.map(|c| c.round().clamp(0.0, 255.0) as u8)
            }
        }
    }
}
