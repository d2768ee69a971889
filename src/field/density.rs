//! Scalar density field controlling local grass probability.

use image::DynamicImage;

use super::{bilinear_taps, locate, nearest_index, MapChannel, MapFilter};
use crate::core::{Error, Result};
use crate::math::Rect;

/// 8-bit density grid; 255 maps to a keep probability of 1.0.
#[derive(Clone, Debug)]
pub struct DensityField {
    width: usize,
    height: usize,
    values: Vec<u8>,
}

impl DensityField {
    /// Build from one byte per texel, row-major.
    pub fn from_values(width: usize, height: usize, values: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Field(format!("density field must not be empty ({width}x{height})")));
        }
        if values.len() != width * height {
            return Err(Error::Field(format!(
                "density field {width}x{height} needs {} values, got {}",
                width * height,
                values.len()
            )));
        }
        Ok(Self { width, height, values })
    }

    /// Build by extracting one channel from RGBA8 pixels.
    pub fn from_rgba(width: usize, height: usize, rgba: &[u8], channel: MapChannel) -> Result<Self> {
        if rgba.len() != width * height * 4 {
            return Err(Error::Field(format!(
                "rgba source {width}x{height} needs {} bytes, got {}",
                width * height * 4,
                rgba.len()
            )));
        }
        let values = rgba
            .chunks_exact(4)
            .map(|px| match channel {
                MapChannel::Red => px[0],
                MapChannel::Green => px[1],
                MapChannel::Blue => px[2],
                MapChannel::Alpha => px[3],
                MapChannel::Color => ((px[0] as u16 + px[1] as u16 + px[2] as u16) / 3) as u8,
            })
            .collect();
        Self::from_values(width, height, values)
    }

    pub fn from_image(image: &DynamicImage, channel: MapChannel) -> Result<Self> {
        let rgba = image.to_rgba8();
        let (w, h) = rgba.dimensions();
        Self::from_rgba(w as usize, h as usize, rgba.as_raw(), channel)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Density in [0, 1] at a world position, 0 outside `bounds`.
    pub fn sample(&self, x: f32, z: f32, bounds: &Rect, filter: MapFilter) -> f32 {
        let Some((u, v)) = locate(x, z, bounds, self.width, self.height) else {
            return 0.0;
        };
        match filter {
            MapFilter::Nearest => {
                self.values[nearest_index(u, v, self.width, self.height)] as f32 / 255.0
            }
            MapFilter::Bilinear => {
                let sum: f32 = bilinear_taps(u, v, self.width, self.height)
                    .iter()
                    .map(|&(idx, w)| self.values[idx] as f32 * w)
                    .sum();
                sum / 255.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half_field() -> DensityField {
        // Left column empty, right column full
        DensityField::from_values(2, 2, vec![0, 255, 0, 255]).unwrap()
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        assert!(DensityField::from_values(0, 4, vec![]).is_err());
        assert!(DensityField::from_values(2, 2, vec![0; 3]).is_err());
        assert!(DensityField::from_rgba(2, 2, &[0; 15], MapChannel::Red).is_err());
    }

    #[test]
    fn test_nearest() {
        let field = half_field();
        let bounds = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(field.sample(2.0, 2.0, &bounds, MapFilter::Nearest), 0.0);
        assert_eq!(field.sample(7.0, 8.0, &bounds, MapFilter::Nearest), 1.0);
        assert_eq!(field.sample(12.0, 8.0, &bounds, MapFilter::Nearest), 0.0);
    }

    #[test]
    fn test_bilinear_blends_between_centres() {
        let field = half_field();
        let bounds = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Texel centres sit at x = 2.5 and 7.5
        let mid = field.sample(5.0, 5.0, &bounds, MapFilter::Bilinear);
        assert!((mid - 0.5).abs() < 1e-5);
        assert_eq!(field.sample(1.0, 5.0, &bounds, MapFilter::Bilinear), 0.0);
        assert_eq!(field.sample(9.0, 5.0, &bounds, MapFilter::Bilinear), 1.0);
    }

    #[test]
    fn test_channel_extraction() {
        let rgba = [30, 60, 90, 120];
        let r = DensityField::from_rgba(1, 1, &rgba, MapChannel::Red).unwrap();
        let c = DensityField::from_rgba(1, 1, &rgba, MapChannel::Color).unwrap();
        let a = DensityField::from_rgba(1, 1, &rgba, MapChannel::Alpha).unwrap();
        let bounds = Rect::new(0.0, 0.0, 1.0, 1.0);
        assert!((r.sample(0.5, 0.5, &bounds, MapFilter::Nearest) - 30.0 / 255.0).abs() < 1e-6);
        assert!((c.sample(0.5, 0.5, &bounds, MapFilter::Nearest) - 60.0 / 255.0).abs() < 1e-6);
        assert!((a.sample(0.5, 0.5, &bounds, MapFilter::Nearest) - 120.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_image() {
        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(1, 0, image::Rgba([0, 255, 0, 255]));
        let field = DensityField::from_image(&DynamicImage::ImageRgba8(img), MapChannel::Green).unwrap();
        assert_eq!(field.width(), 2);
        assert_eq!(field.height(), 1);
        let bounds = Rect::new(0.0, 0.0, 2.0, 1.0);
        assert_eq!(field.sample(1.5, 0.5, &bounds, MapFilter::Nearest), 1.0);
    }
}
