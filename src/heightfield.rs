//! Height field decoded from an image
//!
//! A dense row-major grid of raw samples in [0, 1] plus the height scale the
//! terrain was built with. Nothing wraps: every lookup outside the grid is
//! clamped to the nearest edge cell.

use std::path::Path;

use image::RgbImage;

use crate::error::LoadError;

/// Luminance weights for the red, green and blue channels.
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Normalized elevation grid.
#[derive(Clone, Debug)]
pub struct HeightField {
    width: usize,
    height: usize,
    height_scale: f32,
    samples: Vec<f32>,
}

impl HeightField {
    /// Decode an image file into a height field.
    ///
    /// Fails if the file cannot be opened or decoded, or has no pixels.
    pub fn load(path: impl AsRef<Path>, height_scale: f32) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let image = image::open(path)?.into_rgb8();
        let field = Self::from_rgb_image(&image, height_scale)
            .ok_or_else(|| LoadError::EmptyImage { path: path.to_path_buf() })?;
        log::info!(
            "Loaded height map {} ({}x{}, scale {})",
            path.display(),
            field.width,
            field.height,
            height_scale
        );
        Ok(field)
    }

    /// Sample every pixel of an RGB image by luminance.
    ///
    /// Returns `None` for an image without pixels.
    pub fn from_rgb_image(image: &RgbImage, height_scale: f32) -> Option<Self> {
        if image.width() == 0 || image.height() == 0 {
            return None;
        }
        let width = image.width() as usize;
        let height = image.height() as usize;
        let samples = image.pixels().map(|p| rgb_to_sample(p.0)).collect();
        Some(Self { width, height, height_scale, samples })
    }

    /// Build from raw samples in row-major order (z outer, x inner).
    ///
    /// Samples are clamped to [0, 1]. Returns `None` if the sample count does
    /// not match the dimensions or the grid is empty.
    pub fn from_samples(
        width: usize,
        height: usize,
        samples: Vec<f32>,
        height_scale: f32,
    ) -> Option<Self> {
        if width == 0 || height == 0 || samples.len() != width * height {
            return None;
        }
        let samples = samples.into_iter().map(|s| s.clamp(0.0, 1.0)).collect();
        Some(Self { width, height, height_scale, samples })
    }

    /// A field with the same raw sample everywhere.
    pub fn uniform(width: usize, height: usize, sample: f32, height_scale: f32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            height_scale,
            samples: vec![sample.clamp(0.0, 1.0); width.max(1) * height.max(1)],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn height_scale(&self) -> f32 {
        self.height_scale
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    fn index(&self, x: i64, z: i64) -> usize {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let z = z.clamp(0, self.height as i64 - 1) as usize;
        z * self.width + x
    }

    /// Raw 0-1 sample at a grid cell, clamped to the grid.
    pub fn raw_at(&self, x: i64, z: i64) -> f32 {
        self.samples[self.index(x, z)]
    }

    /// Scaled elevation at a grid cell, clamped to the grid.
    pub fn elevation_at(&self, x: i64, z: i64) -> f32 {
        self.raw_at(x, z) * self.height_scale
    }

    /// Bilinear elevation at fractional grid coordinates, clamped to the grid.
    pub fn elevation_bilinear(&self, fx: f32, fz: f32) -> f32 {
        let max_x = (self.width - 1) as f32;
        let max_z = (self.height - 1) as f32;
        let fx = if fx.is_nan() { 0.0 } else { fx.clamp(0.0, max_x) };
        let fz = if fz.is_nan() { 0.0 } else { fz.clamp(0.0, max_z) };

        let x0 = fx.floor() as i64;
        let z0 = fz.floor() as i64;
        let tx = fx - x0 as f32;
        let tz = fz - z0 as f32;

        let h00 = self.elevation_at(x0, z0);
        let h10 = self.elevation_at(x0 + 1, z0);
        let h01 = self.elevation_at(x0, z0 + 1);
        let h11 = self.elevation_at(x0 + 1, z0 + 1);

        let h0 = h00 * (1.0 - tx) + h10 * tx;
        let h1 = h01 * (1.0 - tx) + h11 * tx;
        h0 * (1.0 - tz) + h1 * tz
    }

    /// Lowest and highest scaled elevation in the grid.
    pub fn elevation_range(&self) -> (f32, f32) {
        let mut min_h = f32::MAX;
        let mut max_h = f32::MIN;
        for &s in &self.samples {
            let h = s * self.height_scale;
            if h < min_h {
                min_h = h;
            }
            if h > max_h {
                max_h = h;
            }
        }
        (min_h, max_h)
    }

    /// Iterate over all cells as (x, z, elevation).
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        let width = self.width;
        let scale = self.height_scale;
        self.samples
            .iter()
            .enumerate()
            .map(move |(idx, &s)| (idx % width, idx / width, s * scale))
    }
}

/// Weighted grayscale of an 8-bit RGB pixel, normalized to [0, 1].
pub fn rgb_to_sample(rgb: [u8; 3]) -> f32 {
    let luma = LUMA_WEIGHTS[0] * rgb[0] as f32
        + LUMA_WEIGHTS[1] * rgb[1] as f32
        + LUMA_WEIGHTS[2] * rgb[2] as f32;
    (luma / u8::MAX as f32).clamp(0.0, 1.0)
}
