//! Elevation-driven colour bands
//!
//! A gradient is an ordered list of (threshold, colour) bands. Colours are
//! linearly interpolated between consecutive thresholds and clamped to the
//! first/last colour outside the covered range. The terrain and the
//! vegetation use the same gradient type with different palettes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One (threshold, colour) stop of a gradient.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiomeBand {
    /// Normalized height (0-1) at which this colour is reached exactly
    pub threshold: f32,
    /// Linear RGB colour
    pub color: [f32; 3],
}

impl BiomeBand {
    pub const fn new(threshold: f32, color: [f32; 3]) -> Self {
        Self { threshold, color }
    }

    fn color_vec(&self) -> Vec3 {
        Vec3::from_array(self.color)
    }
}

// Terrain palette
pub const WATER_COLOR: [f32; 3] = [0.0, 0.3, 1.0];
pub const SHORE_COLOR: [f32; 3] = [0.0, 0.8, 0.8];
pub const GRASS_COLOR: [f32; 3] = [0.0, 0.7, 0.0];
pub const ROCK_COLOR: [f32; 3] = [0.5, 0.5, 0.5];
pub const SNOW_COLOR: [f32; 3] = [0.9, 0.9, 0.9];

// Vegetation palette
pub const SHORE_GRASS_COLOR: [f32; 3] = [0.4, 0.8, 0.3];
pub const MEADOW_GRASS_COLOR: [f32; 3] = [0.2, 0.7, 0.1];
pub const HILL_GRASS_COLOR: [f32; 3] = [0.3, 0.5, 0.2];

/// Ordered colour bands sampled by normalized height.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "UnsortedGradient")]
pub struct BiomeGradient {
    bands: Vec<BiomeBand>,
}

/// Deserialized bands go through `BiomeGradient::new` so they end up sorted.
#[derive(Deserialize)]
struct UnsortedGradient {
    bands: Vec<BiomeBand>,
}

impl From<UnsortedGradient> for BiomeGradient {
    fn from(raw: UnsortedGradient) -> Self {
        Self::new(raw.bands)
    }
}

impl BiomeGradient {
    /// Build a gradient, sorting the bands by threshold.
    pub fn new(mut bands: Vec<BiomeBand>) -> Self {
        bands.sort_by(|a, b| a.threshold.total_cmp(&b.threshold));
        Self { bands }
    }

    /// Water -> shore -> grass -> rock -> snow, used for the ground mesh.
    pub fn terrain() -> Self {
        Self::new(vec![
            BiomeBand::new(0.0, WATER_COLOR),
            BiomeBand::new(0.2, SHORE_COLOR),
            BiomeBand::new(0.4, GRASS_COLOR),
            BiomeBand::new(0.7, ROCK_COLOR),
            BiomeBand::new(1.0, SNOW_COLOR),
        ])
    }

    /// Shore grass -> meadow -> hill grass, used for vegetation instances.
    ///
    /// Below 0.35 the grass keeps the shore colour, above 0.7 the hill colour.
    pub fn vegetation() -> Self {
        Self::new(vec![
            BiomeBand::new(0.35, SHORE_GRASS_COLOR),
            BiomeBand::new(0.55, MEADOW_GRASS_COLOR),
            BiomeBand::new(0.70, HILL_GRASS_COLOR),
        ])
    }

    pub fn bands(&self) -> &[BiomeBand] {
        &self.bands
    }

    /// Index of the band whose threshold is closest to a normalized height.
    ///
    /// Ties go to the lower band, NaN maps to the first band and an empty
    /// gradient has no band at all.
    pub fn nearest_band(&self, normalized_height: f32) -> Option<usize> {
        if self.bands.is_empty() {
            return None;
        }
        if normalized_height.is_nan() {
            return Some(0);
        }
        let mut best = 0;
        for (i, band) in self.bands.iter().enumerate().skip(1) {
            let d = (band.threshold - normalized_height).abs();
            if d < (self.bands[best].threshold - normalized_height).abs() {
                best = i;
            }
        }
        Some(best)
    }

    /// Colour at a normalized height.
    pub fn color_at(&self, normalized_height: f32) -> Vec3 {
        let (first, last) = match (self.bands.first(), self.bands.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Vec3::ONE,
        };

        // NaN heights fall through every comparison; treat them as the lowest band
        if !(normalized_height > first.threshold) {
            return first.color_vec();
        }
        if normalized_height >= last.threshold {
            return last.color_vec();
        }

        for pair in self.bands.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            if normalized_height < upper.threshold {
                let span = upper.threshold - lower.threshold;
                if span <= f32::EPSILON {
                    return upper.color_vec();
                }
                let t = (normalized_height - lower.threshold) / span;
                return lower.color_vec().lerp(upper.color_vec(), t);
            }
        }

        last.color_vec()
    }
}

impl Default for BiomeGradient {
    fn default() -> Self {
        Self::terrain()
    }
}
