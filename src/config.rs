//! Terrain and vegetation configuration
//!
//! Every tunable constant of the pipeline lives here. All structs implement
//! `Default` with the values the renderer was tuned against and deserialize
//! from JSON with missing fields falling back to those defaults.

use std::f32::consts::TAU;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::biome::BiomeGradient;
use crate::error::LoadError;

/// Parameters for turning a height image into a terrain mesh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Side length of the square local-space area the grid spans, centred on the origin
    pub extent: f32,
    /// Multiplier from scaled elevation to local mesh height
    pub vertical_multiplier: f32,
    /// Height scale applied to the 0-1 image luminance
    pub height_scale: f32,
    /// Ground colour bands
    pub palette: BiomeGradient,
}

impl TerrainConfig {
    pub fn with_height_scale(height_scale: f32) -> Self {
        Self { height_scale, ..Self::default() }
    }

    /// Highest local mesh height a terrain can reach.
    ///
    /// Normalized heights are always `local_height / max_local_height()`.
    pub fn max_local_height(&self) -> f32 {
        self.height_scale * self.vertical_multiplier
    }

    /// Convert a local mesh height to the 0-1 range used by the palettes.
    pub fn normalize_height(&self, local_height: f32) -> f32 {
        let max = self.max_local_height();
        if max.abs() <= f32::EPSILON {
            0.0
        } else {
            local_height / max
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            extent: 20.0,
            vertical_multiplier: 5.0,
            height_scale: 1.0,
            palette: BiomeGradient::terrain(),
        }
    }
}

/// Inclusive normalized-height window in which vegetation may grow.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeightRange {
    pub min: f32,
    pub max: f32,
}

impl HeightRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// The whole 0-1 range; nothing on the terrain is rejected.
    pub const fn unrestricted() -> Self {
        Self { min: 0.0, max: 1.0 }
    }

    pub fn contains(&self, normalized_height: f32) -> bool {
        normalized_height >= self.min && normalized_height <= self.max
    }

    pub fn is_empty(&self) -> bool {
        !(self.min <= self.max)
    }
}

impl Default for HeightRange {
    fn default() -> Self {
        // Above the water line, below the rock line
        Self::new(0.2, 0.7)
    }
}

/// Vegetation scattering parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementParams {
    /// Number of instances requested; the placer reads it on every run
    pub count: usize,
    /// Normalized height acceptance window, read by the placer on every run
    pub height_range: HeightRange,
    /// Attempt budget per requested instance (max attempts = count * this)
    pub attempts_per_instance: usize,
    /// Uniform scale range (min, max)
    pub scale_range: (f32, f32),
    /// Yaw range in radians (min, max)
    pub rotation_range: (f32, f32),
    /// Vertical jitter added to the sampled height (+/- this value)
    pub height_jitter: f32,
    /// Multiplicative colour variation range (min, max); results are clamped to 0-1
    pub color_variation: (f32, f32),
    /// Vegetation colour bands
    pub palette: BiomeGradient,
    /// Seed for reproducible placement; a fresh random seed is used when absent
    pub seed: Option<u64>,
}

impl PlacementParams {
    pub fn with_count(count: usize) -> Self {
        Self { count, ..Self::default() }
    }

    pub fn max_attempts(&self) -> usize {
        self.count.saturating_mul(self.attempts_per_instance)
    }

    /// The configured seed, or a fresh random one.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            count: 100_000,
            height_range: HeightRange::default(),
            attempts_per_instance: 10,
            scale_range: (0.001, 0.003),
            rotation_range: (0.0, TAU),
            height_jitter: 0.05,
            color_variation: (0.9, 1.1),
            palette: BiomeGradient::vegetation(),
            seed: None,
        }
    }
}

/// Combined config file accepted by the command line tool.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub terrain: TerrainConfig,
    pub vegetation: PlacementParams,
}

impl SceneConfig {
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
