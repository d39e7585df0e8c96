//! Heightmap terrain and vegetation scattering library
//!
//! Builds a coloured terrain mesh from a grayscale height image, samples the
//! terrain surface in world space, and scatters vegetation instances over it.

pub mod biome;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod heightfield;
pub mod mesh;
pub mod model;
pub mod placement;
pub mod sampler;
pub mod terrain;
pub mod transform;
pub mod vegetation;

pub use config::{HeightRange, PlacementParams, SceneConfig, TerrainConfig};
pub use error::LoadError;
pub use heightfield::HeightField;
pub use mesh::TerrainMesh;
pub use placement::{Footprint, InstancePlacer, InstanceRecord, PlacementOutcome};
pub use sampler::{HeightSample, HeightSampler, WorldSampler};
pub use terrain::Terrain;
pub use transform::Placement;
pub use vegetation::VegetationBatch;
