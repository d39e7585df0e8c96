//! A terrain: one height field, the mesh built from it, and its configuration.
//!
//! The height field is owned here and lent read-only to both the mesh builder
//! and the world sampler, so the elevation grid exists exactly once.

use std::path::Path;

use crate::config::TerrainConfig;
use crate::error::LoadError;
use crate::heightfield::HeightField;
use crate::mesh::TerrainMesh;
use crate::sampler::WorldSampler;

#[derive(Clone, Debug)]
pub struct Terrain {
    config: TerrainConfig,
    field: HeightField,
    mesh: TerrainMesh,
}

impl Terrain {
    /// Decode a height image and build the terrain mesh.
    ///
    /// A decode failure aborts construction; no partial terrain is returned.
    pub fn load(path: impl AsRef<Path>, config: TerrainConfig) -> Result<Self, LoadError> {
        let field = HeightField::load(path, config.height_scale)?;
        Ok(Self::from_height_field(field, config))
    }

    /// Build from an already decoded height field.
    ///
    /// The field's own height scale is authoritative and replaces the one in `config`.
    pub fn from_height_field(field: HeightField, mut config: TerrainConfig) -> Self {
        config.height_scale = field.height_scale();
        let mesh = TerrainMesh::build(&field, &config);
        log::info!(
            "Terrain ready: {}x{} grid, {} vertices, {} triangles",
            field.width(),
            field.height(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Self { config, field, mesh }
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn height_field(&self) -> &HeightField {
        &self.field
    }

    pub fn mesh(&self) -> &TerrainMesh {
        &self.mesh
    }

    /// Sampler borrowing this terrain's height field.
    pub fn sampler(&self) -> WorldSampler<'_> {
        WorldSampler::new(&self.field, &self.config)
    }
}
