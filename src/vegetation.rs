//! A vegetation batch: one model drawn many times over a terrain.

use std::path::Path;

use crate::config::PlacementParams;
use crate::error::LoadError;
use crate::model::ModelMesh;
use crate::placement::{
    instance_bytes, pack_instances, Footprint, InstancePlacer, InstanceRecord, PlacementOutcome,
    PlacementStats,
};
use crate::terrain::Terrain;
use crate::transform::Placement;

pub struct VegetationBatch {
    model: ModelMesh,
    placer: InstancePlacer,
    outcome: PlacementOutcome,
}

impl VegetationBatch {
    pub fn new(model: ModelMesh, params: PlacementParams) -> Self {
        Self {
            model,
            placer: InstancePlacer::new(params),
            outcome: PlacementOutcome::default(),
        }
    }

    /// Load the model geometry; a bad model aborts creation of the batch.
    pub fn load(model_path: impl AsRef<Path>, params: PlacementParams) -> Result<Self, LoadError> {
        Ok(Self::new(ModelMesh::load(model_path)?, params))
    }

    pub fn model(&self) -> &ModelMesh {
        &self.model
    }

    pub fn params(&self) -> &PlacementParams {
        self.placer.params()
    }

    pub fn instances(&self) -> &[InstanceRecord] {
        &self.outcome.instances
    }

    pub fn instance_count(&self) -> usize {
        self.outcome.instances.len()
    }

    /// Outcome of the most recent generation.
    pub fn outcome(&self) -> &PlacementOutcome {
        &self.outcome
    }

    /// Scatter instances over the whole terrain footprint, replacing any previous set.
    pub fn generate(&mut self, terrain: &Terrain, placement: &Placement) -> &PlacementOutcome {
        let footprint = Footprint::covering(terrain.config(), placement);
        self.generate_in(terrain, placement, &footprint)
    }

    /// Scatter instances over an explicit world footprint, replacing any previous set.
    ///
    /// Without a configured seed a fresh one is drawn; either way the seed is
    /// recorded in the outcome so the run can be repeated.
    pub fn generate_in(
        &mut self,
        terrain: &Terrain,
        placement: &Placement,
        footprint: &Footprint,
    ) -> &PlacementOutcome {
        let seed = self.placer.params().resolve_seed();
        log::debug!("Vegetation seed: {}", seed);

        self.outcome = self.placer.place_seeded(footprint, placement, &terrain.sampler(), seed);
        &self.outcome
    }

    /// Multi-threaded `generate`; reproducible for a fixed seed.
    pub fn generate_parallel(
        &mut self,
        terrain: &Terrain,
        placement: &Placement,
    ) -> &PlacementOutcome {
        let footprint = Footprint::covering(terrain.config(), placement);
        let seed = self.placer.params().resolve_seed();
        log::debug!("Vegetation seed: {}", seed);

        self.outcome = self.placer.place_parallel(&footprint, placement, &terrain.sampler(), seed);
        &self.outcome
    }

    /// Seed of the most recent generation, `None` before the first one.
    pub fn last_seed(&self) -> Option<u64> {
        self.outcome.seed
    }

    /// Instance buffer, 8 floats per instance.
    pub fn instance_buffer(&self) -> Vec<f32> {
        pack_instances(&self.outcome.instances)
    }

    pub fn instance_bytes(&self) -> &[u8] {
        instance_bytes(&self.outcome.instances)
    }

    pub fn stats(&self) -> PlacementStats {
        PlacementStats::from_outcome(&self.outcome)
    }
}
