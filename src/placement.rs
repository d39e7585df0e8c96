//! Vegetation scattering by rejection sampling
//!
//! Candidates are drawn uniformly over a world-space footprint, the ground is
//! sampled under each one, and candidates whose normalized height falls
//! outside the acceptance window are discarded. Every attempt counts against
//! a fixed budget (`count * attempts_per_instance`), so sampling always
//! terminates; running out of attempts before `count` instances were accepted
//! is a normal, reported outcome.
//!
//! Parallelization: `place_parallel` splits the attempt budget into fixed
//! chunks, each with its own ChaCha stream derived from the base seed, and
//! runs them in rayon waves. Results are concatenated in chunk order, so the
//! output depends only on the seed, never on the thread count.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::{PlacementParams, TerrainConfig};
use crate::sampler::HeightSampler;
use crate::transform::Placement;

/// Scalars per packed instance: position (3), colour (3), scale, rotation.
pub const FLOATS_PER_INSTANCE: usize = 8;

/// Attempts handled by one parallel chunk.
const CHUNK_ATTEMPTS: usize = 4096;

/// One vegetation instance as consumed by the instanced renderer.
///
/// The field order and `repr(C)` layout are the renderer's attribute layout.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct InstanceRecord {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub scale: f32,
    pub rotation: f32,
}

const _: () = assert!(std::mem::size_of::<InstanceRecord>() == FLOATS_PER_INSTANCE * 4);

impl InstanceRecord {
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn color(&self) -> Vec3 {
        Vec3::from_array(self.color)
    }
}

/// Flatten instances into the renderer's 8-floats-per-instance buffer.
pub fn pack_instances(instances: &[InstanceRecord]) -> Vec<f32> {
    bytemuck::cast_slice::<InstanceRecord, f32>(instances).to_vec()
}

/// Raw bytes of the instance buffer, ready for upload.
pub fn instance_bytes(instances: &[InstanceRecord]) -> &[u8] {
    bytemuck::cast_slice(instances)
}

/// World-space rectangle (in x/z) that candidates are drawn from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    pub center_x: f32,
    pub center_z: f32,
    pub width: f32,
    pub depth: f32,
}

impl Footprint {
    pub fn new(center_x: f32, center_z: f32, width: f32, depth: f32) -> Self {
        Self { center_x, center_z, width, depth }
    }

    /// A `width` x `depth` rectangle centred on the terrain's world position.
    pub fn around(placement: &Placement, width: f32, depth: f32) -> Self {
        let p = placement.position();
        Self::new(p.x, p.z, width, depth)
    }

    /// The full terrain extent after the placement's horizontal scale.
    pub fn covering(config: &TerrainConfig, placement: &Placement) -> Self {
        let scale = placement.scale();
        Self::around(
            placement,
            config.extent * scale.x.abs(),
            config.extent * scale.z.abs(),
        )
    }

    pub fn min_x(&self) -> f32 {
        self.center_x - self.width / 2.0
    }

    pub fn max_x(&self) -> f32 {
        self.center_x + self.width / 2.0
    }

    pub fn min_z(&self) -> f32 {
        self.center_z - self.depth / 2.0
    }

    pub fn max_z(&self) -> f32 {
        self.center_z + self.depth / 2.0
    }

    pub fn contains(&self, x: f32, z: f32) -> bool {
        x >= self.min_x() && x <= self.max_x() && z >= self.min_z() && z <= self.max_z()
    }
}

/// Accepted instances that landed nearest one vegetation palette band.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ZoneCount {
    pub threshold: f32,
    pub count: usize,
}

/// Instances produced by one placement run, with the bookkeeping needed to
/// tell a full run from an underfilled one.
#[derive(Clone, Debug, Default)]
pub struct PlacementOutcome {
    pub instances: Vec<InstanceRecord>,
    pub requested: usize,
    pub attempts: usize,
    /// Seed the run was drawn from; `None` when the caller supplied the RNG
    pub seed: Option<u64>,
    /// One entry per vegetation palette band, in threshold order
    pub zones: Vec<ZoneCount>,
}

impl PlacementOutcome {
    pub fn placed(&self) -> usize {
        self.instances.len()
    }

    /// True if the attempt budget ran out before `requested` instances were accepted.
    pub fn is_underfilled(&self) -> bool {
        self.instances.len() < self.requested
    }

    /// How many requested instances are missing.
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.instances.len())
    }

    /// Accepted instances per attempt (0 when nothing was attempted).
    pub fn acceptance_ratio(&self) -> f32 {
        if self.attempts == 0 {
            0.0
        } else {
            self.instances.len() as f32 / self.attempts as f32
        }
    }
}

/// Uniform draw in [lo, hi); a collapsed range returns `lo` instead of panicking.
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    let t: f32 = rng.gen();
    lo + (hi - lo) * t
}

/// An accepted candidate and the palette band it falls in.
type Accepted = (InstanceRecord, Option<usize>);

/// Scatters instances over a terrain according to `PlacementParams`.
///
/// The requested count and the height window are read from the params; there
/// is no per-call override.
#[derive(Clone, Debug, Default)]
pub struct InstancePlacer {
    params: PlacementParams,
}

impl InstancePlacer {
    pub fn new(params: PlacementParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PlacementParams {
        &self.params
    }

    /// Rejection-sample up to `params.count` instances with the given RNG.
    ///
    /// Stops after `count` acceptances or `count * attempts_per_instance`
    /// attempts, whichever comes first. An empty height window rejects every
    /// candidate and returns an empty outcome once the budget is spent.
    pub fn place<R: Rng + ?Sized>(
        &self,
        footprint: &Footprint,
        placement: &Placement,
        sampler: &dyn HeightSampler,
        rng: &mut R,
    ) -> PlacementOutcome {
        let count = self.params.count;
        let max_attempts = self.params.max_attempts();
        let mut instances = Vec::with_capacity(count);
        let mut zones = self.empty_zones();
        let mut attempts = 0;

        while instances.len() < count && attempts < max_attempts {
            attempts += 1;
            if let Some((instance, zone)) = self.attempt(footprint, placement, sampler, rng) {
                tally(&mut zones, zone);
                instances.push(instance);
            }
        }

        let outcome = PlacementOutcome {
            instances,
            requested: count,
            attempts,
            seed: None,
            zones,
        };
        report(&outcome, footprint);
        outcome
    }

    /// `place` driven by a `ChaCha8Rng` seeded from `seed`; the seed is kept
    /// in the outcome.
    pub fn place_seeded(
        &self,
        footprint: &Footprint,
        placement: &Placement,
        sampler: &dyn HeightSampler,
        seed: u64,
    ) -> PlacementOutcome {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut outcome = self.place(footprint, placement, sampler, &mut rng);
        outcome.seed = Some(seed);
        outcome
    }

    /// Parallel variant of `place`, deterministic for a given seed.
    ///
    /// Uses different random streams than `place_seeded`, so the two do not
    /// produce the same instances for the same seed.
    pub fn place_parallel(
        &self,
        footprint: &Footprint,
        placement: &Placement,
        sampler: &dyn HeightSampler,
        seed: u64,
    ) -> PlacementOutcome {
        let count = self.params.count;
        let max_attempts = self.params.max_attempts();
        let num_chunks = max_attempts.div_ceil(CHUNK_ATTEMPTS);
        let wave_size = rayon::current_num_threads().max(1);

        let mut instances = Vec::with_capacity(count);
        let mut zones = self.empty_zones();
        let mut attempts = 0;
        let mut next_chunk = 0;

        while instances.len() < count && next_chunk < num_chunks {
            let wave_end = (next_chunk + wave_size).min(num_chunks);

            // Each chunk keeps the local attempt index of every acceptance so
            // the global attempt count stays exact after truncation.
            let wave: Vec<Vec<(usize, Accepted)>> = (next_chunk..wave_end)
                .into_par_iter()
                .map(|chunk| {
                    let start = chunk * CHUNK_ATTEMPTS;
                    let len = CHUNK_ATTEMPTS.min(max_attempts - start);
                    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(chunk as u64));
                    let mut accepted = Vec::new();
                    for i in 0..len {
                        if accepted.len() >= count {
                            break;
                        }
                        if let Some(hit) = self.attempt(footprint, placement, sampler, &mut rng) {
                            accepted.push((i, hit));
                        }
                    }
                    accepted
                })
                .collect();

            for (offset, accepted) in wave.into_iter().enumerate() {
                let chunk = next_chunk + offset;
                let start = chunk * CHUNK_ATTEMPTS;
                let len = CHUNK_ATTEMPTS.min(max_attempts - start);

                let remaining = count - instances.len();
                let full = accepted.len() >= remaining;
                if full && remaining > 0 {
                    attempts = start + accepted[remaining - 1].0 + 1;
                } else if !full {
                    attempts = start + len;
                }
                for (_, (instance, zone)) in accepted.into_iter().take(remaining) {
                    tally(&mut zones, zone);
                    instances.push(instance);
                }
                if full {
                    break;
                }
            }

            next_chunk = wave_end;
        }

        let outcome = PlacementOutcome {
            instances,
            requested: count,
            attempts,
            seed: Some(seed),
            zones,
        };
        report(&outcome, footprint);
        outcome
    }

    fn empty_zones(&self) -> Vec<ZoneCount> {
        self.params
            .palette
            .bands()
            .iter()
            .map(|band| ZoneCount { threshold: band.threshold, count: 0 })
            .collect()
    }

    /// Draw one candidate and return the instance if it passes the height filter.
    fn attempt<R: Rng + ?Sized>(
        &self,
        footprint: &Footprint,
        placement: &Placement,
        sampler: &dyn HeightSampler,
        rng: &mut R,
    ) -> Option<Accepted> {
        let params = &self.params;

        let world_x = uniform(rng, footprint.min_x(), footprint.max_x());
        let world_z = uniform(rng, footprint.min_z(), footprint.max_z());

        let sample = sampler.sample(world_x, world_z, placement);
        if !params.height_range.contains(sample.normalized) {
            return None;
        }

        let world_y = sample.height + uniform(rng, -params.height_jitter, params.height_jitter);

        let variation = uniform(rng, params.color_variation.0, params.color_variation.1);
        let color = (params.palette.color_at(sample.normalized) * variation)
            .clamp(Vec3::ZERO, Vec3::ONE);

        let scale = uniform(rng, params.scale_range.0, params.scale_range.1);
        let rotation = uniform(rng, params.rotation_range.0, params.rotation_range.1);

        let instance = InstanceRecord {
            position: [world_x, world_y, world_z],
            color: color.to_array(),
            scale,
            rotation,
        };
        Some((instance, params.palette.nearest_band(sample.normalized)))
    }
}

fn tally(zones: &mut [ZoneCount], zone: Option<usize>) {
    if let Some(zone) = zone.and_then(|i| zones.get_mut(i)) {
        zone.count += 1;
    }
}

fn report(outcome: &PlacementOutcome, footprint: &Footprint) {
    log::debug!(
        "Placement bounds: x [{} to {}], z [{} to {}]",
        footprint.min_x(),
        footprint.max_x(),
        footprint.min_z(),
        footprint.max_z()
    );
    log::info!(
        "Generated {} instances out of {} requested ({} attempts)",
        outcome.placed(),
        outcome.requested,
        outcome.attempts
    );
    if outcome.is_underfilled() {
        log::warn!(
            "Placement underfilled: {} of {} instances missing after {} attempts",
            outcome.shortfall(),
            outcome.requested,
            outcome.attempts
        );
    }
}

/// Summary of a placement run for logs and reports.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementStats {
    pub placed: usize,
    pub requested: usize,
    pub attempts: usize,
    pub seed: Option<u64>,
    /// Component-wise bounds of instance positions, `None` when nothing was placed
    pub bounds: Option<(Vec3, Vec3)>,
    pub mean_height: f32,
    pub zones: Vec<ZoneCount>,
}

impl PlacementStats {
    pub fn from_outcome(outcome: &PlacementOutcome) -> Self {
        let instances = &outcome.instances;
        let bounds = instances.first().map(|first| {
            instances.iter().fold((first.position(), first.position()), |(lo, hi), inst| {
                (lo.min(inst.position()), hi.max(inst.position()))
            })
        });
        let mean_height = if instances.is_empty() {
            0.0
        } else {
            instances.iter().map(|i| i.position[1]).sum::<f32>() / instances.len() as f32
        };

        Self {
            placed: instances.len(),
            requested: outcome.requested,
            attempts: outcome.attempts,
            seed: outcome.seed,
            bounds,
            mean_height,
            zones: outcome.zones.clone(),
        }
    }

    /// Share of placed instances in a zone, in percent.
    pub fn zone_percent(&self, zone: &ZoneCount) -> f32 {
        if self.placed == 0 {
            0.0
        } else {
            100.0 * zone.count as f32 / self.placed as f32
        }
    }
}

impl fmt::Display for PlacementStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total instances: {} / {} requested", self.placed, self.requested)?;
        writeln!(f, "Attempts: {}", self.attempts)?;
        match self.bounds {
            Some((lo, hi)) => {
                writeln!(f, "  X: [{:.3} to {:.3}] (span: {:.3})", lo.x, hi.x, hi.x - lo.x)?;
                writeln!(f, "  Y: [{:.3} to {:.3}] (span: {:.3})", lo.y, hi.y, hi.y - lo.y)?;
                writeln!(f, "  Z: [{:.3} to {:.3}] (span: {:.3})", lo.z, hi.z, hi.z - lo.z)?;
            }
            None => writeln!(f, "  No instances placed")?,
        }
        write!(f, "Average height: {:.3}", self.mean_height)?;
        if !self.zones.is_empty() {
            write!(f, "\nDistribution by zone:")?;
            for zone in &self.zones {
                write!(
                    f,
                    "\n  band {:.2}: {} ({:.1}%)",
                    zone.threshold,
                    zone.count,
                    self.zone_percent(zone)
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeightRange;
    use crate::sampler::HeightSample;

    /// Ground whose normalized height rises linearly with x across [-10, 10].
    struct Slope;

    impl HeightSampler for Slope {
        fn sample(&self, world_x: f32, _world_z: f32, placement: &Placement) -> HeightSample {
            let normalized = ((world_x + 10.0) / 20.0).clamp(0.0, 1.0);
            HeightSample {
                height: normalized * 5.0 + placement.world_y_offset(),
                normalized,
            }
        }
    }

    fn placer_for(count: usize, range: HeightRange) -> InstancePlacer {
        InstancePlacer::new(PlacementParams {
            count,
            height_range: range,
            ..PlacementParams::default()
        })
    }

    fn setup() -> (Footprint, Placement) {
        let placement = Placement::default();
        let footprint = Footprint::around(&placement, 20.0, 20.0);
        (footprint, placement)
    }

    #[test]
    fn test_zero_count_is_empty() {
        let (footprint, placement) = setup();
        let placer = placer_for(0, HeightRange::default());
        let outcome = placer.place_seeded(&footprint, &placement, &Slope, 1);
        assert!(outcome.instances.is_empty());
        assert_eq!(outcome.attempts, 0);
        assert!(!outcome.is_underfilled());
    }

    #[test]
    fn test_unrestricted_range_fills_exactly() {
        let (footprint, placement) = setup();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for count in [1, 17, 300] {
            let placer = placer_for(count, HeightRange::unrestricted());
            let outcome = placer.place(&footprint, &placement, &Slope, &mut rng);
            assert_eq!(outcome.placed(), count);
            assert_eq!(outcome.attempts, count);
            assert_eq!(outcome.shortfall(), 0);
            assert_eq!(outcome.seed, None);
        }
    }

    #[test]
    fn test_empty_window_terminates_empty() {
        let (footprint, placement) = setup();
        let placer = placer_for(50, HeightRange::new(0.8, 0.2));
        let outcome = placer.place_seeded(&footprint, &placement, &Slope, 3);
        assert!(outcome.instances.is_empty());
        assert_eq!(outcome.attempts, 500);
        assert!(outcome.is_underfilled());
        assert_eq!(outcome.shortfall(), 50);
        assert!(outcome.zones.iter().all(|z| z.count == 0));
    }

    #[test]
    fn test_accepted_instances_respect_window_and_ranges() {
        let (footprint, placement) = setup();
        let range = HeightRange::default();
        let placer = placer_for(400, range);
        let outcome = placer.place_seeded(&footprint, &placement, &Slope, 4);
        let params = placer.params();

        assert!(!outcome.instances.is_empty());
        for inst in &outcome.instances {
            let [x, y, z] = inst.position;
            assert!(footprint.contains(x, z));
            let normalized = (x + 10.0) / 20.0;
            assert!(normalized >= range.min - 1e-5 && normalized <= range.max + 1e-5);
            let ground = normalized * 5.0;
            assert!((y - ground).abs() <= params.height_jitter + 1e-4);
            assert!(inst.scale >= params.scale_range.0 && inst.scale <= params.scale_range.1);
            assert!(inst.rotation >= params.rotation_range.0);
            assert!(inst.rotation <= params.rotation_range.1);
            assert!(inst.color.iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }

    #[test]
    fn test_partial_window_underfills_within_budget() {
        let mut params = PlacementParams::with_count(1000);
        params.attempts_per_instance = 1;
        params.height_range = HeightRange::new(0.5, 1.0);
        let placer = InstancePlacer::new(params);
        let (footprint, placement) = setup();

        // Only half of the footprint is acceptable, with one attempt per instance
        let outcome = placer.place_seeded(&footprint, &placement, &Slope, 5);
        assert_eq!(outcome.attempts, 1000);
        assert!(outcome.is_underfilled());
        assert!(outcome.placed() > 300 && outcome.placed() < 700);
    }

    #[test]
    fn test_same_seed_same_instances() {
        let (footprint, placement) = setup();
        let placer = placer_for(100, HeightRange::default());
        let a = placer.place_seeded(&footprint, &placement, &Slope, 9);
        let b = placer.place_seeded(&footprint, &placement, &Slope, 9);
        assert_eq!(a.instances, b.instances);
        assert_eq!(a.seed, Some(9));
    }

    #[test]
    fn test_degenerate_footprint_does_not_panic() {
        let (_, placement) = setup();
        let footprint = Footprint::new(0.0, 0.0, 0.0, 0.0);
        let placer = placer_for(5, HeightRange::unrestricted());
        let outcome = placer.place_seeded(&footprint, &placement, &Slope, 6);
        assert_eq!(outcome.placed(), 5);
        assert!(outcome
            .instances
            .iter()
            .all(|i| i.position[0] == 0.0 && i.position[2] == 0.0));
    }

    #[test]
    fn test_zone_counts_follow_palette_bands() {
        let (footprint, placement) = setup();
        let placer = placer_for(2000, HeightRange::unrestricted());
        let outcome = placer.place_seeded(&footprint, &placement, &Slope, 12);

        let thresholds: Vec<f32> = outcome.zones.iter().map(|z| z.threshold).collect();
        assert_eq!(thresholds, vec![0.35, 0.55, 0.70]);
        assert_eq!(outcome.zones.iter().map(|z| z.count).sum::<usize>(), 2000);

        // Recount from positions: on the slope normalized height is (x + 10) / 20
        let palette = &placer.params().palette;
        let mut expected = [0usize; 3];
        for inst in &outcome.instances {
            let normalized = ((inst.position[0] + 10.0) / 20.0).clamp(0.0, 1.0);
            expected[palette.nearest_band(normalized).unwrap()] += 1;
        }
        let counted: Vec<usize> = outcome.zones.iter().map(|z| z.count).collect();
        assert_eq!(counted, expected.to_vec());

        // Shore covers [0, 0.45), meadow [0.45, 0.625), hill the rest
        assert!(counted[0] > counted[1] && counted[2] > counted[1]);
    }

    #[test]
    fn test_parallel_is_deterministic_and_exact() {
        let (footprint, placement) = setup();
        let count = 5000;
        let placer = placer_for(count, HeightRange::unrestricted());
        let a = placer.place_parallel(&footprint, &placement, &Slope, 42);
        let b = placer.place_parallel(&footprint, &placement, &Slope, 42);
        assert_eq!(a.placed(), count);
        assert_eq!(a.attempts, count);
        assert_eq!(a.instances, b.instances);
        assert_eq!(a.seed, Some(42));

        let c = placer.place_parallel(&footprint, &placement, &Slope, 43);
        assert_ne!(a.instances, c.instances);
    }

    #[test]
    fn test_parallel_independent_of_thread_count() {
        let (footprint, placement) = setup();
        let placer = placer_for(20_000, HeightRange::new(0.25, 0.75));
        let run = |threads: usize| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .unwrap()
                .install(|| placer.place_parallel(&footprint, &placement, &Slope, 77))
        };

        let single = run(1);
        let quad = run(4);
        assert_eq!(single.placed(), 20_000);
        assert!(single.attempts > 5 * CHUNK_ATTEMPTS);
        assert_eq!(single.instances, quad.instances);
        assert_eq!(single.attempts, quad.attempts);
        assert_eq!(single.zones, quad.zones);
    }

    #[test]
    fn test_parallel_respects_budget() {
        let (footprint, placement) = setup();
        let placer = placer_for(900, HeightRange::new(0.9, 0.1));
        let outcome = placer.place_parallel(&footprint, &placement, &Slope, 7);
        assert!(outcome.instances.is_empty());
        assert_eq!(outcome.attempts, 9000);

        let placer = placer_for(0, HeightRange::unrestricted());
        let zero = placer.place_parallel(&footprint, &placement, &Slope, 7);
        assert!(zero.instances.is_empty());
        assert_eq!(zero.attempts, 0);
    }

    #[test]
    fn test_pack_layout() {
        let instances = [
            InstanceRecord {
                position: [1.0, 2.0, 3.0],
                color: [0.1, 0.2, 0.3],
                scale: 0.5,
                rotation: 1.5,
            },
            InstanceRecord {
                position: [4.0, 5.0, 6.0],
                color: [0.4, 0.5, 0.6],
                scale: 0.7,
                rotation: 2.5,
            },
        ];
        let packed = pack_instances(&instances);
        assert_eq!(packed.len(), 2 * FLOATS_PER_INSTANCE);
        assert_eq!(&packed[..8], &[1.0, 2.0, 3.0, 0.1, 0.2, 0.3, 0.5, 1.5]);
        assert_eq!(packed[8], 4.0);
        assert_eq!(instance_bytes(&instances).len(), 64);
    }

    #[test]
    fn test_stats() {
        let outcome = PlacementOutcome {
            instances: vec![
                InstanceRecord { position: [-1.0, 2.0, 0.0], ..Default::default() },
                InstanceRecord { position: [3.0, 4.0, -2.0], ..Default::default() },
            ],
            requested: 4,
            attempts: 40,
            seed: Some(5),
            zones: vec![
                ZoneCount { threshold: 0.35, count: 1 },
                ZoneCount { threshold: 0.55, count: 0 },
                ZoneCount { threshold: 0.70, count: 1 },
            ],
        };
        let stats = PlacementStats::from_outcome(&outcome);
        assert_eq!(stats.placed, 2);
        assert_eq!(stats.seed, Some(5));
        assert_eq!(stats.mean_height, 3.0);
        let (lo, hi) = stats.bounds.unwrap();
        assert_eq!(lo, Vec3::new(-1.0, 2.0, -2.0));
        assert_eq!(hi, Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(stats.zone_percent(&stats.zones[0]), 50.0);

        let text = stats.to_string();
        assert!(text.contains("2 / 4"));
        assert!(text.contains("Distribution by zone:"));
        assert!(text.contains("band 0.35: 1 (50.0%)"));
        assert!(text.contains("band 0.55: 0 (0.0%)"));
        assert!((outcome.acceptance_ratio() - 0.05).abs() < 1e-6);
    }
}
