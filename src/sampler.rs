//! World-space height queries against a placed terrain.
//!
//! The sampler borrows the terrain's height field and answers "how high is
//! the ground at world (x, z)?" for a given placement. Queries are pure,
//! allocation-free and safe to run from many threads at once.

use glam::Vec3;

use crate::config::TerrainConfig;
use crate::heightfield::HeightField;
use crate::transform::Placement;

/// Result of a height query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightSample {
    /// Absolute world height of the ground
    pub height: f32,
    /// Local height divided by the terrain's maximum local height (0-1 on the terrain)
    pub normalized: f32,
}

/// Anything that can report ground height at a world position.
///
/// The instance placer only depends on this trait so that tests and other
/// ground sources can stand in for a real terrain.
pub trait HeightSampler: Sync {
    fn sample(&self, world_x: f32, world_z: f32, placement: &Placement) -> HeightSample;
}

/// Bilinear height lookup in terrain-local grid space.
#[derive(Clone, Copy, Debug)]
pub struct WorldSampler<'a> {
    field: &'a HeightField,
    extent: f32,
    vertical_multiplier: f32,
    max_local_height: f32,
}

impl<'a> WorldSampler<'a> {
    pub fn new(field: &'a HeightField, config: &TerrainConfig) -> Self {
        Self {
            field,
            extent: config.extent,
            vertical_multiplier: config.vertical_multiplier,
            max_local_height: field.height_scale() * config.vertical_multiplier,
        }
    }

    /// Map local (x, z) to clamped [0, 1] texture coordinates.
    pub fn local_to_uv(&self, local_x: f32, local_z: f32) -> (f32, f32) {
        if self.extent.abs() <= f32::EPSILON {
            return (0.5, 0.5);
        }
        let u = (local_x / self.extent + 0.5).clamp(0.0, 1.0);
        let v = (local_z / self.extent + 0.5).clamp(0.0, 1.0);
        (u, v)
    }

    /// Interpolated local mesh height at local (x, z).
    pub fn local_height(&self, local_x: f32, local_z: f32) -> f32 {
        let (u, v) = self.local_to_uv(local_x, local_z);
        let fx = u * (self.field.width() - 1) as f32;
        let fz = v * (self.field.height() - 1) as f32;
        self.field.elevation_bilinear(fx, fz) * self.vertical_multiplier
    }

    /// Height contribution at world (x, z): the interpolated local height
    /// scaled by the placement's vertical scale.
    ///
    /// Positions outside the footprint return the nearest edge height. The
    /// caller adds `placement.world_y_offset()` for the absolute height.
    pub fn height_at(&self, world_x: f32, world_z: f32, placement: &Placement) -> f32 {
        let local = placement.world_to_local(Vec3::new(world_x, 0.0, world_z));
        self.local_height(local.x, local.z) * placement.vertical_scale()
    }

    /// Normalize a local height against the terrain's maximum.
    pub fn normalize(&self, local_height: f32) -> f32 {
        if self.max_local_height.abs() <= f32::EPSILON {
            0.0
        } else {
            local_height / self.max_local_height
        }
    }

    /// World position of a grid vertex under a placement.
    pub fn grid_vertex_world(&self, x: usize, z: usize, placement: &Placement) -> Vec3 {
        let axis = |i: usize, count: usize| {
            if count < 2 {
                0.0
            } else {
                (i as f32 / (count - 1) as f32 - 0.5) * self.extent
            }
        };
        let local = Vec3::new(
            axis(x, self.field.width()),
            self.field.elevation_at(x as i64, z as i64) * self.vertical_multiplier,
            axis(z, self.field.height()),
        );
        placement.local_to_world(local)
    }
}

impl HeightSampler for WorldSampler<'_> {
    fn sample(&self, world_x: f32, world_z: f32, placement: &Placement) -> HeightSample {
        let local = placement.world_to_local(Vec3::new(world_x, 0.0, world_z));
        let local_height = self.local_height(local.x, local.z);
        HeightSample {
            height: local_height * placement.vertical_scale() + placement.world_y_offset(),
            normalized: self.normalize(local_height),
        }
    }
}
