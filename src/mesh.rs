//! Height field to triangle mesh conversion.
//!
//! Vertices are laid out row-major (z outer, x inner) over a square of side
//! `extent` centred on the local origin. Positions, normals and colours share
//! that ordering so index `z * width + x` addresses the same grid cell in all
//! of them.

use glam::Vec3;
use rayon::prelude::*;

use crate::config::TerrainConfig;
use crate::heightfield::HeightField;
use crate::sampler::WorldSampler;

/// Normal given to border vertices, and the expected normal of flat ground.
pub const UP: Vec3 = Vec3::Y;

/// Renderable terrain geometry in local space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerrainMesh {
    pub width: usize,
    pub height: usize,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub colors: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl TerrainMesh {
    /// Build the mesh for a height field.
    ///
    /// Grids with a single row or column produce a zero-area mesh with no
    /// triangles rather than failing.
    pub fn build(field: &HeightField, config: &TerrainConfig) -> Self {
        let width = field.width();
        let height = field.height();

        let (positions, colors) = generate_vertices(field, config);
        let normals = compute_normals(&positions, width, height);
        let indices = generate_indices(width, height);

        log::debug!(
            "Built terrain mesh: {} vertices, {} triangles",
            positions.len(),
            indices.len() / 3
        );

        Self { width, height, positions, normals, colors, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Local height of the vertex at a grid cell, clamped to the grid.
    pub fn height_at_grid(&self, x: i64, z: i64) -> f32 {
        if self.positions.is_empty() {
            return 0.0;
        }
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let z = z.clamp(0, self.height as i64 - 1) as usize;
        self.positions[z * self.width + x].y
    }

    /// Axis-aligned bounds of the vertex positions, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
        )
    }
}

/// Grid coordinate to local horizontal offset; a single-sample axis collapses to 0.
fn grid_to_local(i: usize, count: usize, extent: f32) -> f32 {
    if count < 2 {
        0.0
    } else {
        (i as f32 / (count - 1) as f32 - 0.5) * extent
    }
}

fn generate_vertices(field: &HeightField, config: &TerrainConfig) -> (Vec<Vec3>, Vec<Vec3>) {
    let width = field.width();
    let height = field.height();
    let sampler = WorldSampler::new(field, config);

    let rows: Vec<Vec<(Vec3, Vec3)>> = (0..height)
        .into_par_iter()
        .map(|z| {
            let z_pos = grid_to_local(z, height, config.extent);
            (0..width)
                .map(|x| {
                    let x_pos = grid_to_local(x, width, config.extent);
                    let y_pos = field.elevation_at(x as i64, z as i64) * config.vertical_multiplier;
                    let color = config.palette.color_at(sampler.normalize(y_pos));
                    (Vec3::new(x_pos, y_pos, z_pos), color)
                })
                .collect()
        })
        .collect();

    rows.into_iter().flatten().unzip()
}

/// Central-difference normals for interior vertices, `UP` on the border.
fn compute_normals(positions: &[Vec3], width: usize, height: usize) -> Vec<Vec3> {
    let mut normals = vec![UP; positions.len()];
    if width < 3 || height < 3 {
        return normals;
    }

    normals
        .par_chunks_mut(width)
        .enumerate()
        .filter(|(z, _)| *z > 0 && *z < height - 1)
        .for_each(|(z, row)| {
            for x in 1..width - 1 {
                let left = positions[z * width + x - 1];
                let right = positions[z * width + x + 1];
                let up = positions[(z - 1) * width + x];
                let down = positions[(z + 1) * width + x];

                let normal = (down - up).cross(right - left);
                row[x] = normal.try_normalize().unwrap_or(UP);
            }
        });

    normals
}

/// Two triangles per cell, counter-clockwise when viewed from +Y.
fn generate_indices(width: usize, height: usize) -> Vec<u32> {
    if width < 2 || height < 2 {
        return Vec::new();
    }

    let mut indices = Vec::with_capacity((width - 1) * (height - 1) * 6);
    for z in 0..height - 1 {
        for x in 0..width - 1 {
            let top_left = (z * width + x) as u32;
            let top_right = top_left + 1;
            let bottom_left = ((z + 1) * width + x) as u32;
            let bottom_right = bottom_left + 1;

            indices.extend_from_slice(&[top_left, bottom_left, top_right]);
            indices.extend_from_slice(&[top_right, bottom_left, bottom_right]);
        }
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bumpy(width: usize, height: usize) -> HeightField {
        let samples = (0..width * height)
            .map(|i| {
                let x = (i % width) as f32;
                let z = (i / width) as f32;
                0.5 + 0.25 * (x * 0.7).sin() * (z * 0.4).cos()
            })
            .collect();
        HeightField::from_samples(width, height, samples, 1.5).unwrap()
    }

    #[test]
    fn test_array_lengths_for_various_grids() {
        let config = TerrainConfig::default();
        for (w, h) in [(2, 2), (3, 5), (8, 4), (17, 9)] {
            let mesh = TerrainMesh::build(&bumpy(w, h), &config);
            assert_eq!(mesh.positions.len(), w * h);
            assert_eq!(mesh.normals.len(), w * h);
            assert_eq!(mesh.colors.len(), w * h);
            assert_eq!(mesh.indices.len(), (w - 1) * (h - 1) * 6);
            assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.positions.len()));
        }
    }

    #[test]
    fn test_positions_span_extent() {
        let config = TerrainConfig::default();
        let mesh = TerrainMesh::build(&bumpy(5, 3), &config);
        let (lo, hi) = mesh.bounds().unwrap();
        assert!((lo.x + 10.0).abs() < 1e-5 && (hi.x - 10.0).abs() < 1e-5);
        assert!((lo.z + 10.0).abs() < 1e-5 && (hi.z - 10.0).abs() < 1e-5);
        // Row-major: second vertex steps along x
        assert!(mesh.positions[1].x > mesh.positions[0].x);
        assert_eq!(mesh.positions[1].z, mesh.positions[0].z);
    }

    #[test]
    fn test_vertical_multiplier_applied() {
        let field = HeightField::uniform(3, 3, 0.4, 2.0);
        let mesh = TerrainMesh::build(&field, &TerrainConfig::default());
        assert!((mesh.positions[4].y - 0.4 * 2.0 * 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_flat_field_is_flat_and_faces_up() {
        let field = HeightField::uniform(6, 5, 128.0 / 255.0, 1.0);
        let mesh = TerrainMesh::build(&field, &TerrainConfig::default());
        let y0 = mesh.positions[0].y;
        assert!(mesh.positions.iter().all(|p| p.y == y0));
        assert!(mesh.normals.iter().all(|n| (*n - UP).length() < 1e-6));
    }

    #[test]
    fn test_interior_normal_tilts_away_from_slope() {
        // Heights rise along +x, so the surface normal leans toward -x
        let samples = (0..9).map(|i| (i % 3) as f32 * 0.5).collect();
        let field = HeightField::from_samples(3, 3, samples, 1.0).unwrap();
        let mesh = TerrainMesh::build(&field, &TerrainConfig::default());
        let n = mesh.normals[4];
        assert!((n.length() - 1.0).abs() < 1e-5);
        assert!(n.y > 0.0);
        assert!(n.x < 0.0);
        assert!(n.z.abs() < 1e-6);
        assert_eq!(mesh.normals[0], UP);
    }

    #[test]
    fn test_triangles_wind_counter_clockwise_from_above() {
        let mesh = TerrainMesh::build(&bumpy(4, 4), &TerrainConfig::default());
        for tri in mesh.indices.chunks(3) {
            let a = mesh.positions[tri[0] as usize];
            let b = mesh.positions[tri[1] as usize];
            let c = mesh.positions[tri[2] as usize];
            let face_normal = (b - a).cross(c - a);
            assert!(face_normal.y > 0.0);
        }
    }

    #[test]
    fn test_colors_follow_palette() {
        let config = TerrainConfig::default();
        let field = HeightField::uniform(2, 2, 1.0, 1.0);
        let mesh = TerrainMesh::build(&field, &config);
        assert_eq!(mesh.colors[0], config.palette.color_at(1.0));
    }

    #[test]
    fn test_single_row_grid_is_degenerate_not_fatal() {
        let field = HeightField::uniform(1, 1, 0.5, 1.0);
        let mesh = TerrainMesh::build(&field, &TerrainConfig::default());
        assert_eq!(mesh.positions.len(), 1);
        assert_eq!(mesh.positions[0].x, 0.0);
        assert!(mesh.indices.is_empty());

        let strip = HeightField::uniform(5, 1, 0.5, 1.0);
        let mesh = TerrainMesh::build(&strip, &TerrainConfig::default());
        assert_eq!(mesh.positions.len(), 5);
        assert_eq!(mesh.normals.len(), 5);
        assert!(mesh.indices.is_empty());
    }
}
