//! Export terrain meshes, instance buffers and run summaries to files

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};
use serde::Serialize;

use crate::geometry::Geometry;
use crate::mesh::TerrainMesh;
use crate::placement::{instance_bytes, InstanceRecord, PlacementStats, ZoneCount};

/// Export any geometry as Wavefront OBJ.
/// Vertex colours are written as the common `v x y z r g b` extension.
pub fn export_obj(geometry: &dyn Geometry, path: impl AsRef<Path>) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);

    writeln!(
        w,
        "# {} vertices, {} triangles",
        geometry.vertex_count(),
        geometry.indices().len() / 3
    )?;
    for (p, c) in geometry.positions().iter().zip(geometry.colors()) {
        writeln!(w, "v {} {} {} {} {} {}", p.x, p.y, p.z, c.x, c.y, c.z)?;
    }
    for n in geometry.normals() {
        writeln!(w, "vn {} {} {}", n.x, n.y, n.z)?;
    }
    for tri in geometry.indices().chunks_exact(3) {
        let (a, b, c) = (tri[0] + 1, tri[1] + 1, tri[2] + 1);
        writeln!(w, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }

    w.flush()
}

/// Write the packed instance buffer (8 native-endian f32 per instance).
pub fn export_instance_buffer(
    instances: &[InstanceRecord],
    path: impl AsRef<Path>,
) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(instance_bytes(instances))
}

/// Export the terrain's vertex colours as a top-down PNG, one pixel per grid cell.
pub fn export_color_preview(
    mesh: &TerrainMesh,
    path: impl AsRef<Path>,
) -> Result<(), image::ImageError> {
    let mut img: RgbImage = ImageBuffer::new(mesh.width as u32, mesh.height as u32);

    for (idx, color) in mesh.colors.iter().enumerate() {
        let x = (idx % mesh.width) as u32;
        let z = (idx / mesh.width) as u32;
        let c = color.clamp(glam::Vec3::ZERO, glam::Vec3::ONE) * 255.0;
        img.put_pixel(x, z, Rgb([c.x as u8, c.y as u8, c.z as u8]));
    }

    img.save(path)
}

/// Machine-readable summary of one run.
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    pub heightmap: String,
    pub grid: [usize; 2],
    pub vertices: usize,
    pub triangles: usize,
    pub seed: Option<u64>,
    pub requested: usize,
    pub placed: usize,
    pub attempts: usize,
    pub underfilled: bool,
    pub mean_height: f32,
    pub bounds_min: Option<[f32; 3]>,
    pub bounds_max: Option<[f32; 3]>,
    pub zones: Vec<ZoneCount>,
}

impl RunSummary {
    pub fn new(heightmap: &str, mesh: &TerrainMesh, stats: &PlacementStats) -> Self {
        Self {
            heightmap: heightmap.to_string(),
            grid: [mesh.width, mesh.height],
            vertices: mesh.vertex_count(),
            triangles: mesh.triangle_count(),
            seed: stats.seed,
            requested: stats.requested,
            placed: stats.placed,
            attempts: stats.attempts,
            underfilled: stats.placed < stats.requested,
            mean_height: stats.mean_height,
            bounds_min: stats.bounds.map(|(lo, _)| lo.to_array()),
            bounds_max: stats.bounds.map(|(_, hi)| hi.to_array()),
            zones: stats.zones.clone(),
        }
    }
}

pub fn export_summary(summary: &RunSummary, path: impl AsRef<Path>) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut w, summary)?;
    writeln!(w)?;
    w.flush()
}
