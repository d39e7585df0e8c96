//! Common view over everything that produces renderable geometry.
//!
//! Terrain meshes and vegetation models both expose parallel position,
//! normal and colour arrays plus a triangle index list. The renderer only
//! needs this trait, and `interleave` packs any implementor into a single
//! GPU-ready vertex buffer.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::mesh::TerrainMesh;
use crate::model::ModelMesh;

/// Interleaved vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

/// Produces vertex, normal, colour and index data.
pub trait Geometry {
    fn positions(&self) -> &[Vec3];
    fn normals(&self) -> &[Vec3];
    fn colors(&self) -> &[Vec3];
    fn indices(&self) -> &[u32];

    fn vertex_count(&self) -> usize {
        self.positions().len()
    }

    /// True if the parallel arrays line up and every index is in range.
    fn is_well_formed(&self) -> bool {
        let n = self.positions().len();
        self.normals().len() == n
            && self.colors().len() == n
            && self.indices().len() % 3 == 0
            && self.indices().iter().all(|&i| (i as usize) < n)
    }
}

impl Geometry for TerrainMesh {
    fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    fn indices(&self) -> &[u32] {
        &self.indices
    }
}

impl Geometry for ModelMesh {
    fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    fn indices(&self) -> &[u32] {
        &self.indices
    }
}

/// Pack a geometry's parallel arrays into interleaved vertices.
pub fn interleave(geometry: &dyn Geometry) -> Vec<Vertex> {
    geometry
        .positions()
        .iter()
        .zip(geometry.normals())
        .zip(geometry.colors())
        .map(|((p, n), c)| Vertex {
            position: p.to_array(),
            normal: n.to_array(),
            color: c.to_array(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TerrainConfig;
    use crate::heightfield::HeightField;

    #[test]
    fn test_terrain_and_model_through_one_interface() {
        let field = HeightField::uniform(4, 3, 0.5, 1.0);
        let terrain = TerrainMesh::build(&field, &TerrainConfig::default());
        let model = ModelMesh::from_obj_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let producers: [&dyn Geometry; 2] = [&terrain, &model];
        for geometry in producers {
            assert!(geometry.is_well_formed());
            let vertices = interleave(geometry);
            assert_eq!(vertices.len(), geometry.vertex_count());
            assert_eq!(vertices[0].position, geometry.positions()[0].to_array());
        }
    }

    #[test]
    fn test_vertex_layout_is_nine_floats() {
        assert_eq!(std::mem::size_of::<Vertex>(), 9 * 4);
        let v = Vertex { position: [1.0, 2.0, 3.0], normal: [0.0, 1.0, 0.0], color: [0.5; 3] };
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&v));
        assert_eq!(floats, &[1.0, 2.0, 3.0, 0.0, 1.0, 0.0, 0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_out_of_range_index_is_not_well_formed() {
        let mut model = ModelMesh::from_obj_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        model.indices[2] = 7;
        assert!(!model.is_well_formed());
    }
}
