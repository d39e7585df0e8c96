//! Placement of a terrain's local mesh in world space

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Affine transform from terrain-local space to world space, with its inverse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    matrix: Mat4,
    inverse: Mat4,
    translation: Vec3,
    scale: Vec3,
}

impl Placement {
    /// Build from scene-node style position, Euler rotation (degrees, XYZ) and scale.
    pub fn from_trs(position: Vec3, rotation_degrees: Vec3, scale: Vec3) -> Self {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            rotation_degrees.x.to_radians(),
            rotation_degrees.y.to_radians(),
            rotation_degrees.z.to_radians(),
        );
        let matrix = Mat4::from_scale_rotation_translation(scale, rotation, position);
        Self { matrix, inverse: matrix.inverse(), translation: position, scale }
    }

    /// Wrap an arbitrary affine matrix.
    ///
    /// Translation and per-axis scale are recovered by decomposition.
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, _rotation, translation) = matrix.to_scale_rotation_translation();
        Self { matrix, inverse: matrix.inverse(), translation, scale }
    }

    pub fn translation(position: Vec3) -> Self {
        Self::from_trs(position, Vec3::ZERO, Vec3::ONE)
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn inverse(&self) -> Mat4 {
        self.inverse
    }

    /// World position of the terrain's local origin.
    pub fn position(&self) -> Vec3 {
        self.translation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Scale applied to local heights.
    pub fn vertical_scale(&self) -> f32 {
        self.scale.y
    }

    /// World Y of the terrain's local origin.
    pub fn world_y_offset(&self) -> f32 {
        self.translation.y
    }

    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.matrix.transform_point3(local)
    }

    pub fn world_to_local(&self, world: Vec3) -> Vec3 {
        self.inverse.transform_point3(world)
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::from_matrix(Mat4::IDENTITY)
    }
}
