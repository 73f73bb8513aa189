//! Math utilities and types
//!
//! Provides fundamental math types for scene graph transforms.

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// General affine transform (rotation, translation and non-uniform scale)
pub type Affine3 = nalgebra::Affine3<f32>;

/// Transform representing position, rotation, and scale
///
/// Aligned to 16 bytes so the vector and quaternion payloads sit on
/// SIMD-friendly boundaries wherever a transform is stored.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform from all three parts
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self { position, rotation, scale }
    }

    /// Convert to a transformation matrix (scale, then rotate, then translate)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Convert to an affine transform: `p -> position + rotation * (scale ⊙ p)`
    pub fn to_affine(&self) -> Affine3 {
        Affine3::from_matrix_unchecked(self.to_matrix())
    }
}

/// Translation column of a homogeneous matrix
pub fn translation_of(matrix: &Mat4) -> Vec3 {
    Vec3::new(matrix.m14, matrix.m24, matrix.m34)
}

/// Rotational part of a 3x3 linear map that may carry scale
///
/// Columns are normalized to strip scale before conversion; degenerate
/// (zero-length) columns are left untouched.
pub fn rotation_of(linear: &Mat3) -> Quat {
    let mut rotation_matrix = *linear;
    for mut column in rotation_matrix.column_iter_mut() {
        let length = column.magnitude();
        if length > f32::EPSILON {
            column /= length;
        }
    }
    Quat::from_matrix(&rotation_matrix)
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;
}

/// Math utility functions
pub mod utils {
    use super::*;

    /// Rotation of `angle` radians around `axis` (normalized internally)
    pub fn axis_angle(axis: Vec3, angle: f32) -> Quat {
        Quat::from_axis_angle(&Unit::new_normalize(axis), angle)
    }
}
