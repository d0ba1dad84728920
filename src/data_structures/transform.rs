//! Relative node transformations.
//!
//! Every scene node stores a [`Transform`] relative to its parent. Once per frame
//! the scene manager turns it into a matrix and multiplies it with the parent's
//! absolute transformation.

use cgmath::{Deg, Matrix4, Vector3};

/// Position, rotation and scale of a node relative to its parent.
///
/// Rotation is given as Euler angles in degrees around x, y and z. Rotation
/// animators advance these angles directly.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    /// Create an identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Rotation applied around x first, then y, then z.
    pub fn rotation_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_angle_z(Deg(self.rotation.z))
            * Matrix4::from_angle_y(Deg(self.rotation.y))
            * Matrix4::from_angle_x(Deg(self.rotation.x))
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * self.rotation_matrix()
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl From<Vector3<f32>> for Transform {
    fn from(position: Vector3<f32>) -> Self {
        Transform {
            position,
            ..Default::default()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
