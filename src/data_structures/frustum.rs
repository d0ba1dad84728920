//! View frustum extracted from a view-projection matrix.

use cgmath::{InnerSpace, Matrix, Matrix4, Vector3, Vector4};

use crate::data_structures::aabb::Aabb;

/// The six planes bounding everything a camera can see.
///
/// Planes are stored as `(normal, distance)` packed into a `Vector4` with the
/// normal pointing into the frustum, so a point `p` is inside a plane when
/// `normal.dot(p) + distance >= 0`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frustum {
    planes: [Vector4<f32>; 6],
}

impl Frustum {
    /// Extract the planes of `projection * view`.
    ///
    /// Expects clip space with depth in `0.0..=1.0`, which is what wgpu uses.
    pub fn from_matrix(view_projection: &Matrix4<f32>) -> Self {
        let r0 = view_projection.row(0);
        let r1 = view_projection.row(1);
        let r2 = view_projection.row(2);
        let r3 = view_projection.row(3);
        let planes = [r3 + r0, r3 - r0, r3 + r1, r3 - r1, r2, r3 - r2].map(|plane| {
            let length = plane.truncate().magnitude();
            if length > 0.0 { plane / length } else { plane }
        });
        Self { planes }
    }

    /// `true` when no part of `aabb` can be inside the frustum.
    ///
    /// This is conservative: a box near a frustum corner may be reported visible
    /// although it is not.
    pub fn is_outside(&self, aabb: &Aabb) -> bool {
        self.planes.iter().any(|plane| {
            let normal = plane.truncate();
            // the corner furthest along the plane normal
            let positive = Vector3::new(
                if normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );
            normal.dot(positive) + plane.w < 0.0
        })
    }
}
