//! Axis-aligned bounding boxes.
//!
//! Every scene node reports an [`Aabb`] in its local coordinate system. The scene
//! manager transforms it into world space with the node's absolute transformation
//! and tests it against the active camera's [`Frustum`](super::frustum::Frustum)
//! to skip nodes that are not on screen.

use cgmath::{Matrix4, Vector3};

/// An axis-aligned box given by its minimum and maximum corner.
///
/// The invariant `min <= max` holds componentwise for every box built through
/// [`reset`](Self::reset) and [`add_internal_point`](Self::add_internal_point).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// A degenerate box containing exactly one point.
    pub fn from_point(point: Vector3<f32>) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// The tight box around all `points`, or `None` if there are none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vector3<f32>>,
    {
        let mut points = points.into_iter();
        let mut aabb = Self::from_point(points.next()?);
        points.for_each(|point| aabb.add_internal_point(point));
        Some(aabb)
    }

    /// Collapse the box onto `point`.
    pub fn reset(&mut self, point: Vector3<f32>) {
        self.min = point;
        self.max = point;
    }

    /// Grow the box so that it contains `point`.
    pub fn add_internal_point(&mut self, point: Vector3<f32>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths along x, y and z.
    pub fn extent(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// `true` if the box has no volume and no area, i.e. it is a single point.
    pub fn is_empty(&self) -> bool {
        self.min == self.max
    }

    /// Inclusive containment test.
    pub fn is_point_inside(&self, point: Vector3<f32>) -> bool {
        point.x >= self.min.x
            && point.y >= self.min.y
            && point.z >= self.min.z
            && point.x <= self.max.x
            && point.y <= self.max.y
            && point.z <= self.max.z
    }

    pub fn corners(&self) -> [Vector3<f32>; 8] {
        let (min, max) = (self.min, self.max);
        [
            Vector3::new(min.x, min.y, min.z),
            Vector3::new(max.x, min.y, min.z),
            Vector3::new(min.x, max.y, min.z),
            Vector3::new(max.x, max.y, min.z),
            Vector3::new(min.x, min.y, max.z),
            Vector3::new(max.x, min.y, max.z),
            Vector3::new(min.x, max.y, max.z),
            Vector3::new(max.x, max.y, max.z),
        ]
    }

    /// The box around all eight corners after transforming them with `matrix`.
    ///
    /// The result encloses the transformed box but is generally not tight around
    /// the original geometry.
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Self {
        let corners = self
            .corners()
            .into_iter()
            .map(|corner| (matrix * corner.extend(1.0)).truncate());
        Self::from_points(corners).unwrap_or(*self)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::from_point(Vector3::new(0.0, 0.0, 0.0))
    }
}
