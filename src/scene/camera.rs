//! Perspective camera.

use std::any::Any;

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, Vector3};

use crate::{
    data_structures::aabb::Aabb,
    driver::{TransformState, VideoDriver},
    render::RenderPass,
    scene::node::{RegistrationPass, SceneNode},
};

// cgmath produces OpenGL clip space (z in -1..1), wgpu expects z in 0..1
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// A camera looking from its absolute position at `target`.
///
/// Only the scene's active camera is rendered. Rendering it sets the view and
/// projection transformations of the driver for all nodes drawn afterwards.
#[derive(Clone, Debug)]
pub struct CameraNode {
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    bbox: Aabb,
}

impl CameraNode {
    pub fn new(target: Point3<f32>) -> Self {
        Self {
            target,
            up: Vector3::unit_y(),
            fovy: Rad(std::f32::consts::PI / 2.5),
            znear: 1.0,
            zfar: 3000.0,
            bbox: Aabb::default(),
        }
    }

    pub fn view_matrix(&self, position: Point3<f32>) -> Matrix4<f32> {
        let direction = (self.target - position).normalize();
        let mut up = self.up.normalize();
        // look_at breaks down when looking along the up vector
        if direction.dot(up).abs() > 0.9999 {
            up.x += 0.5;
        }
        Matrix4::look_at_rh(position, self.target, up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, aspect, self.znear, self.zfar)
    }

    /// `projection * view` for a camera with world transformation `absolute`.
    pub fn view_projection(&self, absolute: &Matrix4<f32>, aspect: f32) -> Matrix4<f32> {
        let position = Point3::from_vec(absolute.w.truncate());
        self.projection_matrix(aspect) * self.view_matrix(position)
    }
}

impl SceneNode for CameraNode {
    fn on_register_scene_node(&self, pass: &mut RegistrationPass<'_>) {
        if pass.is_visible() && pass.is_active_camera() {
            pass.register_for_rendering(RenderPass::Camera);
        }
        pass.register_children();
    }

    fn render(&self, absolute: &Matrix4<f32>, driver: &mut dyn VideoDriver) {
        let (width, height) = driver.screen_size();
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        let position = Point3::from_vec(absolute.w.truncate());
        driver.set_transform(TransformState::Projection, &self.projection_matrix(aspect));
        driver.set_transform(TransformState::View, &self.view_matrix(position));
    }

    fn bounding_box(&self) -> &Aabb {
        &self.bbox
    }

    fn type_name(&self) -> &'static str {
        "camera"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
