//! The scene node contract and the per-node state kept by the manager.

use std::any::Any;

use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::{
    data_structures::{aabb::Aabb, material::Material, transform::Transform},
    driver::VideoDriver,
    render::{RenderPass, RenderQueue},
};

/// Identifies a node inside a [`SceneManager`](super::manager::SceneManager).
///
/// Handles are cheap to copy. Once the node is removed the handle goes stale and
/// every lookup with it fails, even if the slot is reused by a new node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// Hierarchy, visibility and transformation of a node.
#[derive(Clone, Debug)]
pub struct NodeBase {
    id: i32,
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,
    pub visible: bool,
    /// Skip rendering when the world-space bounding box is outside the view frustum.
    pub automatic_culling: bool,
    pub transform: Transform,
    pub(crate) absolute: Matrix4<f32>,
}

impl NodeBase {
    /// An id of `-1` means "no id".
    pub const NO_ID: i32 = -1;

    pub(crate) fn new(id: i32, parent: Option<NodeHandle>) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            visible: true,
            automatic_culling: true,
            transform: Transform::new(),
            absolute: Matrix4::identity(),
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// World transformation as of the last animate phase.
    pub fn absolute_transformation(&self) -> &Matrix4<f32> {
        &self.absolute
    }

    pub fn absolute_position(&self) -> Vector3<f32> {
        self.absolute.w.truncate()
    }

    pub(crate) fn update_absolute(&mut self, parent_absolute: &Matrix4<f32>) {
        self.absolute = parent_absolute * self.transform.to_matrix();
    }
}

/// What a node sees of the scene during the register phase.
///
/// A node enqueues itself with [`register_for_rendering`](Self::register_for_rendering)
/// and lets the manager continue with its children through
/// [`register_children`](Self::register_children), which is the default behaviour
/// of [`SceneNode::on_register_scene_node`]. Children of invisible nodes are never
/// registered.
pub struct RegistrationPass<'q> {
    handle: NodeHandle,
    visible: bool,
    active_camera: bool,
    queue: &'q mut RenderQueue,
    descend: bool,
}

impl<'q> RegistrationPass<'q> {
    pub fn new(
        handle: NodeHandle,
        visible: bool,
        active_camera: bool,
        queue: &'q mut RenderQueue,
    ) -> Self {
        Self {
            handle,
            visible,
            active_camera,
            queue,
            descend: false,
        }
    }

    pub fn handle(&self) -> NodeHandle {
        self.handle
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// `true` if the node being registered is the scene's active camera.
    pub fn is_active_camera(&self) -> bool {
        self.active_camera
    }

    pub fn register_for_rendering(&mut self, pass: RenderPass) {
        self.queue.push(self.handle, pass);
    }

    pub fn register_children(&mut self) {
        self.descend = true;
    }

    pub fn children_registered(&self) -> bool {
        self.descend
    }
}

/// A node of the scene graph.
///
/// Only [`render`](Self::render), [`bounding_box`](Self::bounding_box) and the
/// downcasting helpers are required. Everything else has the behaviour of an
/// invisible grouping node.
pub trait SceneNode: Any {
    /// Called once per frame. The default registers nothing and continues with the
    /// children.
    fn on_register_scene_node(&self, pass: &mut RegistrationPass<'_>) {
        pass.register_children();
    }

    /// Draw the node. `absolute` is its world transformation.
    fn render(&self, absolute: &Matrix4<f32>, driver: &mut dyn VideoDriver);

    /// Bounds in the node's local coordinate system.
    fn bounding_box(&self) -> &Aabb;

    fn material_count(&self) -> usize {
        0
    }

    fn material(&self, _index: usize) -> &Material {
        &Material::DEFAULT
    }

    fn material_mut(&mut self, _index: usize) -> Option<&mut Material> {
        None
    }

    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A node without geometry, used to group other nodes. The scene root is one.
#[derive(Debug, Default, Clone)]
pub struct ContainerNode {
    bbox: Aabb,
}

impl ContainerNode {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SceneNode for ContainerNode {
    fn render(&self, _absolute: &Matrix4<f32>, _driver: &mut dyn VideoDriver) {}

    fn bounding_box(&self) -> &Aabb {
        &self.bbox
    }

    fn type_name(&self) -> &'static str {
        "empty"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
