//! The scene manager: node arena and per-frame traversal.

use anyhow::{Context as _, bail};
use cgmath::{Matrix4, Point3, SquareMatrix, Vector3};
use log::{debug, trace, warn};

use crate::{
    data_structures::frustum::Frustum,
    driver::{TransformState, VideoDriver},
    render::{RenderPass, RenderQueue},
    scene::{
        animator::{Animator, RotationAnimator},
        camera::CameraNode,
        node::{ContainerNode, NodeBase, NodeHandle, RegistrationPass, SceneNode},
    },
};

struct Entry {
    base: NodeBase,
    node: Box<dyn SceneNode>,
    animators: Vec<Box<dyn Animator>>,
}

struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// Counters of one [`SceneManager::draw_all`] call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Nodes that enqueued themselves during registration.
    pub registered: usize,
    /// Nodes whose render callback ran, cameras included.
    pub rendered: usize,
    /// Nodes skipped because their bounding box was outside the view frustum.
    pub culled: usize,
}

/// Owns all scene nodes and draws them.
///
/// Nodes live in an arena of slots. A [`NodeHandle`] stores the slot index and the
/// generation of the slot when the node was added, so handles of removed nodes are
/// rejected instead of pointing at whatever reuses the slot.
pub struct SceneManager {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeHandle,
    active_camera: Option<NodeHandle>,
    queue: RenderQueue,
}

fn entry(slots: &[Slot], handle: NodeHandle) -> Option<&Entry> {
    slots
        .get(handle.index as usize)
        .filter(|slot| slot.generation == handle.generation)
        .and_then(|slot| slot.entry.as_ref())
}

fn entry_mut(slots: &mut [Slot], handle: NodeHandle) -> Option<&mut Entry> {
    slots
        .get_mut(handle.index as usize)
        .filter(|slot| slot.generation == handle.generation)
        .and_then(|slot| slot.entry.as_mut())
}

impl SceneManager {
    pub fn new() -> Self {
        let root = NodeHandle {
            index: 0,
            generation: 0,
        };
        let slots = vec![Slot {
            generation: 0,
            entry: Some(Entry {
                base: NodeBase::new(NodeBase::NO_ID, None),
                node: Box::new(ContainerNode::new()),
                animators: Vec::new(),
            }),
        }];
        Self {
            slots,
            free: Vec::new(),
            root,
            active_camera: None,
            queue: RenderQueue::new(),
        }
    }

    /// The root node. It cannot be removed.
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// Add `node` as a child of `parent`, or of the root if `parent` is `None`.
    pub fn add_node(
        &mut self,
        parent: Option<NodeHandle>,
        id: i32,
        node: Box<dyn SceneNode>,
    ) -> anyhow::Result<NodeHandle> {
        let parent = parent.unwrap_or(self.root);
        if !self.contains(parent) {
            bail!("parent node {:?} is not part of the scene", parent);
        }

        let entry = Entry {
            base: NodeBase::new(id, Some(parent)),
            node,
            animators: Vec::new(),
        };
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entry = Some(entry);
                NodeHandle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                NodeHandle {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };

        entry_mut(&mut self.slots, parent)
            .context("parent vanished while adding a child")?
            .base
            .children
            .push(handle);
        debug!("added node {} as {:?} under {:?}", id, handle, parent);
        Ok(handle)
    }

    /// Add a camera at `position` looking at `look_at`. It becomes the active camera
    /// if there is none yet.
    pub fn add_camera(
        &mut self,
        parent: Option<NodeHandle>,
        position: Vector3<f32>,
        look_at: Point3<f32>,
        id: i32,
    ) -> anyhow::Result<NodeHandle> {
        let handle = self.add_node(parent, id, Box::new(CameraNode::new(look_at)))?;
        self.set_position(handle, position);
        if self.active_camera.is_none() {
            self.active_camera = Some(handle);
        }
        Ok(handle)
    }

    pub fn active_camera(&self) -> Option<NodeHandle> {
        self.active_camera.filter(|&camera| self.contains(camera))
    }

    /// Make `camera` the active camera. Fails if it is not a [`CameraNode`] of this scene.
    pub fn set_active_camera(&mut self, camera: NodeHandle) -> anyhow::Result<()> {
        if self.node_as::<CameraNode>(camera).is_none() {
            bail!("{:?} is not a camera of this scene", camera);
        }
        self.active_camera = Some(camera);
        Ok(())
    }

    /// An animator spinning a node by `rotation` degrees per 10 milliseconds.
    pub fn create_rotation_animator(&self, rotation: Vector3<f32>) -> Box<dyn Animator> {
        Box::new(RotationAnimator::new(rotation))
    }

    /// Returns `false` if `handle` is stale.
    pub fn add_animator(&mut self, handle: NodeHandle, animator: Box<dyn Animator>) -> bool {
        match entry_mut(&mut self.slots, handle) {
            Some(entry) => {
                entry.animators.push(animator);
                true
            }
            None => {
                warn!("Cannot attach an animator to stale node {:?}.", handle);
                false
            }
        }
    }

    /// Remove a node and all of its descendants. The root cannot be removed.
    pub fn remove_node(&mut self, handle: NodeHandle) -> bool {
        if handle == self.root || !self.contains(handle) {
            return false;
        }
        if let Some(parent) = self.base(handle).and_then(NodeBase::parent)
            && let Some(parent) = entry_mut(&mut self.slots, parent)
        {
            parent.base.children.retain(|&child| child != handle);
        }

        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index as usize];
            if let Some(entry) = slot.entry.take() {
                stack.extend(entry.base.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
            }
            if self.active_camera == Some(current) {
                self.active_camera = None;
            }
        }
        true
    }

    pub fn contains(&self, handle: NodeHandle) -> bool {
        entry(&self.slots, handle).is_some()
    }

    pub fn base(&self, handle: NodeHandle) -> Option<&NodeBase> {
        entry(&self.slots, handle).map(|entry| &entry.base)
    }

    pub fn base_mut(&mut self, handle: NodeHandle) -> Option<&mut NodeBase> {
        entry_mut(&mut self.slots, handle).map(|entry| &mut entry.base)
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&dyn SceneNode> {
        entry(&self.slots, handle).map(|entry| entry.node.as_ref())
    }

    pub fn node_mut(&mut self, handle: NodeHandle) -> Option<&mut dyn SceneNode> {
        match entry_mut(&mut self.slots, handle) {
            Some(entry) => Some(entry.node.as_mut()),
            None => None,
        }
    }

    /// The node behind `handle` as its concrete type.
    pub fn node_as<T: SceneNode>(&self, handle: NodeHandle) -> Option<&T> {
        self.node(handle)
            .and_then(|node| node.as_any().downcast_ref::<T>())
    }

    pub fn node_as_mut<T: SceneNode>(&mut self, handle: NodeHandle) -> Option<&mut T> {
        self.node_mut(handle)
            .and_then(|node| node.as_any_mut().downcast_mut::<T>())
    }

    /// First node with `id`, in depth-first order from the root.
    pub fn node_by_id(&self, id: i32) -> Option<NodeHandle> {
        let mut stack = vec![self.root];
        while let Some(handle) = stack.pop() {
            let Some(entry) = entry(&self.slots, handle) else {
                continue;
            };
            if entry.base.id() == id {
                return Some(handle);
            }
            stack.extend(entry.base.children.iter().rev());
        }
        None
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.entry.is_some()).count()
    }

    pub fn set_visible(&mut self, handle: NodeHandle, visible: bool) -> bool {
        self.base_mut(handle)
            .map(|base| base.visible = visible)
            .is_some()
    }

    pub fn set_position(&mut self, handle: NodeHandle, position: Vector3<f32>) -> bool {
        self.base_mut(handle)
            .map(|base| base.transform.position = position)
            .is_some()
    }

    /// Rotation in degrees around x, y and z.
    pub fn set_rotation(&mut self, handle: NodeHandle, rotation: Vector3<f32>) -> bool {
        self.base_mut(handle)
            .map(|base| base.transform.rotation = rotation)
            .is_some()
    }

    /// Queue a node for rendering in the current frame.
    pub fn register_node_for_rendering(&mut self, handle: NodeHandle, pass: RenderPass) {
        if self.contains(handle) {
            self.queue.push(handle, pass);
        } else {
            warn!("Ignoring registration of stale node {:?}.", handle);
        }
    }

    pub fn render_queue(&self) -> &RenderQueue {
        &self.queue
    }

    /// Animate, register and render the whole scene.
    pub fn draw_all(&mut self, driver: &mut dyn VideoDriver, time_ms: u32) -> FrameStats {
        for state in TransformState::ALL {
            driver.set_transform(state, &Matrix4::identity());
        }

        self.animate(time_ms);
        self.register();
        let stats = self.render(driver);
        self.queue.clear();

        trace!(
            "frame at {}ms: {} registered, {} rendered, {} culled",
            time_ms, stats.registered, stats.rendered, stats.culled
        );
        stats
    }

    /// Run animators and update absolute transformations top down. Invisible nodes
    /// and their subtrees are left untouched.
    fn animate(&mut self, time_ms: u32) {
        let mut stack = vec![(self.root, Matrix4::identity())];
        while let Some((handle, parent_absolute)) = stack.pop() {
            let Some(Entry {
                base, animators, ..
            }) = entry_mut(&mut self.slots, handle)
            else {
                continue;
            };
            if !base.visible {
                continue;
            }
            for animator in animators.iter_mut() {
                animator.animate_node(base, time_ms);
            }
            base.update_absolute(&parent_absolute);
            let absolute = base.absolute;
            stack.extend(base.children.iter().rev().map(|&child| (child, absolute)));
        }
    }

    fn register(&mut self) {
        let mut stack = vec![self.root];
        while let Some(handle) = stack.pop() {
            let Some(entry) = entry(&self.slots, handle) else {
                continue;
            };
            let mut pass = RegistrationPass::new(
                handle,
                entry.base.visible,
                self.active_camera == Some(handle),
                &mut self.queue,
            );
            entry.node.on_register_scene_node(&mut pass);
            if pass.children_registered() && entry.base.visible {
                stack.extend(entry.base.children.iter().rev());
            }
        }
    }

    fn render(&self, driver: &mut dyn VideoDriver) -> FrameStats {
        let sorted = self.queue.sort(|handle| {
            self.node(handle).is_some_and(|node| {
                (0..node.material_count()).any(|i| node.material(i).is_transparent())
            })
        });
        let mut stats = FrameStats {
            registered: self.queue.len(),
            ..Default::default()
        };

        for &handle in &sorted.cameras {
            if let Some(entry) = entry(&self.slots, handle) {
                entry.node.render(&entry.base.absolute, driver);
                stats.rendered += 1;
            }
        }

        let frustum = (!sorted.cameras.is_empty()).then(|| {
            Frustum::from_matrix(
                &(driver.transform(TransformState::Projection)
                    * driver.transform(TransformState::View)),
            )
        });

        for &handle in sorted.solids.iter().chain(&sorted.transparents) {
            let Some(entry) = entry(&self.slots, handle) else {
                continue;
            };
            if entry.base.automatic_culling
                && let Some(frustum) = &frustum
                && frustum.is_outside(&entry.node.bounding_box().transformed(&entry.base.absolute))
            {
                stats.culled += 1;
                continue;
            }
            entry.node.render(&entry.base.absolute, driver);
            stats.rendered += 1;
        }
        stats
    }
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}
