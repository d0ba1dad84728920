//! Render queue and pass sorting.
//!
//! During registration nodes enqueue themselves with a [`RenderPass`]. The scene
//! manager then renders the queue pass by pass: cameras first so that view and
//! projection are set, then solid geometry, then transparent geometry.
//!
//! # Key types
//!
//! - [`RenderPass`] is the pass a node asks to be rendered in
//! - [`RenderQueue`] collects the registrations of one frame
//! - [`SortedQueue`] is the queue split by pass, ready to render

use crate::scene::node::NodeHandle;

/// The pass a node is rendered in.
///
/// # Variants
///
/// - `Camera` renders before everything else and sets view and projection
/// - `Solid` is opaque geometry
/// - `Transparent` renders after all solid geometry
/// - `Automatic` is resolved from the node's materials: transparent if any of them is
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderPass {
    Camera,
    Solid,
    Transparent,
    #[default]
    Automatic,
}

/// Nodes registered for the current frame, in registration order.
#[derive(Debug, Default, Clone)]
pub struct RenderQueue {
    entries: Vec<(NodeHandle, RenderPass)>,
}

/// A [`RenderQueue`] split by pass. `Automatic` entries are already resolved.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SortedQueue {
    pub cameras: Vec<NodeHandle>,
    pub solids: Vec<NodeHandle>,
    pub transparents: Vec<NodeHandle>,
}

impl SortedQueue {
    pub fn len(&self) -> usize {
        self.cameras.len() + self.solids.len() + self.transparents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, handle: NodeHandle, pass: RenderPass) {
        self.entries.push((handle, pass));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.entries.iter().any(|(h, _)| *h == handle)
    }

    pub fn entries(&self) -> &[(NodeHandle, RenderPass)] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Split the queue by pass. `is_transparent` resolves `Automatic` entries.
    pub fn sort(&self, mut is_transparent: impl FnMut(NodeHandle) -> bool) -> SortedQueue {
        let mut sorted = SortedQueue::default();
        for &(handle, pass) in &self.entries {
            match pass {
                RenderPass::Camera => sorted.cameras.push(handle),
                RenderPass::Solid => sorted.solids.push(handle),
                RenderPass::Transparent => sorted.transparents.push(handle),
                RenderPass::Automatic if is_transparent(handle) => {
                    sorted.transparents.push(handle)
                }
                RenderPass::Automatic => sorted.solids.push(handle),
            }
        }
        sorted
    }
}
