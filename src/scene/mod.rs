//! Scene graph.
//!
//! The [`manager::SceneManager`] owns every node in an arena and hands out
//! [`node::NodeHandle`]s. Each frame it runs three phases over the tree:
//!
//! 1. animate: animators update the relative transforms, absolute transforms are
//!    recomputed top down
//! 2. register: nodes decide whether they want to be drawn and enqueue themselves
//! 3. render: queued nodes are drawn pass by pass through a
//!    [`VideoDriver`](crate::driver::VideoDriver)
//!
//! Nodes only implement [`node::SceneNode`]; hierarchy, visibility and transforms
//! live in the manager's [`node::NodeBase`].

pub mod animator;
pub mod camera;
pub mod manager;
pub mod node;
pub mod tetrahedron;
