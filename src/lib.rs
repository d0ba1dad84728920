//! A small scene engine on wgpu and winit.
//!
//! Scene nodes implement [`scene::node::SceneNode`] and are owned by a
//! [`scene::manager::SceneManager`]. Every frame the manager animates the tree,
//! lets the nodes register for rendering and renders them through a
//! [`driver::VideoDriver`]. [`flow::run`] opens a window and drives an application
//! implementing [`flow::Flow`].
//!
//! [`scene::tetrahedron::TetrahedronNode`] is a custom node drawing its own vertex
//! data and is the main user of that contract.

pub mod config;
pub mod context;
pub mod data_structures;
pub mod device;
pub mod driver;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod scene;
pub mod time;

pub use cgmath;
