//! Engine data structures: vertices, colours, materials, bounding boxes and transforms.
//!
//! - `aabb` is the axis-aligned bounding box used for culling
//! - `colour` is an 8-bit-per-channel RGBA colour
//! - `frustum` holds the six clip planes of a camera, used to cull boxes
//! - `material` is the flags descriptor a node hands to the driver before drawing
//! - `texture` wraps the depth buffer of the GPU driver
//! - `transform` holds the relative position, rotation and scale of a scene node
//! - `vertex` is the standard vertex format uploaded to vertex buffers

pub mod aabb;
pub mod colour;
pub mod frustum;
pub mod material;
pub mod texture;
pub mod transform;
pub mod vertex;
