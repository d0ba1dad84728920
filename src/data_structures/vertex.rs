//! The standard vertex format.
//!
//! Vertices are stored directly in GPU memory, so every vertex type also has to
//! describe its byte layout through [`VertexLayout`].

use crate::data_structures::colour::Colour;

/// Describes the byte layout of a vertex type for a render pipeline.
pub trait VertexLayout {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

/// A vertex with position, normal, colour and one set of texture coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub colour: Colour,
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Create a vertex from its components, in the order position, normal,
    /// colour, texture coordinates.
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        x: f32,
        y: f32,
        z: f32,
        nx: f32,
        ny: f32,
        nz: f32,
        colour: Colour,
        tu: f32,
        tv: f32,
    ) -> Self {
        Self {
            position: [x, y, z],
            normal: [nx, ny, nz],
            colour,
            tex_coords: [tu, tv],
        }
    }

    pub fn position(&self) -> cgmath::Vector3<f32> {
        self.position.into()
    }

    pub fn normal(&self) -> cgmath::Vector3<f32> {
        self.normal.into()
    }
}

/**
 * offset: position, normal and colour are packed back to back.
 * stride: length of a vertex
 *
 * The colour is read as `Unorm8x4`, so the shader receives channels in `0.0..=1.0`.
 */
impl VertexLayout for Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Unorm8x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 7]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}
