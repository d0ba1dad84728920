use wgpu::util::DeviceExt;

use crate::{
    data_structures::{colour::Colour, texture::Texture, vertex::VertexLayout},
    driver::Rect,
    pipelines::basic::mk_render_pipeline,
};

/// A corner of a screen-space rectangle, in pixels.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OverlayVertex {
    pub position: [f32; 2],
    pub colour: Colour,
}

impl VertexLayout for OverlayVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<OverlayVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Unorm8x4,
                },
            ],
        }
    }
}

/// Two triangles per rectangle.
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 1, 3];

/// The four corners of `rect` in the order expected by [`QUAD_INDICES`].
pub fn quad(colour: Colour, rect: Rect) -> [OverlayVertex; 4] {
    let (x0, y0, x1, y1) = (rect.x0 as f32, rect.y0 as f32, rect.x1 as f32, rect.y1 as f32);
    [
        OverlayVertex { position: [x0, y1], colour },
        OverlayVertex { position: [x1, y1], colour },
        OverlayVertex { position: [x0, y0], colour },
        OverlayVertex { position: [x1, y0], colour },
    ]
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct OverlayUniform {
    screen_size: [f32; 2],
    decode_srgb: u32,
    _padding: u32,
}

/// Pipeline and screen-size uniform for 2D rectangles.
///
/// The pass it runs in has a depth attachment, so the pipeline declares one too,
/// but it neither tests nor writes depth: rectangles land in call order.
pub struct OverlayPipeline {
    pub pipeline: wgpu::RenderPipeline,
    uniform: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub index_buffer: wgpu::Buffer,
}

impl OverlayPipeline {
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Overlay Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("overlay.wgsl").into()),
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("overlay_bind_group_layout"),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Overlay Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });
        let pipeline = mk_render_pipeline(
            device,
            &layout,
            color_format,
            Some(wgpu::BlendState::ALPHA_BLENDING),
            wgpu::DepthStencilState {
                format: Texture::DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            },
            wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            &[OverlayVertex::desc()],
            &shader,
        );
        let uniform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Uniform Buffer"),
            contents: bytemuck::cast_slice(&[OverlayUniform {
                screen_size: [1.0, 1.0],
                decode_srgb: 0,
                _padding: 0,
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            }],
            label: Some("overlay_bind_group"),
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Index Buffer"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            pipeline,
            uniform,
            bind_group,
            index_buffer,
        }
    }

    pub fn write_uniform(&self, queue: &wgpu::Queue, screen_size: (u32, u32), decode_srgb: bool) {
        let uniform = OverlayUniform {
            screen_size: [screen_size.0.max(1) as f32, screen_size.1.max(1) as f32],
            decode_srgb: decode_srgb as u32,
            _padding: 0,
        };
        queue.write_buffer(&self.uniform, 0, bytemuck::cast_slice(&[uniform]));
    }
}
