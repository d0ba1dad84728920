use std::collections::HashMap;

use crate::{
    data_structures::{
        material::Material,
        texture::Texture,
        vertex::{Vertex, VertexLayout},
    },
    driver::PrimitiveType,
};

/// The render state a pipeline is baked for.
///
/// wgpu pipelines are immutable, so every distinct combination of material flags
/// and topology gets its own pipeline, created on first use.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub topology: wgpu::PrimitiveTopology,
    pub wireframe: bool,
    pub backface_culling: bool,
    pub transparent: bool,
    pub z_buffer: bool,
    pub z_write: bool,
}

impl PipelineKey {
    pub fn new(material: &Material, primitive_type: PrimitiveType) -> Self {
        Self {
            topology: primitive_type.topology(),
            wireframe: material.wireframe,
            backface_culling: material.backface_culling,
            transparent: material.is_transparent(),
            z_buffer: material.z_buffer,
            z_write: material.z_write,
        }
    }
}

/**
 * The per-draw uniform.
 *
 * Uniforms require 16 byte alignment, so the flag is followed by padding up to
 * the next multiple of 16.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    world_view_proj: [[f32; 4]; 4],
    decode_srgb: u32,
    _padding: [u32; 3],
}

impl SceneUniform {
    pub fn new(world_view_proj: cgmath::Matrix4<f32>, decode_srgb: bool) -> Self {
        Self {
            world_view_proj: world_view_proj.into(),
            decode_srgb: decode_srgb as u32,
            _padding: [0; 3],
        }
    }
}

/// Lazily created scene pipelines sharing one shader and one layout.
pub struct ScenePipelines {
    shader: wgpu::ShaderModule,
    layout: wgpu::PipelineLayout,
    pub bind_group_layout: wgpu::BindGroupLayout,
    color_format: wgpu::TextureFormat,
    line_mode_supported: bool,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
}

impl ScenePipelines {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        line_mode_supported: bool,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
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
            label: Some("scene_bind_group_layout"),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });
        Self {
            shader,
            layout,
            bind_group_layout,
            color_format,
            line_mode_supported,
            pipelines: HashMap::new(),
        }
    }

    /// Wireframe is only honoured if the adapter supports line polygon mode.
    pub fn supports_wireframe(&self) -> bool {
        self.line_mode_supported
    }

    pub fn ensure(&mut self, device: &wgpu::Device, key: PipelineKey) {
        if self.pipelines.contains_key(&key) {
            return;
        }
        log::debug!("creating scene pipeline for {:?}", key);
        let polygon_mode = if key.wireframe && self.line_mode_supported {
            wgpu::PolygonMode::Line
        } else {
            wgpu::PolygonMode::Fill
        };
        let blend = if key.transparent {
            wgpu::BlendState::ALPHA_BLENDING
        } else {
            wgpu::BlendState::REPLACE
        };
        let pipeline = mk_render_pipeline(
            device,
            &self.layout,
            self.color_format,
            Some(blend),
            wgpu::DepthStencilState {
                format: Texture::DEPTH_FORMAT,
                depth_write_enabled: key.z_buffer && key.z_write,
                depth_compare: if key.z_buffer {
                    wgpu::CompareFunction::LessEqual
                } else {
                    wgpu::CompareFunction::Always
                },
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            },
            wgpu::PrimitiveState {
                topology: key.topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: key.backface_culling.then_some(wgpu::Face::Back),
                polygon_mode,
                unclipped_depth: false,
                conservative: false,
            },
            &[Vertex::desc()],
            &self.shader,
        );
        self.pipelines.insert(key, pipeline);
    }

    pub fn get(&self, key: &PipelineKey) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(key)
    }

    pub fn bind_group(&self, device: &wgpu::Device, uniform: &wgpu::Buffer) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            }],
            label: Some("scene_bind_group"),
        })
    }
}

#[allow(clippy::too_many_arguments)]
pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth_stencil: wgpu::DepthStencilState,
    primitive: wgpu::PrimitiveState,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: &wgpu::ShaderModule,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some("Render Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive,
        depth_stencil: Some(depth_stencil),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview_mask: None,
    })
}
