//! The wgpu driver.
//!
//! Calls made between `begin_scene` and `end_scene` are collected into a
//! [`PendingFrame`]. `end_scene` acquires the surface texture, uploads the vertex,
//! index and uniform data of every call, and replays them in order inside a single
//! render pass. Geometry and 2D rectangles share that pass, so whatever was
//! submitted later is drawn on top unless depth testing says otherwise.

use anyhow::{Context as _, bail};
use cgmath::Matrix4;
use log::{debug, trace, warn};
use wgpu::util::DeviceExt;

use crate::{
    context::Context,
    data_structures::{colour::Colour, material::Material, vertex::Vertex},
    driver::{
        DriverState, Indices, PrimitiveType, Rect, TransformState, VertexType, VideoDriver,
        validate_draw,
    },
    pipelines::{
        basic::{PipelineKey, ScenePipelines, SceneUniform},
        overlay::{self, OverlayPipeline, OverlayVertex, QUAD_INDICES},
    },
    time::Timer,
};

enum IndexData {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

struct PendingDraw {
    key: PipelineKey,
    uniform: SceneUniform,
    vertices: Vec<Vertex>,
    indices: IndexData,
    index_count: u32,
}

enum PendingOp {
    Draw(PendingDraw),
    Rectangle(Colour, Rect),
}

struct PendingFrame {
    clear_colour: Option<wgpu::Color>,
    clear_depth: bool,
    ops: Vec<PendingOp>,
}

/// GPU buffers of one draw call. They only need to live until the frame is submitted.
struct UploadedDraw {
    key: PipelineKey,
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_format: wgpu::IndexFormat,
    index_count: u32,
    bind_group: wgpu::BindGroup,
}

enum UploadedOp {
    Draw(UploadedDraw),
    // first vertex of the rectangle inside the shared overlay vertex buffer
    Rectangle(i32),
}

pub struct GpuDriver {
    ctx: Context,
    state: DriverState,
    timer: Timer,
    name: String,
    scene_pipelines: ScenePipelines,
    overlay: OverlayPipeline,
    frame: Option<PendingFrame>,
    warned_wireframe: bool,
}

impl GpuDriver {
    pub fn new(ctx: Context) -> Self {
        let scene_pipelines =
            ScenePipelines::new(&ctx.device, ctx.config.format, ctx.line_mode_supported);
        let overlay = OverlayPipeline::new(&ctx.device, ctx.config.format);
        let name = format!("WebGPU {}", ctx.adapter_name);
        Self {
            ctx,
            state: DriverState::new(),
            timer: Timer::new(),
            name,
            scene_pipelines,
            overlay,
            frame: None,
            warned_wireframe: false,
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    fn decode_srgb(&self) -> bool {
        self.ctx.config.format.is_srgb()
    }

    fn upload(&mut self, ops: Vec<PendingOp>) -> (Vec<UploadedOp>, Option<wgpu::Buffer>) {
        let device = &self.ctx.device;
        let mut rect_vertices: Vec<OverlayVertex> = Vec::new();
        let mut uploaded = Vec::with_capacity(ops.len());
        for op in ops {
            match op {
                PendingOp::Draw(draw) => {
                    self.scene_pipelines.ensure(device, draw.key);
                    let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Scene Vertex Buffer"),
                        contents: bytemuck::cast_slice(&draw.vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    });
                    let (contents, index_format): (&[u8], _) = match &draw.indices {
                        IndexData::U16(indices) => {
                            (bytemuck::cast_slice(indices), wgpu::IndexFormat::Uint16)
                        }
                        IndexData::U32(indices) => {
                            (bytemuck::cast_slice(indices), wgpu::IndexFormat::Uint32)
                        }
                    };
                    let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Scene Index Buffer"),
                        contents,
                        usage: wgpu::BufferUsages::INDEX,
                    });
                    let uniform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Scene Uniform Buffer"),
                        contents: bytemuck::cast_slice(&[draw.uniform]),
                        usage: wgpu::BufferUsages::UNIFORM,
                    });
                    let bind_group = self.scene_pipelines.bind_group(device, &uniform);
                    uploaded.push(UploadedOp::Draw(UploadedDraw {
                        key: draw.key,
                        vertex,
                        index,
                        index_format,
                        index_count: draw.index_count,
                        bind_group,
                    }));
                }
                PendingOp::Rectangle(colour, rect) => {
                    uploaded.push(UploadedOp::Rectangle(rect_vertices.len() as i32));
                    rect_vertices.extend(overlay::quad(colour, rect));
                }
            }
        }
        let rect_buffer = (!rect_vertices.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Overlay Vertex Buffer"),
                contents: bytemuck::cast_slice(&rect_vertices),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });
        (uploaded, rect_buffer)
    }
}

impl VideoDriver for GpuDriver {
    fn begin_scene(
        &mut self,
        clear_back_buffer: bool,
        clear_z_buffer: bool,
        colour: Colour,
    ) -> anyhow::Result<()> {
        if self.frame.is_some() {
            bail!("begin_scene called twice without end_scene");
        }
        let clear_colour = if self.decode_srgb() {
            colour.into()
        } else {
            let [r, g, b, a] = colour.to_array().map(|c| c as f64 / 255.0);
            wgpu::Color { r, g, b, a }
        };
        self.frame = Some(PendingFrame {
            clear_colour: clear_back_buffer.then_some(clear_colour),
            clear_depth: clear_z_buffer,
            ops: Vec::new(),
        });
        Ok(())
    }

    fn end_scene(&mut self) -> anyhow::Result<()> {
        let frame = self
            .frame
            .take()
            .context("end_scene called without begin_scene")?;

        let output = match self.ctx.surface.get_current_texture() {
            Ok(output) => output,
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("surface lost or outdated, reconfiguring");
                self.ctx.reconfigure();
                self.state.drop_frame(self.timer.time_ms());
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("timed out acquiring the surface texture, skipping frame");
                self.state.drop_frame(self.timer.time_ms());
                return Ok(());
            }
            Err(e) => return Err(e).context("failed to acquire the surface texture"),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.overlay
            .write_uniform(&self.ctx.queue, self.screen_size(), self.decode_srgb());
        let (ops, rect_buffer) = self.upload(frame.ops);

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: match frame.clear_colour {
                            Some(colour) => wgpu::LoadOp::Clear(colour),
                            None => wgpu::LoadOp::Load,
                        },
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: if frame.clear_depth {
                            wgpu::LoadOp::Clear(1.0)
                        } else {
                            wgpu::LoadOp::Load
                        },
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            for op in &ops {
                match op {
                    UploadedOp::Draw(draw) => {
                        let Some(pipeline) = self.scene_pipelines.get(&draw.key) else {
                            continue;
                        };
                        render_pass.set_pipeline(pipeline);
                        render_pass.set_bind_group(0, &draw.bind_group, &[]);
                        render_pass.set_vertex_buffer(0, draw.vertex.slice(..));
                        render_pass.set_index_buffer(draw.index.slice(..), draw.index_format);
                        render_pass.draw_indexed(0..draw.index_count, 0, 0..1);
                    }
                    UploadedOp::Rectangle(base_vertex) => {
                        let Some(rect_buffer) = &rect_buffer else {
                            continue;
                        };
                        render_pass.set_pipeline(&self.overlay.pipeline);
                        render_pass.set_bind_group(0, &self.overlay.bind_group, &[]);
                        render_pass.set_vertex_buffer(0, rect_buffer.slice(..));
                        render_pass.set_index_buffer(
                            self.overlay.index_buffer.slice(..),
                            wgpu::IndexFormat::Uint16,
                        );
                        render_pass.draw_indexed(0..QUAD_INDICES.len() as u32, *base_vertex, 0..1);
                    }
                }
            }
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        self.ctx.window.pre_present_notify();
        output.present();

        self.state.finish_frame(self.timer.time_ms());
        Ok(())
    }

    fn set_material(&mut self, material: &Material) {
        self.state.material = material.clone();
    }

    fn set_transform(&mut self, state: TransformState, matrix: &Matrix4<f32>) {
        self.state.set_transform(state, matrix);
    }

    fn transform(&self, state: TransformState) -> Matrix4<f32> {
        self.state.transform(state)
    }

    fn draw_vertex_primitive_list(
        &mut self,
        vertices: &[Vertex],
        indices: Indices<'_>,
        primitive_count: u32,
        vertex_type: VertexType,
        primitive_type: PrimitiveType,
    ) {
        let VertexType::Standard = vertex_type;
        if !validate_draw(vertices, &indices, primitive_count, primitive_type) {
            return;
        }
        if self.state.material.wireframe
            && !self.scene_pipelines.supports_wireframe()
            && !self.warned_wireframe
        {
            warn!("The adapter does not support wireframe rendering; drawing filled polygons.");
            self.warned_wireframe = true;
        }
        let decode_srgb = self.decode_srgb();
        let Some(frame) = self.frame.as_mut() else {
            warn!("Draw call outside of begin_scene/end_scene was dropped.");
            return;
        };
        trace!(
            "queueing draw: {} vertices, {} {:?} primitives",
            vertices.len(),
            primitive_count,
            primitive_type
        );
        let index_count = primitive_type.index_count(primitive_count);
        frame.ops.push(PendingOp::Draw(PendingDraw {
            key: PipelineKey::new(&self.state.material, primitive_type),
            uniform: SceneUniform::new(self.state.world_view_projection(), decode_srgb),
            vertices: vertices.to_vec(),
            indices: match indices {
                Indices::U16(indices) => IndexData::U16(indices.to_vec()),
                Indices::U32(indices) => IndexData::U32(indices.to_vec()),
            },
            index_count,
        }));
        self.state.count_primitives(primitive_count);
    }

    fn draw_2d_rectangle(&mut self, colour: Colour, rect: Rect) {
        if !rect.is_valid() {
            return;
        }
        match self.frame.as_mut() {
            Some(frame) => frame.ops.push(PendingOp::Rectangle(colour, rect)),
            None => warn!("2D rectangle outside of begin_scene/end_scene was dropped."),
        }
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
    }

    fn screen_size(&self) -> (u32, u32) {
        (self.ctx.config.width, self.ctx.config.height)
    }

    fn fps(&self) -> u32 {
        self.state.fps.fps()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn primitive_count_drawn(&self) -> u32 {
        self.state.primitives_last_frame()
    }
}
