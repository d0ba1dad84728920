//! A driver without output.
//!
//! The null driver keeps the same state as a real driver (transformations,
//! material, frame counters) but instead of rendering it appends every call to a
//! command list. Tests and headless devices use it to observe what the scene sends
//! to the backend. `begin_scene` starts a fresh list, so only the current frame is
//! kept.

use cgmath::Matrix4;
use log::trace;

use crate::{
    data_structures::{colour::Colour, material::Material, vertex::Vertex},
    driver::{
        DriverState, IndexType, Indices, PrimitiveType, Rect, TransformState, VertexType,
        VideoDriver, validate_draw,
    },
    time::Timer,
};

/// A draw call as it reached the driver, together with the state it was issued in.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub material: Material,
    pub world: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub index_type: IndexType,
    pub primitive_count: u32,
    pub vertex_type: VertexType,
    pub primitive_type: PrimitiveType,
}

impl DrawCall {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Indices actually consumed by the primitives.
    pub fn index_count(&self) -> u32 {
        self.primitive_type.index_count(self.primitive_count)
    }
}

/// One recorded driver call.
#[derive(Clone, Debug, PartialEq)]
pub enum DriverCommand {
    BeginScene {
        clear_back_buffer: bool,
        clear_z_buffer: bool,
        colour: Colour,
    },
    EndScene,
    SetMaterial(Material),
    SetTransform(TransformState, Matrix4<f32>),
    Draw(Box<DrawCall>),
    Rectangle(Colour, Rect),
}

pub struct NullDriver {
    state: DriverState,
    timer: Timer,
    screen_size: (u32, u32),
    commands: Vec<DriverCommand>,
    frames: u64,
}

impl NullDriver {
    pub const NAME: &'static str = "Null Device";

    pub fn new(screen_size: (u32, u32)) -> Self {
        Self {
            state: DriverState::new(),
            timer: Timer::new(),
            screen_size,
            commands: Vec::new(),
            frames: 0,
        }
    }

    /// Calls recorded since the last `begin_scene`, creation or
    /// [`take_commands`](Self::take_commands), whichever came last.
    pub fn commands(&self) -> &[DriverCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DriverCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn draw_calls(&self) -> impl Iterator<Item = &DrawCall> {
        self.commands.iter().filter_map(|command| match command {
            DriverCommand::Draw(draw) => Some(draw.as_ref()),
            _ => None,
        })
    }

    pub fn current_material(&self) -> &Material {
        &self.state.material
    }

    /// Number of completed `begin_scene`/`end_scene` pairs.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl VideoDriver for NullDriver {
    fn begin_scene(
        &mut self,
        clear_back_buffer: bool,
        clear_z_buffer: bool,
        colour: Colour,
    ) -> anyhow::Result<()> {
        self.commands.clear();
        self.commands.push(DriverCommand::BeginScene {
            clear_back_buffer,
            clear_z_buffer,
            colour,
        });
        Ok(())
    }

    fn end_scene(&mut self) -> anyhow::Result<()> {
        self.commands.push(DriverCommand::EndScene);
        self.state.finish_frame(self.timer.time_ms());
        self.frames += 1;
        Ok(())
    }

    fn set_material(&mut self, material: &Material) {
        self.state.material = material.clone();
        self.commands.push(DriverCommand::SetMaterial(material.clone()));
    }

    fn set_transform(&mut self, state: TransformState, matrix: &Matrix4<f32>) {
        self.state.set_transform(state, matrix);
        self.commands.push(DriverCommand::SetTransform(state, *matrix));
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
        if !validate_draw(vertices, &indices, primitive_count, primitive_type) {
            return;
        }
        trace!(
            "null draw: {} vertices, {} {:?} primitives",
            vertices.len(),
            primitive_count,
            primitive_type
        );
        self.state.count_primitives(primitive_count);
        self.commands.push(DriverCommand::Draw(Box::new(DrawCall {
            material: self.state.material.clone(),
            world: self.state.transform(TransformState::World),
            view: self.state.transform(TransformState::View),
            projection: self.state.transform(TransformState::Projection),
            vertices: vertices.to_vec(),
            indices: indices.to_u32(),
            index_type: indices.index_type(),
            primitive_count,
            vertex_type,
            primitive_type,
        })));
    }

    fn draw_2d_rectangle(&mut self, colour: Colour, rect: Rect) {
        if rect.is_valid() {
            self.commands.push(DriverCommand::Rectangle(colour, rect));
        }
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        self.screen_size = (width, height);
    }

    fn screen_size(&self) -> (u32, u32) {
        self.screen_size
    }

    fn fps(&self) -> u32 {
        self.state.fps.fps()
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn primitive_count_drawn(&self) -> u32 {
        self.state.primitives_last_frame()
    }
}
