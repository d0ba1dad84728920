//! Video drivers.
//!
//! Scene nodes never talk to wgpu directly. During their render callback they set a
//! [`Material`] and a world transformation on a [`VideoDriver`] and hand it vertex
//! and index data. Two drivers exist:
//!
//! - [`gpu::GpuDriver`] batches the calls of a frame and replays them into a wgpu
//!   render pass at [`VideoDriver::end_scene`]
//! - [`null::NullDriver`] renders nothing and records every call, which makes node
//!   and scene behaviour observable without a window or a GPU

pub mod gpu;
pub mod null;

use cgmath::{Matrix4, SquareMatrix};
use log::warn;

use crate::{
    data_structures::{colour::Colour, material::Material, vertex::Vertex},
    time::FpsCounter,
};

/// The matrices a driver keeps for vertex transformation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TransformState {
    World,
    View,
    Projection,
}

impl TransformState {
    pub const ALL: [TransformState; 3] = [
        TransformState::World,
        TransformState::View,
        TransformState::Projection,
    ];

    fn index(self) -> usize {
        match self {
            TransformState::World => 0,
            TransformState::View => 1,
            TransformState::Projection => 2,
        }
    }
}

/// Layout of the vertices passed to a draw call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum VertexType {
    /// [`Vertex`]: position, normal, colour, one set of texture coordinates.
    #[default]
    Standard,
}

/// How indices are assembled into primitives.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Points,
    Lines,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
}

impl PrimitiveType {
    /// Number of indices consumed by `primitive_count` primitives, saturating at
    /// `u32::MAX`.
    pub fn index_count(self, primitive_count: u32) -> u32 {
        self.checked_index_count(primitive_count)
            .unwrap_or(u32::MAX)
    }

    /// Like [`index_count`](Self::index_count) but `None` if the count does not fit in a `u32`.
    pub fn checked_index_count(self, primitive_count: u32) -> Option<u32> {
        if primitive_count == 0 {
            return Some(0);
        }
        match self {
            PrimitiveType::Points => Some(primitive_count),
            PrimitiveType::Lines => primitive_count.checked_mul(2),
            PrimitiveType::LineStrip => primitive_count.checked_add(1),
            PrimitiveType::Triangles => primitive_count.checked_mul(3),
            PrimitiveType::TriangleStrip => primitive_count.checked_add(2),
        }
    }

    pub fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            PrimitiveType::Points => wgpu::PrimitiveTopology::PointList,
            PrimitiveType::Lines => wgpu::PrimitiveTopology::LineList,
            PrimitiveType::LineStrip => wgpu::PrimitiveTopology::LineStrip,
            PrimitiveType::Triangles => wgpu::PrimitiveTopology::TriangleList,
            PrimitiveType::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
        }
    }
}

/// Width of a single index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IndexType {
    Bit16,
    Bit32,
}

impl From<IndexType> for wgpu::IndexFormat {
    fn from(index_type: IndexType) -> Self {
        match index_type {
            IndexType::Bit16 => wgpu::IndexFormat::Uint16,
            IndexType::Bit32 => wgpu::IndexFormat::Uint32,
        }
    }
}

/// Borrowed index data; the variant carries the index width.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Indices<'a> {
    U16(&'a [u16]),
    U32(&'a [u32]),
}

impl Indices<'_> {
    pub fn len(&self) -> usize {
        match self {
            Indices::U16(indices) => indices.len(),
            Indices::U32(indices) => indices.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index_type(&self) -> IndexType {
        match self {
            Indices::U16(_) => IndexType::Bit16,
            Indices::U32(_) => IndexType::Bit32,
        }
    }

    pub fn max_index(&self) -> Option<u32> {
        match self {
            Indices::U16(indices) => indices.iter().max().map(|&i| i as u32),
            Indices::U32(indices) => indices.iter().max().copied(),
        }
    }

    pub fn to_u32(&self) -> Vec<u32> {
        match self {
            Indices::U16(indices) => indices.iter().map(|&i| i as u32).collect(),
            Indices::U32(indices) => indices.to_vec(),
        }
    }
}

/// Screen-space rectangle in pixels. `(x0, y0)` is the upper left corner, the
/// lower right corner `(x1, y1)` is exclusive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Rect {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    pub fn is_valid(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }
}

/// Everything a scene node and a host application can ask of the rendering backend.
///
/// A frame is book-ended by [`begin_scene`](Self::begin_scene) and
/// [`end_scene`](Self::end_scene). Draw calls in between use the material and
/// transformations set most recently.
pub trait VideoDriver {
    /// Start a frame, optionally clearing colour and depth.
    fn begin_scene(
        &mut self,
        clear_back_buffer: bool,
        clear_z_buffer: bool,
        colour: Colour,
    ) -> anyhow::Result<()>;

    /// Finish the frame and present it.
    fn end_scene(&mut self) -> anyhow::Result<()>;

    fn set_material(&mut self, material: &Material);

    fn set_transform(&mut self, state: TransformState, matrix: &Matrix4<f32>);

    fn transform(&self, state: TransformState) -> Matrix4<f32>;

    /// Draw `primitive_count` primitives assembled from `indices` into `vertices`.
    fn draw_vertex_primitive_list(
        &mut self,
        vertices: &[Vertex],
        indices: Indices<'_>,
        primitive_count: u32,
        vertex_type: VertexType,
        primitive_type: PrimitiveType,
    );

    /// Fill a screen-space rectangle, ignoring the 3D transformations.
    fn draw_2d_rectangle(&mut self, colour: Colour, rect: Rect);

    /// React to a resized window.
    fn on_resize(&mut self, width: u32, height: u32);

    fn screen_size(&self) -> (u32, u32);

    fn fps(&self) -> u32;

    fn name(&self) -> &str;

    /// Primitives drawn during the last completed frame.
    fn primitive_count_drawn(&self) -> u32;
}

/// Bookkeeping shared by all drivers.
#[derive(Debug, Clone)]
pub(crate) struct DriverState {
    transforms: [Matrix4<f32>; 3],
    pub(crate) material: Material,
    pub(crate) fps: FpsCounter,
    primitives_this_frame: u32,
    primitives_last_frame: u32,
}

impl DriverState {
    pub(crate) fn new() -> Self {
        Self {
            transforms: [Matrix4::identity(); 3],
            material: Material::default(),
            fps: FpsCounter::new(),
            primitives_this_frame: 0,
            primitives_last_frame: 0,
        }
    }

    pub(crate) fn transform(&self, state: TransformState) -> Matrix4<f32> {
        self.transforms[state.index()]
    }

    pub(crate) fn set_transform(&mut self, state: TransformState, matrix: &Matrix4<f32>) {
        self.transforms[state.index()] = *matrix;
    }

    /// `projection * view * world`, the matrix the vertex shader applies.
    pub(crate) fn world_view_projection(&self) -> Matrix4<f32> {
        self.transform(TransformState::Projection)
            * self.transform(TransformState::View)
            * self.transform(TransformState::World)
    }

    pub(crate) fn count_primitives(&mut self, primitive_count: u32) {
        self.primitives_this_frame += primitive_count;
    }

    pub(crate) fn primitives_last_frame(&self) -> u32 {
        self.primitives_last_frame
    }

    pub(crate) fn finish_frame(&mut self, now_ms: u32) {
        self.primitives_last_frame = self.primitives_this_frame;
        self.primitives_this_frame = 0;
        self.fps.register_frame(now_ms);
    }

    /// Ends a frame that never reached the screen. Nothing counts as drawn.
    pub(crate) fn drop_frame(&mut self, now_ms: u32) {
        self.primitives_this_frame = 0;
        self.finish_frame(now_ms);
    }
}

/// Rejects draw calls whose indices cannot be assembled into the requested
/// primitives or point past the vertex list.
pub(crate) fn validate_draw(
    vertices: &[Vertex],
    indices: &Indices<'_>,
    primitive_count: u32,
    primitive_type: PrimitiveType,
) -> bool {
    if vertices.is_empty() || primitive_count == 0 {
        return false;
    }
    let Some(needed) = primitive_type.checked_index_count(primitive_count) else {
        warn!(
            "Draw call wants {} {:?} primitives, more than a single call can index.",
            primitive_count, primitive_type
        );
        return false;
    };
    let needed = needed as usize;
    if indices.len() < needed {
        warn!(
            "Draw call wants {} {:?} primitives ({} indices) but only {} indices were passed.",
            primitive_count,
            primitive_type,
            needed,
            indices.len()
        );
        return false;
    }
    match indices.max_index() {
        Some(max) if max as usize >= vertices.len() => {
            warn!(
                "Index {} is out of bounds for a vertex list of len {}.",
                max,
                vertices.len()
            );
            false
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_frames_reset_the_primitive_count() {
        let mut state = DriverState::new();
        state.count_primitives(4);
        state.finish_frame(0);
        assert_eq!(state.primitives_last_frame(), 4);

        state.count_primitives(4);
        state.drop_frame(10);
        assert_eq!(state.primitives_last_frame(), 0);

        state.count_primitives(4);
        state.finish_frame(20);
        assert_eq!(state.primitives_last_frame(), 4);
    }

    #[test]
    fn dropped_frames_still_count_towards_fps() {
        let mut state = DriverState::new();
        state.finish_frame(0);
        state.drop_frame(750);
        state.finish_frame(1500);
        // 3 frames in 1.5 seconds
        assert_eq!(state.fps.fps(), 2);
    }
}
