//! A custom scene node drawing a four-sided solid with coloured corners.
//!
//! The node owns everything it draws: four vertices, one material and the bounding
//! box of the vertices. Hierarchy, animation and culling are handled by the scene
//! manager, so the node only has to register itself and issue a single draw call.

use std::any::Any;

use cgmath::{Matrix4, Vector3};

use crate::{
    data_structures::{aabb::Aabb, colour::Colour, material::Material, vertex::Vertex},
    driver::{Indices, PrimitiveType, TransformState, VertexType, VideoDriver},
    render::RenderPass,
    scene::node::{RegistrationPass, SceneNode},
};

/// Four triangles, each one leaving out one of the corners.
const INDICES: [u16; 12] = [0, 2, 3, 2, 1, 3, 1, 0, 3, 2, 0, 1];

const VERTICES: [Vertex; 4] = [
    Vertex::new(
        0.0,
        0.0,
        10.0,
        1.0,
        1.0,
        0.0,
        Colour::from_argb(255, 0, 255, 255),
        0.0,
        1.0,
    ),
    Vertex::new(
        10.0,
        0.0,
        -10.0,
        1.0,
        0.0,
        0.0,
        Colour::from_argb(255, 255, 0, 255),
        1.0,
        1.0,
    ),
    Vertex::new(
        0.0,
        20.0,
        0.0,
        0.0,
        1.0,
        1.0,
        Colour::from_argb(255, 255, 255, 0),
        1.0,
        0.0,
    ),
    Vertex::new(
        -10.0,
        0.0,
        -10.0,
        0.0,
        0.0,
        1.0,
        Colour::from_argb(255, 0, 255, 0),
        0.0,
        0.0,
    ),
];

#[derive(Clone, Debug, PartialEq)]
pub struct TetrahedronNode {
    vertices: [Vertex; 4],
    material: Material,
    bbox: Aabb,
}

impl TetrahedronNode {
    pub const PRIMITIVE_COUNT: u32 = (INDICES.len() / 3) as u32;

    pub fn new() -> Self {
        let vertices = VERTICES;
        let material = Material {
            wireframe: false,
            lighting: false,
            ..Material::default()
        };

        let mut bbox = Aabb::default();
        bbox.reset(Vector3::from(vertices[0].position));
        vertices[1..]
            .iter()
            .for_each(|vertex| bbox.add_internal_point(Vector3::from(vertex.position)));

        Self {
            vertices,
            material,
            bbox,
        }
    }

    pub fn vertices(&self) -> &[Vertex; 4] {
        &self.vertices
    }

    pub fn indices() -> &'static [u16] {
        &INDICES
    }
}

impl Default for TetrahedronNode {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneNode for TetrahedronNode {
    fn on_register_scene_node(&self, pass: &mut RegistrationPass<'_>) {
        if pass.is_visible() {
            pass.register_for_rendering(RenderPass::Automatic);
        }
        pass.register_children();
    }

    fn render(&self, absolute: &Matrix4<f32>, driver: &mut dyn VideoDriver) {
        driver.set_material(&self.material);
        driver.set_transform(TransformState::World, absolute);
        driver.draw_vertex_primitive_list(
            &self.vertices,
            Indices::U16(&INDICES),
            Self::PRIMITIVE_COUNT,
            VertexType::Standard,
            PrimitiveType::Triangles,
        );
    }

    fn bounding_box(&self) -> &Aabb {
        &self.bbox
    }

    fn material_count(&self) -> usize {
        1
    }

    // there is only one material, so every index gets it
    fn material(&self, _index: usize) -> &Material {
        &self.material
    }

    fn material_mut(&mut self, _index: usize) -> Option<&mut Material> {
        Some(&mut self.material)
    }

    fn type_name(&self) -> &'static str {
        "tetrahedron"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
