use scene_ngin::{
    cgmath::{Matrix4, SquareMatrix, Vector3},
    data_structures::{colour::Colour, material::MaterialType},
    driver::{
        IndexType, PrimitiveType, TransformState, VertexType, VideoDriver,
        null::{DriverCommand, NullDriver},
    },
    render::{RenderPass, RenderQueue},
    scene::{
        node::{RegistrationPass, SceneNode},
        tetrahedron::TetrahedronNode,
    },
};

use crate::common::test_utils::{NODE_ID, null_driver, scene_with_tetrahedron};

mod common;

#[test]
fn bounding_box_encloses_the_four_vertices() {
    let node = TetrahedronNode::new();
    let bbox = node.bounding_box();
    assert_eq!(bbox.min, Vector3::new(-10.0, 0.0, -10.0));
    assert_eq!(bbox.max, Vector3::new(10.0, 20.0, 10.0));
    for vertex in node.vertices() {
        assert!(bbox.is_point_inside(Vector3::from(vertex.position)));
    }
}

#[test]
fn bounding_box_is_stable_across_queries() {
    let node = TetrahedronNode::new();
    let first = *node.bounding_box();
    let mut driver = null_driver();
    node.render(&Matrix4::identity(), &mut driver);
    let second = *node.bounding_box();
    assert_eq!(first, second);
}

#[test]
fn vertices_have_the_expected_colours() {
    let node = TetrahedronNode::new();
    let colours: Vec<Colour> = node.vertices().iter().map(|v| v.colour).collect();
    assert_eq!(
        colours,
        vec![
            Colour::new(0, 255, 255, 255),
            Colour::new(255, 0, 255, 255),
            Colour::new(255, 255, 0, 255),
            Colour::new(0, 255, 0, 255),
        ]
    );
    assert_eq!(node.vertices()[1].normal, [1.0, 0.0, 0.0]);
    assert_eq!(node.vertices()[3].tex_coords, [0.0, 0.0]);
}

#[test]
fn has_one_unlit_filled_material() {
    let mut node = TetrahedronNode::new();
    assert_eq!(node.material_count(), 1);

    let material = node.material(0);
    assert!(!material.lighting);
    assert!(!material.wireframe);
    assert_eq!(material.material_type, MaterialType::Solid);
    // every index maps onto the only material
    assert_eq!(node.material(3), node.material(0));

    let material = node.material_mut(0).expect("the node exposes its material");
    material.wireframe = true;
    assert!(node.material(0).wireframe);
}

#[test]
fn visible_node_registers_itself_and_its_children() {
    let (scene, handle) = scene_with_tetrahedron();
    let node = scene.node(handle).unwrap();

    let mut queue = RenderQueue::new();
    let mut pass = RegistrationPass::new(handle, true, false, &mut queue);
    node.on_register_scene_node(&mut pass);
    assert!(pass.children_registered());

    assert_eq!(queue.entries(), &[(handle, RenderPass::Automatic)]);
}

#[test]
fn hidden_node_only_forwards_registration() {
    let (scene, handle) = scene_with_tetrahedron();
    let node = scene.node(handle).unwrap();

    let mut queue = RenderQueue::new();
    let mut pass = RegistrationPass::new(handle, false, false, &mut queue);
    node.on_register_scene_node(&mut pass);
    assert!(pass.children_registered());

    assert!(queue.is_empty());
}

#[test]
fn render_issues_a_single_indexed_triangle_list() {
    let node = TetrahedronNode::new();
    let mut driver = null_driver();
    let world = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));

    node.render(&world, &mut driver);

    let commands = driver.commands();
    assert_eq!(commands.len(), 3);
    assert!(matches!(&commands[0], DriverCommand::SetMaterial(m) if !m.lighting));
    assert_eq!(
        commands[1],
        DriverCommand::SetTransform(TransformState::World, world)
    );

    let draws: Vec<_> = driver.draw_calls().collect();
    assert_eq!(draws.len(), 1);
    let draw = draws[0];
    assert_eq!(draw.vertex_count(), 4);
    assert_eq!(draw.primitive_count, 4);
    assert_eq!(draw.index_count(), 12);
    assert_eq!(draw.indices, vec![0, 2, 3, 2, 1, 3, 1, 0, 3, 2, 0, 1]);
    assert_eq!(draw.index_type, IndexType::Bit16);
    assert_eq!(draw.vertex_type, VertexType::Standard);
    assert_eq!(draw.primitive_type, PrimitiveType::Triangles);
    assert_eq!(draw.world, world);
    assert_eq!(&draw.vertices[..], &node.vertices()[..]);
}

#[test]
fn every_face_leaves_out_exactly_one_vertex() {
    let indices = TetrahedronNode::indices();
    let mut missing: Vec<u16> = indices
        .chunks(3)
        .map(|face| (0..4).find(|v| !face.contains(v)).unwrap())
        .collect();
    missing.sort();
    assert_eq!(missing, vec![0, 1, 2, 3]);
}

#[test]
fn node_added_with_id_666_keeps_its_geometry() {
    let (scene, handle) = scene_with_tetrahedron();

    assert_eq!(scene.node_by_id(NODE_ID), Some(handle));
    assert_eq!(scene.base(handle).unwrap().id(), 666);
    assert_eq!(scene.base(handle).unwrap().parent(), Some(scene.root()));

    let node = scene
        .node_as::<TetrahedronNode>(handle)
        .expect("the node is a tetrahedron");
    assert_eq!(node.vertices()[0].position, [0.0, 0.0, 10.0]);
    assert_eq!(node.vertices()[2].position, [0.0, 20.0, 0.0]);
    assert_eq!(node.bounding_box().min, Vector3::new(-10.0, 0.0, -10.0));
    assert_eq!(node.bounding_box().max, Vector3::new(10.0, 20.0, 10.0));
    assert_eq!(node.material_count(), 1);
    assert_eq!(node.type_name(), "tetrahedron");
}

#[test]
fn id_and_parent_do_not_change_the_material() {
    let (mut scene, first) = scene_with_tetrahedron();
    let second = scene
        .add_node(Some(first), -1, Box::new(TetrahedronNode::new()))
        .unwrap();
    assert_eq!(
        scene.node(second).unwrap().material(0),
        scene.node(first).unwrap().material(0)
    );
}

#[test]
fn null_driver_reports_drawn_primitives_after_the_frame() {
    let node = TetrahedronNode::new();
    let mut driver = NullDriver::new((640, 480));
    driver
        .begin_scene(true, true, Colour::BLACK)
        .expect("null driver never fails");
    node.render(&Matrix4::identity(), &mut driver);
    assert_eq!(driver.primitive_count_drawn(), 0);
    driver.end_scene().expect("null driver never fails");
    assert_eq!(driver.primitive_count_drawn(), 4);
}
