use scene_ngin::{
    cgmath::{Matrix4, SquareMatrix, Vector3},
    data_structures::{
        aabb::Aabb, colour::Colour, frustum::Frustum, material::Material, vertex::Vertex,
    },
    driver::{
        Indices, PrimitiveType, Rect, TransformState, VertexType, VideoDriver,
        null::{DriverCommand, NullDriver},
    },
    scene::camera::CameraNode,
    time::FpsCounter,
};

use crate::common::test_utils::{demo_scene, null_driver};

mod common;

fn triangle() -> [Vertex; 3] {
    [
        Vertex::new(0.0, 0.0, 0.0, 0.0, 0.0, 1.0, Colour::WHITE, 0.0, 0.0),
        Vertex::new(1.0, 0.0, 0.0, 0.0, 0.0, 1.0, Colour::WHITE, 1.0, 0.0),
        Vertex::new(0.0, 1.0, 0.0, 0.0, 0.0, 1.0, Colour::WHITE, 0.0, 1.0),
    ]
}

#[test]
fn null_driver_records_a_frame() {
    let mut driver = null_driver();
    let clear = Colour::from_argb(0, 100, 100, 127);

    driver.begin_scene(true, false, clear).unwrap();
    driver.set_material(&Material::default());
    driver.draw_2d_rectangle(Colour::WHITE, Rect::new(0, 0, 10, 10));
    driver.end_scene().unwrap();

    assert_eq!(
        driver.commands(),
        &[
            DriverCommand::BeginScene {
                clear_back_buffer: true,
                clear_z_buffer: false,
                colour: clear,
            },
            DriverCommand::SetMaterial(Material::default()),
            DriverCommand::Rectangle(Colour::WHITE, Rect::new(0, 0, 10, 10)),
            DriverCommand::EndScene,
        ]
    );
    assert_eq!(driver.frames(), 1);
    assert_eq!(driver.take_commands().len(), 4);
    assert!(driver.commands().is_empty());
}

#[test]
fn null_driver_only_keeps_the_current_frame() {
    let (mut scene, _, _) = demo_scene();
    let mut driver = null_driver();
    let clear = Colour::from_argb(0, 100, 100, 127);

    driver.begin_scene(true, true, clear).unwrap();
    scene.draw_all(&mut driver, 0);
    driver.end_scene().unwrap();
    let per_frame = driver.commands().len();

    for frame in 1..500 {
        driver.begin_scene(true, true, clear).unwrap();
        scene.draw_all(&mut driver, frame * 10);
        driver.end_scene().unwrap();
    }

    assert_eq!(driver.frames(), 500);
    assert_eq!(driver.commands().len(), per_frame);
    assert_eq!(driver.draw_calls().count(), 1);
    assert!(matches!(
        driver.commands().first(),
        Some(DriverCommand::BeginScene { .. })
    ));
}

#[test]
fn null_driver_keeps_transformations() {
    let mut driver = null_driver();
    let view = Matrix4::from_translation(Vector3::new(0.0, 0.0, -5.0));
    driver.set_transform(TransformState::View, &view);

    assert_eq!(driver.transform(TransformState::View), view);
    assert_eq!(driver.transform(TransformState::World), Matrix4::identity());
    assert_eq!(driver.name(), NullDriver::NAME);
    assert_eq!(driver.screen_size(), (800, 600));
}

#[test]
fn empty_rectangles_are_dropped() {
    let mut driver = null_driver();
    driver.draw_2d_rectangle(Colour::WHITE, Rect::new(10, 10, 10, 20));
    driver.draw_2d_rectangle(Colour::WHITE, Rect::new(10, 10, 5, 20));
    assert!(driver.commands().is_empty());
}

#[test]
fn draws_with_too_few_indices_are_rejected() {
    let mut driver = null_driver();
    driver.draw_vertex_primitive_list(
        &triangle(),
        Indices::U16(&[0, 1, 2]),
        2,
        VertexType::Standard,
        PrimitiveType::Triangles,
    );
    assert_eq!(driver.draw_calls().count(), 0);
}

#[test]
fn draws_with_overflowing_primitive_counts_are_rejected() {
    let mut driver = null_driver();
    driver.draw_vertex_primitive_list(
        &triangle(),
        Indices::U16(&[0, 1, 2]),
        u32::MAX / 2,
        VertexType::Standard,
        PrimitiveType::Triangles,
    );
    driver.draw_vertex_primitive_list(
        &triangle(),
        Indices::U16(&[0, 1, 2]),
        u32::MAX,
        VertexType::Standard,
        PrimitiveType::TriangleStrip,
    );
    assert_eq!(driver.draw_calls().count(), 0);
    assert_eq!(PrimitiveType::Triangles.checked_index_count(u32::MAX / 2), None);
    assert_eq!(PrimitiveType::Lines.index_count(u32::MAX), u32::MAX);
}

#[test]
fn draws_with_out_of_range_indices_are_rejected() {
    let mut driver = null_driver();
    driver.draw_vertex_primitive_list(
        &triangle(),
        Indices::U32(&[0, 1, 3]),
        1,
        VertexType::Standard,
        PrimitiveType::Triangles,
    );
    assert_eq!(driver.draw_calls().count(), 0);
}

#[test]
fn empty_draws_are_ignored() {
    let mut driver = null_driver();
    driver.draw_vertex_primitive_list(
        &triangle(),
        Indices::U16(&[0, 1, 2]),
        0,
        VertexType::Standard,
        PrimitiveType::Triangles,
    );
    driver.draw_vertex_primitive_list(
        &[],
        Indices::U16(&[]),
        1,
        VertexType::Standard,
        PrimitiveType::Points,
    );
    assert!(driver.commands().is_empty());
}

#[test]
fn index_counts_per_primitive_type() {
    assert_eq!(PrimitiveType::Points.index_count(4), 4);
    assert_eq!(PrimitiveType::Lines.index_count(4), 8);
    assert_eq!(PrimitiveType::LineStrip.index_count(4), 5);
    assert_eq!(PrimitiveType::Triangles.index_count(4), 12);
    assert_eq!(PrimitiveType::TriangleStrip.index_count(4), 6);
    assert_eq!(PrimitiveType::TriangleStrip.index_count(0), 0);
}

#[test]
fn fps_counter_reports_sixty_until_the_first_window_completes() {
    let mut fps = FpsCounter::new();
    for now in (0..1500).step_by(10) {
        fps.register_frame(now);
    }
    assert_eq!(fps.fps(), FpsCounter::INITIAL_FPS);

    fps.register_frame(1500);
    // 151 frames in 1.5 seconds
    assert_eq!(fps.fps(), 101);
}

#[test]
fn fps_counter_starts_a_new_window() {
    let mut fps = FpsCounter::new();
    fps.register_frame(0);
    fps.register_frame(1500);
    assert_eq!(fps.fps(), 2);

    for now in (1600..=3000).step_by(100) {
        fps.register_frame(now);
    }
    // 15 frames since the window restarted at 1500ms
    assert_eq!(fps.fps(), 10);
}

#[test]
fn colours_are_given_alpha_first() {
    let colour = Colour::from_argb(255, 10, 20, 30);
    assert_eq!(colour, Colour::new(10, 20, 30, 255));
    assert_eq!(colour.to_array(), [10, 20, 30, 255]);

    let clear: wgpu::Color = Colour::WHITE.into();
    assert_eq!(clear, wgpu::Color::WHITE);
}

#[test]
fn aabb_transforms_to_world_space() {
    let aabb = Aabb::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));
    let moved = aabb.transformed(&Matrix4::from_translation(Vector3::new(5.0, 0.0, 0.0)));
    assert_eq!(moved.min, Vector3::new(4.0, -1.0, -1.0));
    assert_eq!(moved.max, Vector3::new(6.0, 1.0, 1.0));
    assert_eq!(moved.center(), Vector3::new(5.0, 0.0, 0.0));
    assert_eq!(moved.extent(), Vector3::new(2.0, 2.0, 2.0));
    assert_eq!(Aabb::from_points(Vec::new()), None);
}

#[test]
fn frustum_of_a_camera_sees_what_it_looks_at() {
    let camera = CameraNode::new((0.0, 0.0, 0.0).into());
    let absolute = Matrix4::from_translation(Vector3::new(0.0, -40.0, 0.0));
    let frustum = Frustum::from_matrix(&camera.view_projection(&absolute, 4.0 / 3.0));

    let at_origin = Aabb::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));
    let behind = Aabb::new(Vector3::new(-1.0, -60.0, -1.0), Vector3::new(1.0, -50.0, 1.0));
    let far_aside = Aabb::new(
        Vector3::new(1000.0, -1.0, -1.0),
        Vector3::new(1001.0, 1.0, 1.0),
    );
    assert!(!frustum.is_outside(&at_origin));
    assert!(frustum.is_outside(&behind));
    assert!(frustum.is_outside(&far_aside));
}
