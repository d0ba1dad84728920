use scene_ngin::{
    cgmath::{Point3, Vector3},
    driver::null::NullDriver,
    scene::{manager::SceneManager, node::NodeHandle, tetrahedron::TetrahedronNode},
};

pub const SCREEN_SIZE: (u32, u32) = (800, 600);
pub const NODE_ID: i32 = 666;
const EPSILON: f32 = 1e-4;

pub fn null_driver() -> NullDriver {
    NullDriver::new(SCREEN_SIZE)
}

/// A scene holding one tetrahedron with id 666 directly under the root.
pub fn scene_with_tetrahedron() -> (SceneManager, NodeHandle) {
    let mut scene = SceneManager::new();
    let root = scene.root();
    let node = scene
        .add_node(Some(root), NODE_ID, Box::new(TetrahedronNode::new()))
        .expect("the root accepts children");
    (scene, node)
}

/// The scene of the demo: a camera at (0, -40, 0) looking at a tetrahedron in the
/// origin. Returns the scene, the camera and the tetrahedron.
pub fn demo_scene() -> (SceneManager, NodeHandle, NodeHandle) {
    let (mut scene, node) = scene_with_tetrahedron();
    let camera = scene
        .add_camera(
            None,
            Vector3::new(0.0, -40.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            -1,
        )
        .expect("the root accepts children");
    (scene, camera, node)
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {} but got {}",
        expected,
        actual
    );
}

pub fn assert_vec3_close(actual: Vector3<f32>, expected: Vector3<f32>) {
    assert_close(actual.x, expected.x);
    assert_close(actual.y, expected.y);
    assert_close(actual.z, expected.z);
}
