use scene_ngin::{
    cgmath::Vector3,
    scene::animator::{Animator, RotationAnimator},
};

use crate::common::test_utils::{
    assert_close, assert_vec3_close, null_driver, scene_with_tetrahedron,
};

mod common;

#[test]
fn first_call_only_starts_the_clock() {
    let (mut scene, node) = scene_with_tetrahedron();
    let mut animator = RotationAnimator::new(Vector3::new(0.0, 0.0, 0.3));

    animator.animate_node(scene.base_mut(node).unwrap(), 5000);

    assert_vec3_close(
        scene.base(node).unwrap().transform.rotation,
        Vector3::new(0.0, 0.0, 0.0),
    );
}

#[test]
fn rotates_by_the_given_degrees_per_ten_milliseconds() {
    let (mut scene, node) = scene_with_tetrahedron();
    let mut animator = RotationAnimator::new(Vector3::new(0.0, 0.0, 0.3));
    let base = scene.base_mut(node).unwrap();

    animator.animate_node(base, 1000);
    animator.animate_node(base, 1010);
    assert_close(base.transform.rotation.z, 0.3);

    animator.animate_node(base, 2010);
    assert_close(base.transform.rotation.z, 30.3);
    assert_close(base.transform.rotation.x, 0.0);
    assert_close(base.transform.rotation.y, 0.0);
}

#[test]
fn no_elapsed_time_changes_nothing() {
    let (mut scene, node) = scene_with_tetrahedron();
    let mut animator = RotationAnimator::new(Vector3::new(1.0, 2.0, 3.0));
    let base = scene.base_mut(node).unwrap();

    animator.animate_node(base, 40);
    animator.animate_node(base, 40);

    assert_eq!(base.transform.rotation, Vector3::new(0.0, 0.0, 0.0));
}

#[test]
fn angles_wrap_at_a_full_turn() {
    let (mut scene, node) = scene_with_tetrahedron();
    let mut animator = RotationAnimator::new(Vector3::new(0.0, 0.0, 0.3));
    let base = scene.base_mut(node).unwrap();
    base.transform.rotation.z = 359.9;

    animator.animate_node(base, 0);
    animator.animate_node(base, 10);

    assert_close(base.transform.rotation.z, 0.2);
}

#[test]
fn survives_a_wrapping_clock() {
    let (mut scene, node) = scene_with_tetrahedron();
    let mut animator = RotationAnimator::new(Vector3::new(0.0, 0.0, 0.3));
    let base = scene.base_mut(node).unwrap();

    animator.animate_node(base, u32::MAX - 4);
    animator.animate_node(base, 5);

    assert_close(base.transform.rotation.z, 0.3);
}

#[test]
fn scene_runs_attached_animators_every_frame() {
    let (mut scene, node) = scene_with_tetrahedron();
    let animator = scene.create_rotation_animator(Vector3::new(0.0, 0.0, 0.3));
    assert!(scene.add_animator(node, animator));
    let mut driver = null_driver();

    scene.draw_all(&mut driver, 0);
    scene.draw_all(&mut driver, 100);

    let base = scene.base(node).unwrap();
    assert_close(base.transform.rotation.z, 3.0);
    let world = driver.draw_calls().last().unwrap().world;
    assert_eq!(world, *base.absolute_transformation());
}

#[test]
fn hidden_nodes_are_not_animated() {
    let (mut scene, node) = scene_with_tetrahedron();
    let animator = scene.create_rotation_animator(Vector3::new(0.0, 0.0, 0.3));
    scene.add_animator(node, animator);
    scene.set_visible(node, false);
    let mut driver = null_driver();

    scene.draw_all(&mut driver, 0);
    scene.draw_all(&mut driver, 100);

    assert_eq!(
        scene.base(node).unwrap().transform.rotation,
        Vector3::new(0.0, 0.0, 0.0)
    );
}

#[test]
fn animators_cannot_be_attached_to_removed_nodes() {
    let (mut scene, node) = scene_with_tetrahedron();
    scene.remove_node(node);
    let animator = scene.create_rotation_animator(Vector3::new(0.0, 0.0, 0.3));
    assert!(!scene.add_animator(node, animator));
}
