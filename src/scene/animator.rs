//! Animators change a node's transformation over time.

use cgmath::Vector3;

use crate::scene::node::NodeBase;

/// Attached to a node and run during the animate phase, before the node's absolute
/// transformation is updated.
pub trait Animator {
    /// `time_ms` is the device time in milliseconds.
    fn animate_node(&mut self, base: &mut NodeBase, time_ms: u32);
}

/// Spins a node at a constant speed.
///
/// `rotation` is given in degrees per 10 milliseconds around each axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RotationAnimator {
    rotation: Vector3<f32>,
    start_time: Option<u32>,
}

impl RotationAnimator {
    pub fn new(rotation: Vector3<f32>) -> Self {
        Self {
            rotation,
            start_time: None,
        }
    }

    pub fn rotation(&self) -> Vector3<f32> {
        self.rotation
    }
}

impl Animator for RotationAnimator {
    fn animate_node(&mut self, base: &mut NodeBase, time_ms: u32) {
        // the first frame only starts the clock
        let Some(start) = self.start_time.replace(time_ms) else {
            return;
        };
        let elapsed = time_ms.wrapping_sub(start);
        if elapsed == 0 {
            return;
        }
        let mut rotation = base.transform.rotation + self.rotation * (elapsed as f32 * 0.1);
        rotation.x %= 360.0;
        rotation.y %= 360.0;
        rotation.z %= 360.0;
        base.transform.rotation = rotation;
    }
}
