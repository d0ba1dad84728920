use std::{cell::Cell, rc::Rc};

use scene_ngin::{
    cgmath::{Point3, Vector3},
    config::{DeviceParams, DriverType},
    data_structures::colour::Colour,
    device::Device,
    driver::{Rect, null::NullDriver},
    flow::{self, Flow},
    scene::tetrahedron::TetrahedronNode,
    time::FpsCounter,
};

use crate::common::test_utils::NODE_ID;

mod common;

/// Builds the demo scene and closes the device after `frames` frames.
struct Demo {
    frames: u32,
    inits: Rc<Cell<u32>>,
    drawn: Rc<Cell<u32>>,
    primitives: Rc<Cell<u32>>,
}

impl Flow for Demo {
    fn on_init(&mut self, device: &mut Device) -> anyhow::Result<()> {
        self.inits.set(self.inits.get() + 1);
        let scene = device.scene_manager();
        scene.add_camera(
            None,
            Vector3::new(0.0, -40.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            -1,
        )?;
        let node = scene.add_node(None, NODE_ID, Box::new(TetrahedronNode::new()))?;
        let animator = scene.create_rotation_animator(Vector3::new(0.0, 0.0, 0.3));
        scene.add_animator(node, animator);
        device.cursor_control().set_visible(false);
        Ok(())
    }

    fn on_frame(&mut self, device: &mut Device) -> anyhow::Result<()> {
        let driver = device.driver();
        driver.begin_scene(true, true, Colour::from_argb(0, 100, 100, 127))?;
        driver.draw_2d_rectangle(Colour::from_argb(255, 255, 255, 0), Rect::new(0, 0, 40, 40));
        device.draw_all();
        device.driver().end_scene()?;

        self.drawn.set(self.drawn.get() + 1);
        self.primitives.set(device.driver().primitive_count_drawn());
        if self.drawn.get() == self.frames {
            device.close();
        }
        Ok(())
    }
}

#[test]
fn default_parameters_match_the_demo_window() {
    let params = DeviceParams::default();
    assert_eq!(params.driver_type, DriverType::Gpu);
    assert_eq!(params.window_size, (800, 600));
    assert_eq!(params.bits, 16);
    assert!(!params.fullscreen);
    assert_eq!(params.caption, "Custom Scene Node - OctopuStudio");
    assert_eq!(DeviceParams::headless().driver_type, DriverType::Null);
}

#[test]
fn null_device_runs_until_closed() {
    let mut device = Device::null(&DeviceParams::headless());
    assert!(device.run());
    assert!(device.run());
    device.close();
    assert!(!device.run());
}

#[test]
fn null_device_exposes_driver_and_caption() {
    let mut device = Device::null(&DeviceParams::headless());
    assert_eq!(device.window_caption(), DeviceParams::DEFAULT_CAPTION);
    assert_eq!(device.driver().name(), NullDriver::NAME);
    assert_eq!(device.driver().fps(), FpsCounter::INITIAL_FPS);
    assert_eq!(device.driver().screen_size(), (800, 600));

    let driver = device.driver();
    let caption = format!(
        "scene-ngin - OctopusStudio [{}] FPS: {}",
        driver.name(),
        driver.fps()
    );
    device.set_window_caption(&caption);
    assert_eq!(
        device.window_caption(),
        "scene-ngin - OctopusStudio [Null Device] FPS: 60"
    );
}

#[test]
fn cursor_control_tracks_position_and_visibility() {
    let mut device = Device::null(&DeviceParams::headless());
    let cursor = device.cursor_control();
    assert!(cursor.is_visible());
    cursor.set_visible(false);
    cursor.set_position(120, 80);
    assert!(!device.cursor_control().is_visible());
    assert_eq!(device.cursor_control().position(), (120, 80));
}

#[test]
fn parts_borrow_scene_and_driver_together() {
    let mut device = Device::null(&DeviceParams::headless());
    let (scene, driver) = device.parts();
    scene
        .add_node(None, NODE_ID, Box::new(TetrahedronNode::new()))
        .unwrap();
    let stats = scene.draw_all(driver, 0);
    assert_eq!(stats.rendered, 1);
}

#[test]
fn headless_run_drives_the_flow_until_it_closes() {
    let inits = Rc::new(Cell::new(0));
    let drawn = Rc::new(Cell::new(0));
    let primitives = Rc::new(Cell::new(0));
    let demo = Demo {
        frames: 3,
        inits: inits.clone(),
        drawn: drawn.clone(),
        primitives: primitives.clone(),
    };

    flow::run(DeviceParams::headless(), demo).expect("the headless run succeeds");

    assert_eq!(inits.get(), 1);
    assert_eq!(drawn.get(), 3);
    assert_eq!(primitives.get(), TetrahedronNode::PRIMITIVE_COUNT);
}

#[test]
fn init_errors_end_the_run() {
    struct Failing;
    impl Flow for Failing {
        fn on_init(&mut self, _: &mut Device) -> anyhow::Result<()> {
            anyhow::bail!("no scene today")
        }
        fn on_frame(&mut self, _: &mut Device) -> anyhow::Result<()> {
            unreachable!("frames never start without a scene")
        }
    }

    let err = flow::run(DeviceParams::headless(), Failing).unwrap_err();
    assert_eq!(err.to_string(), "no scene today");
}
