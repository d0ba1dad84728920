//! Opens a window with a rotating tetrahedron drawn by a custom scene node and a
//! small 2D cursor made of rectangles.

use std::process::ExitCode;

use log::warn;

use scene_ngin::{
    cgmath::{Point3, Vector3},
    config::DeviceParams,
    data_structures::colour::Colour,
    device::Device,
    driver::Rect,
    flow::{self, Flow},
    scene::tetrahedron::TetrahedronNode,
};

const NODE_ID: i32 = 666;
const CAPTION_EVERY_FRAMES: u32 = 100;

#[derive(Default)]
struct CustomSceneNode {
    frames: u32,
}

impl Flow for CustomSceneNode {
    fn on_init(&mut self, device: &mut Device) -> anyhow::Result<()> {
        let scene = device.scene_manager();
        scene.add_camera(
            None,
            Vector3::new(0.0, -40.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            -1,
        )?;

        let root = scene.root();
        let node = scene.add_node(Some(root), NODE_ID, Box::new(TetrahedronNode::new()))?;
        let animator = scene.create_rotation_animator(Vector3::new(0.0, 0.0, 0.3));
        if !scene.add_animator(node, animator) {
            warn!("The tetrahedron will not rotate.");
        }

        device.cursor_control().set_visible(false);
        Ok(())
    }

    fn on_frame(&mut self, device: &mut Device) -> anyhow::Result<()> {
        let (mx, my) = device.cursor_control().position();
        let driver = device.driver();
        driver.begin_scene(true, true, Colour::from_argb(0, 100, 100, 127))?;
        driver.draw_2d_rectangle(
            Colour::from_argb(255, 255, 255, 0),
            Rect::new(mx - 20, my - 20, mx + 20, my + 20),
        );
        driver.draw_2d_rectangle(
            Colour::from_argb(255, 0, 0, 255),
            Rect::new(mx - 16, my - 15, mx - 10, my - 9),
        );
        driver.draw_2d_rectangle(
            Colour::from_argb(255, 0, 255, 0),
            Rect::new(mx + 10, my - 15, mx + 16, my - 9),
        );

        device.draw_all();
        device.driver().end_scene()?;

        self.frames += 1;
        if self.frames == CAPTION_EVERY_FRAMES {
            let driver = device.driver();
            let caption = format!(
                "scene-ngin - OctopusStudio [{}] FPS: {}",
                driver.name(),
                driver.fps()
            );
            device.set_window_caption(&caption);
            self.frames = 0;
        }
        Ok(())
    }
}

fn main() -> ExitCode {
    match flow::run(DeviceParams::default(), CustomSceneNode::default()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
