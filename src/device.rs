//! The device ties together a video driver, a scene manager and the window.
//!
//! A windowed device is created by [`flow::run`](crate::flow::run) and handed to the
//! application's [`Flow`](crate::flow::Flow). A headless device with the null driver
//! can be created directly with [`Device::null`] and driven by calling
//! [`Device::run`] in a loop.

use std::sync::Arc;

use log::{debug, info};
use winit::window::Window;

use crate::{
    config::DeviceParams,
    driver::{VideoDriver, null::NullDriver},
    scene::manager::{FrameStats, SceneManager},
    time::Timer,
};

/// Position and visibility of the mouse cursor over the window.
#[derive(Debug, Default)]
pub struct CursorControl {
    position: (i32, i32),
    visible: bool,
    window: Option<Arc<Window>>,
}

impl CursorControl {
    fn new(window: Option<Arc<Window>>) -> Self {
        Self {
            position: (0, 0),
            visible: true,
            window,
        }
    }

    /// Cursor position in window pixels, origin top left.
    pub fn position(&self) -> (i32, i32) {
        self.position
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.position = (x, y);
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if let Some(window) = &self.window {
            window.set_cursor_visible(visible);
        }
    }
}

pub struct Device {
    driver: Box<dyn VideoDriver>,
    scene: SceneManager,
    timer: Timer,
    cursor: CursorControl,
    caption: String,
    window: Option<Arc<Window>>,
    close_requested: bool,
}

impl Device {
    pub(crate) fn new(
        driver: Box<dyn VideoDriver>,
        window: Option<Arc<Window>>,
        params: &DeviceParams,
    ) -> Self {
        info!("created device with driver {}", driver.name());
        let mut device = Self {
            driver,
            scene: SceneManager::new(),
            timer: Timer::new(),
            cursor: CursorControl::new(window.clone()),
            caption: String::new(),
            window,
            close_requested: false,
        };
        device.set_window_caption(&params.caption);
        device
    }

    /// A device without a window that renders through a [`NullDriver`].
    pub fn null(params: &DeviceParams) -> Self {
        Self::new(Box::new(NullDriver::new(params.window_size)), None, params)
    }

    /// `false` once the device was asked to close.
    pub fn run(&mut self) -> bool {
        !self.close_requested
    }

    pub fn close(&mut self) {
        debug!("device close requested");
        self.close_requested = true;
    }

    pub fn driver(&mut self) -> &mut dyn VideoDriver {
        self.driver.as_mut()
    }

    pub fn scene_manager(&mut self) -> &mut SceneManager {
        &mut self.scene
    }

    /// Scene manager and driver at the same time.
    pub fn parts(&mut self) -> (&mut SceneManager, &mut dyn VideoDriver) {
        (&mut self.scene, self.driver.as_mut())
    }

    pub fn cursor_control(&mut self) -> &mut CursorControl {
        &mut self.cursor
    }

    /// Animate and render the scene at the current device time.
    pub fn draw_all(&mut self) -> FrameStats {
        let time_ms = self.timer.time_ms();
        self.scene.draw_all(self.driver.as_mut(), time_ms)
    }

    /// Milliseconds since the device was created.
    pub fn time_ms(&self) -> u32 {
        self.timer.time_ms()
    }

    pub fn window_caption(&self) -> &str {
        &self.caption
    }

    pub fn set_window_caption(&mut self, caption: &str) {
        self.caption = caption.to_string();
        if let Some(window) = &self.window {
            window.set_title(caption);
        }
    }

    pub(crate) fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    pub(crate) fn on_resize(&mut self, width: u32, height: u32) {
        self.driver.on_resize(width, height);
    }
}
