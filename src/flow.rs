//! Flow control and application event loop.
//!
//! A "flow" is the application side of the frame loop. The engine creates the window
//! and the [`Device`], then calls into the flow:
//!
//! 1. `on_init` once the device exists, to build the scene
//! 2. `on_window_event` for every window event
//! 3. `on_frame` on every redraw; the flow draws the frame and may close the device
//!
//! After `on_frame` the next redraw is requested right away, so the loop runs as
//! fast as presentation allows.

use std::sync::Arc;

use anyhow::Context as _;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Fullscreen, Window},
};

use crate::{
    config::{DeviceParams, DriverType},
    context::Context,
    device::Device,
    driver::gpu::GpuDriver,
};

/// The application driven by [`run`].
pub trait Flow {
    /// Build the scene. Called once after the device was created.
    fn on_init(&mut self, device: &mut Device) -> anyhow::Result<()>;

    /// Draw one frame.
    fn on_frame(&mut self, device: &mut Device) -> anyhow::Result<()>;

    fn on_window_event(&mut self, _device: &mut Device, _event: &WindowEvent) {}
}

struct App<F: Flow> {
    async_runtime: tokio::runtime::Runtime,
    params: DeviceParams,
    flow: F,
    device: Option<Device>,
    // the first error ends the event loop and is returned from `run`
    error: Option<anyhow::Error>,
}

impl<F: Flow> App<F> {
    fn new(params: DeviceParams, flow: F) -> anyhow::Result<Self> {
        let async_runtime =
            tokio::runtime::Runtime::new().context("failed to create the async runtime")?;
        Ok(Self {
            async_runtime,
            params,
            flow,
            device: None,
            error: None,
        })
    }

    fn create_device(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<Device> {
        let (width, height) = self.params.window_size;
        let mut window_attributes = Window::default_attributes()
            .with_title(self.params.caption.clone())
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(self.params.resizable);
        if self.params.fullscreen {
            window_attributes = window_attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("failed to create the window")?,
        );

        let ctx = self
            .async_runtime
            .block_on(Context::new(window.clone(), self.params.vsync))?;
        let driver = GpuDriver::new(ctx);
        let mut device = Device::new(Box::new(driver), Some(window), &self.params);
        self.flow.on_init(&mut device)?;
        Ok(device)
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error.get_or_insert(error);
        event_loop.exit();
    }
}

impl<F: Flow> ApplicationHandler for App<F> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.device.is_some() {
            return;
        }
        match self.create_device(event_loop) {
            Ok(device) => {
                device.request_redraw();
                self.device = Some(device);
            }
            Err(e) => self.fail(event_loop, e.context("could not create the device")),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(device) = &mut self.device else {
            return;
        };

        if let WindowEvent::CursorMoved { position, .. } = event {
            device
                .cursor_control()
                .set_position(position.x as i32, position.y as i32);
        }

        self.flow.on_window_event(device, &event);

        match event {
            WindowEvent::CloseRequested => device.close(),
            WindowEvent::Resized(size) => device.on_resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.flow.on_frame(device) {
                    self.fail(event_loop, e);
                    return;
                }
                device.request_redraw();
            }
            _ => {}
        }

        if self.device.as_mut().is_some_and(|device| !device.run()) {
            event_loop.exit();
        }
    }
}

/// Create a window and a GPU device from `params` and drive `flow` until the
/// window is closed or the flow fails.
///
/// [`DriverType::Null`] parameters are run headless: the flow gets a
/// [`Device::null`] and `on_frame` is called until the flow closes the device.
pub fn run<F: Flow>(params: DeviceParams, mut flow: F) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    if params.driver_type == DriverType::Null {
        let mut device = Device::null(&params);
        flow.on_init(&mut device)?;
        while device.run() {
            flow.on_frame(&mut device)?;
        }
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(params, flow)?;

    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
