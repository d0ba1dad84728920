//! Device creation parameters.
//!
//! There are no command line flags or configuration files: the window title,
//! resolution and driver are constants, collected here so the host application
//! and the tests agree on them. Log filtering follows `RUST_LOG`.

/// Which [`VideoDriver`](crate::driver::VideoDriver) backs a device.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DriverType {
    /// Hardware rendering through wgpu into a winit window.
    #[default]
    Gpu,
    /// No window and no GPU; draw calls are recorded for inspection.
    Null,
}

/// Parameters for creating a [`Device`](crate::device::Device).
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceParams {
    pub driver_type: DriverType,
    pub window_size: (u32, u32),
    /// Requested colour depth. wgpu picks the surface format, so this is advisory.
    pub bits: u8,
    pub fullscreen: bool,
    pub resizable: bool,
    pub vsync: bool,
    pub caption: String,
}

impl DeviceParams {
    pub const DEFAULT_CAPTION: &'static str = "Custom Scene Node - OctopuStudio";

    /// Parameters for a windowless device using the null driver.
    pub fn headless() -> Self {
        Self {
            driver_type: DriverType::Null,
            ..Default::default()
        }
    }
}

impl Default for DeviceParams {
    fn default() -> Self {
        Self {
            driver_type: DriverType::Gpu,
            window_size: (800, 600),
            bits: 16,
            fullscreen: false,
            resizable: false,
            vsync: true,
            caption: Self::DEFAULT_CAPTION.to_string(),
        }
    }
}
