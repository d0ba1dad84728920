//! Frame timing: a millisecond clock for animators and a frames-per-second counter.

use instant::Instant;

/// Milliseconds elapsed since the device was created.
///
/// Animators receive this value once per frame. It wraps after roughly 49 days,
/// which animators tolerate by using wrapping arithmetic.
#[derive(Debug, Clone)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn time_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// Averages the frame rate over windows of at least [`FpsCounter::WINDOW_MS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FpsCounter {
    fps: u32,
    start_ms: Option<u32>,
    frames_counted: u32,
}

impl FpsCounter {
    pub const WINDOW_MS: u32 = 1500;
    /// Reported until the first window completes.
    pub const INITIAL_FPS: u32 = 60;

    pub fn new() -> Self {
        Self {
            fps: Self::INITIAL_FPS,
            start_ms: None,
            frames_counted: 0,
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Count one finished frame at time `now_ms`.
    pub fn register_frame(&mut self, now_ms: u32) {
        let start = *self.start_ms.get_or_insert(now_ms);
        self.frames_counted += 1;

        let elapsed = now_ms.wrapping_sub(start);
        if elapsed >= Self::WINDOW_MS {
            self.fps = (1000.0 * self.frames_counted as f64 / elapsed as f64).ceil() as u32;
            self.frames_counted = 0;
            self.start_ms = Some(now_ms);
        }
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
