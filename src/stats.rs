//! Frame rate counter for the HUD
//!
//! Keeps the timestamps of the last 60 frames and reports how many frames
//! per second that window represents.

/// Number of frames in the rolling window
pub const WINDOW: usize = 60;

/// Rolling frames-per-second counter
#[derive(Debug, Clone)]
pub struct FrameStats {
    frame_times: [f64; WINDOW],
    frame_index: usize,
    recorded: usize,
    fps: u32,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            frame_times: [0.0; WINDOW],
            frame_index: 0,
            recorded: 0,
            fps: 0,
        }
    }

    /// Record a rendered frame at `time` (ms)
    pub fn record(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % WINDOW;
        self.recorded = (self.recorded + 1).min(WINDOW);

        // Once full, the slot we are about to overwrite is the oldest frame
        if self.recorded == WINDOW {
            let oldest = self.frame_times[self.frame_index];
            let elapsed = time - oldest;
            if elapsed > 0.0 {
                self.fps = ((WINDOW - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    /// Frames per second, 0 until the window has filled
    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
