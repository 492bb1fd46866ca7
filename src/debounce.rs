use crate::error::Error;
use num_traits::ToPrimitive;

/// Counts down the frames to ignore after an accepted analysis.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Debouncer {
    remaining: u32,
}

impl Debouncer {
    /// Consume one frame of the window. Returns true if the frame must be skipped.
    pub fn should_skip(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
            true
        } else {
            false
        }
    }

    /// Skip the next `frames` frames. Zero disables skipping.
    pub fn arm(&mut self, frames: u32) {
        self.remaining = frames;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

/// How many frames the debouncer skips after each accepted analysis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DebounceWindow {
    pub skip_frames: u32,
    pub skip_seconds: Option<f32>,
}

impl DebounceWindow {
    /// The window in frames for the given observed frame rate.
    ///
    /// A duration based window needs a finite, positive frame rate; without one
    /// the fixed frame count applies.
    pub fn frames(&self, fps: Option<f32>) -> Result<u32, Error> {
        match (self.skip_seconds, fps) {
            (Some(seconds), Some(fps)) if fps.is_finite() && fps > 0.0 => {
                (seconds * fps).round().to_u32().ok_or(Error::ConvertToU32)
            }
            _ => Ok(self.skip_frames),
        }
    }
}
