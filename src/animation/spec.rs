use crate::foundation::core::Fps;
use crate::foundation::error::{WheelError, WheelResult};

/// Longest sequence a job may render. Every frame is held in memory until export.
pub const MAX_DURATION_FRAMES: u64 = 10_000;

/// Timing of one render job. Immutable for the job's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationSpec {
    /// Number of frames to render.
    pub duration_frames: u64,
    /// Playback rate.
    pub fps: u32,
    /// `0` loops forever; `n` plays the sequence `n` times.
    pub loop_count: u32,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            duration_frames: 100,
            fps: 30,
            loop_count: 0,
        }
    }
}

impl AnimationSpec {
    /// Reject a zero or oversized duration and a zero frame rate.
    pub fn validate(&self) -> WheelResult<()> {
        if self.duration_frames == 0 {
            return Err(WheelError::invalid_configuration(
                "duration_frames must be > 0",
            ));
        }
        if self.duration_frames > MAX_DURATION_FRAMES {
            return Err(WheelError::invalid_configuration(format!(
                "duration_frames must be <= {MAX_DURATION_FRAMES}, got {}",
                self.duration_frames
            )));
        }
        if self.fps == 0 {
            return Err(WheelError::invalid_configuration("fps must be > 0"));
        }
        Ok(())
    }

    /// Frame rate as a rational.
    pub fn frame_rate(&self) -> WheelResult<Fps> {
        Fps::new(self.fps, 1)
    }

    /// Length of one pass through the sequence, in seconds.
    pub fn duration_secs(&self) -> WheelResult<f64> {
        Ok(self.frame_rate()?.frames_to_secs(self.duration_frames))
    }
}
