use std::path::Path;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{WheelError, WheelResult};
use crate::render::frame::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
    /// `0` loops forever; `n` plays `n` times. Sinks without a loop flag ignore it.
    pub loop_count: u32,
}

impl SinkConfig {
    pub(crate) fn validate(&self) -> WheelResult<()> {
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(WheelError::export_failure("fps must be non-zero"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(WheelError::export_failure(
                "sink width/height must be non-zero",
            ));
        }
        Ok(())
    }

    pub(crate) fn frame_len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

/// Sink contract for consuming rendered frames in step order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> WheelResult<()>;
    /// Push one frame in strictly increasing order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> WheelResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> WheelResult<()>;
    /// Give up after a failure. File-backed sinks delete what they wrote.
    fn abort(&mut self) {}
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Return `true` once `end` ran without an abort.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> WheelResult<()> {
        cfg.validate()?;
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> WheelResult<()> {
        check_frame(self.cfg.as_ref(), self.frames.last().map(|(i, _)| *i), idx, frame)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> WheelResult<()> {
        self.finished = true;
        Ok(())
    }

    fn abort(&mut self) {
        self.frames.clear();
        self.finished = false;
    }
}

/// Shared `push_frame` checks: started, in order, and sized like the config.
pub(crate) fn check_frame(
    cfg: Option<&SinkConfig>,
    last: Option<FrameIndex>,
    idx: FrameIndex,
    frame: &FrameRGBA,
) -> WheelResult<()> {
    let cfg = cfg.ok_or_else(|| WheelError::export_failure("sink not started"))?;
    if let Some(last) = last
        && idx.0 <= last.0
    {
        return Err(WheelError::export_failure(
            "sink received out-of-order frame index",
        ));
    }
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(WheelError::export_failure(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    if frame.data.len() != cfg.frame_len() {
        return Err(WheelError::export_failure(
            "frame.data size mismatch with width*height*4",
        ));
    }
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> WheelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Remove a partially written output, ignoring a file that is already gone.
pub(crate) fn remove_partial(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove partial output"),
    }
}
