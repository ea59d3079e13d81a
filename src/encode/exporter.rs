//! Turns the sequencer's frame list into one artifact on disk.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::animation::spec::AnimationSpec;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::gif::{GifSink, GifSinkOpts};
use crate::encode::sink::{FrameSink, SinkConfig, remove_partial};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{WheelError, WheelResult};
use crate::render::frame::Frame;

/// Artifact container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Looping animated GIF.
    Gif,
    /// H.264 MP4 through system `ffmpeg`.
    Mp4,
}

impl ExportFormat {
    /// Pick the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> WheelResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                WheelError::invalid_configuration(format!(
                    "cannot infer output format from '{}' (expected .gif or .mp4)",
                    path.display()
                ))
            })?;
        ext.parse()
    }

    /// Times the frame list is written: MP4 carries no loop flag, so loops are unrolled.
    pub fn passes(self, loop_count: u32) -> u32 {
        match self {
            Self::Gif => 1,
            Self::Mp4 => loop_count.max(1),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = WheelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gif" => Ok(Self::Gif),
            "mp4" => Ok(Self::Mp4),
            other => Err(WheelError::invalid_configuration(format!(
                "unsupported output format '{other}' (expected gif or mp4)"
            ))),
        }
    }
}

/// Where and how to write the artifact.
#[derive(Clone, Debug)]
pub struct ExportOpts {
    /// Output file.
    pub out_path: PathBuf,
    /// Container.
    pub format: ExportFormat,
    /// Replace an existing file.
    pub overwrite: bool,
    /// Opaque color the premultiplied frames are flattened over.
    pub bg_rgba: [u8; 4],
}

impl ExportOpts {
    /// Options for `out_path`, with the format taken from its extension.
    pub fn for_path(out_path: impl Into<PathBuf>) -> WheelResult<Self> {
        let out_path = out_path.into();
        let format = ExportFormat::from_path(&out_path)?;
        Ok(Self {
            out_path,
            format,
            overwrite: true,
            bg_rgba: [255, 255, 255, 255],
        })
    }
}

/// A written artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedArtifact {
    /// File that was written.
    pub path: PathBuf,
    /// Container.
    pub format: ExportFormat,
    /// File size.
    pub bytes: u64,
    /// Frames handed to the encoder, counting unrolled loops.
    pub frames_written: u64,
}

/// Encodes a complete frame list in one blocking pass.
#[derive(Clone, Debug)]
pub struct Exporter {
    opts: ExportOpts,
}

impl Exporter {
    /// Create an exporter.
    pub fn new(opts: ExportOpts) -> Self {
        Self { opts }
    }

    /// Export options.
    pub fn opts(&self) -> &ExportOpts {
        &self.opts
    }

    /// Write `frames` in order at `spec.fps`, honoring `spec.loop_count`.
    ///
    /// On failure the partially written file is removed and the error is an `ExportFailure`.
    #[tracing::instrument(
        skip(self, frames, spec),
        fields(out = %self.opts.out_path.display(), format = ?self.opts.format, frames = frames.len())
    )]
    pub fn export(&self, frames: &[Frame], spec: &AnimationSpec) -> WheelResult<ExportedArtifact> {
        let opts = &self.opts;
        let mut sink: Box<dyn FrameSink> = match opts.format {
            ExportFormat::Gif => Box::new(GifSink::new(GifSinkOpts {
                overwrite: opts.overwrite,
                bg_rgba: opts.bg_rgba,
                ..GifSinkOpts::new(&opts.out_path)
            })),
            ExportFormat::Mp4 => Box::new(FfmpegSink::new(FfmpegSinkOpts {
                overwrite: opts.overwrite,
                bg_rgba: opts.bg_rgba,
                ..FfmpegSinkOpts::new(&opts.out_path)
            })),
        };
        let passes = opts.format.passes(spec.loop_count);
        let frames_written = export_to_sink(sink.as_mut(), frames, spec, passes)?;

        let bytes = std::fs::metadata(&opts.out_path)
            .map(|m| m.len())
            .map_err(|e| {
                WheelError::export_failure(format!(
                    "cannot stat '{}' after encoding: {e}",
                    opts.out_path.display()
                ))
            })?;
        if bytes == 0 {
            remove_partial(&opts.out_path);
            return Err(WheelError::export_failure(format!(
                "encoder produced an empty file at '{}'",
                opts.out_path.display()
            )));
        }

        tracing::debug!(bytes, frames_written, "artifact written");
        Ok(ExportedArtifact {
            path: opts.out_path.clone(),
            format: opts.format,
            bytes,
            frames_written,
        })
    }
}

/// Stream `frames` into `sink` `passes` times, aborting the sink on any failure.
///
/// Returns the number of frames pushed. Errors are reported as `ExportFailure`.
pub fn export_to_sink(
    sink: &mut dyn FrameSink,
    frames: &[Frame],
    spec: &AnimationSpec,
    passes: u32,
) -> WheelResult<u64> {
    let first = frames
        .first()
        .ok_or_else(|| WheelError::export_failure("no frames to export"))?;
    if frames.windows(2).any(|w| w[1].index <= w[0].index) {
        return Err(WheelError::export_failure(
            "frames are not in strictly increasing step order",
        ));
    }
    spec.validate().map_err(as_export_failure)?;
    let cfg = SinkConfig {
        width: first.image.width,
        height: first.image.height,
        fps: spec.frame_rate().map_err(as_export_failure)?,
        loop_count: spec.loop_count,
    };

    match push_all(sink, cfg, frames, passes) {
        Ok(n) => Ok(n),
        Err(e) => {
            sink.abort();
            Err(as_export_failure(e))
        }
    }
}

fn push_all(
    sink: &mut dyn FrameSink,
    cfg: SinkConfig,
    frames: &[Frame],
    passes: u32,
) -> WheelResult<u64> {
    sink.begin(cfg)?;
    let mut idx = 0u64;
    for _ in 0..passes.max(1) {
        for frame in frames {
            sink.push_frame(FrameIndex(idx), &frame.image)?;
            idx += 1;
        }
    }
    sink.end()?;
    Ok(idx)
}

fn as_export_failure(e: WheelError) -> WheelError {
    match e {
        WheelError::ExportFailure(_) => e,
        other => WheelError::export_failure(other.to_string()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/exporter.rs"]
mod tests;
