//! Wheelspin renders prize-wheel spin animations.
//!
//! A job takes a participant list and an animation spec, rotates a styled wheel through a
//! sequence of random deltas, and writes the frames as a looping GIF or an MP4:
//!
//! - Describe the job with a [`JobConfig`] (or build a [`Wheel`] and [`Sequencer`] directly)
//! - Run it with a [`RenderJob`]
//! - Read the winner and artifact path from the [`RenderResult`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Spin animation: timing, rotation deltas and the frame sequencer.
pub mod animation;
/// JSON job configuration.
pub mod config;
/// Raster kernels used by the compositor.
pub mod effects;
/// Encoding sinks and the exporter.
pub mod encode;
/// Wheel geometry.
pub mod geometry;
/// Layer compositor and frame types.
pub mod render;
/// End-to-end render jobs.
pub mod session;
/// Wheel state and styling.
pub mod wheel;

pub use crate::foundation::core::{Affine, Canvas, Fps, FrameIndex, Point, normalize_degrees};
pub use crate::foundation::error::{WheelError, WheelResult};

pub use crate::animation::sequencer::{
    CancelToken, RenderThreading, Sequencer, SequencerState, SpinOutcome,
};
pub use crate::animation::spec::AnimationSpec;
pub use crate::animation::spin::SpinProfile;
pub use crate::config::job::{JobConfig, StyleConfig};
pub use crate::encode::exporter::{ExportFormat, ExportOpts, ExportedArtifact, Exporter};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::gif::{GifSink, GifSinkOpts};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::geometry::segments::{
    MIN_PARTICIPANTS, Segment, compute_segments, label_anchor, pointer_wheel_angle, segment_at,
    winner_index,
};
pub use crate::render::compositor::{CompositorOpts, GradientFill, GradientKind, WheelLayers};
pub use crate::render::frame::{Frame, FrameRGBA};
pub use crate::render::text::LabelFont;
pub use crate::session::render_job::{RenderJob, RenderResult};
pub use crate::wheel::state::Wheel;
pub use crate::wheel::style::WheelStyle;
