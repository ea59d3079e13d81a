//! JSON job configuration.
//!
//! Every field has a default, so a minimal job file only lists participants:
//!
//! ```json
//! { "participants": ["Ann", "Bo", "Cy", "Di", "Ed"] }
//! ```

use std::path::{Path, PathBuf};

use crate::animation::sequencer::RenderThreading;
use crate::animation::spec::AnimationSpec;
use crate::animation::spin::SpinProfile;
use crate::foundation::core::Canvas;
use crate::foundation::error::{WheelError, WheelResult};
use crate::geometry::segments::MIN_PARTICIPANTS;
use crate::render::compositor::{BlurLayerOpts, CompositorOpts, GradientFill, LabelOpts};
use crate::render::text::LabelFont;
use crate::wheel::style::DEFAULT_TEXTURE_STROKES;

/// Longest display name drawn on the wheel.
pub const DEFAULT_LABEL_MAX_CHARS: usize = 21;

/// One render job.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    /// Display names, one segment each, in wheel order.
    pub participants: Vec<String>,
    /// Upper bound on participants. `None` means unbounded.
    pub max_participants: Option<usize>,
    /// Frame count, rate and looping.
    pub animation: AnimationSpec,
    /// Seed for styling and spin. `None` draws one from system entropy.
    pub seed: Option<u64>,
    /// Rotation deltas.
    pub spin: SpinProfile,
    /// Look of the wheel.
    pub style: StyleConfig,
    /// Frame-level threading.
    pub render: RenderThreading,
}

impl JobConfig {
    /// Read and parse a JSON job file.
    pub fn from_path(path: &Path) -> WheelResult<Self> {
        use anyhow::Context as _;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read job config '{}'", path.display()))?;
        Self::from_json(&text)
    }

    /// Parse a JSON job description.
    pub fn from_json(text: &str) -> WheelResult<Self> {
        serde_json::from_str(text).map_err(|e| WheelError::serde(e.to_string()))
    }

    /// Check everything that can be checked before rendering starts.
    pub fn validate(&self) -> WheelResult<()> {
        let n = self.participants.len();
        if n < MIN_PARTICIPANTS {
            return Err(WheelError::invalid_configuration(format!(
                "a wheel needs at least {MIN_PARTICIPANTS} participants, got {n}"
            )));
        }
        if let Some(max) = self.max_participants
            && n > max
        {
            return Err(WheelError::invalid_configuration(format!(
                "{n} participants exceed the limit of {max}"
            )));
        }
        self.animation.validate()?;
        self.spin.validate()?;
        self.style.validate()?;
        if self.render.threads == Some(0) {
            return Err(WheelError::invalid_configuration(
                "render threading 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

/// Visual settings. Pixel sizes left as `None` are derived from the canvas size.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    /// Square canvas side in pixels.
    pub size: u32,
    /// Wheel radius as a fraction of the canvas side.
    pub wheel_radius: f64,
    /// Label radius as a fraction of the wheel radius.
    pub label_radius: f64,
    /// TrueType/OpenType font for labels. `None` renders without labels.
    pub font: Option<PathBuf>,
    /// Label size in pixels at a 500px canvas.
    pub label_size: f32,
    /// Names longer than this are truncated on the wheel.
    pub label_max_chars: usize,
    /// Label color (straight RGBA8).
    pub label_rgba: [u8; 4],
    /// Base gradient.
    pub gradient: GradientFill,
    /// Draw random line textures over each segment.
    pub textures: bool,
    /// Texture strokes per segment.
    pub texture_strokes: usize,
    /// Segment shadow blur. Defaults to half a segment's angular size.
    pub shadow_blur_px: Option<u32>,
    /// Segment shadow opacity.
    pub shadow_opacity: f32,
    /// Rim ring blur.
    pub depth_blur_px: Option<u32>,
    /// Rim ring opacity.
    pub depth_opacity: f32,
    /// Twinkle highlight opacity.
    pub twinkle_opacity: f32,
    /// Glow blur.
    pub glow_blur_px: Option<u32>,
    /// Glow disc alpha before blurring.
    pub glow_alpha: u8,
    /// Glow opacity.
    pub glow_opacity: f32,
    /// Pointer drop shadow blur.
    pub pointer_blur_px: Option<u32>,
    /// Opaque background the frames are flattened over on export.
    pub background: [u8; 4],
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            size: 500,
            wheel_radius: 0.4,
            label_radius: 0.62,
            font: None,
            label_size: 40.0,
            label_max_chars: DEFAULT_LABEL_MAX_CHARS,
            label_rgba: [255, 255, 255, 255],
            gradient: GradientFill::default(),
            textures: true,
            texture_strokes: DEFAULT_TEXTURE_STROKES,
            shadow_blur_px: None,
            shadow_opacity: 1.0,
            depth_blur_px: None,
            depth_opacity: 0.5,
            twinkle_opacity: 1.0,
            glow_blur_px: None,
            glow_alpha: 96,
            glow_opacity: 1.0,
            pointer_blur_px: None,
            background: [255, 255, 255, 255],
        }
    }
}

impl StyleConfig {
    /// Validate without touching the filesystem.
    pub fn validate(&self) -> WheelResult<()> {
        let canvas = Canvas::square(self.size)?;
        if !self.label_size.is_finite() || self.label_size <= 0.0 {
            return Err(WheelError::invalid_configuration(
                "label_size must be finite and > 0",
            ));
        }
        if self.background[3] != 255 {
            return Err(WheelError::invalid_configuration(
                "background must be opaque",
            ));
        }
        self.opts_without_font(canvas, MIN_PARTICIPANTS).validate()
    }

    /// Canvas described by `size`.
    pub fn canvas(&self) -> WheelResult<Canvas> {
        Canvas::square(self.size)
    }

    /// Build compositor options for `participant_count` segments, loading the label font.
    ///
    /// An unreadable font is a `RenderFailure`.
    pub fn compositor_opts(&self, participant_count: usize) -> WheelResult<CompositorOpts> {
        let canvas = self.canvas()?;
        let mut opts = self.opts_without_font(canvas, participant_count);
        opts.labels = match &self.font {
            Some(path) => Some(LabelOpts {
                font: LabelFont::load(path)?,
                size_px: (f64::from(self.label_size) * opts.scale()) as f32,
                max_chars: self.label_max_chars,
                rgba: self.label_rgba,
            }),
            None => {
                tracing::warn!("no label font configured; rendering without participant names");
                None
            }
        };
        opts.validate()?;
        Ok(opts)
    }

    fn opts_without_font(&self, canvas: Canvas, participant_count: usize) -> CompositorOpts {
        let defaults = CompositorOpts::new(canvas, participant_count);
        CompositorOpts {
            canvas,
            wheel_radius: self.wheel_radius,
            label_radius: self.label_radius,
            gradient: self.gradient,
            textures: self.textures && self.texture_strokes > 0,
            labels: None,
            shadow: BlurLayerOpts {
                blur_px: self.shadow_blur_px.unwrap_or(defaults.shadow.blur_px),
                opacity: self.shadow_opacity,
            },
            depth: BlurLayerOpts {
                blur_px: self.depth_blur_px.unwrap_or(defaults.depth.blur_px),
                opacity: self.depth_opacity,
            },
            twinkle_opacity: self.twinkle_opacity,
            glow: BlurLayerOpts {
                blur_px: self.glow_blur_px.unwrap_or(defaults.glow.blur_px),
                opacity: self.glow_opacity,
            },
            glow_alpha: self.glow_alpha,
            pointer_blur_px: self.pointer_blur_px.unwrap_or(defaults.pointer_blur_px),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/job.rs"]
mod tests;
