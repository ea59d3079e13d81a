//! Fixed layer pipeline: styling in, premultiplied frames out.
//!
//! Layers 1-6 do not depend on the rotation, so they are composed once into an unrotated wheel
//! layer. Each frame rotates that layer (expanding bounds), crops back to the job canvas and
//! draws the fixed pointer over it.

use crate::effects::composite::over_in_place;
use crate::effects::rotate::{crop_center, rotate_expand};
use crate::foundation::core::Canvas;
use crate::foundation::error::{WheelError, WheelResult};
use crate::render::frame::FrameRGBA;
use crate::render::layers::{
    LayerScene, depth_layer, glow_layer, gradient_layer, pointer_layer, segments_layer,
    shadow_layer, twinkle_layer,
};
use crate::render::text::LabelFont;

/// Canvas side the default pixel sizes are tuned for.
pub const REFERENCE_SIDE: f64 = 500.0;

/// Shape of the base gradient.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientKind {
    /// `inner` at the hub, `outer` at the rim.
    #[default]
    Radial,
    /// `inner` at the top of the disc, `outer` at the bottom.
    Linear,
}

/// Base gradient fill under the segments (straight-alpha colors).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GradientFill {
    /// Gradient shape.
    #[serde(default)]
    pub kind: GradientKind,
    /// Start color.
    pub inner: [u8; 4],
    /// End color.
    pub outer: [u8; 4],
}

impl Default for GradientFill {
    fn default() -> Self {
        Self {
            kind: GradientKind::Radial,
            inner: [255, 244, 214, 255],
            outer: [196, 110, 36, 255],
        }
    }
}

/// Blur radius and blend opacity of one overlay layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlurLayerOpts {
    /// Gaussian kernel half-width in pixels.
    pub blur_px: u32,
    /// Blend opacity; 0 skips the layer.
    pub opacity: f32,
}

/// Participant label settings.
#[derive(Clone, Debug)]
pub struct LabelOpts {
    /// Font used for every label.
    pub font: LabelFont,
    /// Font size in pixels.
    pub size_px: f32,
    /// Display names longer than this are truncated.
    pub max_chars: usize,
    /// Straight-alpha text color.
    pub rgba: [u8; 4],
}

/// Everything the compositor needs besides per-segment styling.
#[derive(Clone, Debug)]
pub struct CompositorOpts {
    /// Output canvas.
    pub canvas: Canvas,
    /// Wheel radius as a fraction of the canvas side.
    pub wheel_radius: f64,
    /// Label anchor radius as a fraction of the wheel radius.
    pub label_radius: f64,
    /// Layer 1.
    pub gradient: GradientFill,
    /// Draw the random line textures in layer 2.
    pub textures: bool,
    /// Draw participant names in layer 2. `None` skips labels.
    pub labels: Option<LabelOpts>,
    /// Layer 3.
    pub shadow: BlurLayerOpts,
    /// Layer 4.
    pub depth: BlurLayerOpts,
    /// Layer 5 opacity.
    pub twinkle_opacity: f32,
    /// Layer 6.
    pub glow: BlurLayerOpts,
    /// Alpha of the white glow disc before blurring.
    pub glow_alpha: u8,
    /// Blur radius of the pointer drop shadow.
    pub pointer_blur_px: u32,
}

impl CompositorOpts {
    /// Defaults for a wheel of `participant_count` segments, with pixel sizes scaled to `canvas`.
    pub fn new(canvas: Canvas, participant_count: usize) -> Self {
        let scale = f64::from(canvas.width) / REFERENCE_SIDE;
        Self {
            canvas,
            wheel_radius: 0.4,
            label_radius: 0.62,
            gradient: GradientFill::default(),
            textures: true,
            labels: None,
            shadow: BlurLayerOpts {
                blur_px: default_shadow_blur_px(participant_count, scale),
                opacity: 1.0,
            },
            depth: BlurLayerOpts {
                blur_px: scaled_px(12.0, scale),
                opacity: 0.5,
            },
            twinkle_opacity: 1.0,
            glow: BlurLayerOpts {
                blur_px: scaled_px(50.0, scale),
                opacity: 1.0,
            },
            glow_alpha: 96,
            pointer_blur_px: scaled_px(5.0, scale),
        }
    }

    /// Fills, outlines and pointer only: no textures, labels or overlays.
    pub fn plain(mut self) -> Self {
        self.textures = false;
        self.labels = None;
        self.shadow.opacity = 0.0;
        self.depth.opacity = 0.0;
        self.twinkle_opacity = 0.0;
        self.glow.opacity = 0.0;
        self
    }

    /// Ratio of the canvas side to [`REFERENCE_SIDE`].
    pub fn scale(&self) -> f64 {
        f64::from(self.canvas.width) / REFERENCE_SIDE
    }

    /// Wheel radius in pixels.
    pub fn radius_px(&self) -> f64 {
        f64::from(self.canvas.width.min(self.canvas.height)) * self.wheel_radius
    }

    /// Reject values the layer producers cannot honor.
    pub fn validate(&self) -> WheelResult<()> {
        if !(self.wheel_radius > 0.0 && self.wheel_radius <= 0.5) {
            return Err(WheelError::invalid_configuration(
                "wheel radius must be within (0, 0.5] of the canvas side",
            ));
        }
        if !(self.label_radius > 0.0 && self.label_radius <= 1.0) {
            return Err(WheelError::invalid_configuration(
                "label radius must be within (0, 1] of the wheel radius",
            ));
        }
        for (name, v) in [
            ("shadow", self.shadow.opacity),
            ("depth", self.depth.opacity),
            ("twinkle", self.twinkle_opacity),
            ("glow", self.glow.opacity),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(WheelError::invalid_configuration(format!(
                    "{name} opacity must be within [0, 1], got {v}"
                )));
            }
        }
        let side = self.canvas.width.max(self.canvas.height);
        for (name, px) in [
            ("shadow", self.shadow.blur_px),
            ("depth", self.depth.blur_px),
            ("glow", self.glow.blur_px),
            ("pointer", self.pointer_blur_px),
        ] {
            if px > side {
                return Err(WheelError::invalid_configuration(format!(
                    "{name} blur radius must be <= the canvas side ({side}px), got {px}"
                )));
            }
        }
        if let Some(labels) = &self.labels
            && (!labels.size_px.is_finite() || labels.size_px <= 0.0)
        {
            return Err(WheelError::invalid_configuration(
                "label size must be finite and > 0",
            ));
        }
        Ok(())
    }
}

/// Round a pixel size given at [`REFERENCE_SIDE`] to the current canvas.
pub fn scaled_px(reference_px: f64, scale: f64) -> u32 {
    (reference_px * scale).round().max(0.0) as u32
}

/// Shadow blur of half a segment's angular size, read as pixels at [`REFERENCE_SIDE`].
pub fn default_shadow_blur_px(participant_count: usize, scale: f64) -> u32 {
    let segment_deg = 360.0 / participant_count.max(1) as f64;
    scaled_px(segment_deg / 2.0, scale)
}

/// Rotating layers, blended bottom to top.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelLayer {
    /// Base disc gradient.
    Gradient,
    /// Wedge fills, textures, outlines and labels.
    Segments,
    /// Blurred dark ellipse per segment, masked to the wedge.
    Shadow,
    /// Blurred dark rim.
    Depth,
    /// Low-alpha white highlight per segment.
    Twinkle,
    /// Blurred white disc over the hub.
    Glow,
}

impl WheelLayer {
    /// Blend order.
    pub const ORDER: [Self; 6] = [
        Self::Gradient,
        Self::Segments,
        Self::Shadow,
        Self::Depth,
        Self::Twinkle,
        Self::Glow,
    ];

    fn opacity(self, opts: &CompositorOpts) -> f32 {
        match self {
            Self::Gradient | Self::Segments => 1.0,
            Self::Shadow => opts.shadow.opacity,
            Self::Depth => opts.depth.opacity,
            Self::Twinkle => opts.twinkle_opacity,
            Self::Glow => opts.glow.opacity,
        }
    }

    fn produce(self, scene: &LayerScene<'_>) -> WheelResult<Vec<u8>> {
        match self {
            Self::Gradient => Ok(gradient_layer(scene)),
            Self::Segments => segments_layer(scene),
            Self::Shadow => shadow_layer(scene),
            Self::Depth => depth_layer(scene),
            Self::Twinkle => twinkle_layer(scene),
            Self::Glow => glow_layer(scene),
        }
    }
}

/// Composed per-job layers, reused for every frame.
#[derive(Clone, Debug)]
pub struct WheelLayers {
    canvas: Canvas,
    wheel: Vec<u8>,
    pointer: Vec<u8>,
}

impl WheelLayers {
    /// Job canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Unrotated wheel (layers 1-6), premultiplied RGBA8.
    pub fn wheel(&self) -> &[u8] {
        &self.wheel
    }

    /// Pointer layer, premultiplied RGBA8.
    pub fn pointer(&self) -> &[u8] {
        &self.pointer
    }
}

#[tracing::instrument(
    skip_all,
    fields(segments = scene.segments.len(), side = scene.canvas.width)
)]
pub(crate) fn compose_layers(scene: &LayerScene<'_>) -> WheelResult<WheelLayers> {
    scene.opts.validate()?;
    let mut wheel = vec![0u8; scene.canvas.rgba_len()];
    for layer in WheelLayer::ORDER {
        let opacity = layer.opacity(scene.opts);
        if opacity <= 0.0 {
            tracing::debug!(?layer, "layer skipped");
            continue;
        }
        let pixels = layer.produce(scene)?;
        over_in_place(&mut wheel, &pixels, opacity)?;
    }
    let pointer = pointer_layer(scene)?;
    Ok(WheelLayers {
        canvas: scene.canvas,
        wheel,
        pointer,
    })
}

/// Rotate the wheel layer clockwise by `angle_deg` and draw the pointer over it.
pub fn render_frame(layers: &WheelLayers, angle_deg: f64) -> WheelResult<FrameRGBA> {
    if !angle_deg.is_finite() {
        return Err(WheelError::render_failure("frame angle must be finite"));
    }
    let Canvas { width, height } = layers.canvas;
    let rotated = rotate_expand(&layers.wheel, width, height, angle_deg)?;
    let mut data = crop_center(&rotated, width, height)?;
    over_in_place(&mut data, &layers.pointer, 1.0)?;
    Ok(FrameRGBA {
        width,
        height,
        data,
        premultiplied: true,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
