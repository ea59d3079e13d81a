use std::sync::OnceLock;

use rand::Rng;

use crate::foundation::core::normalize_degrees;
use crate::foundation::error::{WheelError, WheelResult};
use crate::geometry::segments::{Segment, compute_segments, winner_index};
use crate::render::compositor::{CompositorOpts, WheelLayers, compose_layers, render_frame};
use crate::render::frame::FrameRGBA;
use crate::render::layers::LayerScene;
use crate::wheel::style::{DEFAULT_TEXTURE_STROKES, WheelStyle};

/// A prize wheel for one render job.
///
/// Participants, segments and styling are fixed at construction. Only the rotation changes, and
/// rendering is a pure function of it. The composed layers are built on first render and reused.
#[derive(Debug)]
pub struct Wheel {
    participants: Vec<String>,
    segments: Vec<Segment>,
    style: WheelStyle,
    opts: CompositorOpts,
    current_angle: f64,
    cumulative_rotation: f64,
    layers: OnceLock<WheelLayers>,
}

impl Wheel {
    /// Build a wheel, drawing its styling from `rng`.
    pub fn new(
        participants: Vec<String>,
        opts: CompositorOpts,
        rng: &mut impl Rng,
    ) -> WheelResult<Self> {
        Self::with_texture_strokes(participants, opts, DEFAULT_TEXTURE_STROKES, rng)
    }

    /// Like [`Wheel::new`] with an explicit number of texture strokes per segment.
    pub fn with_texture_strokes(
        participants: Vec<String>,
        opts: CompositorOpts,
        texture_strokes: usize,
        rng: &mut impl Rng,
    ) -> WheelResult<Self> {
        let segments = compute_segments(participants.len())?;
        let style = WheelStyle::random(rng, segments.len(), texture_strokes);
        Self::assemble(participants, segments, style, opts)
    }

    /// Build a wheel with caller-provided styling.
    pub fn with_style(
        participants: Vec<String>,
        style: WheelStyle,
        opts: CompositorOpts,
    ) -> WheelResult<Self> {
        let segments = compute_segments(participants.len())?;
        if style.segments.len() != segments.len() {
            return Err(WheelError::invalid_configuration(format!(
                "style has {} segments, wheel has {}",
                style.segments.len(),
                segments.len()
            )));
        }
        Self::assemble(participants, segments, style, opts)
    }

    fn assemble(
        participants: Vec<String>,
        segments: Vec<Segment>,
        style: WheelStyle,
        opts: CompositorOpts,
    ) -> WheelResult<Self> {
        opts.validate()?;
        Ok(Self {
            participants,
            segments,
            style,
            opts,
            current_angle: 0.0,
            cumulative_rotation: 0.0,
            layers: OnceLock::new(),
        })
    }

    /// Participant names in segment order.
    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    /// Segment table.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Fixed styling.
    pub fn style(&self) -> &WheelStyle {
        &self.style
    }

    /// Compositor settings.
    pub fn opts(&self) -> &CompositorOpts {
        &self.opts
    }

    /// Rotation in `[0, 360)`.
    pub fn current_angle(&self) -> f64 {
        self.current_angle
    }

    /// Sum of every delta applied so far (not normalized).
    pub fn cumulative_rotation(&self) -> f64 {
        self.cumulative_rotation
    }

    /// Add `delta_degrees` to the rotation and return the normalized angle.
    pub fn rotate(&mut self, delta_degrees: f64) -> WheelResult<f64> {
        if !delta_degrees.is_finite() {
            return Err(WheelError::invalid_configuration(
                "rotation delta must be finite",
            ));
        }
        self.cumulative_rotation += delta_degrees;
        self.current_angle = normalize_degrees(self.current_angle + delta_degrees);
        Ok(self.current_angle)
    }

    /// Jump straight to `angle_degrees` (normalized).
    pub fn set_angle(&mut self, angle_degrees: f64) -> WheelResult<()> {
        if !angle_degrees.is_finite() {
            return Err(WheelError::invalid_configuration("angle must be finite"));
        }
        self.current_angle = normalize_degrees(angle_degrees);
        Ok(())
    }

    /// Put the rotation back to a previously read `(current_angle, cumulative_rotation)` pair.
    pub(crate) fn restore_rotation(&mut self, (angle, cumulative): (f64, f64)) {
        self.current_angle = angle;
        self.cumulative_rotation = cumulative;
    }

    /// Composed layers, built on first use.
    pub fn layers(&self) -> WheelResult<&WheelLayers> {
        if let Some(layers) = self.layers.get() {
            return Ok(layers);
        }
        let scene = LayerScene::new(&self.opts, &self.segments, &self.participants, &self.style);
        let built = compose_layers(&scene)?;
        Ok(self.layers.get_or_init(|| built))
    }

    /// Render the wheel at its current angle.
    pub fn render(&self) -> WheelResult<FrameRGBA> {
        self.render_at(self.current_angle)
    }

    /// Render the wheel at `angle_degrees` without changing its state.
    pub fn render_at(&self, angle_degrees: f64) -> WheelResult<FrameRGBA> {
        render_frame(self.layers()?, angle_degrees)
    }

    /// Participant under the pointer at the current angle.
    pub fn winner(&self) -> WheelResult<usize> {
        winner_index(&self.segments, self.current_angle)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/wheel/state.rs"]
mod tests;
