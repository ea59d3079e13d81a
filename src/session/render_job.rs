//! One render job end to end: configuration in, artifact and winner out.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::animation::sequencer::{CancelToken, Sequencer};
use crate::config::job::JobConfig;
use crate::encode::exporter::{ExportFormat, ExportOpts, Exporter};
use crate::foundation::error::{WheelError, WheelResult};
use crate::render::frame::FrameRGBA;
use crate::wheel::state::Wheel;

/// Outcome of a finished job.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderResult {
    /// Written artifact.
    pub artifact_path: PathBuf,
    /// Index of the participant under the pointer on the last frame.
    pub winner_index: usize,
    /// That participant's name.
    pub winner_name: String,
    /// Distinct frames rendered (loop repeats not counted).
    pub frame_count: u64,
    /// Wheel rotation of the last frame, in `[0, 360)`.
    pub final_angle: f64,
    /// Artifact size on disk.
    pub bytes: u64,
    /// Seed the styling and spin were drawn from.
    pub seed: u64,
}

/// A configured job. Each run owns an independent wheel and sequencer.
#[derive(Clone, Debug)]
pub struct RenderJob {
    config: JobConfig,
    out_path: PathBuf,
    format: Option<ExportFormat>,
    cancel: CancelToken,
}

impl RenderJob {
    /// Job writing to `out_path`; the format comes from its extension unless overridden.
    pub fn new(config: JobConfig, out_path: impl Into<PathBuf>) -> Self {
        Self {
            config,
            out_path: out_path.into(),
            format: None,
            cancel: CancelToken::new(),
        }
    }

    /// Force the artifact format.
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Token that aborts this job when cancelled from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Job configuration.
    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Output path.
    pub fn out_path(&self) -> &Path {
        &self.out_path
    }

    /// Format the artifact will be written in.
    pub fn format(&self) -> WheelResult<ExportFormat> {
        match self.format {
            Some(f) => Ok(f),
            None => ExportFormat::from_path(&self.out_path),
        }
    }

    /// Validate, render every frame, export, and resolve the winner.
    ///
    /// Configuration errors surface before any frame is rendered. A cancelled job writes nothing.
    #[tracing::instrument(
        skip(self),
        fields(
            out = %self.out_path.display(),
            participants = self.config.participants.len(),
        )
    )]
    pub fn run(&self) -> WheelResult<RenderResult> {
        let format = self.preflight()?;
        let seed = self.resolve_seed();
        let mut rng = StdRng::seed_from_u64(seed);

        let wheel = self.build_wheel(&mut rng)?;
        let animation = self.config.animation;
        let mut sequencer = Sequencer::new(wheel, animation, self.config.spin)?
            .with_threading(self.config.render);
        let outcome = sequencer.run(&mut rng, &self.cancel)?;
        if self.cancel.is_cancelled() {
            return Err(WheelError::Cancelled);
        }

        let exporter = Exporter::new(ExportOpts {
            out_path: self.out_path.clone(),
            format,
            overwrite: true,
            bg_rgba: self.config.style.background,
        });
        let artifact = exporter.export(&outcome.frames, &animation)?;

        let winner_name = self
            .config
            .participants
            .get(outcome.winner_index)
            .cloned()
            .ok_or_else(|| {
                WheelError::render_failure(format!(
                    "winner index {} is out of range",
                    outcome.winner_index
                ))
            })?;
        tracing::info!(
            winner = %winner_name,
            winner_index = outcome.winner_index,
            path = %artifact.path.display(),
            frames = outcome.frames.len(),
            bytes = artifact.bytes,
            "render job finished"
        );

        Ok(RenderResult {
            artifact_path: artifact.path,
            winner_index: outcome.winner_index,
            winner_name,
            frame_count: outcome.frames.len() as u64,
            final_angle: outcome.final_angle,
            bytes: artifact.bytes,
            seed,
        })
    }

    /// Render the job's wheel at a fixed rotation without animating or exporting.
    pub fn render_frame_at(&self, angle_degrees: f64) -> WheelResult<FrameRGBA> {
        self.config.validate()?;
        let mut rng = StdRng::seed_from_u64(self.resolve_seed());
        let mut wheel = self.build_wheel(&mut rng)?;
        wheel.set_angle(angle_degrees)?;
        wheel.render()
    }

    fn preflight(&self) -> WheelResult<ExportFormat> {
        self.config.validate()?;
        let format = self.format()?;
        let size = self.config.style.size;
        if format == ExportFormat::Mp4 && !size.is_multiple_of(2) {
            return Err(WheelError::invalid_configuration(format!(
                "mp4 output needs an even canvas size, got {size}"
            )));
        }
        Ok(format)
    }

    fn resolve_seed(&self) -> u64 {
        match self.config.seed {
            Some(seed) => seed,
            None => {
                let seed: u64 = rand::rng().random();
                tracing::info!(seed, "no seed configured; drew one from entropy");
                seed
            }
        }
    }

    fn build_wheel(&self, rng: &mut StdRng) -> WheelResult<Wheel> {
        let style = &self.config.style;
        let opts = style.compositor_opts(self.config.participants.len())?;
        Wheel::with_texture_strokes(
            self.config.participants.clone(),
            opts,
            style.texture_strokes,
            rng,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_job.rs"]
mod tests;
