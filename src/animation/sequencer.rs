//! Drives the wheel through `duration_frames` rotation steps and resolves the winner.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::Rng;
use rayon::prelude::*;

use crate::animation::spec::AnimationSpec;
use crate::animation::spin::SpinProfile;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{WheelError, WheelResult};
use crate::geometry::segments::winner_index;
use crate::render::frame::Frame;
use crate::wheel::state::Wheel;

/// Shared flag for aborting a job between steps.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Return `true` once [`CancelToken::cancel`] was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Frame-level threading options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderThreading {
    /// Render frames on a rayon pool.
    pub parallel: bool,
    /// Worker count for the pool. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

/// Sequencer lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequencerState {
    /// Not started, or reset after a failed run.
    Idle,
    /// Rendering step `step` (0-based).
    Rotating {
        /// Current step.
        step: u64,
    },
    /// All frames rendered; resolving the winner.
    Finalizing,
    /// Outputs are final.
    Done,
}

/// Outputs of a finished sequence.
#[derive(Clone, Debug)]
pub struct SpinOutcome {
    /// Frames in step order.
    pub frames: Vec<Frame>,
    /// Participant under the pointer on the last frame.
    pub winner_index: usize,
    /// Rotation of the last frame, in `[0, 360)`.
    pub final_angle: f64,
}

/// Owns the wheel for one job and turns it into frames.
#[derive(Debug)]
pub struct Sequencer {
    wheel: Wheel,
    spec: AnimationSpec,
    spin: SpinProfile,
    threading: RenderThreading,
    state: SequencerState,
}

struct Step {
    index: FrameIndex,
    angle: f64,
    cumulative_rotation: f64,
}

impl Sequencer {
    /// Create an idle sequencer. The animation spec and spin profile are validated up front.
    pub fn new(wheel: Wheel, spec: AnimationSpec, spin: SpinProfile) -> WheelResult<Self> {
        spec.validate()?;
        spin.validate()?;
        Ok(Self {
            wheel,
            spec,
            spin,
            threading: RenderThreading::default(),
            state: SequencerState::Idle,
        })
    }

    /// Use `threading` for the next run.
    pub fn with_threading(mut self, threading: RenderThreading) -> Self {
        self.threading = threading;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// The wheel being driven.
    pub fn wheel(&self) -> &Wheel {
        &self.wheel
    }

    /// Render every step and resolve the winner.
    ///
    /// Any failure, including cancellation, drops the frames rendered so far, rolls the wheel back
    /// to its rotation before the run and leaves the sequencer `Idle`.
    #[tracing::instrument(
        skip(self, rng, cancel),
        fields(
            frames = self.spec.duration_frames,
            parallel = self.threading.parallel,
        )
    )]
    pub fn run(&mut self, rng: &mut impl Rng, cancel: &CancelToken) -> WheelResult<SpinOutcome> {
        if self.state != SequencerState::Idle {
            return Err(WheelError::invalid_configuration(
                "sequencer has already run",
            ));
        }
        let before = (self.wheel.current_angle(), self.wheel.cumulative_rotation());
        let result = self.run_inner(rng, cancel);
        if result.is_err() {
            self.wheel.restore_rotation(before);
            self.state = SequencerState::Idle;
        }
        result
    }

    fn run_inner(&mut self, rng: &mut impl Rng, cancel: &CancelToken) -> WheelResult<SpinOutcome> {
        let pool = if self.threading.parallel {
            Some(build_thread_pool(self.threading.threads)?)
        } else {
            None
        };
        let deltas = self.spin.plan(self.spec.duration_frames, rng)?;
        let frames = if let Some(pool) = &pool {
            self.rotate_parallel(&deltas, pool, cancel)?
        } else {
            self.rotate_sequential(&deltas, cancel)?
        };

        self.state = SequencerState::Finalizing;
        let final_angle = self.wheel.current_angle();
        let winner_index = winner_index(self.wheel.segments(), final_angle)?;
        tracing::debug!(final_angle, winner_index, "sequence finalized");

        self.state = SequencerState::Done;
        Ok(SpinOutcome {
            frames,
            winner_index,
            final_angle,
        })
    }

    fn rotate_sequential(
        &mut self,
        deltas: &[f64],
        cancel: &CancelToken,
    ) -> WheelResult<Vec<Frame>> {
        let mut frames = Vec::with_capacity(deltas.len());
        for (i, &delta) in deltas.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(WheelError::Cancelled);
            }
            let step = i as u64;
            self.state = SequencerState::Rotating { step };
            let angle = self.wheel.rotate(delta)?;
            tracing::debug!(step, delta, angle, "rotate");
            let image = self.wheel.render()?;
            frames.push(Frame {
                index: FrameIndex(step),
                angle,
                cumulative_rotation: self.wheel.cumulative_rotation(),
                image,
            });
        }
        Ok(frames)
    }

    fn rotate_parallel(
        &mut self,
        deltas: &[f64],
        pool: &rayon::ThreadPool,
        cancel: &CancelToken,
    ) -> WheelResult<Vec<Frame>> {
        // Angles only depend on the deltas, so the whole plan is resolved before any rendering
        // and each frame keeps its step index.
        let mut steps = Vec::with_capacity(deltas.len());
        for (i, &delta) in deltas.iter().enumerate() {
            let step = i as u64;
            self.state = SequencerState::Rotating { step };
            let angle = self.wheel.rotate(delta)?;
            tracing::debug!(step, delta, angle, "rotate");
            steps.push(Step {
                index: FrameIndex(step),
                angle,
                cumulative_rotation: self.wheel.cumulative_rotation(),
            });
        }

        let wheel = &self.wheel;
        wheel.layers()?;
        let rendered = pool.install(|| {
            steps
                .par_iter()
                .map(|s| -> WheelResult<Frame> {
                    if cancel.is_cancelled() {
                        return Err(WheelError::Cancelled);
                    }
                    Ok(Frame {
                        index: s.index,
                        angle: s.angle,
                        cumulative_rotation: s.cumulative_rotation,
                        image: wheel.render_at(s.angle)?,
                    })
                })
                .collect::<Vec<_>>()
        });

        let mut frames = Vec::with_capacity(rendered.len());
        for item in rendered {
            frames.push(item?);
        }
        if cancel.is_cancelled() {
            return Err(WheelError::Cancelled);
        }
        Ok(frames)
    }
}

fn build_thread_pool(threads: Option<usize>) -> WheelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(WheelError::invalid_configuration(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| WheelError::render_failure(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/animation/sequencer.rs"]
mod tests;
