use rand::Rng;

use crate::animation::spec::MAX_DURATION_FRAMES;
use crate::foundation::core::FULL_TURN_DEG;
use crate::foundation::error::{WheelError, WheelResult};

/// How per-frame rotation deltas are drawn.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpinProfile {
    /// Every delta drawn independently from `[min_deg, max_deg)`.
    Uniform {
        /// Smallest delta.
        min_deg: f64,
        /// Upper bound (exclusive).
        max_deg: f64,
    },
    /// Deltas drawn from `[final_deg, initial_deg)` and ordered so they never increase.
    Decelerating {
        /// Upper bound for the first steps.
        initial_deg: f64,
        /// Lower bound for the last steps.
        final_deg: f64,
    },
}

impl Default for SpinProfile {
    fn default() -> Self {
        Self::Uniform {
            min_deg: 360.0,
            max_deg: 720.0,
        }
    }
}

impl SpinProfile {
    /// Bounds as `(low, high)`.
    fn bounds(&self) -> (f64, f64) {
        match *self {
            Self::Uniform { min_deg, max_deg } => (min_deg, max_deg),
            Self::Decelerating {
                initial_deg,
                final_deg,
            } => (final_deg, initial_deg),
        }
    }

    /// Reject empty, negative or non-finite ranges.
    pub fn validate(&self) -> WheelResult<()> {
        let (low, high) = self.bounds();
        if !low.is_finite() || !high.is_finite() {
            return Err(WheelError::invalid_configuration(
                "spin bounds must be finite",
            ));
        }
        if low <= 0.0 {
            return Err(WheelError::invalid_configuration(
                "spin lower bound must be > 0",
            ));
        }
        if high <= low {
            return Err(WheelError::invalid_configuration(format!(
                "spin range is empty: [{low}, {high})"
            )));
        }
        Ok(())
    }

    /// Draw `steps` deltas, in step order.
    ///
    /// Whole turns are redrawn so consecutive frames never land on the same angle.
    pub fn plan(&self, steps: u64, rng: &mut impl Rng) -> WheelResult<Vec<f64>> {
        self.validate()?;
        if steps > MAX_DURATION_FRAMES {
            return Err(WheelError::invalid_configuration(format!(
                "cannot plan {steps} steps (limit {MAX_DURATION_FRAMES})"
            )));
        }
        let (low, high) = self.bounds();
        let mut deltas = Vec::with_capacity(steps as usize);
        for _ in 0..steps {
            deltas.push(draw_delta(low, high, rng));
        }
        if matches!(self, Self::Decelerating { .. }) {
            deltas.sort_by(|a, b| b.total_cmp(a));
        }
        Ok(deltas)
    }
}

fn draw_delta(low: f64, high: f64, rng: &mut impl Rng) -> f64 {
    loop {
        let d = rng.random_range(low..high);
        if d.rem_euclid(FULL_TURN_DEG) != 0.0 {
            return d;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spin.rs"]
mod tests;
