//! Angular segment table for the wheel.
//!
//! Wheel-space angles are degrees measured clockwise from 12 o'clock. The pointer sits at screen
//! angle 0 and never moves; the wheel layer is rotated clockwise on screen by the current angle.

use crate::foundation::core::{FULL_TURN_DEG, Point, normalize_degrees};
use crate::foundation::error::{WheelError, WheelResult};

/// Fewest participants a wheel can be built with.
pub const MIN_PARTICIPANTS: usize = 5;

/// One angular wedge of the wheel, assigned to the participant with the same index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    /// Participant index (0-based).
    pub index: usize,
    /// Inclusive start angle in degrees.
    pub start_angle: f64,
    /// Exclusive end angle in degrees.
    pub end_angle: f64,
}

impl Segment {
    /// Angular extent in degrees.
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Angle halfway between start and end.
    pub fn mid_angle(&self) -> f64 {
        self.start_angle + self.sweep() / 2.0
    }

    /// Return `true` when `angle` (normalized) lies in `[start, end)`.
    pub fn contains(&self, angle: f64) -> bool {
        let a = normalize_degrees(angle);
        self.start_angle <= a && a < self.end_angle
    }
}

/// Compute equal-size segments for `participant_count` participants, starting at 0°.
pub fn compute_segments(participant_count: usize) -> WheelResult<Vec<Segment>> {
    if participant_count < MIN_PARTICIPANTS {
        return Err(WheelError::invalid_configuration(format!(
            "a wheel needs at least {MIN_PARTICIPANTS} participants, got {participant_count}"
        )));
    }

    let n = participant_count as f64;
    let mut segments = Vec::with_capacity(participant_count);
    for i in 0..participant_count {
        // Boundaries are computed from the index, not accumulated, so the last segment ends at
        // exactly 360 and the next start equals the previous end bit-for-bit.
        let start_angle = FULL_TURN_DEG * (i as f64) / n;
        let end_angle = if i + 1 == participant_count {
            FULL_TURN_DEG
        } else {
            FULL_TURN_DEG * ((i + 1) as f64) / n
        };
        segments.push(Segment {
            index: i,
            start_angle,
            end_angle,
        });
    }
    Ok(segments)
}

/// Convert a wheel-space angle and radius into a screen point around `center`.
///
/// `x = cx + r·cos θ`, `y = cy + r·sin θ` with `θ = radians(angle − 90°)`, so 0° is straight up.
pub fn polar_point(center: Point, radius: f64, angle_deg: f64) -> Point {
    let theta = (angle_deg - 90.0).to_radians();
    Point::new(
        center.x + radius * theta.cos(),
        center.y + radius * theta.sin(),
    )
}

/// Label position at the segment's angular midpoint, `label_radius` away from `center`.
pub fn label_anchor(segment: &Segment, center: Point, label_radius: f64) -> Point {
    polar_point(center, label_radius, segment.mid_angle())
}

/// Find the segment containing `angle` (any value, normalized first).
pub fn segment_at(segments: &[Segment], angle: f64) -> Option<usize> {
    if segments.is_empty() {
        return None;
    }
    let a = normalize_degrees(angle);
    // Equal-size table: index arithmetic, then nudge for float rounding at boundaries.
    let size = FULL_TURN_DEG / segments.len() as f64;
    let mut idx = ((a / size).floor() as usize).min(segments.len() - 1);
    if a < segments[idx].start_angle && idx > 0 {
        idx -= 1;
    } else if a >= segments[idx].end_angle && idx + 1 < segments.len() {
        idx += 1;
    }
    Some(segments[idx].index)
}

/// Wheel-space angle under the fixed pointer when the wheel has been rotated by `current_angle`.
pub fn pointer_wheel_angle(current_angle: f64) -> f64 {
    normalize_degrees(FULL_TURN_DEG - normalize_degrees(current_angle))
}

/// Index of the winning participant for a wheel stopped at `final_angle`.
pub fn winner_index(segments: &[Segment], final_angle: f64) -> WheelResult<usize> {
    segment_at(segments, pointer_wheel_angle(final_angle))
        .ok_or_else(|| WheelError::invalid_configuration("segment table is empty"))
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/segments.rs"]
mod tests;
