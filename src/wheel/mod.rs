//! Per-job wheel state: fixed styling plus the current rotation.

/// The wheel itself.
pub mod state;
/// Seeded random styling.
pub mod style;
