//! Spin animation: job timing, rotation deltas, and the frame sequencer.

/// Frame sequencer state machine.
pub mod sequencer;
/// Job timing.
pub mod spec;
/// Per-step rotation deltas.
pub mod spin;
