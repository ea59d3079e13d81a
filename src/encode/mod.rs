//! Encoding sinks and the exporter that feeds them.
//!
//! Sinks consume rendered frames in step order; the exporter picks one from the output format and
//! guarantees that a failed export leaves no file that looks complete.

/// Format selection and the frame-list exporter.
pub mod exporter;
/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Looping GIF sink.
pub mod gif;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
