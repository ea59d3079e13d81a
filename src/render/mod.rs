//! Wheel rendering: vector rasterization, labels, layer producers and the compositor.

/// Fixed layer pipeline and per-frame rotation.
pub mod compositor;
/// Frame types.
pub mod frame;
pub(crate) mod layers;
pub(crate) mod raster;
/// Label fonts and text layout.
pub mod text;
