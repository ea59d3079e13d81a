//! Pure raster kernels over premultiplied RGBA8 buffers.

/// Separable Gaussian blur.
pub mod blur;
/// Source-over blending, masking and background flattening.
pub mod composite;
/// Expanding rotation and center cropping.
pub mod rotate;
