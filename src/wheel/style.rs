//! Per-job styling, drawn once from a seeded random source and then held fixed.

use rand::Rng;

/// Number of random line strokes per segment texture.
pub const DEFAULT_TEXTURE_STROKES: usize = 10;

/// One short texture stroke, stored in segment-relative polar coordinates.
///
/// `*_t` runs across the segment's sweep (0 = start edge, 1 = end edge) and `*_r` runs from the
/// hub to the rim (fraction of the wheel radius).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureStroke {
    /// Sweep fraction of the first endpoint.
    pub from_t: f64,
    /// Radius fraction of the first endpoint.
    pub from_r: f64,
    /// Sweep fraction of the second endpoint.
    pub to_t: f64,
    /// Radius fraction of the second endpoint.
    pub to_r: f64,
    /// Opaque stroke color.
    pub rgb: [u8; 3],
    /// Stroke width in pixels.
    pub width: f64,
}

/// Procedural texture drawn over a segment fill.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SegmentTexture {
    /// Strokes in draw order.
    pub strokes: Vec<TextureStroke>,
}

impl SegmentTexture {
    /// Draw `count` random strokes.
    pub fn random(rng: &mut impl Rng, count: usize) -> Self {
        let strokes = (0..count)
            .map(|_| TextureStroke {
                from_t: rng.random_range(0.0..=1.0),
                from_r: rng.random_range(0.2..=1.0),
                to_t: rng.random_range(0.0..=1.0),
                to_r: rng.random_range(0.2..=1.0),
                rgb: random_rgb(rng),
                width: 2.0,
            })
            .collect();
        Self { strokes }
    }
}

/// Fixed look of one segment.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentStyle {
    /// Straight-alpha wedge fill.
    pub fill: [u8; 4],
    /// Straight-alpha outline color.
    pub outline: [u8; 4],
    /// Outline width in pixels (10..=20).
    pub outline_width: f64,
    /// Alpha of the twinkle highlight over this segment.
    pub twinkle_alpha: u8,
    /// Procedural line texture.
    pub texture: SegmentTexture,
}

/// Pointer and hub look.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerStyle {
    /// Opaque pointer color.
    pub rgb: [u8; 3],
    /// Pointer half-width at its base, in pixels (10..=20).
    pub width: f64,
}

/// Complete styling state for one render job.
#[derive(Clone, Debug, PartialEq)]
pub struct WheelStyle {
    /// One entry per segment, in participant order.
    pub segments: Vec<SegmentStyle>,
    /// Pointer styling.
    pub pointer: PointerStyle,
}

impl WheelStyle {
    /// Draw styling for `segment_count` segments.
    ///
    /// Channels are drawn from `0..=255`, alphas from `128..=255`, widths from `10..=20`.
    pub fn random(rng: &mut impl Rng, segment_count: usize, texture_strokes: usize) -> Self {
        let segments = (0..segment_count)
            .map(|_| {
                let fill = random_rgba(rng);
                let outline = random_rgba(rng);
                let outline_width = f64::from(rng.random_range(10u8..=20));
                let twinkle_alpha = rng.random_range(20u8..=70);
                let texture = SegmentTexture::random(rng, texture_strokes);
                SegmentStyle {
                    fill,
                    outline,
                    outline_width,
                    twinkle_alpha,
                    texture,
                }
            })
            .collect();
        let pointer = PointerStyle {
            rgb: random_rgb(rng),
            width: f64::from(rng.random_range(10u8..=20)),
        };
        Self { segments, pointer }
    }
}

fn random_rgb(rng: &mut impl Rng) -> [u8; 3] {
    [
        rng.random_range(0..=255),
        rng.random_range(0..=255),
        rng.random_range(0..=255),
    ]
}

fn random_rgba(rng: &mut impl Rng) -> [u8; 4] {
    let [r, g, b] = random_rgb(rng);
    [r, g, b, rng.random_range(128..=255)]
}

#[cfg(test)]
#[path = "../../tests/unit/wheel/style.rs"]
mod tests;
