use crate::foundation::core::FrameIndex;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are premultiplied alpha while they move through the compositor. The `premultiplied`
/// flag makes this explicit at API boundaries; exporters flatten over a background color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA bytes of the pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let p = self.data.get(i..i + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }
}

/// One step of the spin: the image plus the rotation it was rendered at.
///
/// Frames are created by the sequencer and never mutated afterwards.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Step index within the job.
    pub index: FrameIndex,
    /// Wheel rotation in `[0, 360)` at this step.
    pub angle: f64,
    /// Sum of all deltas applied up to and including this step.
    pub cumulative_rotation: f64,
    /// Composited image.
    pub image: FrameRGBA,
}
