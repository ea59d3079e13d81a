use crate::foundation::core::Canvas;
use crate::foundation::error::{WheelError, WheelResult};

/// Largest kernel half-width accepted, matching the largest canvas side.
pub const MAX_BLUR_RADIUS: u32 = Canvas::MAX_SIDE;

/// Blur parameters for one layer: kernel half-width in pixels plus Gaussian sigma.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlurSpec {
    /// Kernel half-width; 0 disables the blur.
    pub radius_px: u32,
    /// Gaussian standard deviation in pixels.
    pub sigma: f32,
}

impl BlurSpec {
    /// Blur with the conventional `sigma = radius / 2`.
    pub fn from_radius(radius_px: u32) -> Self {
        Self {
            radius_px,
            sigma: (radius_px as f32 / 2.0).max(0.5),
        }
    }
}

/// Separable Gaussian blur over premultiplied RGBA8, edge pixels clamped.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    spec: BlurSpec,
) -> WheelResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| WheelError::render_failure("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(WheelError::render_failure(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if spec.radius_px == 0 || width == 0 || height == 0 {
        return Ok(src.to_vec());
    }
    if spec.radius_px > MAX_BLUR_RADIUS {
        return Err(WheelError::invalid_configuration(format!(
            "blur radius must be <= {MAX_BLUR_RADIUS}px, got {}",
            spec.radius_px
        )));
    }

    let kernel = gaussian_kernel_q16(spec.radius_px, spec.sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> WheelResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(WheelError::invalid_configuration("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(WheelError::render_failure("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Push rounding drift into the center tap so the kernel sums to exactly 1.0 in Q16.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        let row = (y * w) as usize;
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = (row + sx as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = (row + x as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
