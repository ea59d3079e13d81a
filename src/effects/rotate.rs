use crate::foundation::core::normalize_degrees;
use crate::foundation::error::{WheelError, WheelResult};

/// A premultiplied RGBA8 raster produced by [`rotate_expand`].
#[derive(Clone, Debug)]
pub struct Rotated {
    /// Expanded width in pixels.
    pub width: u32,
    /// Expanded height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes, row-major.
    pub data: Vec<u8>,
}

/// Rotate a premultiplied RGBA8 image clockwise (on screen) by `degrees` about its center.
///
/// The output canvas grows so no source pixel is clipped; growth is kept to even amounts so the
/// rotation center stays on the same pixel grid as the source. Samples are taken with a cubic
/// convolution kernel (`a = -0.5`) and pixels outside the source read as transparent.
pub fn rotate_expand(src: &[u8], width: u32, height: u32, degrees: f64) -> WheelResult<Rotated> {
    if src.len() != (width as usize) * (height as usize) * 4 {
        return Err(WheelError::render_failure(
            "rotate_expand expects src matching width*height*4",
        ));
    }

    let deg = normalize_degrees(degrees);
    let theta = deg.to_radians();
    let (sin, cos) = theta.sin_cos();

    let (w, h) = (f64::from(width), f64::from(height));
    let bound_w = w * cos.abs() + h * sin.abs();
    let bound_h = w * sin.abs() + h * cos.abs();
    let out_w = width + 2 * (((bound_w - w) / 2.0 - 1e-9).ceil().max(0.0) as u32);
    let out_h = height + 2 * (((bound_h - h) / 2.0 - 1e-9).ceil().max(0.0) as u32);

    let mut out = vec![0u8; (out_w as usize) * (out_h as usize) * 4];
    let pad_x = ((out_w - width) / 2) as usize;
    let pad_y = ((out_h - height) / 2) as usize;

    if deg == 0.0 {
        for y in 0..height as usize {
            let s = y * width as usize * 4;
            let d = ((y + pad_y) * out_w as usize + pad_x) * 4;
            out[d..d + width as usize * 4].copy_from_slice(&src[s..s + width as usize * 4]);
        }
        return Ok(Rotated {
            width: out_w,
            height: out_h,
            data: out,
        });
    }

    let (scx, scy) = (w / 2.0, h / 2.0);
    let (dcx, dcy) = (f64::from(out_w) / 2.0, f64::from(out_h) / 2.0);

    for y in 0..out_h {
        let dy = f64::from(y) + 0.5 - dcy;
        for x in 0..out_w {
            let dx = f64::from(x) + 0.5 - dcx;
            // Inverse mapping: rotate the destination offset back by -theta.
            let sx = cos * dx + sin * dy + scx - 0.5;
            let sy = -sin * dx + cos * dy + scy - 0.5;
            if sx <= -2.0 || sy <= -2.0 || sx >= w + 1.0 || sy >= h + 1.0 {
                continue;
            }
            let px = sample_bicubic(src, width, height, sx, sy);
            let idx = ((y as usize) * (out_w as usize) + x as usize) * 4;
            out[idx..idx + 4].copy_from_slice(&px);
        }
    }

    Ok(Rotated {
        width: out_w,
        height: out_h,
        data: out,
    })
}

/// Cut a centered `width x height` window out of a larger image.
pub fn crop_center(rotated: &Rotated, width: u32, height: u32) -> WheelResult<Vec<u8>> {
    if width > rotated.width || height > rotated.height {
        return Err(WheelError::render_failure(format!(
            "cannot crop {width}x{height} out of {}x{}",
            rotated.width, rotated.height
        )));
    }
    let x0 = ((rotated.width - width) / 2) as usize;
    let y0 = ((rotated.height - height) / 2) as usize;
    let row = width as usize * 4;
    let mut out = Vec::with_capacity(row * height as usize);
    for y in 0..height as usize {
        let s = ((y + y0) * rotated.width as usize + x0) * 4;
        out.extend_from_slice(&rotated.data[s..s + row]);
    }
    Ok(out)
}

fn cubic_weight(x: f64) -> f64 {
    const A: f64 = -0.5;
    let x = x.abs();
    if x <= 1.0 {
        ((A + 2.0) * x - (A + 3.0)) * x * x + 1.0
    } else if x < 2.0 {
        ((A * x - 5.0 * A) * x + 8.0 * A) * x - 4.0 * A
    } else {
        0.0
    }
}

fn sample_bicubic(src: &[u8], width: u32, height: u32, sx: f64, sy: f64) -> [u8; 4] {
    let x0 = sx.floor();
    let y0 = sy.floor();
    let fx = sx - x0;
    let fy = sy - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let wx = [
        cubic_weight(fx + 1.0),
        cubic_weight(fx),
        cubic_weight(fx - 1.0),
        cubic_weight(fx - 2.0),
    ];
    let wy = [
        cubic_weight(fy + 1.0),
        cubic_weight(fy),
        cubic_weight(fy - 1.0),
        cubic_weight(fy - 2.0),
    ];

    let mut acc = [0.0f64; 4];
    for (j, wyj) in wy.iter().enumerate() {
        let yy = y0 - 1 + j as i64;
        if yy < 0 || yy >= i64::from(height) {
            continue;
        }
        for (i, wxi) in wx.iter().enumerate() {
            let xx = x0 - 1 + i as i64;
            if xx < 0 || xx >= i64::from(width) {
                continue;
            }
            let wgt = wxi * wyj;
            let idx = ((yy as usize) * (width as usize) + xx as usize) * 4;
            for c in 0..4 {
                acc[c] += wgt * f64::from(src[idx + c]);
            }
        }
    }

    // Cubic convolution overshoots near hard edges; clamp and keep color <= alpha.
    let a = acc[3].round().clamp(0.0, 255.0) as u8;
    let mut out = [0u8, 0, 0, a];
    for c in 0..3 {
        out[c] = (acc[c].round().clamp(0.0, 255.0) as u8).min(a);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/rotate.rs"]
mod tests;
