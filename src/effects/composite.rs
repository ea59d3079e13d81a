use crate::foundation::error::{WheelError, WheelResult};
use crate::foundation::math::mul_div255_u8;

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over for one premultiplied pixel, with `src` scaled by `opacity`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Blend a whole `src` layer over `dst` at `opacity`.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> WheelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(WheelError::render_failure(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Blend a `src_w x src_h` patch over `dst` with its top-left corner at `(x0, y0)`.
///
/// Parts of the patch falling outside `dst` are dropped.
#[allow(clippy::too_many_arguments)]
pub fn over_patch_in_place(
    dst: &mut [u8],
    dst_w: u32,
    dst_h: u32,
    src: &[u8],
    src_w: u32,
    src_h: u32,
    x0: i32,
    y0: i32,
) -> WheelResult<()> {
    if dst.len() != (dst_w as usize) * (dst_h as usize) * 4
        || src.len() != (src_w as usize) * (src_h as usize) * 4
    {
        return Err(WheelError::render_failure(
            "over_patch_in_place expects buffers matching their dimensions",
        ));
    }
    for sy in 0..src_h as i32 {
        let dy = y0 + sy;
        if dy < 0 || dy >= dst_h as i32 {
            continue;
        }
        for sx in 0..src_w as i32 {
            let dx = x0 + sx;
            if dx < 0 || dx >= dst_w as i32 {
                continue;
            }
            let si = ((sy as usize) * (src_w as usize) + sx as usize) * 4;
            let di = ((dy as usize) * (dst_w as usize) + dx as usize) * 4;
            let s = [src[si], src[si + 1], src[si + 2], src[si + 3]];
            let d = [dst[di], dst[di + 1], dst[di + 2], dst[di + 3]];
            dst[di..di + 4].copy_from_slice(&over(d, s, 1.0));
        }
    }
    Ok(())
}

/// Multiply every pixel of `dst` by the alpha coverage of `mask`.
pub fn mask_in_place(dst: &mut [u8], mask: &[u8]) -> WheelResult<()> {
    if dst.len() != mask.len() || !dst.len().is_multiple_of(4) {
        return Err(WheelError::render_failure(
            "mask_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, m) in dst.chunks_exact_mut(4).zip(mask.chunks_exact(4)) {
        let cov = u16::from(m[3]);
        if cov == 255 {
            continue;
        }
        for c in d.iter_mut() {
            *c = mul_div255(u16::from(*c), cov);
        }
    }
    Ok(())
}

/// Flatten premultiplied RGBA8 over an opaque background color (straight RGBA8).
pub fn flatten_premul_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> WheelResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(WheelError::render_failure(
            "flatten_premul_over_bg_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = u16::from(bg_rgba[0]);
    let bg_g = u16::from(bg_rgba[1]);
    let bg_b = u16::from(bg_rgba[2]);

    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        d[0] = add_sat_u8(s[0], mul_div255(bg_r, inv));
        d[1] = add_sat_u8(s[1], mul_div255(bg_g, inv));
        d[2] = add_sat_u8(s[2], mul_div255(bg_b, inv));
        d[3] = 255;
    }

    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    mul_div255_u8(x, y)
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
