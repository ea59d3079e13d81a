//! Layer producers. Each returns a canvas-sized premultiplied RGBA8 buffer for the compositor to
//! blend; none of them depend on the rotation angle.

use crate::effects::blur::{BlurSpec, blur_rgba8_premul};
use crate::effects::composite::{mask_in_place, over_in_place, over_patch_in_place};
use crate::foundation::core::{Affine, Canvas, Point, Rgba8Premul, Vec2};
use crate::foundation::error::WheelResult;
use crate::foundation::math::lerp_u8;
use crate::geometry::segments::{Segment, label_anchor, polar_point};
use crate::render::compositor::{CompositorOpts, GradientKind};
use crate::render::raster::{
    VectorCanvas, annular_wedge_path, disc_path, line_path, polygon_path, radial_ellipse_path,
    ring_path, wedge_path,
};
use crate::render::text::{TextBrushRgba8, TextLayoutEngine, draw_label_centered, truncate_label};
use crate::wheel::style::{SegmentStyle, WheelStyle};

const WHITE: [u8; 4] = [255, 255, 255, 255];
const SHADOW_RGBA: [u8; 4] = [0, 0, 0, 100];
const DEPTH_RGBA: [u8; 4] = [0, 0, 0, 160];
const POINTER_SHADOW_RGBA: [u8; 4] = [0, 0, 0, 140];

// Radii below are fractions of the wheel radius.
const SHADOW_CENTER: f64 = 0.6;
const SHADOW_RADII: (f64, f64) = (0.3, 0.12);
const DEPTH_INNER: f64 = 0.86;
const TWINKLE_INNER: f64 = 0.5;
const GLOW_RADIUS: f64 = 0.45;
const HUB_RADIUS: f64 = 0.08;
const POINTER_BASE_ABOVE_RIM: f64 = 0.12;
const POINTER_TIP_BELOW_RIM: f64 = 0.15;

/// Inputs shared by all producers for one job.
pub(crate) struct LayerScene<'a> {
    pub(crate) canvas: Canvas,
    pub(crate) center: Point,
    pub(crate) radius: f64,
    pub(crate) segments: &'a [Segment],
    pub(crate) labels: &'a [String],
    pub(crate) style: &'a WheelStyle,
    pub(crate) opts: &'a CompositorOpts,
}

impl<'a> LayerScene<'a> {
    pub(crate) fn new(
        opts: &'a CompositorOpts,
        segments: &'a [Segment],
        labels: &'a [String],
        style: &'a WheelStyle,
    ) -> Self {
        Self {
            canvas: opts.canvas,
            center: opts.canvas.center(),
            radius: opts.radius_px(),
            segments,
            labels,
            style,
            opts,
        }
    }

    fn styled_segments(&self) -> impl Iterator<Item = (&'a Segment, &'a SegmentStyle)> {
        self.segments.iter().zip(self.style.segments.iter())
    }
}

/// Layer 1: gradient disc with an anti-aliased rim.
pub(crate) fn gradient_layer(scene: &LayerScene<'_>) -> Vec<u8> {
    let Canvas { width, height } = scene.canvas;
    let g = scene.opts.gradient;
    let r = scene.radius;
    let mut out = vec![0u8; scene.canvas.rgba_len()];

    for y in 0..height {
        let py = f64::from(y) + 0.5 - scene.center.y;
        for x in 0..width {
            let px = f64::from(x) + 0.5 - scene.center.x;
            let dist = px.hypot(py);
            let coverage = (r + 0.5 - dist).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                continue;
            }
            let t = match g.kind {
                GradientKind::Radial => dist / r,
                GradientKind::Linear => (py + r) / (2.0 * r),
            };
            let c: [u8; 4] = std::array::from_fn(|i| lerp_u8(g.inner[i], g.outer[i], t));
            let a = (f64::from(c[3]) * coverage).round() as u8;
            let p = Rgba8Premul::from_straight_rgba(c[0], c[1], c[2], a);
            let idx = ((y as usize) * (width as usize) + x as usize) * 4;
            out[idx..idx + 4].copy_from_slice(&p.to_array());
        }
    }
    out
}

/// Layer 2: wedge fills, textures, outlines, then labels.
pub(crate) fn segments_layer(scene: &LayerScene<'_>) -> WheelResult<Vec<u8>> {
    let mut canvas = VectorCanvas::for_canvas(scene.canvas)?;
    let scale = scene.opts.scale();

    for (seg, style) in scene.styled_segments() {
        canvas.fill(&wedge_path(scene.center, scene.radius, seg), style.fill);
    }

    if scene.opts.textures {
        // Wedges are convex for five or more segments, so a stroke between two interior points
        // stays inside its wedge up to the cap radius, which the outline covers.
        for (seg, style) in scene.styled_segments() {
            for stroke in &style.texture.strokes {
                let from = polar_point(
                    scene.center,
                    scene.radius * stroke.from_r,
                    seg.start_angle + seg.sweep() * stroke.from_t,
                );
                let to = polar_point(
                    scene.center,
                    scene.radius * stroke.to_r,
                    seg.start_angle + seg.sweep() * stroke.to_t,
                );
                let [r, g, b] = stroke.rgb;
                canvas.stroke(
                    &line_path(from, to),
                    (stroke.width * scale).max(1.0),
                    [r, g, b, 255],
                );
            }
        }
    }

    for (seg, style) in scene.styled_segments() {
        canvas.stroke(
            &wedge_path(scene.center, scene.radius, seg),
            (style.outline_width * scale).max(1.0),
            style.outline,
        );
    }

    if let Some(labels) = &scene.opts.labels {
        let mut engine = TextLayoutEngine::new();
        let [r, g, b, a] = labels.rgba;
        let brush = TextBrushRgba8 { r, g, b, a };
        let label_radius = scene.radius * scene.opts.label_radius;
        for (seg, name) in scene.segments.iter().zip(scene.labels) {
            let text = truncate_label(name, labels.max_chars);
            let anchor = label_anchor(seg, scene.center, label_radius);
            draw_label_centered(
                canvas.ctx_mut(),
                &mut engine,
                &labels.font,
                text,
                labels.size_px,
                anchor,
                brush,
            )?;
        }
    }

    Ok(canvas.finish())
}

/// Layer 3: per segment, a dark ellipse blurred in its own patch and masked by the wedge.
pub(crate) fn shadow_layer(scene: &LayerScene<'_>) -> WheelResult<Vec<u8>> {
    let Canvas { width, height } = scene.canvas;
    let mut out = vec![0u8; scene.canvas.rgba_len()];
    let blur = BlurSpec::from_radius(scene.opts.shadow.blur_px);
    let radii = Vec2::new(
        scene.radius * SHADOW_RADII.0,
        scene.radius * SHADOW_RADII.1,
    );

    for seg in scene.segments {
        let mid = seg.mid_angle();
        let c = polar_point(scene.center, scene.radius * SHADOW_CENTER, mid);
        let reach = radii.x + f64::from(blur.radius_px) + 2.0;
        let x0 = (c.x - reach).floor().max(0.0) as i32;
        let y0 = (c.y - reach).floor().max(0.0) as i32;
        let x1 = (c.x + reach).ceil().min(f64::from(width)) as i32;
        let y1 = (c.y + reach).ceil().min(f64::from(height)) as i32;
        if x1 <= x0 || y1 <= y0 {
            continue;
        }
        let (pw, ph) = ((x1 - x0) as u32, (y1 - y0) as u32);
        let shift = Affine::translate((-f64::from(x0), -f64::from(y0)));

        let mut ellipse = VectorCanvas::new(pw, ph)?;
        ellipse.set_transform(shift);
        ellipse.fill(&radial_ellipse_path(c, radii, mid), SHADOW_RGBA);
        let mut patch = blur_rgba8_premul(&ellipse.finish(), pw, ph, blur)?;

        let mut mask = VectorCanvas::new(pw, ph)?;
        mask.set_transform(shift);
        mask.fill(&wedge_path(scene.center, scene.radius, seg), WHITE);
        mask_in_place(&mut patch, &mask.finish())?;

        over_patch_in_place(&mut out, width, height, &patch, pw, ph, x0, y0)?;
    }
    Ok(out)
}

/// Layer 4: dark rim ring, blurred and kept inside the disc.
pub(crate) fn depth_layer(scene: &LayerScene<'_>) -> WheelResult<Vec<u8>> {
    let Canvas { width, height } = scene.canvas;
    let mut ring = VectorCanvas::for_canvas(scene.canvas)?;
    ring.fill(
        &ring_path(scene.center, scene.radius * DEPTH_INNER, scene.radius),
        DEPTH_RGBA,
    );
    let mut out = blur_rgba8_premul(
        &ring.finish(),
        width,
        height,
        BlurSpec::from_radius(scene.opts.depth.blur_px),
    )?;

    let mut disc = VectorCanvas::for_canvas(scene.canvas)?;
    disc.fill(&disc_path(scene.center, scene.radius), WHITE);
    mask_in_place(&mut out, &disc.finish())?;
    Ok(out)
}

/// Layer 5: white highlight over the outer half of each segment at its own alpha.
pub(crate) fn twinkle_layer(scene: &LayerScene<'_>) -> WheelResult<Vec<u8>> {
    let mut canvas = VectorCanvas::for_canvas(scene.canvas)?;
    for (seg, style) in scene.styled_segments() {
        canvas.fill(
            &annular_wedge_path(
                scene.center,
                scene.radius * TWINKLE_INNER,
                scene.radius,
                seg,
            ),
            [255, 255, 255, style.twinkle_alpha],
        );
    }
    Ok(canvas.finish())
}

/// Layer 6: blurred white disc centered on the hub.
pub(crate) fn glow_layer(scene: &LayerScene<'_>) -> WheelResult<Vec<u8>> {
    let Canvas { width, height } = scene.canvas;
    let mut canvas = VectorCanvas::for_canvas(scene.canvas)?;
    canvas.fill(
        &disc_path(scene.center, scene.radius * GLOW_RADIUS),
        [255, 255, 255, scene.opts.glow_alpha],
    );
    blur_rgba8_premul(
        &canvas.finish(),
        width,
        height,
        BlurSpec::from_radius(scene.opts.glow.blur_px),
    )
}

/// Pointer at 12 o'clock pointing down into the wheel, with a soft drop shadow and the hub.
pub(crate) fn pointer_layer(scene: &LayerScene<'_>) -> WheelResult<Vec<u8>> {
    let Canvas { width, height } = scene.canvas;
    let scale = scene.opts.scale();
    let pointer = scene.style.pointer;
    let [r, g, b] = pointer.rgb;
    let color = [r, g, b, 255];

    let half = (pointer.width * scale).max(1.0);
    let cx = scene.center.x;
    let rim = scene.center.y - scene.radius;
    let base = rim - scene.radius * POINTER_BASE_ABOVE_RIM;
    let tip = rim + scene.radius * POINTER_TIP_BELOW_RIM;
    let triangle = polygon_path(&[
        Point::new(cx - half, base),
        Point::new(cx + half, base),
        Point::new(cx, tip),
    ]);

    let mut shadow = VectorCanvas::for_canvas(scene.canvas)?;
    shadow.set_transform(Affine::translate((0.0, (2.0 * scale).max(1.0))));
    shadow.fill(&triangle, POINTER_SHADOW_RGBA);
    let mut out = blur_rgba8_premul(
        &shadow.finish(),
        width,
        height,
        BlurSpec::from_radius(scene.opts.pointer_blur_px),
    )?;

    let mut fg = VectorCanvas::for_canvas(scene.canvas)?;
    fg.fill(&triangle, color);
    fg.fill(&disc_path(scene.center, scene.radius * HUB_RADIUS), color);
    over_in_place(&mut out, &fg.finish(), 1.0)?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/layers.rs"]
mod tests;
