use kurbo::Shape;

use crate::foundation::core::{Affine, BezPath, Canvas, Point, Vec2};
use crate::foundation::error::{WheelError, WheelResult};
use crate::geometry::segments::Segment;

const PATH_TOLERANCE: f64 = 0.1;

/// Thin wrapper over a `vello_cpu` render context targeting one premultiplied RGBA8 surface.
pub(crate) struct VectorCanvas {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
}

impl VectorCanvas {
    pub(crate) fn new(width: u32, height: u32) -> WheelResult<Self> {
        let width: u16 = width
            .try_into()
            .map_err(|_| WheelError::render_failure("surface width exceeds u16"))?;
        let height: u16 = height
            .try_into()
            .map_err(|_| WheelError::render_failure("surface height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(WheelError::render_failure("surface must be non-empty"));
        }
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(width, height),
            width,
            height,
        })
    }

    pub(crate) fn for_canvas(canvas: Canvas) -> WheelResult<Self> {
        Self::new(canvas.width, canvas.height)
    }

    pub(crate) fn set_transform(&mut self, transform: Affine) {
        self.ctx.set_transform(affine_to_cpu(transform));
    }

    /// Fill `path` with a straight-alpha RGBA8 color.
    pub(crate) fn fill(&mut self, path: &BezPath, rgba: [u8; 4]) {
        let [r, g, b, a] = rgba;
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Stroke `path` with a straight-alpha RGBA8 color and round joins.
    pub(crate) fn stroke(&mut self, path: &BezPath, width: f64, rgba: [u8; 4]) {
        let [r, g, b, a] = rgba;
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        self.ctx.set_stroke(
            vello_cpu::kurbo::Stroke::new(width)
                .with_join(vello_cpu::kurbo::Join::Round)
                .with_caps(vello_cpu::kurbo::Cap::Round),
        );
        self.ctx.stroke_path(&bezpath_to_cpu(path));
    }

    pub(crate) fn ctx_mut(&mut self) -> &mut vello_cpu::RenderContext {
        &mut self.ctx
    }

    /// Rasterize everything drawn so far and return the premultiplied RGBA8 bytes.
    pub(crate) fn finish(mut self) -> Vec<u8> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        pixmap.data_as_u8_slice().to_vec()
    }
}

/// Pie wedge covering `segment` out to `radius`.
pub(crate) fn wedge_path(center: Point, radius: f64, segment: &Segment) -> BezPath {
    annular_wedge_path(center, 0.0, radius, segment)
}

/// Wedge of `segment` between `inner` and `outer` radii.
pub(crate) fn annular_wedge_path(
    center: Point,
    inner: f64,
    outer: f64,
    segment: &Segment,
) -> BezPath {
    kurbo::CircleSegment::new(
        center,
        outer,
        inner,
        screen_radians(segment.start_angle),
        segment.sweep().to_radians(),
    )
    .to_path(PATH_TOLERANCE)
}

pub(crate) fn disc_path(center: Point, radius: f64) -> BezPath {
    kurbo::Circle::new(center, radius).to_path(PATH_TOLERANCE)
}

/// Ring between `inner` and `outer`. The inner arc winds backwards, so a nonzero fill leaves the
/// hole empty.
pub(crate) fn ring_path(center: Point, inner: f64, outer: f64) -> BezPath {
    kurbo::CircleSegment::new(center, outer, inner, 0.0, std::f64::consts::TAU)
        .to_path(PATH_TOLERANCE)
}

/// Ellipse whose `radii.x` axis points along wheel-space `angle_deg`.
pub(crate) fn radial_ellipse_path(center: Point, radii: Vec2, angle_deg: f64) -> BezPath {
    kurbo::Ellipse::new(center, radii, screen_radians(angle_deg)).to_path(PATH_TOLERANCE)
}

pub(crate) fn polygon_path(points: &[Point]) -> BezPath {
    let mut p = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        p.move_to(*first);
        for pt in rest {
            p.line_to(*pt);
        }
        p.close_path();
    }
    p
}

pub(crate) fn line_path(from: Point, to: Point) -> BezPath {
    let mut p = BezPath::new();
    p.move_to(from);
    p.line_to(to);
    p
}

/// Wheel-space degrees (clockwise from 12 o'clock) to kurbo screen radians (clockwise from +x).
pub(crate) fn screen_radians(angle_deg: f64) -> f64 {
    (angle_deg - 90.0).to_radians()
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
