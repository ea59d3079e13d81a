use std::path::Path;
use std::sync::Arc;

use crate::foundation::core::{Affine, Point, Vec2};
use crate::foundation::error::{WheelError, WheelResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// TrueType/OpenType font used for participant labels.
#[derive(Clone)]
pub struct LabelFont {
    bytes: Arc<Vec<u8>>,
    font: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelFont")
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl LabelFont {
    /// Read a font file. A missing or unreadable file is a render failure.
    pub fn load(path: &Path) -> WheelResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            WheelError::render_failure(format!(
                "failed to read label font '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_bytes(bytes)
    }

    /// Wrap in-memory font bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> WheelResult<Self> {
        if bytes.is_empty() {
            return Err(WheelError::render_failure("label font file is empty"));
        }
        let bytes = Arc::new(bytes);
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
            0,
        );
        Ok(Self { bytes, font })
    }
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: Option<String>,
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            family_name: None,
        }
    }

    fn register(&mut self, font: &LabelFont) -> WheelResult<String> {
        if let Some(name) = &self.family_name {
            return Ok(name.clone());
        }
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes.as_ref().clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            WheelError::render_failure("no font families registered from label font bytes")
        })?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| WheelError::render_failure("registered font family has no name"))?
            .to_string();
        self.family_name = Some(name.clone());
        Ok(name)
    }

    /// Shape one line of plain text.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        font: &LabelFont,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> WheelResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(WheelError::invalid_configuration(
                "label size must be finite and > 0",
            ));
        }
        let family_name = self.register(font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// Truncate a display name to at most `max_chars` characters.
pub fn truncate_label(name: &str, max_chars: usize) -> &str {
    match name.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &name[..byte_idx],
        None => name,
    }
}

/// Draw `text` centered on `anchor`.
pub(crate) fn draw_label_centered(
    ctx: &mut vello_cpu::RenderContext,
    engine: &mut TextLayoutEngine,
    font: &LabelFont,
    text: &str,
    size_px: f32,
    anchor: Point,
    brush: TextBrushRgba8,
) -> WheelResult<()> {
    if text.is_empty() {
        return Ok(());
    }
    let layout = engine.layout_line(text, font, size_px, brush)?;
    let half = Vec2::new(
        f64::from(layout.width()) / 2.0,
        f64::from(layout.height()) / 2.0,
    );
    let origin = anchor - half;
    let tr = Affine::translate(origin.to_vec2());
    ctx.set_transform(vello_cpu::kurbo::Affine::new(tr.as_coeffs()));

    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&font.font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
