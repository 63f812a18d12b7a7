use std::collections::HashMap;

use crate::foundation::core::Rgb8;
use crate::foundation::error::{SynthError, SynthResult};
use crate::render::raster::Raster;
use crate::sampling::font::FontSpec;

/// Turns one text fragment into a tightly sized premultiplied raster.
pub trait TextRasterizer: Send {
    /// Rasterize `text` with `font` filled in `color`.
    fn rasterize(&mut self, text: &str, font: &FontSpec, color: Rgb8) -> SynthResult<Raster>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TextBrushRgba8 {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

struct RegisteredFont {
    family_name: String,
    data: vello_cpu::peniko::FontData,
}

/// Outline stroke width, as a fraction of the font size, used to embolden text.
const BOLD_STROKE_RATIO: f32 = 1.0 / 24.0;

/// Shapes text with Parley and fills glyph runs with `vello_cpu`.
pub struct ParleyRasterizer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    fonts: HashMap<String, RegisteredFont>,
}

impl Default for ParleyRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ParleyRasterizer {
    /// Construct a rasterizer with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            fonts: HashMap::new(),
        }
    }

    fn register(&mut self, font: &FontSpec) -> SynthResult<(String, vello_cpu::peniko::FontData)> {
        let key = font.cache_key();
        if let Some(f) = self.fonts.get(&key) {
            return Ok((f.family_name.clone(), f.data.clone()));
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.to_vec()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            SynthError::sampling(format!(
                "no font families registered from '{}'",
                font.family
            ))
        })?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SynthError::sampling("registered font family has no name"))?
            .to_string();
        let data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font.bytes.to_vec()),
            0,
        );

        self.fonts.insert(
            key,
            RegisteredFont {
                family_name: family_name.clone(),
                data: data.clone(),
            },
        );
        Ok((family_name, data))
    }
}

impl TextRasterizer for ParleyRasterizer {
    fn rasterize(&mut self, text: &str, font: &FontSpec, color: Rgb8) -> SynthResult<Raster> {
        if !font.size_px.is_finite() || font.size_px <= 0.0 {
            return Err(SynthError::validation(
                "font size_px must be finite and > 0",
            ));
        }
        let (family_name, font_data) = self.register(font)?;
        let brush = TextBrushRgba8 {
            r: color.r,
            g: color.g,
            b: color.b,
            a: 255,
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));
        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        // bold faces are synthesized by stroking the filled outline
        let stroke_width = if font.bold {
            (font.size_px * BOLD_STROKE_RATIO).max(1.0)
        } else {
            0.0
        };
        let pad = stroke_width.ceil();
        let width = extent_px(layout.width() + 2.0 * pad)?;
        let height = extent_px(layout.height() + 2.0 * pad)?;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            f64::from(pad),
            f64::from(pad),
        )));
        if font.bold {
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(f64::from(stroke_width)));
        }
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                let font_size = run.run().font_size();
                ctx.glyph_run(&font_data)
                    .font_size(font_size)
                    .fill_glyphs(glyphs.clone());
                if font.bold {
                    ctx.glyph_run(&font_data)
                        .font_size(font_size)
                        .stroke_glyphs(glyphs);
                }
            }
        }
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);

        Raster::from_rgba8_premul(
            u32::from(width),
            u32::from(height),
            pixmap.data_as_u8_slice().to_vec(),
        )
    }
}

fn extent_px(v: f32) -> SynthResult<u16> {
    if !v.is_finite() {
        return Err(SynthError::layout("text layout extent is not finite"));
    }
    let px = v.ceil().max(1.0);
    if px > f32::from(u16::MAX) {
        return Err(SynthError::layout(format!(
            "text layout extent {px}px exceeds the rasterizer limit"
        )));
    }
    Ok(px as u16)
}

/// Debug rasterizer drawing each character as a solid cell.
///
/// Cells are `ceil(0.6 * size)` wide and `ceil(size)` tall; whitespace leaves its cell
/// transparent. Useful in tests and when no font files are at hand.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockTextRasterizer;

impl BlockTextRasterizer {
    /// Cell size in pixels for `font`.
    pub fn cell_size(font: &FontSpec) -> (u32, u32) {
        let size = if font.size_px.is_finite() {
            font.size_px.max(1.0)
        } else {
            1.0
        };
        ((size * 3.0 / 5.0).ceil() as u32, size.ceil() as u32)
    }
}

impl TextRasterizer for BlockTextRasterizer {
    fn rasterize(&mut self, text: &str, font: &FontSpec, color: Rgb8) -> SynthResult<Raster> {
        let (cw, ch) = Self::cell_size(font);
        let n = text.chars().count().max(1) as u32;
        let mut out = Raster::transparent(cw * n, ch)?;
        let px = color.to_rgba8_opaque();
        for (i, c) in text.chars().enumerate() {
            if c.is_whitespace() {
                continue;
            }
            let x0 = i as u32 * cw;
            for y in 1..ch.saturating_sub(1) {
                for x in (x0 + 1)..(x0 + cw).saturating_sub(1) {
                    let idx = out.index(x, y);
                    out.data[idx..idx + 4].copy_from_slice(&px);
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
