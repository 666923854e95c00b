use crate::{
    core::{Rgba8, Viewport},
    error::{VitrineError, VitrineResult},
};

/// RGBA8 brush carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrush {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba8> for TextBrush {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// A glyph resolved to an absolute position inside a laid-out title.
#[derive(Clone, Copy, Debug)]
pub struct PlacedGlyph {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

/// Shapes and rasterizes the loading title from one registered font. Holds
/// the Parley contexts so repeated layouts reuse shaped data, plus the raw
/// font bytes the glyph rasterizer needs.
pub struct TitleArtist {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    font_data: vello_cpu::peniko::FontData,
    family_name: String,
}

impl std::fmt::Debug for TitleArtist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleArtist")
            .field("family_name", &self.family_name)
            .finish_non_exhaustive()
    }
}

impl TitleArtist {
    /// Register one font from raw bytes. The first family in the file names
    /// the stack every layout uses.
    pub fn new(font_bytes: Vec<u8>) -> VitrineResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            VitrineError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| VitrineError::validation("registered font family has no name"))?
            .to_string();

        let font_data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            font_data,
            family_name,
        })
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn font_data(&self) -> &vello_cpu::peniko::FontData {
        &self.font_data
    }

    /// Lay out `text` as a single unwrapped line.
    pub fn layout(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrush,
    ) -> VitrineResult<parley::Layout<TextBrush>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(VitrineError::validation(
                "title size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Rasterize `text` centered in a `viewport`-sized surface and return the
    /// premultiplied RGBA8 pixels. This is the raster the dissolve field
    /// samples, so it lays out the whole string at once; kerning here matches
    /// the final title, not the per-letter reveal entries.
    pub fn rasterize_centered(
        &mut self,
        text: &str,
        size_px: f32,
        color: Rgba8,
        viewport: Viewport,
    ) -> VitrineResult<Vec<u8>> {
        let width: u16 = viewport
            .width
            .try_into()
            .map_err(|_| VitrineError::raster("raster surface width exceeds u16"))?;
        let height: u16 = viewport
            .height
            .try_into()
            .map_err(|_| VitrineError::raster("raster surface height exceeds u16"))?;
        if viewport.is_empty() {
            return Err(VitrineError::raster("raster surface must be non-empty"));
        }

        let layout = self.layout(text, size_px, TextBrush::from(color))?;
        let (text_w, text_h) = measure(&layout);
        let origin_x = (viewport.w() - text_w) / 2.0;
        let origin_y = (viewport.h() - text_h) / 2.0;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin_x, origin_y)));
        draw_layout(&mut ctx, &layout, &self.font_data);
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);
        Ok(pixmap.data_as_u8_slice().to_vec())
    }
}

/// Intrinsic size of a layout: widest line advance by summed line heights.
pub fn measure(layout: &parley::Layout<TextBrush>) -> (f64, f64) {
    let mut w = 0.0f64;
    let mut h = 0.0f64;
    for line in layout.lines() {
        let m = line.metrics();
        w = w.max(f64::from(m.advance));
        h += f64::from(m.ascent + m.descent + m.leading);
    }
    (w, h)
}

/// Flatten a layout into absolutely positioned glyphs in layout order.
pub fn placed_glyphs(layout: &parley::Layout<TextBrush>) -> Vec<PlacedGlyph> {
    let mut out = Vec::new();
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            for g in run.glyphs() {
                out.push(PlacedGlyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
            }
        }
    }
    out
}

/// Draw every glyph run of a layout into the context at its layout position.
pub fn draw_layout(
    ctx: &mut vello_cpu::RenderContext,
    layout: &parley::Layout<TextBrush>,
    font: &vello_cpu::peniko::FontData,
) {
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
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}
