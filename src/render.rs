use kurbo::{Affine, Circle, PathEl, Point, Rect, RoundedRect, Shape};

use crate::{
    core::{Rgba8, Viewport, stable_hash64},
    director::Director,
    error::{VitrineError, VitrineResult},
    layout::SIDE_MARGIN_FRAC,
    stage::SectionKind,
    text::{self, TextBrush},
    transitions::WipeOrigin,
};

/// Upward travel of a section's slide-in, in pixels.
pub const REVEAL_RISE_PX: f64 = 40.0;

const CORNER_RADIUS_PX: f64 = 10.0;
const CURSOR_RING_R_PX: f64 = 16.0;
const CURSOR_RING_HOVER_R_PX: f64 = 24.0;
const CURSOR_DOT_R_PX: f64 = 3.0;
const CURSOR_RING_ALPHA: f64 = 0.35;
const IMAGE_INSET_PX: f64 = 8.0;
const ROW_TEXT_SIZE_PX: f32 = 28.0;
const HERO_TITLE_SCALE: f32 = 0.75;

/// Below this a paint is invisible at 8-bit depth, so the draw is skipped.
const MIN_ALPHA: f64 = 1.0 / 255.0;

/// One rendered frame, row-major RGBA8 straight off the rasterizer, which
/// produces premultiplied alpha.
#[derive(Clone, Debug)]
pub struct FramePixels {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FramePixels {
    /// Convert the buffer to straight alpha in place, for encoders that
    /// expect unassociated RGBA.
    pub fn unpremultiply_in_place(&mut self) {
        if !self.premultiplied {
            return;
        }
        for px in self.data.chunks_exact_mut(4) {
            let a = px[3] as u16;
            if a == 0 {
                px[0] = 0;
                px[1] = 0;
                px[2] = 0;
                continue;
            }
            px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
            px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
            px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
        }
        self.premultiplied = false;
    }
}

/// Paint the director's post-tick state into a fresh pixel buffer.
///
/// Back-to-front: background, ambient particles, the scrolled page, the
/// project detail overlay, the hover preview, the loading overlay, dissolve
/// particles, the cover wipe, and the cursor above everything.
///
/// The director is borrowed mutably because live text runs through the title
/// artist's layout contexts.
pub fn render_frame(d: &mut Director) -> VitrineResult<FramePixels> {
    let viewport = d.viewport;
    if viewport.is_empty() {
        return Err(VitrineError::raster("frame surface must be non-empty"));
    }
    let width: u16 = viewport
        .width
        .try_into()
        .map_err(|_| VitrineError::raster("frame width exceeds u16"))?;
    let height: u16 = viewport
        .height
        .try_into()
        .map_err(|_| VitrineError::raster("frame height exceeds u16"))?;

    let mut ctx = vello_cpu::RenderContext::new(width, height);

    fill_rect(&mut ctx, full_rect(viewport), d.stage.palette.background, 1.0);
    draw_ambient(&mut ctx, d);
    draw_page(&mut ctx, d)?;
    draw_detail_overlay(&mut ctx, d);
    draw_hover_preview(&mut ctx, d);
    draw_loading_overlay(&mut ctx, d)?;
    draw_dissolve(&mut ctx, d);
    draw_cover(&mut ctx, d);
    draw_cursor(&mut ctx, d);

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut pixmap);

    Ok(FramePixels {
        width: viewport.width,
        height: viewport.height,
        data: pixmap.data_as_u8_slice().to_vec(),
        premultiplied: true,
    })
}

fn draw_ambient(ctx: &mut vello_cpu::RenderContext, d: &Director) {
    let accent = d.stage.palette.accent;
    for p in d.ambient.particles() {
        if p.opacity < MIN_ALPHA {
            continue;
        }
        fill_circle(ctx, Point::new(p.pos.x, p.pos.y), p.size, accent, p.opacity);
    }
}

/// The scrolled page: per-section content blocks with their reveal slide-in,
/// project rows, the hero call-to-action, and contact icons. Everything
/// shares one opacity layer while the post-loading fade ramps.
fn draw_page(ctx: &mut vello_cpu::RenderContext, d: &mut Director) -> VitrineResult<()> {
    let alpha = d.loading.content_alpha();
    if !d.loading.content_displayed() || alpha < MIN_ALPHA {
        return Ok(());
    }
    let palette = d.stage.palette;
    let scroll = d.scroller.offset();
    let vh = d.viewport.h();

    let layered = alpha < 1.0;
    if layered {
        ctx.push_opacity_layer(alpha as f32);
    }

    for section in &d.layout.sections {
        // Cull with headroom for the slide-in travel.
        if section.rect.y1 - scroll < -REVEAL_RISE_PX
            || section.rect.y0 - scroll > vh + REVEAL_RISE_PX
        {
            continue;
        }

        let (block_alpha, rise) = match section.reveal_slot {
            Some(slot) => {
                let p = d.reveal.progress(slot);
                (p, (1.0 - p) * REVEAL_RISE_PX)
            }
            None => (1.0, 0.0),
        };
        if block_alpha < MIN_ALPHA {
            continue;
        }
        let to_screen =
            |r: Rect| Rect::new(r.x0, r.y0 - scroll + rise, r.x1, r.y1 - scroll + rise);

        match section.kind {
            SectionKind::Hero => {
                let content = to_screen(section.content);
                fill_rounded(ctx, content, palette.surface, block_alpha);
                if let Some(artist) = d.artist.as_mut() {
                    let title = &d.stage.title;
                    let brush = scaled_brush(palette.text, block_alpha);
                    let size = title.size_px * HERO_TITLE_SCALE;
                    let layout = artist.layout(&title.text, size, brush)?;
                    let (text_w, text_h) = text::measure(&layout);
                    let origin = Point::new(
                        (content.x0 + content.x1 - text_w) / 2.0,
                        content.y0 + content.height() * 0.28 - text_h / 2.0,
                    );
                    ctx.set_transform(affine_to_cpu(Affine::translate((origin.x, origin.y))));
                    text::draw_layout(ctx, &layout, artist.font_data());
                }
                if let Some(cta) = d.layout.cta {
                    fill_rounded(ctx, to_screen(cta), palette.accent, block_alpha);
                }
            }
            SectionKind::Text => {
                fill_rounded(ctx, to_screen(section.content), palette.surface, block_alpha);
            }
            SectionKind::ProjectIndex => {
                for (i, row) in d.layout.project_rows.iter().enumerate() {
                    let row = to_screen(*row);
                    fill_rounded(ctx, row, palette.surface, block_alpha);
                    let Some(project) = d.stage.projects.get(i) else {
                        continue;
                    };
                    if let Some(artist) = d.artist.as_mut() {
                        let brush = scaled_brush(palette.text, block_alpha);
                        let layout = artist.layout(&project.name, ROW_TEXT_SIZE_PX, brush)?;
                        let (_, text_h) = text::measure(&layout);
                        let origin = Point::new(
                            row.x0 + 24.0,
                            (row.y0 + row.y1 - text_h) / 2.0,
                        );
                        ctx.set_transform(affine_to_cpu(Affine::translate((origin.x, origin.y))));
                        text::draw_layout(ctx, &layout, artist.font_data());
                    }
                }
            }
            SectionKind::Contact => {
                fill_rounded(ctx, to_screen(section.content), palette.surface, block_alpha);
                for icon in &d.layout.contact_icons {
                    let icon = to_screen(*icon);
                    fill_circle(
                        ctx,
                        icon.center(),
                        icon.width() / 2.0,
                        palette.accent,
                        block_alpha,
                    );
                }
            }
        }
    }

    if layered {
        ctx.pop_layer();
    }
    Ok(())
}

/// The open project's overlay: full-bleed background, the fixed gallery
/// frame with its cross-fading images, narrative bands at the overlay's own
/// scroll offset, and the back button on top.
fn draw_detail_overlay(ctx: &mut vello_cpu::RenderContext, d: &Director) {
    let Some(session) = d.transitions.session() else {
        return;
    };
    let Some(project) = d.stage.project(session.project()) else {
        return;
    };
    let palette = d.stage.palette;
    let layout = session.layout();
    let vh = d.viewport.h();
    let scroll = session.scroll_y();

    fill_rect(ctx, full_rect(d.viewport), palette.background, 1.0);

    fill_rounded(ctx, layout.image_frame, palette.surface, 1.0);
    let image_rect = layout.image_frame.inset(-IMAGE_INSET_PX);
    for (i, &alpha) in session.image_alphas().iter().enumerate() {
        if alpha < MIN_ALPHA {
            continue;
        }
        let Some(image_ref) = project.images.get(i) else {
            continue;
        };
        fill_rounded(ctx, image_rect, placeholder_color(image_ref), alpha);
    }

    for band in &layout.text_bands {
        let band = Rect::new(band.x0, band.y0 - scroll, band.x1, band.y1 - scroll);
        if band.y1 < 0.0 || band.y0 > vh {
            continue;
        }
        fill_rounded(ctx, band, palette.surface, 1.0);
    }

    let bb = layout.back_button;
    fill_rounded(ctx, bb, palette.surface, 1.0);
    let cy = (bb.y0 + bb.y1) / 2.0;
    let mut arrow = kurbo::BezPath::new();
    arrow.move_to((bb.x0 + 34.0, cy - 8.0));
    arrow.line_to((bb.x0 + 20.0, cy));
    arrow.line_to((bb.x0 + 34.0, cy + 8.0));
    arrow.close_path();
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    set_paint(ctx, palette.accent, 1.0);
    ctx.fill_path(&shape_to_cpu(&arrow));
}

/// The hover preview panel, right-aligned against the side margin. `top` is
/// in document space, so the page scroll applies.
fn draw_hover_preview(ctx: &mut vello_cpu::RenderContext, d: &Director) {
    let Some(hover) = d.transitions.hover() else {
        return;
    };
    let Some(project) = d.stage.project(hover.project) else {
        return;
    };
    let (pw, ph) = d.layout.preview_size;
    let x1 = d.viewport.w() * (1.0 - SIDE_MARGIN_FRAC);
    let y0 = hover.top - d.scroller.offset();
    let panel = Rect::new(x1 - pw, y0, x1, y0 + ph);
    fill_rounded(ctx, panel, d.stage.palette.surface, 1.0);
    fill_rounded(
        ctx,
        panel.inset(-IMAGE_INSET_PX),
        placeholder_color(&project.preview_image),
        1.0,
    );
}

/// The intro overlay: a full-bleed fill plus the title's staggered letter
/// entrances, each glyph on its own rise-and-fade pose. The whole overlay
/// fades through one opacity layer once the dissolve starts.
fn draw_loading_overlay(
    ctx: &mut vello_cpu::RenderContext,
    d: &mut Director,
) -> VitrineResult<()> {
    if !d.loading.overlay_active() {
        return Ok(());
    }
    let overlay_alpha = d.loading.overlay_alpha();
    if overlay_alpha < MIN_ALPHA {
        return Ok(());
    }
    let palette = d.stage.palette;
    let viewport = d.viewport;

    let layered = overlay_alpha < 1.0;
    if layered {
        ctx.push_opacity_layer(overlay_alpha as f32);
    }

    fill_rect(ctx, full_rect(viewport), palette.background, 1.0);

    if d.loading.letters_visible()
        && let Some(artist) = d.artist.as_mut()
    {
        let title = &d.stage.title;
        let layout = artist.layout(&title.text, title.size_px, TextBrush::from(palette.text))?;
        let (text_w, text_h) = text::measure(&layout);
        let origin = Point::new(
            (viewport.w() - text_w) / 2.0,
            (viewport.h() - text_h) / 2.0,
        );
        let font = artist.font_data().clone();
        for (i, glyph) in text::placed_glyphs(&layout).iter().enumerate() {
            let (alpha, rise) = d.loading.letter_pose(i);
            if alpha < MIN_ALPHA {
                continue;
            }
            ctx.set_transform(affine_to_cpu(Affine::translate((
                origin.x,
                origin.y + rise,
            ))));
            set_paint(ctx, palette.text, alpha);
            ctx.glyph_run(&font)
                .font_size(title.size_px)
                .fill_glyphs(std::iter::once(vello_cpu::Glyph {
                    id: glyph.id,
                    x: glyph.x,
                    y: glyph.y,
                }));
        }
    }

    if layered {
        ctx.pop_layer();
    }
    Ok(())
}

/// Dissolve fragments: a wide glow square under a tight fill square, both
/// spinning around the particle's center.
fn draw_dissolve(ctx: &mut vello_cpu::RenderContext, d: &Director) {
    for p in d.loading.dissolve().particles() {
        let size = p.size();
        if size <= 0.0 {
            continue;
        }
        let pose = Affine::translate((p.pos().x, p.pos().y)) * Affine::rotate(p.rotation());
        ctx.set_transform(affine_to_cpu(pose));

        let glow = p.glow_alpha();
        if glow >= MIN_ALPHA {
            set_paint(ctx, p.color(), glow);
            ctx.fill_rect(&rect_to_cpu(Rect::new(-size, -size, size, size)));
        }
        let fill = p.fill_alpha();
        if fill >= MIN_ALPHA {
            set_paint(ctx, p.color(), fill);
            let half = size / 2.0;
            ctx.fill_rect(&rect_to_cpu(Rect::new(-half, -half, half, half)));
        }
    }
}

fn draw_cover(ctx: &mut vello_cpu::RenderContext, d: &Director) {
    let Some(cover) = d.transitions.cover() else {
        return;
    };
    let s = cover.scale_y.clamp(0.0, 1.0);
    if s <= 0.0 {
        return;
    }
    let vw = d.viewport.w();
    let vh = d.viewport.h();
    let rect = match cover.origin {
        WipeOrigin::Bottom => Rect::new(0.0, vh * (1.0 - s), vw, vh),
        WipeOrigin::Top => Rect::new(0.0, 0.0, vw, vh * s),
    };
    fill_rect(ctx, rect, d.stage.palette.surface, 1.0);
}

fn draw_cursor(ctx: &mut vello_cpu::RenderContext, d: &Director) {
    let accent = d.stage.palette.accent;
    let ring = if d.cursor.is_hover() {
        CURSOR_RING_HOVER_R_PX
    } else {
        CURSOR_RING_R_PX
    };
    fill_circle(ctx, d.cursor.marker(), ring, accent, CURSOR_RING_ALPHA);
    fill_circle(ctx, d.cursor.dot(), CURSOR_DOT_R_PX, accent, 1.0);
}

/// Deterministic stand-in color for an image reference. Stages carry refs,
/// not pixels, so the renderer derives a stable mid-tone from the ref and
/// cross-fades stay visible and reproducible.
fn placeholder_color(image_ref: &str) -> Rgba8 {
    let h = stable_hash64(0, image_ref);
    Rgba8::opaque(
        64 + (h & 0x7f) as u8,
        64 + ((h >> 8) & 0x7f) as u8,
        96 + ((h >> 16) & 0x5f) as u8,
    )
}

fn scaled_brush(color: Rgba8, alpha: f64) -> TextBrush {
    let a = (f64::from(color.a) * alpha.clamp(0.0, 1.0)).round() as u8;
    TextBrush::from(color.with_alpha(a))
}

fn full_rect(viewport: Viewport) -> Rect {
    Rect::new(0.0, 0.0, viewport.w(), viewport.h())
}

fn set_paint(ctx: &mut vello_cpu::RenderContext, color: Rgba8, alpha: f64) {
    let a = (f64::from(color.a) * alpha.clamp(0.0, 1.0)).round() as u8;
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        color.r, color.g, color.b, a,
    ));
}

fn fill_rect(ctx: &mut vello_cpu::RenderContext, rect: Rect, color: Rgba8, alpha: f64) {
    if alpha < MIN_ALPHA {
        return;
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    set_paint(ctx, color, alpha);
    ctx.fill_rect(&rect_to_cpu(rect));
}

fn fill_rounded(ctx: &mut vello_cpu::RenderContext, rect: Rect, color: Rgba8, alpha: f64) {
    if alpha < MIN_ALPHA {
        return;
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    set_paint(ctx, color, alpha);
    let rr = RoundedRect::from_rect(rect, CORNER_RADIUS_PX);
    ctx.fill_path(&shape_to_cpu(&rr));
}

fn fill_circle(ctx: &mut vello_cpu::RenderContext, center: Point, r: f64, color: Rgba8, alpha: f64) {
    if alpha < MIN_ALPHA || r <= 0.0 {
        return;
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    set_paint(ctx, color, alpha);
    ctx.fill_path(&shape_to_cpu(&Circle::new(center, r)));
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn shape_to_cpu(shape: &impl Shape) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in shape.path_elements(0.1) {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p0, p1) => out.quad_to(point_to_cpu(p0), point_to_cpu(p1)),
            PathEl::CurveTo(p0, p1, p2) => {
                out.curve_to(point_to_cpu(p0), point_to_cpu(p1), point_to_cpu(p2))
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
