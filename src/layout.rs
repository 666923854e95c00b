use kurbo::{Point, Rect};

use crate::{
    core::Viewport,
    reveal::RevealTarget,
    stage::{ProjectId, ProjectSpec, SectionId, SectionKind, Stage},
};

pub const SIDE_MARGIN_FRAC: f64 = 0.08;
const SECTION_INSET_FRAC: f64 = 0.12;
const LIST_HEADING_PX: f64 = 64.0;
const ROW_HEIGHT_PX: f64 = 72.0;
const ROW_GAP_PX: f64 = 16.0;
const LIST_FOOTER_PX: f64 = 48.0;
const CTA_W_PX: f64 = 220.0;
const CTA_H_PX: f64 = 56.0;
const ICON_SIZE_PX: f64 = 48.0;
const ICON_GAP_PX: f64 = 24.0;
const CONTACT_ICON_COUNT: usize = 3;
pub const PREVIEW_W_FRAC: f64 = 0.30;
pub const PREVIEW_H_FRAC: f64 = 0.34;

const BACK_BUTTON_MARGIN_PX: f64 = 32.0;
const BACK_BUTTON_W_PX: f64 = 140.0;
const BACK_BUTTON_H_PX: f64 = 44.0;
const IMAGE_FRAME_W_FRAC: f64 = 0.44;
const IMAGE_FRAME_H_FRAC: f64 = 0.56;
const TEXT_COL_X_FRAC: f64 = 0.52;
const TEXT_COL_W_FRAC: f64 = 0.40;
const OVERLAY_INTRO_VH: f64 = 0.9;
const OVERLAY_BAND_VH: f64 = 0.8;
const OVERLAY_GAP_VH: f64 = 0.2;

/// Interactive regions the pointer can land on. These drive both cursor
/// hover state and click dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HotspotRole {
    ProjectLink(ProjectId),
    CtaButton,
    ContactIcon(usize),
}

#[derive(Clone, Debug)]
pub struct Hotspot {
    pub rect: Rect,
    pub role: HotspotRole,
}

#[derive(Clone, Debug)]
pub struct SectionGeom {
    pub id: SectionId,
    pub kind: SectionKind,
    /// Full-width band in document space.
    pub rect: Rect,
    /// Inset content block; this is what slides in on reveal.
    pub content: Rect,
    /// Index into the reveal observer's target list, when observed.
    pub reveal_slot: Option<usize>,
}

/// Document-space geometry for the main page, recomputed on resize. The
/// document stacks sections vertically; the project index stretches past its
/// nominal height when its rows need the room.
#[derive(Clone, Debug)]
pub struct StageLayout {
    pub viewport: Viewport,
    pub content_height: f64,
    pub sections: Vec<SectionGeom>,
    pub project_rows: Vec<Rect>,
    /// Band around the rows; leaving it hides the hover preview.
    pub projects_region: Option<Rect>,
    pub cta: Option<Rect>,
    pub contact_icons: Vec<Rect>,
    pub contact_top: Option<f64>,
    /// Hover preview panel size in pixels.
    pub preview_size: (f64, f64),
    hotspots: Vec<Hotspot>,
    reveal_targets: Vec<RevealTarget>,
}

impl StageLayout {
    pub fn compute(stage: &Stage, viewport: Viewport) -> Self {
        let vw = viewport.w();
        let vh = viewport.h();
        let margin = vw * SIDE_MARGIN_FRAC;

        let mut sections = Vec::with_capacity(stage.sections.len());
        let mut project_rows = Vec::new();
        let mut projects_region = None;
        let mut cta = None;
        let mut contact_icons = Vec::new();
        let mut contact_top = None;
        let mut hotspots = Vec::new();
        let mut reveal_targets = Vec::new();

        let mut y = 0.0;
        for (i, spec) in stage.sections.iter().enumerate() {
            let base = spec.height_vh * vh;
            let inset = base * SECTION_INSET_FRAC;
            let height = match spec.kind {
                SectionKind::ProjectIndex => {
                    let rows = stage.projects.len() as f64;
                    let needed = LIST_HEADING_PX
                        + rows * ROW_HEIGHT_PX
                        + (rows - 1.0).max(0.0) * ROW_GAP_PX
                        + LIST_FOOTER_PX;
                    base.max(needed + 2.0 * inset)
                }
                _ => base,
            };

            let rect = Rect::new(0.0, y, vw, y + height);
            let content = Rect::new(margin, y + inset, vw - margin, y + height - inset);

            match spec.kind {
                SectionKind::Hero => {
                    let cx = (content.x0 + content.x1) / 2.0;
                    let button = Rect::new(
                        cx - CTA_W_PX / 2.0,
                        content.y1 - 90.0 - CTA_H_PX,
                        cx + CTA_W_PX / 2.0,
                        content.y1 - 90.0,
                    );
                    hotspots.push(Hotspot {
                        rect: button,
                        role: HotspotRole::CtaButton,
                    });
                    cta = Some(button);
                }
                SectionKind::ProjectIndex => {
                    let rows_top = content.y0 + LIST_HEADING_PX;
                    for (p, _) in stage.projects.iter().enumerate() {
                        let top = rows_top + (p as f64) * (ROW_HEIGHT_PX + ROW_GAP_PX);
                        let row = Rect::new(content.x0, top, content.x1, top + ROW_HEIGHT_PX);
                        hotspots.push(Hotspot {
                            rect: row,
                            role: HotspotRole::ProjectLink(ProjectId(p)),
                        });
                        project_rows.push(row);
                    }
                    if let (Some(first), Some(last)) = (project_rows.first(), project_rows.last()) {
                        projects_region = Some(Rect::new(
                            content.x0,
                            first.y0 - ROW_GAP_PX,
                            content.x1,
                            last.y1 + ROW_GAP_PX,
                        ));
                    }
                }
                SectionKind::Contact => {
                    contact_top = Some(rect.y0);
                    let total = (CONTACT_ICON_COUNT as f64) * ICON_SIZE_PX
                        + ((CONTACT_ICON_COUNT as f64) - 1.0) * ICON_GAP_PX;
                    let cx = (content.x0 + content.x1) / 2.0;
                    let top = (content.y0 + content.y1) / 2.0 + 40.0;
                    for n in 0..CONTACT_ICON_COUNT {
                        let x = cx - total / 2.0 + (n as f64) * (ICON_SIZE_PX + ICON_GAP_PX);
                        let icon = Rect::new(x, top, x + ICON_SIZE_PX, top + ICON_SIZE_PX);
                        hotspots.push(Hotspot {
                            rect: icon,
                            role: HotspotRole::ContactIcon(n),
                        });
                        contact_icons.push(icon);
                    }
                }
                SectionKind::Text => {}
            }

            let reveal_slot = if spec.reveal {
                reveal_targets.push(RevealTarget {
                    top: content.y0,
                    height: content.height(),
                });
                Some(reveal_targets.len() - 1)
            } else {
                None
            };

            sections.push(SectionGeom {
                id: SectionId(i),
                kind: spec.kind,
                rect,
                content,
                reveal_slot,
            });
            y += height;
        }

        Self {
            viewport,
            content_height: y,
            sections,
            project_rows,
            projects_region,
            cta,
            contact_icons,
            contact_top,
            preview_size: (vw * PREVIEW_W_FRAC, vh * PREVIEW_H_FRAC),
            hotspots,
            reveal_targets,
        }
    }

    pub fn reveal_targets(&self) -> Vec<RevealTarget> {
        self.reveal_targets.clone()
    }

    /// Hit-test a screen-space point against the page's interactive regions.
    pub fn hit_page(&self, screen: Point, scroll_y: f64) -> Option<HotspotRole> {
        let doc = Point::new(screen.x, screen.y + scroll_y);
        self.hotspots
            .iter()
            .find(|h| h.rect.contains(doc))
            .map(|h| h.role)
    }

    pub fn row_center_y(&self, id: ProjectId) -> Option<f64> {
        self.project_rows.get(id.0).map(|r| (r.y0 + r.y1) / 2.0)
    }

    pub fn in_projects_region(&self, screen: Point, scroll_y: f64) -> bool {
        let doc = Point::new(screen.x, screen.y + scroll_y);
        self.projects_region.is_some_and(|r| r.contains(doc))
    }
}

/// Geometry for one project's detail overlay. The overlay owns its scroll:
/// the gallery frame stays fixed while narrative bands scroll past it.
#[derive(Clone, Debug)]
pub struct OverlayLayout {
    pub viewport: Viewport,
    pub scroll_extent: f64,
    /// Viewport space; the overlay header does not scroll.
    pub back_button: Rect,
    /// Viewport space; gallery images cross-fade inside this frame.
    pub image_frame: Rect,
    /// Overlay document space, one band per narrative block.
    pub text_bands: Vec<Rect>,
}

impl OverlayLayout {
    pub fn compute(project: &ProjectSpec, viewport: Viewport) -> Self {
        let vw = viewport.w();
        let vh = viewport.h();

        let back_button = Rect::new(
            BACK_BUTTON_MARGIN_PX,
            BACK_BUTTON_MARGIN_PX,
            BACK_BUTTON_MARGIN_PX + BACK_BUTTON_W_PX,
            BACK_BUTTON_MARGIN_PX + BACK_BUTTON_H_PX,
        );

        let frame_w = vw * IMAGE_FRAME_W_FRAC;
        let frame_h = vh * IMAGE_FRAME_H_FRAC;
        let image_frame = Rect::new(
            vw * SIDE_MARGIN_FRAC,
            (vh - frame_h) / 2.0,
            vw * SIDE_MARGIN_FRAC + frame_w,
            (vh - frame_h) / 2.0 + frame_h,
        );

        let col_x0 = vw * TEXT_COL_X_FRAC;
        let col_x1 = col_x0 + vw * TEXT_COL_W_FRAC;
        let mut text_bands = Vec::with_capacity(project.text_sections.len());
        let mut y = vh * OVERLAY_INTRO_VH;
        for _ in &project.text_sections {
            let band = Rect::new(col_x0, y, col_x1, y + vh * OVERLAY_BAND_VH);
            text_bands.push(band);
            y = band.y1 + vh * OVERLAY_GAP_VH;
        }

        Self {
            viewport,
            scroll_extent: (y - vh).max(0.0),
            back_button,
            image_frame,
            text_bands,
        }
    }

    pub fn hit_back(&self, screen: Point) -> bool {
        self.back_button.contains(screen)
    }

    /// Scroll positions at which band `idx` enters and leaves the overlay
    /// viewport's vertical center.
    pub fn center_band(&self, idx: usize) -> Option<(f64, f64)> {
        let half = self.viewport.h() / 2.0;
        self.text_bands
            .get(idx)
            .map(|band| (band.y0 - half, band.y1 - half))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::Stage;

    fn demo_layout() -> (Stage, StageLayout) {
        let stage = Stage::demo();
        let layout = StageLayout::compute(&stage, stage.viewport);
        (stage, layout)
    }

    #[test]
    fn sections_stack_without_gaps() {
        let (_, layout) = demo_layout();
        let mut y = 0.0;
        for section in &layout.sections {
            assert_eq!(section.rect.y0, y);
            y = section.rect.y1;
        }
        assert_eq!(layout.content_height, y);
        assert!(layout.content_height >= 4.0 * 800.0);
    }

    #[test]
    fn rows_sit_inside_the_index_section() {
        let (_, layout) = demo_layout();
        let index = layout
            .sections
            .iter()
            .find(|s| s.kind == SectionKind::ProjectIndex)
            .unwrap();
        assert_eq!(layout.project_rows.len(), 3);
        for row in &layout.project_rows {
            assert!(row.y0 >= index.rect.y0);
            assert!(row.y1 <= index.rect.y1);
        }
    }

    #[test]
    fn index_section_grows_for_long_lists() {
        let mut stage = Stage::demo();
        let template = stage.projects[0].clone();
        for i in 0..12 {
            let mut p = template.clone();
            p.slug = format!("extra-{i}");
            stage.projects.push(p);
        }
        let layout = StageLayout::compute(&stage, stage.viewport);
        let index = layout
            .sections
            .iter()
            .find(|s| s.kind == SectionKind::ProjectIndex)
            .unwrap();
        assert!(index.rect.height() > 800.0);
        assert_eq!(layout.project_rows.len(), 15);
    }

    #[test]
    fn hit_finds_rows_and_cta_through_scroll() {
        let (_, layout) = demo_layout();
        let row = layout.project_rows[1];
        let scroll = 500.0;
        let screen = Point::new((row.x0 + row.x1) / 2.0, (row.y0 + row.y1) / 2.0 - scroll);
        assert_eq!(
            layout.hit_page(screen, scroll),
            Some(HotspotRole::ProjectLink(ProjectId(1)))
        );

        let cta = layout.cta.unwrap();
        let screen = Point::new((cta.x0 + cta.x1) / 2.0, (cta.y0 + cta.y1) / 2.0);
        assert_eq!(layout.hit_page(screen, 0.0), Some(HotspotRole::CtaButton));

        assert_eq!(layout.hit_page(Point::new(1.0, 1.0), 0.0), None);
    }

    #[test]
    fn reveal_targets_follow_section_order() {
        let (stage, layout) = demo_layout();
        let targets = layout.reveal_targets();
        let expected = stage.sections.iter().filter(|s| s.reveal).count();
        assert_eq!(targets.len(), expected);
        for pair in targets.windows(2) {
            assert!(pair[0].top < pair[1].top);
        }
    }

    #[test]
    fn overlay_bands_are_ordered_and_extent_nonnegative() {
        let stage = Stage::demo();
        let overlay = OverlayLayout::compute(&stage.projects[0], stage.viewport);
        assert_eq!(overlay.text_bands.len(), 4);
        for pair in overlay.text_bands.windows(2) {
            assert!(pair[0].y1 <= pair[1].y0);
        }
        assert!(overlay.scroll_extent > 0.0);

        let (start, end) = overlay.center_band(0).unwrap();
        assert!(start < end);
        assert_eq!(start, overlay.text_bands[0].y0 - 400.0);
    }

    #[test]
    fn overlay_with_no_text_has_zero_extent() {
        let mut stage = Stage::demo();
        stage.projects[0].text_sections.clear();
        let overlay = OverlayLayout::compute(&stage.projects[0], stage.viewport);
        assert!(overlay.text_bands.is_empty());
        assert_eq!(overlay.scroll_extent, 0.0);
        assert!(overlay.center_band(0).is_none());
    }
}
