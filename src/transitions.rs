use kurbo::Point;

use crate::{
    core::{Fps, Viewport},
    ease::{Ease, approach},
    layout::{HotspotRole, OverlayLayout, StageLayout},
    scroll::DetailGate,
    stage::{ProjectId, Stage},
    timeline::Timeline,
    trigger::{TriggerEvent, TriggerId, TriggerSet},
};

/// Duration of one leg of the cover wipe.
const WIPE_SECS: f64 = 0.4;
/// Per-frame chase factor for the gallery cross-fade.
const IMAGE_FADE_FACTOR: f64 = 0.15;

/// Edge the cover panel grows from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WipeOrigin {
    Top,
    Bottom,
}

/// Steps the wipe timelines fire between their tweens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WipeAction {
    OriginBottom,
    OriginTop,
    Activate,
    Teardown,
}

/// Snapshot of the cover panel while a wipe is playing.
#[derive(Clone, Copy, Debug)]
pub struct CoverWipe {
    pub scale_y: f64,
    pub origin: WipeOrigin,
}

/// The preview panel that follows project links under a non-touch pointer.
/// `top` is in document space so the panel scrolls with the list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoverPreview {
    pub project: ProjectId,
    pub top: f64,
}

/// One open detail overlay: its geometry, internal scroll position, the
/// scroll-linked trigger set and the gallery cross-fade state.
#[derive(Debug)]
pub struct DetailSession {
    project: ProjectId,
    layout: OverlayLayout,
    scroll_y: f64,
    triggers: TriggerSet,
    trigger_ids: Vec<TriggerId>,
    active_image: usize,
    image_alphas: Vec<f64>,
}

impl DetailSession {
    fn new(project: ProjectId, layout: OverlayLayout, image_count: usize) -> Self {
        let mut triggers = TriggerSet::new();
        let mut trigger_ids = Vec::new();
        // No images means nothing to cross-fade, so no triggers either.
        if image_count > 0 {
            for i in 0..layout.text_bands.len() {
                if let Some((start, end)) = layout.center_band(i) {
                    trigger_ids.push(triggers.create(i, start, end));
                }
            }
        }
        Self {
            project,
            layout,
            scroll_y: 0.0,
            triggers,
            trigger_ids,
            active_image: 0,
            image_alphas: vec![0.0; image_count],
        }
    }

    /// Overlay scroll is instant: no inertia, clamped to the extent, and the
    /// trigger set sees every position change.
    fn wheel(&mut self, delta_y: f64) {
        let pos = (self.scroll_y + delta_y).clamp(0.0, self.layout.scroll_extent);
        self.move_to(pos);
    }

    fn move_to(&mut self, pos: f64) {
        self.scroll_y = pos;
        let mut crossings = Vec::new();
        self.triggers.update(pos, &mut crossings);
        self.apply_crossings(&crossings);
    }

    fn apply_crossings(&mut self, crossings: &[TriggerEvent]) {
        let Some(last_image) = self.image_alphas.len().checked_sub(1) else {
            return;
        };
        for ev in crossings {
            // Narrative blocks can outnumber images; extras hold the last one.
            self.active_image = ev.index.min(last_image);
        }
    }

    fn step(&mut self) {
        for (i, alpha) in self.image_alphas.iter_mut().enumerate() {
            let goal = if i == self.active_image { 1.0 } else { 0.0 };
            *alpha = approach(*alpha, goal, IMAGE_FADE_FACTOR);
        }
    }

    fn resize(&mut self, layout: OverlayLayout) {
        self.layout = layout;
        for (i, id) in self.trigger_ids.iter().enumerate() {
            if let Some((start, end)) = self.layout.center_band(i) {
                self.triggers.update_band(*id, start, end);
            }
        }
        let pos = self.scroll_y.min(self.layout.scroll_extent);
        self.move_to(pos);
    }

    fn release_triggers(&mut self) -> Vec<TriggerId> {
        self.triggers.drain()
    }

    pub fn project(&self) -> ProjectId {
        self.project
    }

    pub fn layout(&self) -> &OverlayLayout {
        &self.layout
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn active_image(&self) -> usize {
        self.active_image
    }

    pub fn image_alphas(&self) -> &[f64] {
        &self.image_alphas
    }

    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }
}

/// Orchestrates project navigation: the cover wipe timelines, the detail
/// session they activate and tear down, and the hover preview over the
/// project list. Holds the scroller's gate up for as long as a session is
/// anywhere in flight.
#[derive(Debug)]
pub struct PageTransitions {
    gate: DetailGate,
    touch: bool,
    wipe_frames: u64,
    wipe: Option<Timeline<WipeAction>>,
    origin: WipeOrigin,
    cover_scale: f64,
    pending_open: Option<ProjectId>,
    session: Option<DetailSession>,
    hover: Option<HoverPreview>,
    last_released: Vec<TriggerId>,
}

impl PageTransitions {
    pub fn new(gate: DetailGate, fps: Fps, touch: bool) -> Self {
        Self {
            gate,
            touch,
            wipe_frames: fps.secs_to_frames_min1(WIPE_SECS),
            wipe: None,
            origin: WipeOrigin::Bottom,
            cover_scale: 0.0,
            pending_open: None,
            session: None,
            hover: None,
            last_released: Vec::new(),
        }
    }

    /// Start the open sequence. Ignored while a wipe is playing or a session
    /// is already up; an unknown project aborts before any visual change.
    pub fn open_project(&mut self, id: ProjectId, stage: &Stage) {
        if self.wipe.is_some() || self.session.is_some() || stage.project(id).is_none() {
            return;
        }
        self.gate.raise();
        self.hover = None;
        self.pending_open = Some(id);
        self.wipe = Some(
            Timeline::builder(0.0)
                .call(WipeAction::OriginBottom)
                .to(1.0, self.wipe_frames, Ease::InOutQuad)
                .call(WipeAction::Activate)
                .call(WipeAction::OriginTop)
                .to(0.0, self.wipe_frames, Ease::InOutQuad)
                .build(),
        );
    }

    /// Start the close sequence. The session's triggers are released here,
    /// before the wipe plays, so a re-open can never double-fire them.
    pub fn close_project(&mut self) {
        if self.wipe.is_some() {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        self.last_released = session.release_triggers();
        self.wipe = Some(
            Timeline::builder(0.0)
                .call(WipeAction::OriginTop)
                .to(1.0, self.wipe_frames, Ease::InOutQuad)
                .call(WipeAction::Teardown)
                .call(WipeAction::OriginBottom)
                .to(0.0, self.wipe_frames, Ease::InOutQuad)
                .build(),
        );
    }

    /// Advance the wipe (if playing) and the session's cross-fade.
    pub fn step(&mut self, stage: &Stage, viewport: Viewport) {
        if let Some(timeline) = self.wipe.as_mut() {
            let mut fired = Vec::new();
            timeline.tick(&mut fired);
            self.cover_scale = timeline.value();
            let finished = timeline.is_finished();
            for action in fired {
                match action {
                    WipeAction::OriginBottom => self.origin = WipeOrigin::Bottom,
                    WipeAction::OriginTop => self.origin = WipeOrigin::Top,
                    WipeAction::Activate => {
                        if let Some(id) = self.pending_open.take()
                            && let Some(project) = stage.project(id)
                        {
                            self.session = Some(DetailSession::new(
                                id,
                                OverlayLayout::compute(project, viewport),
                                project.images.len(),
                            ));
                        }
                    }
                    WipeAction::Teardown => {
                        self.session = None;
                        self.gate.lower();
                    }
                }
            }
            if finished {
                self.wipe = None;
            }
        }
        if let Some(session) = self.session.as_mut() {
            session.step();
        }
    }

    /// Wheel input while a session exists scrolls the overlay.
    pub fn wheel(&mut self, delta_y: f64) {
        if let Some(session) = self.session.as_mut() {
            session.wheel(delta_y);
        }
    }

    /// Track the pointer over the project list for the hover preview. The
    /// preview keys to the hovered link and stays put until the pointer
    /// leaves the list region. Touch stages never show it.
    pub fn handle_pointer(&mut self, screen: Point, layout: &StageLayout, scroll_y: f64) {
        if self.touch {
            return;
        }
        if self.session.is_some() || self.wipe.is_some() {
            self.hover = None;
            return;
        }
        match layout.hit_page(screen, scroll_y) {
            Some(HotspotRole::ProjectLink(id)) => {
                if let Some(center) = layout.row_center_y(id) {
                    let (_, preview_h) = layout.preview_size;
                    self.hover = Some(HoverPreview {
                        project: id,
                        top: center - preview_h / 2.0,
                    });
                }
            }
            _ => {
                if !layout.in_projects_region(screen, scroll_y) {
                    self.hover = None;
                }
            }
        }
    }

    /// Recompute the open session's geometry for a new viewport, re-banding
    /// its triggers in place and clamping its scroll.
    pub fn handle_resize(&mut self, stage: &Stage, viewport: Viewport) {
        if let Some(session) = self.session.as_mut()
            && let Some(project) = stage.project(session.project)
        {
            session.resize(OverlayLayout::compute(project, viewport));
        }
    }

    pub fn cover(&self) -> Option<CoverWipe> {
        self.wipe.as_ref().map(|_| CoverWipe {
            scale_y: self.cover_scale,
            origin: self.origin,
        })
    }

    pub fn is_wiping(&self) -> bool {
        self.wipe.is_some()
    }

    pub fn session(&self) -> Option<&DetailSession> {
        self.session.as_ref()
    }

    pub fn hover(&self) -> Option<&HoverPreview> {
        self.hover.as_ref()
    }

    /// Ids drained by the most recent close, in creation order.
    pub fn last_released_triggers(&self) -> &[TriggerId] {
        &self.last_released
    }
}
