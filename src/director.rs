use kurbo::Point;

use crate::{
    ambient::AmbientField,
    core::{FrameIndex, Viewport},
    cursor::CursorTrail,
    error::VitrineResult,
    input::{InputEvent, InputScript},
    layout::{HotspotRole, StageLayout},
    loading::{LoadingAnimation, LoadingEvent},
    reveal::RevealObserver,
    scroll::{DetailGate, SmoothScroller},
    stage::Stage,
    text::TitleArtist,
    transitions::PageTransitions,
};

/// Owns every live component and advances them once per tick in a fixed
/// order: input, loading, ambient field, cursor, scroller, transitions,
/// reveal observer. Rendering reads the post-tick state; nothing here draws.
///
/// The whole session is deterministic for a given stage and input script:
/// the only randomness is seeded from the stage, and ticks carry no wall
/// clock.
pub struct Director {
    pub(crate) stage: Stage,
    pub(crate) viewport: Viewport,
    pub(crate) layout: StageLayout,
    pub(crate) frame: FrameIndex,
    pub(crate) gate: DetailGate,
    pub(crate) loading: LoadingAnimation,
    pub(crate) ambient: AmbientField,
    pub(crate) cursor: CursorTrail,
    pub(crate) scroller: SmoothScroller,
    pub(crate) reveal: RevealObserver,
    pub(crate) transitions: PageTransitions,
    pub(crate) artist: Option<TitleArtist>,
    pub(crate) pointer: Point,
    pub(crate) content_ready: bool,
}

impl Director {
    /// Validate the stage and wire the components together. Passing no font
    /// bytes keeps the title artist out entirely; the loading sequence then
    /// takes its particle-free fallback path.
    pub fn new(stage: Stage, font_bytes: Option<Vec<u8>>) -> VitrineResult<Self> {
        stage.validate()?;
        let artist = font_bytes.map(TitleArtist::new).transpose()?;
        let viewport = stage.viewport;
        let layout = StageLayout::compute(&stage, viewport);
        let gate = DetailGate::new();
        let loading = LoadingAnimation::new(&stage.title, stage.palette.text, stage.fps, stage.seed);
        let ambient = AmbientField::new(viewport, stage.seed);
        let scroller = SmoothScroller::new(gate.clone());
        let transitions = PageTransitions::new(gate.clone(), stage.fps, stage.touch);

        Ok(Self {
            stage,
            viewport,
            layout,
            frame: FrameIndex(0),
            gate,
            loading,
            ambient,
            cursor: CursorTrail::new(),
            scroller,
            reveal: RevealObserver::new(),
            transitions,
            artist,
            pointer: Point::ZERO,
            content_ready: false,
        })
    }

    /// Advance one tick, applying `events` first.
    #[tracing::instrument(skip(self, events))]
    pub fn tick(&mut self, events: &[InputEvent]) -> VitrineResult<()> {
        for event in events {
            self.apply(*event);
        }

        if let Some(LoadingEvent::Finished) =
            self.loading.step(self.artist.as_mut(), self.viewport)?
        {
            // Content was unmeasurable while hidden; measure and observe now.
            self.content_ready = true;
            self.scroller
                .set_extent(self.layout.content_height, self.viewport.h());
            self.reveal.observe(self.layout.reveal_targets());
            tracing::debug!(frame = self.frame.0, "loading finished, page live");
        }

        self.ambient.step();

        self.cursor.set_hover(self.pointer_over_hotspot());
        self.cursor.step();

        self.scroller.step();
        self.transitions.step(&self.stage, self.viewport);
        self.reveal.update(self.scroller.offset(), self.viewport.h());

        self.frame.0 += 1;
        Ok(())
    }

    /// Advance one tick, drawing this tick's events from a script.
    pub fn tick_scripted(&mut self, script: &InputScript) -> VitrineResult<()> {
        let events: Vec<InputEvent> = script.events_at(self.frame).collect();
        self.tick(&events)
    }

    fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMoved { x, y } => {
                self.pointer = Point::new(x, y);
                self.cursor.pointer_moved(self.pointer);
                if self.loading.content_displayed() {
                    self.transitions
                        .handle_pointer(self.pointer, &self.layout, self.scroller.offset());
                }
            }
            InputEvent::Wheel { delta_y } => {
                if self.transitions.session().is_some() {
                    self.transitions.wheel(delta_y);
                } else {
                    self.scroller.wheel(delta_y);
                }
            }
            InputEvent::Click { x, y } => self.dispatch_click(Point::new(x, y)),
            InputEvent::Resized { width, height } => self.resize(Viewport::new(width, height)),
        }
    }

    /// Route a click to whatever surface currently owns the screen.
    fn dispatch_click(&mut self, p: Point) {
        // The loading overlay swallows everything under it, and so does a
        // cover mid-wipe.
        if !self.loading.content_displayed() || self.transitions.is_wiping() {
            return;
        }
        if let Some(session) = self.transitions.session() {
            if session.layout().hit_back(p) {
                tracing::debug!(frame = self.frame.0, "closing project overlay");
                self.transitions.close_project();
            }
            return;
        }
        match self.layout.hit_page(p, self.scroller.offset()) {
            Some(HotspotRole::ProjectLink(id)) => {
                tracing::debug!(frame = self.frame.0, project = id.0, "opening project");
                self.transitions.open_project(id, &self.stage);
            }
            Some(HotspotRole::CtaButton) => {
                if let Some(top) = self.layout.contact_top {
                    self.scroller.scroll_to(top);
                }
            }
            Some(HotspotRole::ContactIcon(_)) | None => {}
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.layout = StageLayout::compute(&self.stage, viewport);
        self.ambient.resize(viewport);
        let content = if self.content_ready {
            self.layout.content_height
        } else {
            0.0
        };
        self.scroller.set_extent(content, viewport.h());
        if self.content_ready {
            self.reveal.retarget(self.layout.reveal_targets());
        }
        self.transitions.handle_resize(&self.stage, viewport);
    }

    fn pointer_over_hotspot(&self) -> bool {
        if let Some(session) = self.transitions.session() {
            return session.layout().hit_back(self.pointer);
        }
        if !self.loading.content_displayed() || self.transitions.is_wiping() {
            return false;
        }
        self.layout
            .hit_page(self.pointer, self.scroller.offset())
            .is_some()
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn layout(&self) -> &StageLayout {
        &self.layout
    }

    pub fn frame(&self) -> FrameIndex {
        self.frame
    }

    pub fn gate(&self) -> &DetailGate {
        &self.gate
    }

    pub fn loading(&self) -> &LoadingAnimation {
        &self.loading
    }

    pub fn ambient(&self) -> &AmbientField {
        &self.ambient
    }

    pub fn cursor(&self) -> &CursorTrail {
        &self.cursor
    }

    pub fn scroller(&self) -> &SmoothScroller {
        &self.scroller
    }

    pub fn reveal(&self) -> &RevealObserver {
        &self.reveal
    }

    pub fn transitions(&self) -> &PageTransitions {
        &self.transitions
    }

    pub fn content_ready(&self) -> bool {
        self.content_ready
    }

    /// The artist is borrowed mutably by rendering to lay out live text.
    pub fn artist_mut(&mut self) -> Option<&mut TitleArtist> {
        self.artist.as_mut()
    }

    pub fn has_artist(&self) -> bool {
        self.artist.is_some()
    }
}

impl std::fmt::Debug for Director {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Director")
            .field("frame", &self.frame)
            .field("viewport", &self.viewport)
            .field("content_ready", &self.content_ready)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Fps;

    fn demo_director() -> Director {
        let mut stage = Stage::demo();
        // 10 fps keeps the intro short: handover lands on tick 26.
        stage.fps = Fps::new(10, 1).unwrap();
        Director::new(stage, None).unwrap()
    }

    fn run(d: &mut Director, frames: usize) {
        for _ in 0..frames {
            d.tick(&[]).unwrap();
        }
    }

    fn finish_loading(d: &mut Director) {
        run(d, 30);
        assert!(d.content_ready());
    }

    #[test]
    fn loading_handover_arms_scroller_and_reveal() {
        let mut d = demo_director();
        assert_eq!(d.scroller().target(), 0.0);
        d.tick(&[InputEvent::Wheel { delta_y: 300.0 }]).unwrap();
        // Extent is still zero while the intro covers the page.
        assert_eq!(d.scroller().target(), 0.0);

        finish_loading(&mut d);
        assert!(!d.reveal().is_empty());
        d.tick(&[InputEvent::Wheel { delta_y: 300.0 }]).unwrap();
        assert_eq!(d.scroller().target(), 300.0);
    }

    #[test]
    fn click_on_row_opens_and_back_closes() {
        let mut d = demo_director();
        finish_loading(&mut d);

        let row = d.layout().project_rows[0];
        let click = InputEvent::Click {
            x: (row.x0 + row.x1) / 2.0,
            y: (row.y0 + row.y1) / 2.0,
        };
        d.tick(&[click]).unwrap();
        assert!(d.gate().is_raised());
        assert!(d.transitions().is_wiping());

        run(&mut d, 8);
        let session = d.transitions().session().unwrap();
        assert_eq!(session.project().0, 0);
        let back = session.layout().back_button;
        let expected = session.trigger_count();

        let click = InputEvent::Click {
            x: (back.x0 + back.x1) / 2.0,
            y: (back.y0 + back.y1) / 2.0,
        };
        d.tick(&[click]).unwrap();
        run(&mut d, 8);
        assert!(d.transitions().session().is_none());
        assert!(!d.gate().is_raised());
        assert_eq!(d.transitions().last_released_triggers().len(), expected);
    }

    #[test]
    fn wheel_routes_to_the_open_overlay() {
        let mut d = demo_director();
        finish_loading(&mut d);
        d.tick(&[InputEvent::Wheel { delta_y: 120.0 }]).unwrap();
        let page_target = d.scroller().target();
        assert_eq!(page_target, 120.0);

        let row = d.layout().project_rows[0];
        d.tick(&[InputEvent::Click {
            x: (row.x0 + row.x1) / 2.0,
            y: (row.y0 + row.y1) / 2.0 - d.scroller().offset(),
        }])
        .unwrap();
        run(&mut d, 8);
        assert!(d.transitions().session().is_some());

        d.tick(&[InputEvent::Wheel { delta_y: 200.0 }]).unwrap();
        let session = d.transitions().session().unwrap();
        assert_eq!(session.scroll_y(), 200.0);
        // The page target never moved while the gate was up.
        assert_eq!(d.scroller().target(), page_target);
    }

    #[test]
    fn cta_click_scrolls_to_contact() {
        let mut d = demo_director();
        finish_loading(&mut d);
        let cta = d.layout().cta.unwrap();
        d.tick(&[InputEvent::Click {
            x: (cta.x0 + cta.x1) / 2.0,
            y: (cta.y0 + cta.y1) / 2.0,
        }])
        .unwrap();
        assert_eq!(d.scroller().target(), d.layout().contact_top.unwrap());
    }

    #[test]
    fn clicks_are_swallowed_while_loading_covers_the_page() {
        let mut d = demo_director();
        let row = d.layout().project_rows[0];
        d.tick(&[InputEvent::Click {
            x: (row.x0 + row.x1) / 2.0,
            y: (row.y0 + row.y1) / 2.0,
        }])
        .unwrap();
        assert!(!d.gate().is_raised());
        assert!(!d.transitions().is_wiping());
    }

    #[test]
    fn pointer_over_row_sets_cursor_hover_and_preview() {
        let mut d = demo_director();
        finish_loading(&mut d);
        let row = d.layout().project_rows[1];
        d.tick(&[InputEvent::PointerMoved {
            x: (row.x0 + row.x1) / 2.0,
            y: (row.y0 + row.y1) / 2.0,
        }])
        .unwrap();
        assert!(d.cursor().is_hover());
        assert_eq!(d.transitions().hover().unwrap().project.0, 1);

        d.tick(&[InputEvent::PointerMoved { x: 1.0, y: 1.0 }]).unwrap();
        assert!(!d.cursor().is_hover());
        assert!(d.transitions().hover().is_none());
    }

    #[test]
    fn resize_relayouts_and_keeps_scroll_reachable() {
        let mut d = demo_director();
        finish_loading(&mut d);
        d.tick(&[InputEvent::Wheel { delta_y: 1.0e9 }]).unwrap();
        let max_before = d.scroller().max_scroll();
        assert_eq!(d.scroller().target(), max_before);

        d.tick(&[InputEvent::Resized {
            width: 640,
            height: 360,
        }])
        .unwrap();
        assert_eq!(d.viewport(), Viewport::new(640, 360));
        assert_eq!(d.layout().viewport, Viewport::new(640, 360));
        assert_eq!(d.ambient().len(), crate::ambient::POOL_SIZE);
        // Reveal registration survives with the same target count.
        assert!(!d.reveal().is_empty());
    }

    #[test]
    fn scripted_session_is_deterministic() {
        let script = InputScript {
            events: vec![
                crate::input::ScriptedEvent {
                    frame: FrameIndex(27),
                    event: InputEvent::PointerMoved { x: 300.0, y: 300.0 },
                },
                crate::input::ScriptedEvent {
                    frame: FrameIndex(28),
                    event: InputEvent::Wheel { delta_y: 240.0 },
                },
            ],
        };
        let run_once = || {
            let mut d = demo_director();
            for _ in 0..40 {
                d.tick_scripted(&script).unwrap();
            }
            (
                d.scroller().offset(),
                d.cursor().marker(),
                d.ambient().particles()[0].pos,
            )
        };
        assert_eq!(run_once(), run_once());
    }
}
