use rand::{SeedableRng, rngs::StdRng};

use crate::{
    core::{Fps, Rgba8, Viewport, stable_hash64},
    dissolve::DissolveField,
    ease::Ease,
    error::VitrineResult,
    stage::TitleSpec,
    text::TitleArtist,
};

/// Seconds of staggered letter entrances before the title rasterizes.
const TEXT_REVEAL_SECS: f64 = 2.0;
/// Seconds the overlay takes to fade out once the dissolve starts.
const OVERLAY_FADE_SECS: f64 = 1.5;
/// Seconds between the dissolve starting and the content counting as visible.
const CONTENT_REVEAL_DELAY_SECS: f64 = 0.5;
/// Stagger between consecutive letter entrances.
const LETTER_DELAY_SECS: f64 = 0.075;
/// Duration of one letter's rise.
const LETTER_RISE_SECS: f64 = 0.5;
/// Vertical travel of a letter entrance, in pixels.
const LETTER_RISE_PX: f64 = 28.0;
/// Seconds the revealed content takes to ramp to full opacity.
const CONTENT_FADE_SECS: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadingPhase {
    TextReveal,
    Rasterize,
    Dissolving,
    Revealed,
}

/// Emitted the tick the intro hands the page over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadingEvent {
    Finished,
}

/// One character of the title with its staggered entrance delay.
#[derive(Clone, Debug)]
pub struct LetterReveal {
    glyph: char,
    delay_frames: u64,
}

impl LetterReveal {
    pub fn glyph(&self) -> char {
        self.glyph
    }
}

/// The intro sequence: staggered letter entrances, one rasterize tick that
/// seeds the dissolve field from the title pixels, an overlay fade, and a
/// single `Finished` event once the content underneath counts as visible.
/// Phases only move forward; the dissolve field outlives them, stepping
/// until its last particle expires.
#[derive(Debug)]
pub struct LoadingAnimation {
    phase: LoadingPhase,
    ticks: u64,
    title_text: String,
    title_size_px: f32,
    text_color: Rgba8,
    letters: Vec<LetterReveal>,
    dissolve: DissolveField,
    rng: StdRng,
    reveal_frames: u64,
    fade_frames: u64,
    content_delay_frames: u64,
    rise_frames: u64,
    content_fade_frames: u64,
    dissolve_started_at: Option<u64>,
    content_displayed: bool,
    content_visible: bool,
    content_alpha: f64,
    finished: bool,
}

impl LoadingAnimation {
    pub fn new(title: &TitleSpec, text_color: Rgba8, fps: Fps, seed: u64) -> Self {
        let letters = title
            .text
            .chars()
            .enumerate()
            .map(|(i, c)| LetterReveal {
                glyph: if c == ' ' { '\u{00a0}' } else { c },
                delay_frames: fps.secs_to_frames_floor(i as f64 * LETTER_DELAY_SECS),
            })
            .collect();

        Self {
            phase: LoadingPhase::TextReveal,
            ticks: 0,
            title_text: title.text.clone(),
            title_size_px: title.size_px,
            text_color,
            letters,
            dissolve: DissolveField::default(),
            rng: StdRng::seed_from_u64(stable_hash64(seed, "dissolve")),
            reveal_frames: fps.secs_to_frames_min1(TEXT_REVEAL_SECS),
            fade_frames: fps.secs_to_frames_min1(OVERLAY_FADE_SECS),
            content_delay_frames: fps.secs_to_frames_min1(CONTENT_REVEAL_DELAY_SECS),
            rise_frames: fps.secs_to_frames_min1(LETTER_RISE_SECS),
            content_fade_frames: fps.secs_to_frames_min1(CONTENT_FADE_SECS),
            dissolve_started_at: None,
            content_displayed: false,
            content_visible: false,
            content_alpha: 0.0,
            finished: false,
        }
    }

    /// Advance one tick. Returns `Finished` on exactly the tick the content
    /// becomes visible. The rasterize tick falls back to a particle-free
    /// handover when the viewport is empty or no artist is available.
    pub fn step(
        &mut self,
        artist: Option<&mut TitleArtist>,
        viewport: Viewport,
    ) -> VitrineResult<Option<LoadingEvent>> {
        self.ticks += 1;
        self.dissolve.step();

        match self.phase {
            LoadingPhase::TextReveal => {
                if self.ticks >= self.reveal_frames {
                    self.phase = LoadingPhase::Rasterize;
                }
            }
            LoadingPhase::Rasterize => {
                if let Some(artist) = artist
                    && !viewport.is_empty()
                {
                    let raster = artist.rasterize_centered(
                        &self.title_text,
                        self.title_size_px,
                        self.text_color,
                        viewport,
                    )?;
                    self.dissolve = DissolveField::sample_raster(
                        &raster,
                        viewport.width,
                        viewport.height,
                        &mut self.rng,
                    )?;
                    self.dissolve.step();
                }
                self.phase = LoadingPhase::Dissolving;
                self.dissolve_started_at = Some(self.ticks);
                self.content_displayed = true;
            }
            LoadingPhase::Dissolving => {
                let started = self.dissolve_started_at.unwrap_or(self.ticks);
                if self.ticks - started >= self.content_delay_frames {
                    self.phase = LoadingPhase::Revealed;
                    self.content_visible = true;
                    self.finished = true;
                    return Ok(Some(LoadingEvent::Finished));
                }
            }
            LoadingPhase::Revealed => {
                let rate = 1.0 / self.content_fade_frames as f64;
                self.content_alpha = (self.content_alpha + rate).min(1.0);
            }
        }
        Ok(None)
    }

    pub fn phase(&self) -> LoadingPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn content_displayed(&self) -> bool {
        self.content_displayed
    }

    pub fn content_visible(&self) -> bool {
        self.content_visible
    }

    /// Opacity of the revealed page content, ramping after the handover.
    pub fn content_alpha(&self) -> f64 {
        self.content_alpha
    }

    /// Whether the loading overlay is still part of the scene.
    pub fn overlay_active(&self) -> bool {
        match self.dissolve_started_at {
            None => true,
            Some(t0) => self.ticks - t0 < self.fade_frames,
        }
    }

    /// Overlay opacity. Holds at 1 until the dissolve starts, then fades
    /// linearly to 0.
    pub fn overlay_alpha(&self) -> f64 {
        match self.dissolve_started_at {
            None => 1.0,
            Some(t0) => {
                let dt = (self.ticks - t0) as f64;
                (1.0 - dt / self.fade_frames as f64).max(0.0)
            }
        }
    }

    /// Title entries are drawn while the phases before the dissolve run.
    pub fn letters_visible(&self) -> bool {
        matches!(
            self.phase,
            LoadingPhase::TextReveal | LoadingPhase::Rasterize
        )
    }

    pub fn letters(&self) -> &[LetterReveal] {
        &self.letters
    }

    /// Entrance pose for the letter at `index`: (opacity, remaining upward
    /// travel in pixels). A letter renders that many pixels below its final
    /// spot. Indexes past the end clamp to the last letter.
    pub fn letter_pose(&self, index: usize) -> (f64, f64) {
        let Some(letter) = self
            .letters
            .get(index)
            .or_else(|| self.letters.last())
        else {
            return (0.0, 0.0);
        };
        if self.ticks < letter.delay_frames {
            return (0.0, LETTER_RISE_PX);
        }
        let t = (self.ticks - letter.delay_frames) as f64 / self.rise_frames as f64;
        let p = Ease::OutCubic.apply(t.min(1.0));
        (p, (1.0 - p) * LETTER_RISE_PX)
    }

    pub fn dissolve(&self) -> &DissolveField {
        &self.dissolve
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title() -> TitleSpec {
        TitleSpec {
            text: "AB C".to_string(),
            size_px: 48.0,
            font_source: None,
        }
    }

    fn anim(fps_num: u32) -> LoadingAnimation {
        LoadingAnimation::new(
            &title(),
            Rgba8::opaque(236, 238, 243),
            Fps::new(fps_num, 1).unwrap(),
            7,
        )
    }

    #[test]
    fn letters_substitute_nbsp_and_stagger_delays() {
        let a = anim(60);
        let glyphs: Vec<char> = a.letters().iter().map(|l| l.glyph()).collect();
        assert_eq!(glyphs, vec!['A', 'B', '\u{00a0}', 'C']);
        // 0.075 s stride at 60 fps is 4.5 frames, floored per index.
        let delays: Vec<u64> = a.letters().iter().map(|l| l.delay_frames).collect();
        assert_eq!(delays, vec![0, 4, 9, 13]);
    }

    #[test]
    fn fallback_path_finishes_once_without_particles() {
        // 10 fps: reveal 20, fade 15, content delay 5.
        let mut a = anim(10);
        let viewport = Viewport::new(64, 48);
        let mut events = Vec::new();
        for _ in 0..200 {
            if let Some(ev) = a.step(None, viewport).unwrap() {
                events.push(ev);
            }
        }
        assert_eq!(events, vec![LoadingEvent::Finished]);
        assert_eq!(a.phase(), LoadingPhase::Revealed);
        assert!(a.is_finished());
        assert!(a.content_displayed());
        assert!(a.content_visible());
        assert!(a.dissolve().is_empty());
        assert!(!a.overlay_active());
        assert_eq!(a.overlay_alpha(), 0.0);
        assert_eq!(a.content_alpha(), 1.0);
    }

    #[test]
    fn phases_advance_on_schedule() {
        let mut a = anim(10);
        let viewport = Viewport::new(64, 48);
        for _ in 0..19 {
            a.step(None, viewport).unwrap();
        }
        assert_eq!(a.phase(), LoadingPhase::TextReveal);
        a.step(None, viewport).unwrap();
        assert_eq!(a.phase(), LoadingPhase::Rasterize);
        assert!(!a.content_displayed());

        a.step(None, viewport).unwrap();
        assert_eq!(a.phase(), LoadingPhase::Dissolving);
        assert!(a.content_displayed());
        assert!(!a.content_visible());
        assert!((a.overlay_alpha() - 1.0).abs() < 1e-9);

        let mut finished_at = None;
        for i in 0..10 {
            if a.step(None, viewport).unwrap().is_some() {
                finished_at = Some(i);
                break;
            }
        }
        // Content delay is 5 frames past the dissolve start.
        assert_eq!(finished_at, Some(4));
        assert_eq!(a.phase(), LoadingPhase::Revealed);
    }

    #[test]
    fn overlay_fades_linearly_then_drops() {
        let mut a = anim(10);
        let viewport = Viewport::new(64, 48);
        for _ in 0..21 {
            a.step(None, viewport).unwrap();
        }
        assert_eq!(a.phase(), LoadingPhase::Dissolving);
        assert!(a.overlay_active());
        a.step(None, viewport).unwrap();
        // One fade frame of fifteen elapsed.
        assert!((a.overlay_alpha() - (1.0 - 1.0 / 15.0)).abs() < 1e-9);
        for _ in 0..14 {
            a.step(None, viewport).unwrap();
        }
        assert!(!a.overlay_active());
        assert_eq!(a.overlay_alpha(), 0.0);
    }

    #[test]
    fn letter_pose_rises_and_settles() {
        let mut a = anim(10);
        let viewport = Viewport::new(64, 48);
        let (alpha, rise) = a.letter_pose(3);
        assert_eq!(alpha, 0.0);
        assert_eq!(rise, LETTER_RISE_PX);
        for _ in 0..19 {
            a.step(None, viewport).unwrap();
        }
        // Last letter: delay floor(3 * 0.075 * 10) = 2, rise 5 frames.
        let (alpha, rise) = a.letter_pose(3);
        assert_eq!(alpha, 1.0);
        assert_eq!(rise, 0.0);
        // Out-of-range indexes clamp rather than panic.
        assert_eq!(a.letter_pose(99), a.letter_pose(3));
    }

    #[test]
    fn content_alpha_ramps_after_reveal() {
        let mut a = anim(10);
        let viewport = Viewport::new(64, 48);
        for _ in 0..26 {
            a.step(None, viewport).unwrap();
        }
        assert_eq!(a.phase(), LoadingPhase::Revealed);
        assert_eq!(a.content_alpha(), 0.0);
        for _ in 0..5 {
            a.step(None, viewport).unwrap();
        }
        assert_eq!(a.content_alpha(), 1.0);
    }
}
