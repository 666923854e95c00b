//! Vitrine is a deterministic, headless engine for portfolio-site motion:
//! the title dissolve intro, ambient particles, inertial scrolling with
//! reveal-on-scroll sections, cover-wipe page transitions, and a scroll-synced
//! project gallery, all driven frame by frame with no wall clock and no real
//! browser.
//!
//! The public API is session-oriented:
//!
//! - Describe a scene as a [`Stage`] (or start from [`Stage::demo`])
//! - Create a [`Director`] and feed it ticks plus [`InputEvent`]s
//! - Rasterize any tick's state with [`render_frame`]
//!
//! The [`guide`] module is the long-form walkthrough.
#![forbid(unsafe_code)]

pub mod ambient;
pub mod core;
pub mod cursor;
pub mod director;
pub mod dissolve;
pub mod ease;
pub mod error;
pub mod guide;
pub mod input;
pub mod layout;
pub mod loading;
pub mod render;
pub mod reveal;
pub mod scroll;
pub mod stage;
pub mod text;
pub mod timeline;
pub mod transitions;
pub mod trigger;

pub use ambient::{AmbientField, AmbientParticle};
pub use core::{Affine, Fps, FrameIndex, Point, Rect, Rgba8, Vec2, Viewport, stable_hash64};
pub use cursor::CursorTrail;
pub use director::Director;
pub use dissolve::{DissolveField, DissolveParticle};
pub use ease::Ease;
pub use error::{VitrineError, VitrineResult};
pub use input::{InputEvent, InputScript, ScriptedEvent};
pub use layout::{HotspotRole, OverlayLayout, StageLayout};
pub use loading::{LoadingAnimation, LoadingEvent, LoadingPhase};
pub use render::{FramePixels, render_frame};
pub use reveal::{RevealObserver, RevealTarget};
pub use scroll::{DetailGate, SmoothScroller};
pub use stage::{
    Palette, ProjectId, ProjectSpec, SectionId, SectionKind, SectionSpec, Stage, TitleSpec,
};
pub use text::{TextBrush, TitleArtist};
pub use timeline::{Timeline, TimelineBuilder};
pub use transitions::{CoverWipe, DetailSession, HoverPreview, PageTransitions, WipeOrigin};
pub use trigger::{Crossing, TriggerEvent, TriggerId, TriggerSet};
