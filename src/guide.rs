//! # Vitrine guide (v0.1.0)
//!
//! This module is a standalone, end-to-end walkthrough of Vitrine's architecture and public API.
//! It is intentionally detailed so future phases (and external integrations) can build on a shared
//! mental model of what "a frame" means in this codebase.
//!
//! If you are looking for copy/paste commands, start with the repository `README.md`.
//! If you are implementing new features, start here.
//!
//! ---
//!
//! ## Core concepts
//!
//! - [`Stage`](crate::Stage): the scene description (title, palette, sections, projects)
//! - [`Director`](crate::Director): owns every live component and advances them one tick at a time
//! - [`FrameIndex`](crate::FrameIndex): a 0-based tick counter; there is no wall clock anywhere
//! - [`InputEvent`](crate::InputEvent) / [`InputScript`](crate::InputScript): pointer, wheel,
//!   click, and resize events, either fed per tick or scheduled by frame
//! - [`render_frame`](crate::render_frame): paints the post-tick state into pixels
//! - [`FramePixels`](crate::FramePixels): the output pixels (RGBA8, premultiplied alpha)
//! - [`TitleArtist`](crate::TitleArtist): the only component that touches fonts
//!
//! A session is explicitly staged, once per tick:
//!
//! 1. Apply this tick's input events
//! 2. Advance the loading sequence ([`LoadingAnimation`](crate::LoadingAnimation))
//! 3. Step the ambient particle field, the cursor trail, the inertial scroller
//! 4. Step page transitions (cover wipe, detail overlay, hover preview)
//! 5. Update reveal visibility from the settled scroll offset
//!
//! Rendering is a separate, read-mostly pass over the result. Ticking without rendering is valid
//! and cheap; that is what most of the test suite does.
//!
//! ---
//!
//! ## No wall clock, no ambient randomness (and why)
//!
//! Vitrine wants a session to be a pure function of `(stage, input script)`. To get that:
//!
//! - time is a tick count; durations in seconds are converted through the stage's
//!   [`Fps`](crate::Fps) when components are built
//! - every random stream is seeded from the stage seed hashed with the consuming component's
//!   name ([`stable_hash64`](crate::stable_hash64)), so adding a component never reshuffles
//!   another's stream
//! - input arrives as data, never as callbacks
//!
//! Because of this, two runs of the same stage and script produce byte-identical frames, and a
//! frame can be reproduced in isolation by replaying ticks up to it.
//!
//! ---
//!
//! ## Premultiplied alpha (Vitrine's pixel contract)
//!
//! Vitrine's internal and output pixel convention is **premultiplied RGBA8**:
//!
//! - the rasterizer composites in premultiplied alpha and
//!   [`FramePixels`](crate::FramePixels) reports `premultiplied: true`
//! - the dissolve sampler reads the title raster as premultiplied and recovers straight colors
//!   per particle
//! - [`FramePixels::unpremultiply_in_place`](crate::FramePixels::unpremultiply_in_place)
//!   converts for encoders that expect unassociated RGBA (PNG does)
//!
//! If you integrate Vitrine with an external compositor, this is the most important contract to
//! preserve.
//!
//! ---
//!
//! ## Driving a session
//!
//! The following example builds the bundled demo stage, runs the loading sequence to its
//! handover, scrolls, and renders one frame. No font is supplied, so the title dissolve takes
//! its particle-free fallback path; supply font bytes as the second argument to
//! [`Director::new`](crate::Director::new) to get the full intro.
//!
//! ```rust,no_run
//! use vitrine::{Director, InputEvent, Stage, render_frame};
//!
//! # fn main() -> vitrine::VitrineResult<()> {
//! let stage = Stage::demo();
//! let mut director = Director::new(stage, None)?;
//!
//! // The intro runs on its own; ticks are the only time there is.
//! while !director.content_ready() {
//!     director.tick(&[])?;
//! }
//!
//! director.tick(&[InputEvent::Wheel { delta_y: 600.0 }])?;
//! for _ in 0..90 {
//!     director.tick(&[])?; // let the inertial scroller settle
//! }
//!
//! let frame = render_frame(&mut director)?;
//! assert_eq!(frame.width, 1280);
//! assert_eq!(frame.height, 800);
//! assert!(frame.premultiplied);
//! assert_eq!(frame.data.len(), 1280 * 800 * 4);
//! # Ok(())
//! # }
//! ```
//!
//! Notes:
//!
//! - [`Stage::validate`](crate::Stage::validate) is called by the director's constructor.
//! - `render_frame` borrows the director mutably because live text goes through the title
//!   artist's layout contexts; it never mutates animation state.
//!
//! ---
//!
//! ## Input scripts
//!
//! For offline runs, events are scheduled by frame in an [`InputScript`](crate::InputScript)
//! and applied with [`Director::tick_scripted`](crate::Director::tick_scripted). Scripts are
//! plain JSON, ordered by frame:
//!
//! ```json
//! {
//!   "events": [
//!     { "frame": 130, "event": { "PointerMoved": { "x": 640.0, "y": 400.0 } } },
//!     { "frame": 140, "event": { "Wheel": { "delta_y": 900.0 } } },
//!     { "frame": 260, "event": { "Click": { "x": 640.0, "y": 300.0 } } }
//!   ]
//! }
//! ```
//!
//! A script plus a stage is a complete, reproducible session recording.
//!
//! ---
//!
//! ## The loading sequence
//!
//! [`LoadingAnimation`](crate::LoadingAnimation) runs four forward-only phases:
//!
//! - **TextReveal**: the title's letters enter one by one on a fixed stagger
//! - **Rasterize**: one tick; the full title is rasterized and sampled into dissolve particles
//! - **Dissolving**: particles fall under gravity while the overlay fades
//! - **Revealed**: the page underneath ramps to full opacity
//!
//! The handover is a single [`LoadingEvent::Finished`](crate::LoadingEvent) on exactly one tick.
//! The director reacts by measuring the page (scroll extent, reveal targets), which was
//! meaningless while the overlay covered it. Without a font, or with an empty viewport, the
//! sequence keeps its timing but spawns no particles.
//!
//! ---
//!
//! ## Page scroll vs. detail overlay
//!
//! There are two scroll domains and they never mix:
//!
//! - the page scrolls through [`SmoothScroller`](crate::SmoothScroller): wheel deltas move a
//!   clamped target, the offset chases it exponentially and settles on an epsilon
//! - an open project's overlay scrolls instantly, clamped to its own extent, and feeds a
//!   [`TriggerSet`](crate::TriggerSet) that cross-fades the gallery image matching the
//!   narrative block at the viewport's center
//!
//! A shared [`DetailGate`](crate::DetailGate) arbitrates: raised on open, lowered after the
//! closing wipe. While raised, page wheel input and page scroll stepping are inert, so the page
//! is exactly where the visitor left it when the overlay closes. Closing releases the overlay's
//! triggers *before* the wipe starts; the released ids come back in creation order.
//!
//! ---
//!
//! ## Fonts
//!
//! Vitrine loads no files on its own. Callers hand font bytes to
//! [`Director::new`](crate::Director::new) (the CLI resolves
//! [`TitleSpec::font_source`](crate::TitleSpec) relative to the stage file). Text layout and
//! glyph placement go through Parley; glyph rendering goes through the same `vello_cpu`
//! pipeline as every other paint. There is no path that rasterizes text without an artist: the
//! renderer simply draws no title and the dissolve has nothing to sample.
