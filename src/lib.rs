//! hanzi-tracer judges freehand Chinese handwriting stroke by stroke and escalates feedback
//! across repeated mistakes.
//!
//! # Pipeline overview
//!
//! 1. **Load**: reference glyphs (outlines plus one median polyline per stroke, in a 1024 unit
//!    y-up glyph space) come from a [`GlyphProvider`], optionally through a background
//!    [`GlyphLoader`].
//! 2. **Normalize**: glyph coordinates are mapped onto the square drawing surface
//!    ([`glyph_to_surface`]); every threshold is a fraction of the [`GridSize`].
//! 3. **Judge**: in guided mode each released stroke is checked by [`validate_stroke`]; in
//!    tested mode the whole character goes to a [`RecognitionOracle`].
//! 4. **Escalate**: repeated incorrect judgments move from a flash to an [`ErrorHint`] circle
//!    to a stroke-by-stroke demonstration ([`EscalationController`]).
//!
//! [`PracticeEngine`] ties these together behind an event interpreter: hosts feed [`Event`]s
//! and react to [`Signal`]s.
//!
//! Missing reference data never blocks practice: a character without a glyph expects a
//! single stroke and accepts anything drawn.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation {
    pub(crate) mod core;
    pub(crate) mod error;
    pub(crate) mod math;
}

mod glyph {
    pub(crate) mod cache;
    pub(crate) mod loader;
    pub(crate) mod model;
    pub(crate) mod normalize;
    pub(crate) mod provider;
}

mod stroke {
    pub(crate) mod gesture;
    pub(crate) mod validate;
}

mod trace {
    pub(crate) mod sequencer;
    pub(crate) mod word;
}

mod escalate {
    pub(crate) mod controller;
    pub(crate) mod locate;
}

mod practice {
    pub(crate) mod engine;
    pub(crate) mod opts;
    pub(crate) mod oracle;
    pub(crate) mod progress;
    pub(crate) mod stats;
}

mod raster {
    pub(crate) mod snapshot;
}

pub use escalate::controller::{
    EscalationConfig, EscalationController, EscalationPhase, Remedy,
};
pub use escalate::locate::{ErrorHint, LocatorConfig, locate_error};
pub use foundation::core::{
    Affine, BezPath, GridSize, PathEl, Point, Rect, Vec2, pairs_from_points, points_from_pairs,
};
pub use foundation::error::{TracerError, TracerResult};
pub use glyph::cache::{CachedGlyph, GlyphCache};
pub use glyph::loader::{FetchTicket, GlyphFetched, GlyphLoader};
pub use glyph::model::{CharacterGlyph, GlyphRecord};
pub use glyph::normalize::{
    GLYPH_BASELINE, GLYPH_EM, glyph_to_surface, glyph_to_surface_affine, median_to_surface,
    outline_points_to_surface, surface_to_glyph,
};
pub use glyph::provider::{
    DirGlyphProvider, GlyphProvider, JsonlGlyphProvider, MemoryGlyphProvider,
};
pub use practice::engine::{Event, PracticeEngine, PracticeSnapshot, Signal, SkipScope};
pub use practice::opts::{PracticeMode, PracticeOpts};
pub use practice::oracle::{GeometricOracle, Judgment, RecognitionOracle, judge_fail_closed};
pub use practice::progress::{InMemoryProgress, JsonlProgress, ProgressEvent, ProgressSink};
pub use practice::stats::{CharacterStats, PracticeStats};
pub use raster::snapshot::{SnapshotImage, render_snapshot, save_png};
pub use stroke::gesture::{DrawnStroke, LiveGesture};
pub use stroke::validate::{RejectReason, ValidatorConfig, Verdict, validate_stroke};
pub use trace::sequencer::{StrokeOutcome, TracerSession};
pub use trace::word::{Advance, WordCursor};
