use std::sync::Arc;

use crate::foundation::core::{GridSize, Point};
use crate::glyph::model::CharacterGlyph;
use crate::glyph::normalize::median_to_surface;
use crate::stroke::gesture::{DrawnStroke, LiveGesture};
use crate::stroke::validate::{RejectReason, ValidatorConfig, Verdict, validate_stroke};

/// Result of releasing a gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeOutcome {
    /// Stroke `stroke_index` was committed.
    Accepted {
        /// Index of the committed stroke.
        stroke_index: usize,
        /// This was the last stroke.
        character_complete: bool,
    },
    /// Stroke `stroke_index` is still expected.
    Rejected {
        /// Index still expected.
        stroke_index: usize,
        /// Check that failed.
        reason: RejectReason,
    },
    /// Nothing was in flight, or the character is already complete.
    Ignored,
}

/// Stroke-by-stroke progress on one character.
///
/// Without usable reference data (no glyph, or a glyph with no strokes) the session expects a
/// single stroke and accepts any non-empty gesture. That fallback also covers the window in
/// which the glyph is still being fetched.
#[derive(Clone, Debug)]
pub struct TracerSession {
    character: char,
    grid: GridSize,
    glyph: Option<Arc<CharacterGlyph>>,
    surface_medians: Vec<Vec<Point>>,
    stroke_index: usize,
    committed: Vec<DrawnStroke>,
    live: Option<LiveGesture>,
    last_rejected: Option<Vec<Point>>,
    rejections: u32,
}

impl TracerSession {
    /// Session for `character`. `None` starts in the single-stroke fallback.
    pub fn new(character: char, glyph: Option<Arc<CharacterGlyph>>, grid: GridSize) -> Self {
        let mut s = Self {
            character,
            grid,
            glyph: None,
            surface_medians: Vec::new(),
            stroke_index: 0,
            committed: Vec::new(),
            live: None,
            last_rejected: None,
            rejections: 0,
        };
        s.set_glyph(glyph);
        s
    }

    fn set_glyph(&mut self, glyph: Option<Arc<CharacterGlyph>>) {
        self.surface_medians = glyph
            .as_ref()
            .map(|g| {
                g.medians
                    .iter()
                    .map(|m| median_to_surface(m, self.grid))
                    .collect()
            })
            .unwrap_or_default();
        self.glyph = glyph;
    }

    /// Install a glyph that arrived after the session started.
    ///
    /// Ignored once the character is complete; strokes judged under the fallback stay
    /// committed.
    pub fn attach_glyph(&mut self, glyph: Option<Arc<CharacterGlyph>>) {
        if self.is_complete() {
            return;
        }
        self.set_glyph(glyph);
    }

    /// The character being written.
    pub fn character(&self) -> char {
        self.character
    }

    /// Surface side the session judges against.
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Reference glyph, if any.
    pub fn glyph(&self) -> Option<&Arc<CharacterGlyph>> {
        self.glyph.as_ref()
    }

    /// Strokes required to finish. Degrades to 1 without usable glyph data.
    pub fn total_strokes(&self) -> usize {
        match self.glyph.as_ref().map(|g| g.stroke_count()) {
            Some(n) if n > 0 => n,
            _ => 1,
        }
    }

    /// Strokes accepted so far.
    pub fn stroke_index(&self) -> usize {
        self.stroke_index
    }

    /// Strokes on the canvas.
    pub fn committed(&self) -> &[DrawnStroke] {
        &self.committed
    }

    /// Samples of the gesture in flight.
    pub fn live_points(&self) -> &[Point] {
        self.live.as_ref().map(LiveGesture::points).unwrap_or(&[])
    }

    /// A gesture is in flight.
    pub fn is_drawing(&self) -> bool {
        self.live.is_some()
    }

    /// Points of the most recent rejected gesture, kept until the next release or reset.
    pub fn last_rejected(&self) -> Option<&[Point]> {
        self.last_rejected.as_deref()
    }

    /// Strokes rejected on this character.
    pub fn rejections(&self) -> u32 {
        self.rejections
    }

    /// Every expected stroke was accepted.
    pub fn is_complete(&self) -> bool {
        self.stroke_index >= self.total_strokes()
    }

    /// Surface-space median of the stroke currently expected.
    pub fn expected_median(&self) -> Option<&[Point]> {
        self.surface_medians
            .get(self.stroke_index)
            .map(Vec::as_slice)
    }

    /// Start a gesture. A gesture already in flight is discarded.
    pub fn begin_gesture(&mut self, at: Point) {
        self.live = Some(LiveGesture::start(at));
    }

    /// Add a sample to the gesture in flight.
    pub fn extend_gesture(&mut self, to: Point) {
        if let Some(g) = self.live.as_mut() {
            g.push(to);
        }
    }

    /// Release the gesture in flight and judge it against the expected stroke.
    pub fn end_gesture(&mut self, cfg: &ValidatorConfig) -> StrokeOutcome {
        match self.live.take() {
            Some(g) => self.judge_points(g.finish(), cfg),
            None => StrokeOutcome::Ignored,
        }
    }

    /// Judge a complete recorded stroke as if it had just been released.
    pub fn submit_stroke(&mut self, points: Vec<Point>, cfg: &ValidatorConfig) -> StrokeOutcome {
        self.live = None;
        self.judge_points(points, cfg)
    }

    fn judge_points(&mut self, points: Vec<Point>, cfg: &ValidatorConfig) -> StrokeOutcome {
        if self.is_complete() {
            return StrokeOutcome::Ignored;
        }

        // Fail open whenever there is nothing to judge against, not only when the glyph is absent.
        let verdict = if self.surface_medians.is_empty() {
            if points.is_empty() {
                Verdict::Reject(RejectReason::TooFewPoints)
            } else {
                Verdict::Accept
            }
        } else {
            validate_stroke(&points, self.expected_median(), self.grid, cfg)
        };

        match verdict {
            Verdict::Accept => {
                let stroke_index = self.stroke_index;
                self.committed.push(DrawnStroke::new(points));
                self.stroke_index += 1;
                self.last_rejected = None;
                StrokeOutcome::Accepted {
                    stroke_index,
                    character_complete: self.is_complete(),
                }
            }
            Verdict::Reject(reason) => {
                self.rejections += 1;
                self.last_rejected = Some(points);
                StrokeOutcome::Rejected {
                    stroke_index: self.stroke_index,
                    reason,
                }
            }
        }
    }

    /// Commit a stroke without judging it (whole-character mode).
    ///
    /// Returns the number of strokes now on the canvas.
    pub fn end_gesture_unjudged(&mut self) -> Option<usize> {
        let g = self.live.take()?;
        if g.is_empty() {
            return None;
        }
        self.committed.push(DrawnStroke::new(g.finish()));
        Some(self.committed.len())
    }

    /// Every point currently on the canvas, in drawing order.
    pub fn canvas_points(&self) -> Vec<Point> {
        self.committed
            .iter()
            .flat_map(|s| s.points().iter().copied())
            .collect()
    }

    /// Take the committed strokes off the canvas, leaving progress at stroke 0.
    pub fn take_canvas(&mut self) -> Vec<DrawnStroke> {
        self.live = None;
        self.stroke_index = 0;
        std::mem::take(&mut self.committed)
    }

    /// Start the character over: clears committed strokes, the live path and the last
    /// rejection.
    pub fn repeat(&mut self) {
        self.committed.clear();
        self.stroke_index = 0;
        self.live = None;
        self.last_rejected = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trace/sequencer.rs"]
mod tests;
