use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::foundation::core::GridSize;
use crate::foundation::error::TracerResult;
use crate::glyph::normalize::median_to_surface;
use crate::glyph::provider::GlyphProvider;
use crate::stroke::gesture::DrawnStroke;
use crate::stroke::validate::{ValidatorConfig, validate_stroke};

/// Verdict of a whole-character recognizer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgment {
    /// The attempt matches the target.
    pub correct: bool,
    /// What the recognizer thinks was drawn. Only ever shown to the learner.
    #[serde(default)]
    pub best_guess: Option<String>,
}

impl Judgment {
    /// A correct verdict.
    pub fn correct(best_guess: Option<String>) -> Self {
        Self {
            correct: true,
            best_guess,
        }
    }

    /// An incorrect verdict.
    pub fn incorrect(best_guess: Option<String>) -> Self {
        Self {
            correct: false,
            best_guess,
        }
    }
}

/// Judges a fully drawn character in tested mode.
pub trait RecognitionOracle {
    /// Judge `strokes` (surface space, side `grid`) as an attempt at `target`.
    fn judge(
        &self,
        target: char,
        strokes: &[DrawnStroke],
        grid: GridSize,
    ) -> TracerResult<Judgment>;
}

/// Run `oracle`, treating any failure as an incorrect answer.
pub fn judge_fail_closed(
    oracle: &dyn RecognitionOracle,
    target: char,
    strokes: &[DrawnStroke],
    grid: GridSize,
) -> Judgment {
    match oracle.judge(target, strokes, grid) {
        Ok(j) => j,
        Err(e) => {
            tracing::warn!(%target, error = %e, "recognition failed; counting as incorrect");
            Judgment::incorrect(None)
        }
    }
}

/// Offline stand-in for a recognizer: every stroke must pass the stroke validator in order,
/// and the stroke count must match.
///
/// A character without reference data (no glyph, or a glyph with no strokes) is judged correct
/// as soon as anything was drawn.
pub struct GeometricOracle {
    provider: Arc<dyn GlyphProvider>,
    cfg: ValidatorConfig,
}

impl GeometricOracle {
    /// Judge against glyphs from `provider` with validator thresholds `cfg`.
    pub fn new(provider: Arc<dyn GlyphProvider>, cfg: ValidatorConfig) -> Self {
        Self { provider, cfg }
    }
}

impl RecognitionOracle for GeometricOracle {
    fn judge(
        &self,
        target: char,
        strokes: &[DrawnStroke],
        grid: GridSize,
    ) -> TracerResult<Judgment> {
        let drew_something = strokes.iter().any(|s| !s.points().is_empty());
        let glyph = self.provider.fetch(target)?.filter(|g| g.has_reference());
        let Some(glyph) = glyph else {
            return Ok(if drew_something {
                Judgment::correct(Some(target.to_string()))
            } else {
                Judgment::incorrect(None)
            });
        };

        if strokes.len() != glyph.stroke_count() {
            tracing::debug!(
                %target,
                drawn = strokes.len(),
                expected = glyph.stroke_count(),
                "stroke count mismatch"
            );
            return Ok(Judgment::incorrect(None));
        }
        let all_pass = strokes.iter().zip(&glyph.medians).all(|(s, m)| {
            let median = median_to_surface(m, grid);
            validate_stroke(s.points(), Some(median.as_slice()), grid, &self.cfg).is_accept()
        });
        Ok(if all_pass {
            Judgment::correct(Some(target.to_string()))
        } else {
            Judgment::incorrect(None)
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/practice/oracle.rs"]
mod tests;
