//! Geometric judgement of one drawn stroke against its reference median.
//!
//! This is a cheap heuristic, not a recognizer: a handful of distance, length and angle
//! checks, each expressed as a fraction of the grid size so the verdict does not depend on
//! the surface resolution.

use crate::foundation::core::{GridSize, Point};
use crate::foundation::error::{TracerError, TracerResult};
use crate::foundation::math::{distance_to_polyline, polyline_length};

/// Tunable thresholds of [`validate_stroke`]. Fractions are of the grid side.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Medians shorter than this are treated as dots.
    pub dot_length_frac: f64,
    /// Maximum distance between drawn and expected start.
    pub start_tolerance_frac: f64,
    /// Minimum drawn displacement as a ratio of the expected length.
    pub min_length_ratio: f64,
    /// Maximum distance between drawn and expected end.
    pub end_tolerance_frac: f64,
    /// Maximum path length / displacement of the drawn stroke.
    pub max_sinuosity: f64,
    /// Maximum distance from any drawn point to the median.
    pub max_deviation_frac: f64,
    /// Cosine of the largest tolerated angle between drawn and expected direction.
    pub min_direction_cos: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            dot_length_frac: 0.025,
            start_tolerance_frac: 0.18,
            min_length_ratio: 0.25,
            end_tolerance_frac: 0.20,
            max_sinuosity: 2.0,
            max_deviation_frac: 0.22,
            min_direction_cos: std::f64::consts::FRAC_1_SQRT_2,
        }
    }
}

impl ValidatorConfig {
    /// Fractions must be finite and non-negative, sinuosity at least 1, the direction cosine
    /// within `[-1, 1]`.
    pub fn validate(&self) -> TracerResult<()> {
        let fracs = [
            ("dot_length_frac", self.dot_length_frac),
            ("start_tolerance_frac", self.start_tolerance_frac),
            ("min_length_ratio", self.min_length_ratio),
            ("end_tolerance_frac", self.end_tolerance_frac),
            ("max_deviation_frac", self.max_deviation_frac),
        ];
        for (name, v) in fracs {
            if !v.is_finite() || v < 0.0 {
                return Err(TracerError::config(format!(
                    "validator.{name} must be finite and >= 0"
                )));
            }
        }
        if !self.max_sinuosity.is_finite() || self.max_sinuosity < 1.0 {
            return Err(TracerError::config(
                "validator.max_sinuosity must be finite and >= 1",
            ));
        }
        if !(-1.0..=1.0).contains(&self.min_direction_cos) {
            return Err(TracerError::config(
                "validator.min_direction_cos must be in [-1, 1]",
            ));
        }
        Ok(())
    }
}

/// Which check turned a stroke down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Fewer than two samples; nothing to judge.
    TooFewPoints,
    /// Dot stroke started away from the dot.
    DotMissed,
    /// Started too far from the expected start.
    StartTooFar,
    /// Much shorter than the expected stroke.
    TooShort,
    /// Ended too far from the expected end.
    EndTooFar,
    /// Path wanders too much relative to its displacement.
    TooWobbly,
    /// Some sample strayed too far from the median.
    Strayed,
    /// Drawn in the wrong direction.
    WrongDirection,
}

/// Outcome of judging one stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "snake_case")]
pub enum Verdict {
    /// The stroke matches.
    Accept,
    /// The stroke failed a check.
    Reject(RejectReason),
}

impl Verdict {
    /// Whether the stroke was accepted.
    pub fn is_accept(self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// Judge `drawn` against `expected`. Both are in surface space.
///
/// A missing median, or one with fewer than two points, accepts anything with at least two
/// samples.
#[tracing::instrument(level = "debug", skip_all, fields(samples = drawn.len()))]
pub fn validate_stroke(
    drawn: &[Point],
    expected: Option<&[Point]>,
    grid: GridSize,
    cfg: &ValidatorConfig,
) -> Verdict {
    let verdict = judge(drawn, expected, grid, cfg);
    tracing::debug!(?verdict, "stroke judged");
    verdict
}

fn judge(
    drawn: &[Point],
    expected: Option<&[Point]>,
    grid: GridSize,
    cfg: &ValidatorConfig,
) -> Verdict {
    let (Some(&d_start), Some(&d_end)) = (drawn.first(), drawn.last()) else {
        return Verdict::Reject(RejectReason::TooFewPoints);
    };
    if drawn.len() < 2 {
        return Verdict::Reject(RejectReason::TooFewPoints);
    }

    let median = match expected {
        Some(m) if m.len() >= 2 => m,
        _ => return Verdict::Accept,
    };
    let e_start = median[0];
    let e_end = median[median.len() - 1];
    let expected_len = polyline_length(median);

    let start_tol = grid.fraction(cfg.start_tolerance_frac);
    if expected_len < grid.fraction(cfg.dot_length_frac) {
        return if d_start.distance(e_start) <= start_tol {
            Verdict::Accept
        } else {
            Verdict::Reject(RejectReason::DotMissed)
        };
    }

    if d_start.distance(e_start) > start_tol {
        return Verdict::Reject(RejectReason::StartTooFar);
    }

    let displacement = d_end - d_start;
    let disp_len = displacement.hypot();
    if disp_len <= 0.0 || disp_len < expected_len * cfg.min_length_ratio {
        return Verdict::Reject(RejectReason::TooShort);
    }

    if d_end.distance(e_end) > grid.fraction(cfg.end_tolerance_frac) {
        return Verdict::Reject(RejectReason::EndTooFar);
    }

    if polyline_length(drawn) / disp_len > cfg.max_sinuosity {
        return Verdict::Reject(RejectReason::TooWobbly);
    }

    let max_dev = grid.fraction(cfg.max_deviation_frac);
    if drawn
        .iter()
        .any(|&p| distance_to_polyline(p, median) > max_dev)
    {
        return Verdict::Reject(RejectReason::Strayed);
    }

    let e_disp = e_end - e_start;
    let e_len = e_disp.hypot();
    let cos = if e_len > 0.0 {
        displacement.dot(e_disp) / (disp_len * e_len)
    } else {
        // Closed median: no direction to compare against.
        1.0
    };
    if !(cos > cfg.min_direction_cos) {
        return Verdict::Reject(RejectReason::WrongDirection);
    }

    Verdict::Accept
}

#[cfg(test)]
#[path = "../../tests/unit/stroke/validate.rs"]
mod tests;
