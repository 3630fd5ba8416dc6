use serde::{Deserialize, Serialize};

use crate::foundation::core::{GridSize, Point};
use crate::foundation::error::{TracerError, TracerResult};
use crate::foundation::math::{centroid, farthest_from};
use crate::glyph::model::CharacterGlyph;
use crate::glyph::normalize::outline_points_to_surface;

/// Circle marking where an attempt went wrong, in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ErrorHint {
    /// Circle center, x.
    pub center_x: f64,
    /// Circle center, y.
    pub center_y: f64,
    /// Circle radius.
    pub radius: f64,
}

impl ErrorHint {
    /// Circle center as a point.
    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    fn at(p: Point, radius: f64) -> Self {
        Self {
            center_x: p.x,
            center_y: p.y,
            radius,
        }
    }
}

/// Error locator tuning. Every value is a fraction of the grid size except `worst_radius_scale`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Radius of the centroid circle.
    pub fallback_radius_frac: f64,
    /// Below this worst-point distance the attempt is considered close everywhere.
    pub noise_floor_frac: f64,
    /// Smallest radius of a targeted circle.
    pub min_radius_frac: f64,
    /// Multiplier applied to the worst distance when sizing a targeted circle.
    pub worst_radius_scale: f64,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            fallback_radius_frac: 0.28,
            noise_floor_frac: 0.05,
            min_radius_frac: 0.22,
            worst_radius_scale: 0.55,
        }
    }
}

impl LocatorConfig {
    /// Radii and scale must be positive; the noise floor must not be negative.
    pub fn validate(&self) -> TracerResult<()> {
        let fracs = [
            ("fallback_radius_frac", self.fallback_radius_frac),
            ("min_radius_frac", self.min_radius_frac),
            ("worst_radius_scale", self.worst_radius_scale),
        ];
        for (name, v) in fracs {
            if !v.is_finite() || v <= 0.0 {
                return Err(TracerError::config(format!("{name} must be > 0")));
            }
        }
        if !self.noise_floor_frac.is_finite() || self.noise_floor_frac < 0.0 {
            return Err(TracerError::config("noise_floor_frac must be >= 0"));
        }
        Ok(())
    }
}

/// Locate the worst part of a failed attempt.
///
/// `drawn` is every surface point of the failed attempts on this character. Returns `None`
/// only when `drawn` is empty.
#[tracing::instrument(skip(drawn, glyph, cfg), fields(points = drawn.len()))]
pub fn locate_error(
    drawn: &[Point],
    glyph: Option<&CharacterGlyph>,
    grid: GridSize,
    cfg: &LocatorConfig,
) -> Option<ErrorHint> {
    let center = centroid(drawn)?;
    let fallback = ErrorHint::at(center, grid.fraction(cfg.fallback_radius_frac));

    let reference: Vec<Point> = glyph
        .map(|g| {
            g.strokes
                .iter()
                .flat_map(|outline| outline_points_to_surface(outline, grid))
                .collect()
        })
        .unwrap_or_default();
    if reference.is_empty() {
        return Some(fallback);
    }

    match farthest_from(drawn, &reference) {
        Some((worst, dist)) if dist > grid.fraction(cfg.noise_floor_frac) => {
            let radius = grid
                .fraction(cfg.min_radius_frac)
                .max(cfg.worst_radius_scale * dist);
            tracing::debug!(x = worst.x, y = worst.y, dist, radius, "error located");
            Some(ErrorHint::at(worst, radius))
        }
        _ => Some(fallback),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/escalate/locate.rs"]
mod tests;
