use crate::foundation::error::{TracerError, TracerResult};

pub use kurbo::{Affine, BezPath, PathEl, Point, Rect, Vec2};

/// Side length of the square drawing surface, in surface pixels.
///
/// Every validator and locator threshold is expressed as a fraction of this value.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct GridSize(f64);

impl GridSize {
    /// Validate a surface side in pixels.
    pub fn new(px: f64) -> TracerResult<Self> {
        if !px.is_finite() || px <= 0.0 {
            return Err(TracerError::validation(format!(
                "grid size must be finite and > 0, got {px}"
            )));
        }
        Ok(Self(px))
    }

    /// Side length in pixels.
    pub fn px(self) -> f64 {
        self.0
    }

    /// `frac` of the grid side, in pixels.
    pub fn fraction(self, frac: f64) -> f64 {
        self.0 * frac
    }

    pub(crate) fn is_valid(self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self(300.0)
    }
}

/// Converts a `[x, y]` pair list (the on-disk point format) into kurbo points.
pub fn points_from_pairs(pairs: &[[f64; 2]]) -> Vec<Point> {
    pairs.iter().map(|&[x, y]| Point::new(x, y)).collect()
}

/// Inverse of [`points_from_pairs`].
pub fn pairs_from_points(points: &[Point]) -> Vec<[f64; 2]> {
    points.iter().map(|p| [p.x, p.y]).collect()
}

/// `serialize_with` helper writing points in the `[x, y]` pair format.
pub(crate) fn serialize_pairs<S: serde::Serializer>(
    points: &[Point],
    s: S,
) -> Result<S::Ok, S::Error> {
    serde::Serialize::serialize(&pairs_from_points(points), s)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
