//! Glyph space ⇄ surface space.
//!
//! Glyph space is the 1024-unit em square of the stroke datasets, y-up, with outlines shifted
//! against a baseline at 900 rather than the full em height. Surface space is the pixel space
//! of the square drawing area, y-down.

use crate::foundation::core::{Affine, BezPath, GridSize, PathEl, Point};

/// Em size of glyph space.
pub const GLYPH_EM: f64 = 1024.0;
/// Baseline offset of the glyph format. Not `GLYPH_EM`.
pub const GLYPH_BASELINE: f64 = 900.0;

/// Map a glyph-space point onto a surface of side `grid`.
pub fn glyph_to_surface(p: Point, grid: GridSize) -> Point {
    let s = grid.px() / GLYPH_EM;
    Point::new(p.x * s, (GLYPH_BASELINE - p.y) * s)
}

/// Inverse of [`glyph_to_surface`].
pub fn surface_to_glyph(p: Point, grid: GridSize) -> Point {
    let s = GLYPH_EM / grid.px();
    Point::new(p.x * s, GLYPH_BASELINE - p.y * s)
}

/// The glyph → surface mapping as an affine transform.
pub fn glyph_to_surface_affine(grid: GridSize) -> Affine {
    let s = grid.px() / GLYPH_EM;
    Affine::new([s, 0.0, 0.0, -s, 0.0, GLYPH_BASELINE * s])
}

/// Median polyline mapped into surface space.
pub fn median_to_surface(median: &[Point], grid: GridSize) -> Vec<Point> {
    median.iter().map(|&p| glyph_to_surface(p, grid)).collect()
}

/// Every on-curve and control point of `outline`, mapped into surface space.
pub fn outline_points_to_surface(outline: &BezPath, grid: GridSize) -> Vec<Point> {
    let xf = glyph_to_surface_affine(grid);
    let mut out = Vec::with_capacity(outline.elements().len() * 2);
    for el in outline.elements() {
        match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => out.push(xf * p),
            PathEl::QuadTo(c, p) => {
                out.push(xf * c);
                out.push(xf * p);
            }
            PathEl::CurveTo(c1, c2, p) => {
                out.push(xf * c1);
                out.push(xf * c2);
                out.push(xf * p);
            }
            PathEl::ClosePath => {}
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/glyph/normalize.rs"]
mod tests;
