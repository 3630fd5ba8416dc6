use crate::foundation::core::Point;

/// Sum of segment lengths along `points`.
pub(crate) fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Arithmetic mean of `points`, `None` when empty.
pub(crate) fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// Smallest distance from `p` to any point of `set`; infinite for an empty set.
pub(crate) fn nearest_distance(p: Point, set: &[Point]) -> f64 {
    set.iter()
        .map(|q| p.distance(*q))
        .fold(f64::INFINITY, f64::min)
}

/// Distance from `p` to the nearest point on the polyline through `line`.
///
/// A single-point polyline degenerates to point distance; an empty one is infinitely far.
pub(crate) fn distance_to_polyline(p: Point, line: &[Point]) -> f64 {
    match line {
        [] => f64::INFINITY,
        [only] => p.distance(*only),
        _ => line
            .windows(2)
            .map(|w| distance_to_segment(p, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// The point of `candidates` whose nearest neighbour in `reference` is farthest away,
/// together with that distance. Ties keep the earliest candidate.
pub(crate) fn farthest_from(candidates: &[Point], reference: &[Point]) -> Option<(Point, f64)> {
    let mut best: Option<(Point, f64)> = None;
    for &p in candidates {
        let d = nearest_distance(p, reference);
        match best {
            Some((_, bd)) if bd >= d => {}
            _ => best = Some((p, d)),
        }
    }
    best
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
