use std::sync::Arc;

use crate::foundation::core::{Point, pairs_from_points};

/// Point buffer of the gesture currently in flight.
///
/// Lives from pointer-down to pointer-up and is consumed by [`LiveGesture::finish`] exactly
/// once, whatever the verdict.
#[derive(Clone, Debug, Default)]
pub struct LiveGesture {
    points: Vec<Point>,
}

impl LiveGesture {
    /// Begin a gesture at `at`.
    pub fn start(at: Point) -> Self {
        let mut g = Self::default();
        g.push(at);
        g
    }

    /// Append a sample. Non-finite samples are dropped, as are exact repeats of the last one.
    pub fn push(&mut self, p: Point) {
        if !p.is_finite() {
            return;
        }
        if self.points.last() == Some(&p) {
            return;
        }
        self.points.push(p);
    }

    /// Samples so far.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// No samples yet.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Release the gesture and take its samples.
    pub fn finish(self) -> Vec<Point> {
        self.points
    }
}

/// A committed stroke in surface space. Never mutated once built.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawnStroke {
    points: Arc<[Point]>,
}

impl DrawnStroke {
    /// Freeze `points`.
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points: points.into(),
        }
    }

    /// The stroke's samples.
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

impl From<Vec<Point>> for DrawnStroke {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

impl serde::Serialize for DrawnStroke {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        pairs_from_points(&self.points).serialize(s)
    }
}
