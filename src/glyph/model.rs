use std::path::Path;

use crate::foundation::core::{BezPath, Point, pairs_from_points, points_from_pairs};
use crate::foundation::error::{TracerError, TracerResult};

/// On-disk glyph record.
///
/// This is the JSON shape used by the common open stroke datasets: one object per character
/// with SVG outline path data per stroke and one median polyline per stroke, both in glyph
/// space (0..1024, y-up).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GlyphRecord {
    /// The character this record describes. Per-character files may omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    /// SVG path data, one outline per stroke.
    pub strokes: Vec<String>,
    /// Skeleton polylines, one per stroke, as `[x, y]` pairs.
    pub medians: Vec<Vec<[f64; 2]>>,
}

/// Reference definition of one character.
///
/// `medians[i]` is the centerline of `strokes[i]`; construction rejects records where the
/// two lists disagree in length or a median has fewer than two points.
///
/// A glyph with no strokes is legal and carries no reference data; consumers treat it like a
/// missing glyph.
#[derive(Clone, Debug)]
pub struct CharacterGlyph {
    /// The character.
    pub character: char,
    /// Stroke outlines in glyph space.
    pub strokes: Vec<BezPath>,
    /// Stroke medians in glyph space.
    pub medians: Vec<Vec<Point>>,
}

impl CharacterGlyph {
    /// Build a glyph from parsed parts.
    pub fn new(
        character: char,
        strokes: Vec<BezPath>,
        medians: Vec<Vec<Point>>,
    ) -> TracerResult<Self> {
        if strokes.len() != medians.len() {
            return Err(TracerError::glyph(format!(
                "'{character}': {} strokes but {} medians",
                strokes.len(),
                medians.len()
            )));
        }
        if let Some(i) = medians.iter().position(|m| m.len() < 2) {
            return Err(TracerError::glyph(format!(
                "'{character}' median {i}: needs at least 2 points"
            )));
        }
        Ok(Self {
            character,
            strokes,
            medians,
        })
    }

    /// Convert an on-disk record. `fallback` supplies the character when the record has none.
    pub fn from_record(record: GlyphRecord, fallback: Option<char>) -> TracerResult<Self> {
        let character = match (record.character.as_deref(), fallback) {
            (Some(s), _) => single_char(s)?,
            (None, Some(c)) => c,
            (None, None) => {
                return Err(TracerError::glyph("glyph record has no character"));
            }
        };

        let strokes = record
            .strokes
            .iter()
            .enumerate()
            .map(|(i, d)| {
                BezPath::from_svg(d).map_err(|e| {
                    TracerError::glyph(format!("'{character}' stroke {i}: invalid path data: {e}"))
                })
            })
            .collect::<TracerResult<Vec<_>>>()?;
        let medians = record
            .medians
            .iter()
            .map(|m| points_from_pairs(m))
            .collect();

        Self::new(character, strokes, medians)
    }

    /// Parse a single JSON record.
    pub fn from_json(json: &str, fallback: Option<char>) -> TracerResult<Self> {
        let record: GlyphRecord = serde_json::from_str(json)
            .map_err(|e| TracerError::serde(format!("parse glyph JSON: {e}")))?;
        Self::from_record(record, fallback)
    }

    /// Parse a single JSON record from disk.
    pub fn from_path(path: impl AsRef<Path>, fallback: Option<char>) -> TracerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            TracerError::glyph(format!("read glyph file '{}': {e}", path.display()))
        })?;
        Self::from_json(&text, fallback)
    }

    /// Back to the on-disk form.
    pub fn to_record(&self) -> GlyphRecord {
        GlyphRecord {
            character: Some(self.character.to_string()),
            strokes: self.strokes.iter().map(|p| p.to_svg()).collect(),
            medians: self.medians.iter().map(|m| pairs_from_points(m)).collect(),
        }
    }

    /// Number of strokes in the reference.
    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    /// Whether the glyph carries any strokes to judge against.
    pub fn has_reference(&self) -> bool {
        !self.strokes.is_empty()
    }

    /// Median of stroke `index`, if the glyph has that many strokes.
    pub fn median(&self, index: usize) -> Option<&[Point]> {
        self.medians.get(index).map(Vec::as_slice)
    }
}

pub(crate) fn single_char(s: &str) -> TracerResult<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(TracerError::glyph(format!(
            "expected exactly one character, got '{s}'"
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/glyph/model.rs"]
mod tests;
