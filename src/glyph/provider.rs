use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::foundation::error::{TracerError, TracerResult};
use crate::glyph::model::{CharacterGlyph, GlyphRecord};

/// Source of reference glyphs.
///
/// `Ok(None)` means the source has no data for the character, which is an ordinary outcome.
/// Callers treat `Err` the same way after logging it.
pub trait GlyphProvider: Send + Sync {
    /// Look up the reference for `character`.
    fn fetch(&self, character: char) -> TracerResult<Option<CharacterGlyph>>;
}

/// Glyphs held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryGlyphProvider {
    glyphs: HashMap<char, CharacterGlyph>,
}

impl MemoryGlyphProvider {
    /// Empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the glyph for its character.
    pub fn insert(&mut self, glyph: CharacterGlyph) {
        self.glyphs.insert(glyph.character, glyph);
    }

    /// Number of glyphs held.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// No glyphs held.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl FromIterator<CharacterGlyph> for MemoryGlyphProvider {
    fn from_iter<I: IntoIterator<Item = CharacterGlyph>>(iter: I) -> Self {
        let mut out = Self::new();
        for g in iter {
            out.insert(g);
        }
        out
    }
}

impl GlyphProvider for MemoryGlyphProvider {
    fn fetch(&self, character: char) -> TracerResult<Option<CharacterGlyph>> {
        Ok(self.glyphs.get(&character).cloned())
    }
}

/// A line-delimited JSON dictionary: one [`GlyphRecord`] with `character` set per line.
///
/// The whole file is parsed up front.
#[derive(Clone, Debug, Default)]
pub struct JsonlGlyphProvider {
    inner: MemoryGlyphProvider,
}

impl JsonlGlyphProvider {
    /// Parse every record. A malformed line fails the whole load and names its line number.
    pub fn from_reader<R: BufRead>(r: R) -> TracerResult<Self> {
        let mut inner = MemoryGlyphProvider::new();
        for (i, line) in r.lines().enumerate() {
            let line = line.map_err(|e| TracerError::glyph(format!("read line {}: {e}", i + 1)))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record: GlyphRecord = serde_json::from_str(line)
                .map_err(|e| TracerError::serde(format!("line {}: {e}", i + 1)))?;
            let glyph = CharacterGlyph::from_record(record, None)
                .map_err(|e| TracerError::glyph(format!("line {}: {e}", i + 1)))?;
            inner.insert(glyph);
        }
        tracing::debug!(glyphs = inner.len(), "loaded glyph dictionary");
        Ok(Self { inner })
    }

    /// Open and parse a dictionary file.
    pub fn from_path(path: impl AsRef<Path>) -> TracerResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path).map_err(|e| {
            TracerError::glyph(format!("open glyph dictionary '{}': {e}", path.display()))
        })?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    /// Number of glyphs in the dictionary.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// The dictionary had no records.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl GlyphProvider for JsonlGlyphProvider {
    fn fetch(&self, character: char) -> TracerResult<Option<CharacterGlyph>> {
        self.inner.fetch(character)
    }
}

/// One `<character>.json` file per glyph under a root directory, read on demand.
#[derive(Clone, Debug)]
pub struct DirGlyphProvider {
    root: PathBuf,
}

impl DirGlyphProvider {
    /// Serve glyphs from `root`. Nothing is read until a fetch.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, character: char) -> PathBuf {
        self.root.join(format!("{character}.json"))
    }
}

impl GlyphProvider for DirGlyphProvider {
    fn fetch(&self, character: char) -> TracerResult<Option<CharacterGlyph>> {
        let path = self.path_for(character);
        if !path.is_file() {
            return Ok(None);
        }
        CharacterGlyph::from_path(&path, Some(character)).map(Some)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/glyph/provider.rs"]
mod tests;
