use std::collections::HashMap;
use std::sync::Arc;

use crate::glyph::model::CharacterGlyph;
use crate::glyph::provider::GlyphProvider;

/// What the cache knows about one character.
#[derive(Clone, Debug)]
pub enum CachedGlyph {
    /// The source answered and has a glyph.
    Present(Arc<CharacterGlyph>),
    /// The source answered and has nothing.
    Missing,
}

impl CachedGlyph {
    /// The glyph, if the source had one.
    pub fn glyph(&self) -> Option<&Arc<CharacterGlyph>> {
        match self {
            CachedGlyph::Present(g) => Some(g),
            CachedGlyph::Missing => None,
        }
    }
}

/// Per-character memo of glyph lookups.
///
/// Answers (including "no data") are kept; provider errors are not, so a later request for
/// the same character asks the provider again.
#[derive(Clone, Debug, Default)]
pub struct GlyphCache {
    entries: HashMap<char, CachedGlyph>,
    fetches: HashMap<char, u32>,
}

impl GlyphCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// What is known about `character`, without fetching.
    pub fn lookup(&self, character: char) -> Option<&CachedGlyph> {
        self.entries.get(&character)
    }

    /// Record an answer; `None` means the source has no data.
    pub fn insert(&mut self, character: char, glyph: Option<Arc<CharacterGlyph>>) {
        let entry = match glyph {
            Some(g) => CachedGlyph::Present(g),
            None => CachedGlyph::Missing,
        };
        self.entries.insert(character, entry);
    }

    /// Cached answer, or a synchronous provider call whose answer is cached.
    pub fn get_or_fetch(
        &mut self,
        character: char,
        provider: &dyn GlyphProvider,
    ) -> Option<Arc<CharacterGlyph>> {
        if let Some(hit) = self.entries.get(&character) {
            return hit.glyph().cloned();
        }
        *self.fetches.entry(character).or_insert(0) += 1;
        match provider.fetch(character) {
            Ok(glyph) => {
                let glyph = glyph.map(Arc::new);
                self.insert(character, glyph.clone());
                glyph
            }
            Err(e) => {
                tracing::warn!(%character, error = %e, "glyph fetch failed; continuing without reference");
                None
            }
        }
    }

    /// Provider calls made through [`GlyphCache::get_or_fetch`] for `character`.
    pub fn fetch_count(&self, character: char) -> u32 {
        self.fetches.get(&character).copied().unwrap_or(0)
    }

    /// Characters with a cached answer.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No answers cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
