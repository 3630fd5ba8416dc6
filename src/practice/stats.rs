use std::collections::BTreeMap;

use serde::Serialize;

/// Counters for one character across a practice run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CharacterStats {
    /// Strokes committed in guided mode.
    pub accepted_strokes: u32,
    /// Strokes refused in guided mode.
    pub rejected_strokes: u32,
    /// Incorrect whole-character judgments.
    pub incorrect_judgments: u32,
    /// Times the character was finished.
    pub completions: u32,
    /// Times the character was skipped.
    pub skips: u32,
    /// Hints shown.
    pub hints_shown: u32,
    /// Demonstrations started.
    pub demonstrations_played: u32,
}

/// Per-character tallies, ordered by character.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PracticeStats {
    characters: BTreeMap<char, CharacterStats>,
}

impl PracticeStats {
    /// No counters yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for `character`, if it was practiced.
    pub fn get(&self, character: char) -> Option<&CharacterStats> {
        self.characters.get(&character)
    }

    /// Counters for `character`, created on first use.
    pub fn entry(&mut self, character: char) -> &mut CharacterStats {
        self.characters.entry(character).or_default()
    }

    /// Every practiced character with its counters.
    pub fn iter(&self) -> impl Iterator<Item = (char, &CharacterStats)> {
        self.characters.iter().map(|(c, s)| (*c, s))
    }

    /// Sum over every character.
    pub fn totals(&self) -> CharacterStats {
        self.characters
            .values()
            .fold(CharacterStats::default(), |mut acc, s| {
                acc.accepted_strokes += s.accepted_strokes;
                acc.rejected_strokes += s.rejected_strokes;
                acc.incorrect_judgments += s.incorrect_judgments;
                acc.completions += s.completions;
                acc.skips += s.skips;
                acc.hints_shown += s.hints_shown;
                acc.demonstrations_played += s.demonstrations_played;
                acc
            })
    }
}
