use crate::foundation::error::{TracerError, TracerResult};

/// What happened when the cursor moved past the current character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Another character is now current.
    Next {
        /// Position of the new character.
        index: usize,
        /// The new character.
        character: char,
    },
    /// The word has no characters left.
    WordComplete,
}

/// Progress through the characters of one vocabulary item.
#[derive(Clone, Debug)]
pub struct WordCursor {
    word: String,
    characters: Vec<char>,
    index: usize,
    completed: Vec<char>,
}

impl WordCursor {
    /// Cursor on the first character of `word`. Whitespace is not practiced and is dropped.
    pub fn new(word: &str) -> TracerResult<Self> {
        let characters: Vec<char> = word.chars().filter(|c| !c.is_whitespace()).collect();
        if characters.is_empty() {
            return Err(TracerError::validation(
                "word must contain at least one character",
            ));
        }
        Ok(Self {
            word: word.to_string(),
            characters,
            index: 0,
            completed: Vec::new(),
        })
    }

    /// The word as given.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Characters to practice.
    pub fn characters(&self) -> &[char] {
        &self.characters
    }

    /// Position of the current character.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The current character; `None` once the word is done.
    pub fn current(&self) -> Option<char> {
        self.characters.get(self.index).copied()
    }

    /// Characters already written (or skipped) for display.
    pub fn completed(&self) -> &[char] {
        &self.completed
    }

    /// Every character was finished or skipped.
    pub fn is_complete(&self) -> bool {
        self.index >= self.characters.len()
    }

    /// Move past the current character, recording it for display.
    pub fn advance(&mut self) -> Advance {
        if let Some(c) = self.current() {
            self.completed.push(c);
            self.index += 1;
        }
        match self.current() {
            Some(character) => Advance::Next {
                index: self.index,
                character,
            },
            None => Advance::WordComplete,
        }
    }

    /// Abandon the remaining characters.
    pub fn abandon(&mut self) {
        self.index = self.characters.len();
    }
}
