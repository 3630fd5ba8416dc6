use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{TracerError, TracerResult};

/// Durable record of practice progress, emitted at completion and skip boundaries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// A character was finished.
    CharacterComplete {
        /// Word being practiced.
        word: String,
        /// The character.
        character: char,
        /// Incorrect judgments or rejected strokes before success.
        mistakes: u32,
    },
    /// A character was abandoned.
    CharacterSkipped {
        /// Word being practiced.
        word: String,
        /// The character.
        character: char,
    },
    /// Every character of a word was finished or skipped.
    WordComplete {
        /// The word.
        word: String,
    },
    /// The rest of a word was abandoned.
    WordSkipped {
        /// The word.
        word: String,
    },
}

/// Destination for [`ProgressEvent`]s.
pub trait ProgressSink: Send {
    /// Persist one event. Errors are logged by the engine and practice continues.
    fn record(&mut self, event: &ProgressEvent) -> TracerResult<()>;
}

/// Sink that keeps events in memory, for tests and previews.
#[derive(Debug, Default)]
pub struct InMemoryProgress {
    events: Vec<ProgressEvent>,
}

impl InMemoryProgress {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far.
    pub fn events(&self) -> &[ProgressEvent] {
        &self.events
    }
}

impl ProgressSink for InMemoryProgress {
    fn record(&mut self, event: &ProgressEvent) -> TracerResult<()> {
        self.events.push(event.clone());
        Ok(())
    }
}

/// Writes one JSON object per line.
pub struct JsonlProgress<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> JsonlProgress<W> {
    /// Write to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Hand back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> ProgressSink for JsonlProgress<W> {
    fn record(&mut self, event: &ProgressEvent) -> TracerResult<()> {
        serde_json::to_writer(&mut self.out, event)
            .map_err(|e| TracerError::serde(format!("encode progress event: {e}")))?;
        self.out
            .write_all(b"\n")
            .and_then(|()| self.out.flush())
            .map_err(|e| TracerError::Other(anyhow::Error::new(e).context("write progress event")))
    }
}
