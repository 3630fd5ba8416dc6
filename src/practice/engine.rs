//! Event-driven practice loop.
//!
//! [`PracticeEngine`] owns every piece of per-word state: the word cursor, the active
//! [`TracerSession`], the escalation controller and the glyph cache. Hosts feed it
//! [`Event`]s and render from the returned [`Signal`]s plus [`PracticeEngine::snapshot`].
//! The engine never blocks: glyph lookups are announced with [`Signal::GlyphRequested`] and
//! answered later with [`Event::GlyphArrived`], or synchronously through
//! [`PracticeEngine::resolve_pending`].

use std::sync::Arc;

use serde::Serialize;

use crate::escalate::controller::{EscalationController, EscalationPhase, Remedy};
use crate::escalate::locate::{ErrorHint, locate_error};
use crate::foundation::core::{Point, serialize_pairs};
use crate::foundation::error::TracerResult;
use crate::glyph::cache::GlyphCache;
use crate::glyph::loader::{FetchTicket, GlyphFetched};
use crate::glyph::model::CharacterGlyph;
use crate::glyph::provider::GlyphProvider;
use crate::practice::opts::{PracticeMode, PracticeOpts};
use crate::practice::oracle::{Judgment, RecognitionOracle, judge_fail_closed};
use crate::practice::progress::{ProgressEvent, ProgressSink};
use crate::practice::stats::PracticeStats;
use crate::stroke::gesture::DrawnStroke;
use crate::stroke::validate::RejectReason;
use crate::trace::sequencer::{StrokeOutcome, TracerSession};
use crate::trace::word::{Advance, WordCursor};

/// What to abandon on [`Event::Skip`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipScope {
    /// Only the current character.
    Character,
    /// The current character and the rest of the word.
    Word,
}

/// Input to [`PracticeEngine::handle`].
#[derive(Clone, Debug)]
pub enum Event {
    /// Pointer went down at a surface point.
    GestureStart(Point),
    /// Pointer moved while down.
    GestureMove(Point),
    /// Pointer released.
    GestureEnd,
    /// Ask for the drawn character to be judged (tested mode).
    Submit,
    /// Answer from the recognition oracle.
    JudgmentReceived(Judgment),
    /// Close the hint.
    DismissHint,
    /// Close a finished demonstration.
    DismissDemonstration,
    /// Wall-clock time passed; drives demonstration playback.
    Elapsed {
        /// Milliseconds since the previous `Elapsed`.
        ms: u64,
    },
    /// Abandon the current character or word.
    Skip(SkipScope),
    /// Clear the current character's strokes and start it over.
    Repeat,
    /// A background glyph fetch finished.
    GlyphArrived(GlyphFetched),
}

/// Output of the engine, in the order things happened.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum Signal {
    /// A character became active.
    CharacterStarted {
        /// Position in the word.
        index: usize,
        /// The character.
        character: char,
    },
    /// A glyph fetch must be issued for `ticket`.
    GlyphRequested {
        /// Request to answer with [`Event::GlyphArrived`].
        ticket: FetchTicket,
    },
    /// Reference data for the active character is settled. `strokes` is `None` without data.
    GlyphResolved {
        /// The active character.
        character: char,
        /// Reference stroke count.
        strokes: Option<usize>,
    },
    /// A stroke was committed (guided mode).
    StrokeAccepted {
        /// Index of the committed stroke.
        stroke_index: usize,
        /// Strokes the character needs.
        total_strokes: usize,
    },
    /// A stroke was refused (guided mode).
    StrokeRejected {
        /// Index of the stroke still expected.
        stroke_index: usize,
        /// Check that failed.
        reason: RejectReason,
    },
    /// A stroke was added to the canvas without judgment (tested mode).
    StrokeRecorded {
        /// Strokes now on the canvas.
        strokes: usize,
    },
    /// The host should ask the oracle to judge the canvas.
    JudgmentRequested {
        /// Target character.
        character: char,
        /// Strokes submitted.
        strokes: usize,
    },
    /// Incorrect; flash and clear the canvas.
    FlashRejection {
        /// Incorrect judgments so far.
        attempts: u32,
        /// What the oracle thought was drawn.
        best_guess: Option<String>,
    },
    /// Incorrect; show the error circle over the frozen attempt.
    HintShown {
        /// Error circle, if any points were drawn.
        hint: Option<ErrorHint>,
        /// What the oracle thought was drawn.
        best_guess: Option<String>,
    },
    /// The hint was recomputed against a late glyph.
    HintRefined {
        /// Updated circle.
        hint: Option<ErrorHint>,
    },
    /// `total` is `None` while the glyph is still loading.
    DemonstrationStarted {
        /// Strokes to play.
        total: Option<usize>,
    },
    /// Playback advanced.
    DemonstrationStep {
        /// Strokes shown so far.
        cursor: usize,
    },
    /// Playback is complete and may be dismissed.
    DemonstrationFinished,
    /// A hint or demonstration was closed.
    PhaseDismissed {
        /// The phase that was closed.
        phase: EscalationPhase,
    },
    /// Committed strokes were removed.
    CanvasCleared,
    /// The active character was finished.
    CharacterComplete {
        /// Position in the word.
        index: usize,
        /// The character.
        character: char,
    },
    /// The active character was abandoned.
    CharacterSkipped {
        /// Position in the word.
        index: usize,
        /// The character.
        character: char,
    },
    /// `celebrate` is false when any character of the word was skipped.
    WordComplete {
        /// The word.
        word: String,
        /// Every character was finished without skipping.
        celebrate: bool,
    },
    /// The rest of the word was abandoned.
    WordSkipped {
        /// The word.
        word: String,
    },
}

/// Read-only view of everything a renderer needs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PracticeSnapshot {
    /// Practice mode.
    pub mode: PracticeMode,
    /// Active word.
    pub word: Option<String>,
    /// Active character.
    pub character: Option<char>,
    /// Position of the active character in the word.
    pub character_index: usize,
    /// Strokes accepted so far.
    pub stroke_index: usize,
    /// Strokes the character needs.
    pub total_strokes: usize,
    /// Strokes on the canvas.
    pub committed: Vec<DrawnStroke>,
    /// Gesture in flight.
    #[serde(serialize_with = "serialize_pairs")]
    pub live: Vec<Point>,
    /// Most recent rejected gesture.
    #[serde(serialize_with = "serialize_pairs")]
    pub last_rejected: Vec<Point>,
    /// Escalation phase.
    pub phase: EscalationPhase,
    /// Incorrect judgments on this character.
    pub attempts: u32,
    /// The demonstration was already shown.
    pub post_demonstration: bool,
    /// Error circle while hinting.
    pub hint: Option<ErrorHint>,
    /// Strokes demonstrated so far.
    pub demonstration_cursor: Option<usize>,
    /// Strokes to demonstrate, once known.
    pub demonstration_total: Option<usize>,
    /// The attempt kept on screen under a hint.
    pub frozen: Vec<DrawnStroke>,
    /// Characters done (finished or skipped) in this word.
    pub completed: Vec<char>,
    /// A glyph fetch for the active character is outstanding.
    pub glyph_pending: bool,
    /// A submitted attempt waits for the oracle.
    pub awaiting_judgment: bool,
}

/// One learner working through one word at a time.
pub struct PracticeEngine {
    opts: PracticeOpts,
    cache: GlyphCache,
    word: Option<WordCursor>,
    session: Option<TracerSession>,
    escalation: EscalationController,
    generation: u64,
    pending: Option<FetchTicket>,
    hint: Option<ErrorHint>,
    frozen: Vec<DrawnStroke>,
    failed_points: Vec<Point>,
    awaiting_judgment: bool,
    mistakes: u32,
    skipped_in_word: bool,
    stats: PracticeStats,
    sink: Option<Box<dyn ProgressSink>>,
}

impl PracticeEngine {
    /// Start an idle engine. Fails with [`TracerError::Config`] when `opts` do not validate.
    ///
    /// [`TracerError::Config`]: crate::TracerError::Config
    pub fn new(opts: PracticeOpts) -> TracerResult<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            cache: GlyphCache::new(),
            word: None,
            session: None,
            escalation: EscalationController::new(opts.escalation),
            generation: 0,
            pending: None,
            hint: None,
            frozen: Vec::new(),
            failed_points: Vec::new(),
            awaiting_judgment: false,
            mistakes: 0,
            skipped_in_word: false,
            stats: PracticeStats::new(),
            sink: None,
        })
    }

    /// Forward completion and skip records to `sink`.
    pub fn with_sink(mut self, sink: Box<dyn ProgressSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Options the engine was built with.
    pub fn opts(&self) -> &PracticeOpts {
        &self.opts
    }

    /// Counters per character.
    pub fn stats(&self) -> &PracticeStats {
        &self.stats
    }

    /// Glyphs seen so far.
    pub fn cache(&self) -> &GlyphCache {
        &self.cache
    }

    /// Seed the cache, e.g. with glyphs prefetched for a whole lesson.
    pub fn cache_glyph(&mut self, character: char, glyph: Option<Arc<CharacterGlyph>>) {
        self.cache.insert(character, glyph);
    }

    /// Outstanding glyph request for the active character.
    pub fn pending_ticket(&self) -> Option<FetchTicket> {
        self.pending
    }

    /// Reference glyph of the active character, once resolved.
    pub fn current_glyph(&self) -> Option<&Arc<CharacterGlyph>> {
        self.session.as_ref().and_then(TracerSession::glyph)
    }

    /// Stroke state of the active character.
    pub fn session(&self) -> Option<&TracerSession> {
        self.session.as_ref()
    }

    /// Escalation phase of the active character.
    pub fn phase(&self) -> EscalationPhase {
        self.escalation.phase()
    }

    /// Begin practicing `word`, abandoning whatever was in progress.
    pub fn start_word(&mut self, word: &str) -> TracerResult<Vec<Signal>> {
        let cursor = WordCursor::new(word)?;
        let first = cursor.current();
        self.word = Some(cursor);
        self.skipped_in_word = false;
        let mut out = Vec::new();
        if let Some(c) = first {
            self.activate(0, c, &mut out);
        }
        Ok(out)
    }

    /// Apply one event and return what happened.
    ///
    /// Events that make no sense in the current state are ignored and produce no signals.
    #[tracing::instrument(level = "trace", skip(self), fields(generation = self.generation))]
    pub fn handle(&mut self, event: Event) -> Vec<Signal> {
        let mut out = Vec::new();
        match event {
            Event::GestureStart(p) => {
                if self.accepts_input()
                    && let Some(s) = self.session.as_mut()
                {
                    s.begin_gesture(p);
                }
            }
            Event::GestureMove(p) => {
                if self.accepts_input()
                    && let Some(s) = self.session.as_mut()
                {
                    s.extend_gesture(p);
                }
            }
            Event::GestureEnd => self.on_gesture_end(&mut out),
            Event::Submit => self.on_submit(&mut out),
            Event::JudgmentReceived(j) => self.on_judgment(j, &mut out),
            Event::DismissHint => {
                if self.escalation.dismiss_hint() {
                    self.hint = None;
                    self.frozen.clear();
                    out.push(Signal::PhaseDismissed {
                        phase: EscalationPhase::Hint,
                    });
                }
            }
            Event::DismissDemonstration => {
                if self.escalation.dismiss_demonstration() {
                    if let Some(s) = self.session.as_mut() {
                        s.take_canvas();
                    }
                    out.push(Signal::PhaseDismissed {
                        phase: EscalationPhase::Demonstration,
                    });
                }
            }
            Event::Elapsed { ms } => {
                let steps = self.escalation.tick(ms);
                let advanced = !steps.is_empty();
                out.extend(
                    steps
                        .into_iter()
                        .map(|cursor| Signal::DemonstrationStep { cursor }),
                );
                if advanced && self.escalation.demonstration_finished() {
                    out.push(Signal::DemonstrationFinished);
                }
            }
            Event::Skip(SkipScope::Character) => self.skip_character(&mut out),
            Event::Skip(SkipScope::Word) => self.skip_word(&mut out),
            Event::Repeat => {
                if let Some(s) = self.session.as_mut() {
                    s.repeat();
                    self.awaiting_judgment = false;
                    out.push(Signal::CanvasCleared);
                }
            }
            Event::GlyphArrived(fetched) => {
                if !fetched.failed {
                    self.cache
                        .insert(fetched.ticket.character, fetched.glyph.clone());
                }
                self.apply_glyph(fetched.ticket, fetched.glyph, &mut out);
            }
        }
        out
    }

    /// Answer the outstanding glyph request synchronously through the cache.
    pub fn resolve_pending(&mut self, provider: &dyn GlyphProvider) -> Vec<Signal> {
        let mut out = Vec::new();
        if let Some(ticket) = self.pending {
            let glyph = self.cache.get_or_fetch(ticket.character, provider);
            self.apply_glyph(ticket, glyph, &mut out);
        }
        out
    }

    /// [`PracticeEngine::handle`] followed by [`PracticeEngine::resolve_pending`].
    pub fn handle_with(&mut self, event: Event, provider: &dyn GlyphProvider) -> Vec<Signal> {
        let mut out = self.handle(event);
        // A completion may activate the next character, which asks for another glyph.
        out.extend(self.resolve_pending(provider));
        out
    }

    /// Submit the drawn character to `oracle` and feed back its judgment.
    pub fn submit_to(&mut self, oracle: &dyn RecognitionOracle) -> Vec<Signal> {
        let mut out = self.handle(Event::Submit);
        if !self.awaiting_judgment {
            return out;
        }
        let Some(s) = self.session.as_ref() else {
            return out;
        };
        let judgment = judge_fail_closed(oracle, s.character(), s.committed(), s.grid());
        out.extend(self.handle(Event::JudgmentReceived(judgment)));
        out
    }

    /// Everything a renderer needs, copied out.
    pub fn snapshot(&self) -> PracticeSnapshot {
        let s = self.session.as_ref();
        PracticeSnapshot {
            mode: self.opts.mode,
            word: self.word.as_ref().map(|w| w.word().to_string()),
            character: s.map(TracerSession::character),
            character_index: self.word.as_ref().map_or(0, WordCursor::index),
            stroke_index: s.map_or(0, TracerSession::stroke_index),
            total_strokes: s.map_or(0, TracerSession::total_strokes),
            committed: s.map(|s| s.committed().to_vec()).unwrap_or_default(),
            live: s.map(|s| s.live_points().to_vec()).unwrap_or_default(),
            last_rejected: s
                .and_then(TracerSession::last_rejected)
                .map(<[Point]>::to_vec)
                .unwrap_or_default(),
            phase: self.escalation.phase(),
            attempts: self.escalation.attempts(),
            post_demonstration: self.escalation.post_demonstration(),
            hint: self.hint,
            demonstration_cursor: self.escalation.demonstration_cursor(),
            demonstration_total: self.escalation.demonstration_total(),
            frozen: self.frozen.clone(),
            completed: self
                .word
                .as_ref()
                .map(|w| w.completed().to_vec())
                .unwrap_or_default(),
            glyph_pending: self.pending.is_some(),
            awaiting_judgment: self.awaiting_judgment,
        }
    }

    fn accepts_input(&self) -> bool {
        !self.escalation.blocks_input() && !self.awaiting_judgment
    }

    fn activate(&mut self, index: usize, character: char, out: &mut Vec<Signal>) {
        self.generation += 1;
        self.escalation.reset();
        self.hint = None;
        self.frozen.clear();
        self.failed_points.clear();
        self.awaiting_judgment = false;
        self.mistakes = 0;
        self.pending = None;

        out.push(Signal::CharacterStarted { index, character });
        let cached = self.cache.lookup(character).map(|c| c.glyph().cloned());
        match cached {
            Some(glyph) => {
                out.push(Signal::GlyphResolved {
                    character,
                    strokes: glyph.as_ref().map(|g| g.stroke_count()),
                });
                self.session = Some(TracerSession::new(character, glyph, self.opts.grid));
            }
            None => {
                let ticket = FetchTicket {
                    character,
                    generation: self.generation,
                };
                self.pending = Some(ticket);
                self.session = Some(TracerSession::new(character, None, self.opts.grid));
                out.push(Signal::GlyphRequested { ticket });
            }
        }
        tracing::debug!(%character, index, generation = self.generation, "character started");
    }

    fn apply_glyph(
        &mut self,
        ticket: FetchTicket,
        glyph: Option<Arc<CharacterGlyph>>,
        out: &mut Vec<Signal>,
    ) {
        if self.pending != Some(ticket) {
            tracing::trace!(character = %ticket.character, generation = ticket.generation, "stale glyph result discarded");
            return;
        }
        self.pending = None;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.attach_glyph(glyph.clone());
        out.push(Signal::GlyphResolved {
            character: ticket.character,
            strokes: glyph.as_ref().map(|g| g.stroke_count()),
        });

        match self.escalation.phase() {
            EscalationPhase::Hint => {
                self.hint = locate_error(
                    &self.failed_points,
                    glyph.as_deref(),
                    self.opts.grid,
                    &self.opts.escalation.locator,
                );
                out.push(Signal::HintRefined { hint: self.hint });
            }
            EscalationPhase::Demonstration if self.escalation.demonstration_total().is_none() => {
                let total = glyph.as_ref().map_or(0, |g| g.stroke_count());
                self.escalation.set_demonstration_total(total);
                if self.escalation.demonstration_finished() {
                    out.push(Signal::DemonstrationFinished);
                }
            }
            _ => {}
        }
    }

    fn on_gesture_end(&mut self, out: &mut Vec<Signal>) {
        if !self.accepts_input() {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let character = session.character();

        if self.opts.mode == PracticeMode::Tested {
            if let Some(strokes) = session.end_gesture_unjudged() {
                out.push(Signal::StrokeRecorded { strokes });
            }
            return;
        }

        let total_strokes = session.total_strokes();
        match session.end_gesture(&self.opts.validator) {
            StrokeOutcome::Accepted {
                stroke_index,
                character_complete,
            } => {
                self.stats.entry(character).accepted_strokes += 1;
                out.push(Signal::StrokeAccepted {
                    stroke_index,
                    total_strokes,
                });
                if character_complete {
                    self.complete_character(out);
                }
            }
            StrokeOutcome::Rejected {
                stroke_index,
                reason,
            } => {
                self.stats.entry(character).rejected_strokes += 1;
                self.mistakes += 1;
                out.push(Signal::StrokeRejected {
                    stroke_index,
                    reason,
                });
            }
            StrokeOutcome::Ignored => {}
        }
    }

    fn on_submit(&mut self, out: &mut Vec<Signal>) {
        if self.opts.mode != PracticeMode::Tested || !self.accepts_input() {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        // Releasing is implied by submitting.
        session.end_gesture_unjudged();
        let strokes = session.committed().len();
        if strokes == 0 {
            return;
        }
        self.awaiting_judgment = true;
        out.push(Signal::JudgmentRequested {
            character: session.character(),
            strokes,
        });
    }

    fn on_judgment(&mut self, judgment: Judgment, out: &mut Vec<Signal>) {
        if !self.awaiting_judgment {
            tracing::trace!("judgment without a pending submit ignored");
            return;
        }
        self.awaiting_judgment = false;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let character = session.character();

        if judgment.correct {
            self.escalation.on_correct();
            self.complete_character(out);
            return;
        }

        self.stats.entry(character).incorrect_judgments += 1;
        self.mistakes += 1;
        self.failed_points.extend(session.canvas_points());
        let attempt = session.take_canvas();

        match self.escalation.on_incorrect() {
            Remedy::Flash => out.push(Signal::FlashRejection {
                attempts: self.escalation.attempts(),
                best_guess: judgment.best_guess,
            }),
            Remedy::Hint => {
                self.frozen = attempt;
                self.hint = locate_error(
                    &self.failed_points,
                    session.glyph().map(|g| &**g),
                    self.opts.grid,
                    &self.opts.escalation.locator,
                );
                self.stats.entry(character).hints_shown += 1;
                out.push(Signal::HintShown {
                    hint: self.hint,
                    best_guess: judgment.best_guess,
                });
            }
            Remedy::Demonstration => {
                self.frozen.clear();
                self.hint = None;
                self.stats.entry(character).demonstrations_played += 1;
                let total = match session.glyph() {
                    Some(g) => Some(g.stroke_count()),
                    None if self.pending.is_none() => Some(0),
                    None => None,
                };
                if let Some(t) = total {
                    self.escalation.set_demonstration_total(t);
                }
                out.push(Signal::DemonstrationStarted { total });
                if self.escalation.demonstration_finished() {
                    out.push(Signal::DemonstrationFinished);
                }
            }
        }
    }

    fn complete_character(&mut self, out: &mut Vec<Signal>) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let character = session.character();
        let index = self.word.as_ref().map_or(0, WordCursor::index);
        self.stats.entry(character).completions += 1;
        out.push(Signal::CharacterComplete { index, character });
        let word = self.word_text();
        self.record(ProgressEvent::CharacterComplete {
            word,
            character,
            mistakes: self.mistakes,
        });
        self.advance(out);
    }

    fn skip_character(&mut self, out: &mut Vec<Signal>) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let character = session.character();
        let index = self.word.as_ref().map_or(0, WordCursor::index);
        self.stats.entry(character).skips += 1;
        self.skipped_in_word = true;
        out.push(Signal::CharacterSkipped { index, character });
        let word = self.word_text();
        self.record(ProgressEvent::CharacterSkipped { word, character });
        self.advance(out);
    }

    fn skip_word(&mut self, out: &mut Vec<Signal>) {
        let Some(cursor) = self.word.as_mut() else {
            return;
        };
        if cursor.is_complete() {
            return;
        }
        cursor.abandon();
        let word = cursor.word().to_string();
        self.finish_word();
        out.push(Signal::WordSkipped { word: word.clone() });
        self.record(ProgressEvent::WordSkipped { word });
    }

    fn advance(&mut self, out: &mut Vec<Signal>) {
        self.generation += 1;
        let Some(cursor) = self.word.as_mut() else {
            return;
        };
        match cursor.advance() {
            Advance::Next { index, character } => self.activate(index, character, out),
            Advance::WordComplete => {
                let word = cursor.word().to_string();
                let celebrate = !self.skipped_in_word;
                self.finish_word();
                out.push(Signal::WordComplete {
                    word: word.clone(),
                    celebrate,
                });
                self.record(ProgressEvent::WordComplete { word });
            }
        }
    }

    fn finish_word(&mut self) {
        self.session = None;
        self.pending = None;
        self.escalation.reset();
        self.hint = None;
        self.frozen.clear();
        self.failed_points.clear();
        self.awaiting_judgment = false;
    }

    fn word_text(&self) -> String {
        self.word
            .as_ref()
            .map(|w| w.word().to_string())
            .unwrap_or_default()
    }

    fn record(&mut self, event: ProgressEvent) {
        if let Some(sink) = self.sink.as_mut()
            && let Err(e) = sink.record(&event)
        {
            tracing::warn!(error = %e, "progress sink failed");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/practice/engine.rs"]
mod tests;
