use serde::{Deserialize, Serialize};

use crate::escalate::locate::LocatorConfig;
use crate::foundation::error::{TracerError, TracerResult};

/// Which remedial phase the current character is in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationPhase {
    /// Plain practice.
    #[default]
    Normal,
    /// A frozen attempt with an error circle, waiting for dismissal.
    Hint,
    /// The reference strokes are being played back one by one.
    Demonstration,
}

/// Response chosen for an incorrect judgment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Remedy {
    /// Brief rejection indicator; the canvas is cleared and the phase stays Normal.
    Flash,
    /// Freeze the attempt and show the error circle.
    Hint,
    /// Play the reference strokes back.
    Demonstration,
}

/// Thresholds and timing for [`EscalationController`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    /// Incorrect attempts before a hint is shown.
    pub hint_after: u32,
    /// Incorrect attempts before the demonstration plays.
    pub demonstrate_after: u32,
    /// Delay between demonstrated strokes.
    pub demonstration_interval_ms: u64,
    /// Error circle sizing.
    pub locator: LocatorConfig,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            hint_after: 2,
            demonstrate_after: 3,
            demonstration_interval_ms: 800,
            locator: LocatorConfig::default(),
        }
    }
}

impl EscalationConfig {
    /// Reject zero thresholds, a zero interval, or a bad locator config.
    pub fn validate(&self) -> TracerResult<()> {
        if self.hint_after == 0 || self.demonstrate_after == 0 {
            return Err(TracerError::config(
                "escalation thresholds must be at least 1",
            ));
        }
        if self.demonstration_interval_ms == 0 {
            return Err(TracerError::config(
                "demonstration_interval_ms must be > 0",
            ));
        }
        self.locator.validate()
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Demonstration {
    cursor: usize,
    total: Option<usize>,
    pending_ms: u64,
}

impl Demonstration {
    fn finished(&self) -> bool {
        self.total.is_some_and(|t| self.cursor >= t)
    }
}

/// Per-character failure counting and phase selection.
#[derive(Clone, Debug)]
pub struct EscalationController {
    cfg: EscalationConfig,
    attempts: u32,
    phase: EscalationPhase,
    post_demonstration: bool,
    demo: Demonstration,
}

impl EscalationController {
    /// Fresh controller: no attempts, Normal phase.
    pub fn new(cfg: EscalationConfig) -> Self {
        Self {
            cfg,
            attempts: 0,
            phase: EscalationPhase::Normal,
            post_demonstration: false,
            demo: Demonstration::default(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &EscalationConfig {
        &self.cfg
    }

    /// Incorrect judgments on the current character.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Current phase.
    pub fn phase(&self) -> EscalationPhase {
        self.phase
    }

    /// Whether the demonstration was already shown for this character.
    pub fn post_demonstration(&self) -> bool {
        self.post_demonstration
    }

    /// New gestures are refused while a hint or demonstration is up.
    pub fn blocks_input(&self) -> bool {
        self.phase != EscalationPhase::Normal
    }

    /// Strokes shown so far, while demonstrating.
    pub fn demonstration_cursor(&self) -> Option<usize> {
        (self.phase == EscalationPhase::Demonstration).then_some(self.demo.cursor)
    }

    /// Strokes to demonstrate, once the glyph is known.
    pub fn demonstration_total(&self) -> Option<usize> {
        (self.phase == EscalationPhase::Demonstration)
            .then_some(self.demo.total)
            .flatten()
    }

    /// Playback reached the last stroke and may be dismissed.
    pub fn demonstration_finished(&self) -> bool {
        self.phase == EscalationPhase::Demonstration && self.demo.finished()
    }

    /// Count one incorrect judgment and pick the response.
    pub fn on_incorrect(&mut self) -> Remedy {
        self.attempts += 1;
        let remedy = if self.post_demonstration {
            Remedy::Flash
        } else if self.attempts >= self.cfg.demonstrate_after {
            Remedy::Demonstration
        } else if self.attempts >= self.cfg.hint_after {
            Remedy::Hint
        } else {
            Remedy::Flash
        };
        self.phase = match remedy {
            Remedy::Flash => EscalationPhase::Normal,
            Remedy::Hint => EscalationPhase::Hint,
            Remedy::Demonstration => {
                self.demo = Demonstration::default();
                EscalationPhase::Demonstration
            }
        };
        tracing::debug!(attempts = self.attempts, ?remedy, "incorrect judgment");
        remedy
    }

    /// A correct judgment clears everything for this character.
    pub fn on_correct(&mut self) {
        self.reset();
    }

    /// Back to a fresh character.
    pub fn reset(&mut self) {
        self.attempts = 0;
        self.phase = EscalationPhase::Normal;
        self.post_demonstration = false;
        self.demo = Demonstration::default();
    }

    /// Leave the hint. Returns false when no hint was showing.
    pub fn dismiss_hint(&mut self) -> bool {
        if self.phase != EscalationPhase::Hint {
            return false;
        }
        self.phase = EscalationPhase::Normal;
        true
    }

    /// Leave a finished demonstration; the character will not escalate again.
    pub fn dismiss_demonstration(&mut self) -> bool {
        if !self.demonstration_finished() {
            return false;
        }
        self.phase = EscalationPhase::Normal;
        self.post_demonstration = true;
        self.demo = Demonstration::default();
        true
    }

    /// Number of strokes to play, once known. Zero makes the demonstration finish at once.
    pub fn set_demonstration_total(&mut self, total: usize) {
        if self.phase == EscalationPhase::Demonstration && self.demo.total.is_none() {
            self.demo.total = Some(total);
            self.demo.pending_ms = 0;
        }
    }

    /// Advance playback by `elapsed_ms`; returns every cursor value reached.
    ///
    /// Time spent before the stroke count is known does not count toward the first step.
    pub fn tick(&mut self, elapsed_ms: u64) -> Vec<usize> {
        let mut reached = Vec::new();
        if self.phase != EscalationPhase::Demonstration {
            return reached;
        }
        let Some(total) = self.demo.total else {
            return reached;
        };
        let interval = self.cfg.demonstration_interval_ms.max(1);
        self.demo.pending_ms = self.demo.pending_ms.saturating_add(elapsed_ms);
        while self.demo.cursor < total && self.demo.pending_ms >= interval {
            self.demo.pending_ms -= interval;
            self.demo.cursor += 1;
            reached.push(self.demo.cursor);
        }
        if self.demo.finished() {
            self.demo.pending_ms = 0;
        }
        reached
    }
}

impl Default for EscalationController {
    fn default() -> Self {
        Self::new(EscalationConfig::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/escalate/controller.rs"]
mod tests;
