use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::escalate::controller::EscalationConfig;
use crate::foundation::core::GridSize;
use crate::foundation::error::{TracerError, TracerResult};
use crate::stroke::validate::ValidatorConfig;

/// How strokes are judged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PracticeMode {
    /// Every stroke is checked against its reference median as it is released.
    #[default]
    Guided,
    /// The whole character is drawn freely and judged by a recognizer on submit.
    Tested,
}

/// Options for a [`crate::PracticeEngine`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeOpts {
    /// Guided or tested practice.
    pub mode: PracticeMode,
    /// Side of the square drawing surface in pixels.
    pub grid: GridSize,
    /// Stroke validator thresholds.
    pub validator: ValidatorConfig,
    /// Mistake escalation tuning.
    pub escalation: EscalationConfig,
}

impl PracticeOpts {
    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> TracerResult<Self> {
        let opts: Self = serde_json::from_reader(r)
            .map_err(|e| TracerError::config(format!("parse practice options JSON: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Read options from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> TracerResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TracerError::config(format!("open practice options '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check the grid and every nested config.
    pub fn validate(&self) -> TracerResult<()> {
        if !self.grid.is_valid() {
            return Err(TracerError::config("grid must be finite and > 0"));
        }
        self.validator.validate()?;
        self.escalation.validate()
    }
}
