/// Convenience result type used across hanzi-tracer.
pub type TracerResult<T> = Result<T, TracerError>;

/// Top-level error taxonomy for the data-loading and rendering surface.
///
/// The practice core itself never fails: rejections, missing glyphs and oracle failures are
/// ordinary outcomes. Errors only arise while loading glyph data, options or scripts, and
/// while rasterizing snapshots.
#[derive(thiserror::Error, Debug)]
pub enum TracerError {
    /// Invalid caller-provided data (points, sizes, scripts).
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed or inconsistent character glyph data.
    #[error("glyph error: {0}")]
    Glyph(String),

    /// Out-of-range or unreadable configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TracerError {
    /// Build a [`TracerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TracerError::Glyph`] value.
    pub fn glyph(msg: impl Into<String>) -> Self {
        Self::Glyph(msg.into())
    }

    /// Build a [`TracerError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`TracerError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
