/// Convenience result type used across wheelspin.
pub type WheelResult<T> = Result<T, WheelError>;

/// Top-level error taxonomy surfaced to callers of a render job.
#[derive(thiserror::Error, Debug)]
pub enum WheelError {
    /// Participant list, animation spec, or style values that cannot produce a wheel.
    ///
    /// Always raised before any frame is rendered.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A per-frame compositing step failed (font load, raster buffer mismatch, worker pool).
    #[error("render failure: {0}")]
    RenderFailure(String),

    /// Encoding or writing the output artifact failed.
    #[error("export failure: {0}")]
    ExportFailure(String),

    /// The job was cancelled before the artifact was written.
    #[error("render job cancelled")]
    Cancelled,

    /// Errors when serializing or deserializing job files.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WheelError {
    /// Build a [`WheelError::InvalidConfiguration`] value.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Build a [`WheelError::RenderFailure`] value.
    pub fn render_failure(msg: impl Into<String>) -> Self {
        Self::RenderFailure(msg.into())
    }

    /// Build a [`WheelError::ExportFailure`] value.
    pub fn export_failure(msg: impl Into<String>) -> Self {
        Self::ExportFailure(msg.into())
    }

    /// Build a [`WheelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
