use crate::assets::loader::FrameLoadFailure;

/// Convenience result type used across Embrace.
pub type EmbraceResult<T> = Result<T, EmbraceError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum EmbraceError {
    /// Invalid user-provided configuration or track data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A frame sequence exceeded its failure tolerance.
    #[error("load error: {0}")]
    Load(#[from] FrameLoadFailure),

    /// Reading or writing persisted progress failed.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EmbraceError {
    /// Build a [`EmbraceError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`EmbraceError::Persistence`] value.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Build a [`EmbraceError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
