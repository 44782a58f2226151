/// Convenience result type used across promoreel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid caller input: empty image list, unreadable source files, bad configuration.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unreadable or zero-duration media (base clip, voiceover, music).
    #[error("media decode error: {0}")]
    MediaDecode(String),

    /// Filesystem write or encoder failure.
    #[error("io error: {0}")]
    Io(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`ReelError::MediaDecode`] value.
    pub fn media_decode(msg: impl Into<String>) -> Self {
        Self::MediaDecode(msg.into())
    }

    /// Build a [`ReelError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
