/// Result alias that carries the crate [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the trainer core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A session, player or config value that can not be worked with.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Persisted session history that is not a list of session records.
    #[error("corrupt data: {0}")]
    CorruptData(String),
    /// No output device or stream could be opened.
    #[error("audio unavailable: {0}")]
    AudioUnavailable(String),
    /// The session already reached its terminal state.
    #[error("session already completed")]
    SessionCompleted,
    #[error("character `{0}` is not part of this session")]
    UnknownCharacter(char),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid<T: Into<String>>(msg: T) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn corrupt<T: Into<String>>(msg: T) -> Self {
        Self::CorruptData(msg.into())
    }

    pub fn audio<T: std::fmt::Display>(err: T) -> Self {
        Self::AudioUnavailable(err.to_string())
    }
}
