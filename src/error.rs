//! Error types for the studio controller

use thiserror::Error;

/// Result type alias for studio operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the studio
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The prompt was empty or whitespace-only
    #[error("empty prompt")]
    EmptyPrompt,

    /// The backend answered with a non-success HTTP status
    #[error("Request failed with HTTP status {status}")]
    RequestFailed { status: u16 },

    /// The request never produced a response (connect, DNS, reset, ...)
    #[error("{0}")]
    Transport(String),

    /// Success status, but the body carried no usable `filename`
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Success status, but the backend reported its own failure in the body
    #[error("{0}")]
    Backend(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Failed to build the HTTP client
    #[error("Studio initialization failed: {0}")]
    InitializationError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error came from the network round trip rather than from
    /// local validation or setup.
    pub fn is_submission_failure(&self) -> bool {
        matches!(
            self,
            Error::RequestFailed { .. }
                | Error::Transport(_)
                | Error::MalformedResponse(_)
                | Error::Backend(_)
        )
    }
}
