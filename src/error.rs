//! Error types for skygraph operations.

use thiserror::Error;

/// Result type alias for skygraph operations.
pub type Result<T> = std::result::Result<T, SkygraphError>;

/// Main error type for skygraph operations.
#[derive(Error, Debug)]
pub enum SkygraphError {
    /// HTTP transport errors from the XRPC client
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A feed or thread fetch failed at the service
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    /// The focused post has no resolvable thread
    #[error("Thread not found: {0}")]
    ThreadNotFound(String),

    /// Authentication or session errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Session state errors (missing, expired, unrefreshable)
    #[error("Session error: {0}")]
    Session(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SkygraphError {
    /// Creates a new fetch-failed error.
    pub fn fetch_failed<T: ToString>(msg: T) -> Self {
        Self::FetchFailed(msg.to_string())
    }

    /// Creates a new thread-not-found error.
    pub fn thread_not_found<T: ToString>(msg: T) -> Self {
        Self::ThreadNotFound(msg.to_string())
    }

    /// Creates a new authentication error.
    pub fn auth<T: ToString>(msg: T) -> Self {
        Self::Auth(msg.to_string())
    }

    /// Creates a new session error.
    pub fn session<T: ToString>(msg: T) -> Self {
        Self::Session(msg.to_string())
    }

    /// Creates a new serialization error.
    pub fn serialization<T: ToString>(msg: T) -> Self {
        Self::Serialization(msg.to_string())
    }

    /// Creates a new invalid input error.
    pub fn invalid_input<T: ToString>(msg: T) -> Self {
        Self::InvalidInput(msg.to_string())
    }

    /// Returns true if this error indicates the requested thread was missing.
    pub fn is_thread_not_found(&self) -> bool {
        matches!(self, Self::ThreadNotFound(_))
    }
}
