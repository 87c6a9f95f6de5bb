//! Errors crossing the engine HTTP boundary.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Network failure before a response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),
    /// Non-success status; `message` is the engine's error body when present
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}
