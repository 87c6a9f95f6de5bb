//! Error types for port operations.

#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Spreadsheet append errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SheetError {
    /// The service-account token exchange failed.
    #[error("Sheet authorization failed: {0}")]
    Authorization(String),
    #[error("Sheet request failed: {0}")]
    RequestFailed(String),
}
