//! External service port traits (text generation, spreadsheet).

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde_json::Value;

use super::error::{LlmError, SheetError};

// =============================================================================
// LLM Types
// =============================================================================

/// A single-prompt generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    pub model: String,
    pub prompt: String,
    /// Temperature for response generation (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Structured output schema
    pub response_schema: Option<Value>,
    pub response_mime_type: Option<String>,
}

impl LlmRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature: None,
            response_schema: None,
            response_mime_type: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_response_format(
        mut self,
        mime_type: Option<String>,
        schema: Option<Value>,
    ) -> Self {
        self.response_mime_type = mime_type;
        self.response_schema = schema;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    pub content: String,
    pub finish_reason: FinishReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    Unknown,
}

/// Text chunks in arrival order.
pub type LlmTextStream = BoxStream<'static, Result<String, LlmError>>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmPort: Send + Sync {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Start a streamed generation. Errors before the first chunk are returned
    /// directly; later ones arrive inside the stream.
    async fn generate_stream(&self, request: LlmRequest) -> Result<LlmTextStream, LlmError>;
}

// =============================================================================
// Spreadsheet
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpreadsheetPort: Send + Sync {
    /// Append one row after the last filled row of the configured sheet.
    async fn append_row(&self, row: Vec<String>) -> Result<(), SheetError>;
}
