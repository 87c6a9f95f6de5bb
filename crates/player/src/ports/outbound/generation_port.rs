//! Generation Port - text generation through the engine.

use async_trait::async_trait;
use mindgrowth_shared::GenerateRequest;

use super::ApiError;

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait GenerationPort: Send + Sync {
    /// Single-shot generation; returns the generated text.
    async fn generate(&self, request: GenerateRequest) -> Result<String, ApiError>;

    /// Streamed generation; chunks are concatenated into the final text.
    async fn generate_streamed(&self, request: GenerateRequest) -> Result<String, ApiError>;
}
