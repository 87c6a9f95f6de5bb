//! Forward a generation request to the text model.

use std::sync::Arc;

use mindgrowth_shared::GenerateRequest;

use crate::infrastructure::ports::{LlmError, LlmPort, LlmRequest, LlmTextStream};

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// No API key was configured at startup.
    #[error("Text model is not configured")]
    NotConfigured,
    #[error("Prompt cannot be empty")]
    EmptyPrompt,
    #[error("Model identifier cannot be empty")]
    EmptyModel,
    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Single-shot and streamed generation.
pub struct GenerateText {
    llm: Option<Arc<dyn LlmPort>>,
}

impl GenerateText {
    pub fn new(llm: Option<Arc<dyn LlmPort>>) -> Self {
        Self { llm }
    }

    pub async fn execute(&self, request: GenerateRequest) -> Result<String, GenerationError> {
        let llm = self.llm()?;
        let intent = request.intent;
        let llm_request = to_llm_request(request)?;

        tracing::debug!(?intent, model = %llm_request.model, "Generating text");
        let response = llm.generate(llm_request).await?;
        tracing::debug!(
            ?intent,
            finish_reason = ?response.finish_reason,
            chars = response.content.chars().count(),
            "Generation finished"
        );

        Ok(response.content)
    }

    pub async fn stream(&self, request: GenerateRequest) -> Result<LlmTextStream, GenerationError> {
        let llm = self.llm()?;
        let intent = request.intent;
        let llm_request = to_llm_request(request)?;

        tracing::debug!(?intent, model = %llm_request.model, "Streaming text");
        Ok(llm.generate_stream(llm_request).await?)
    }

    fn llm(&self) -> Result<&Arc<dyn LlmPort>, GenerationError> {
        self.llm.as_ref().ok_or(GenerationError::NotConfigured)
    }
}

fn to_llm_request(request: GenerateRequest) -> Result<LlmRequest, GenerationError> {
    if request.prompt.trim().is_empty() {
        return Err(GenerationError::EmptyPrompt);
    }
    if request.model.trim().is_empty() {
        return Err(GenerationError::EmptyModel);
    }

    Ok(LlmRequest::new(request.model, request.prompt)
        .with_temperature(request.temperature)
        .with_response_format(request.response_mime_type, request.response_schema))
}
