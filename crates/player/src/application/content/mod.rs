//! Content Generation Gateway.
//!
//! Turns the three generation intents into engine calls and normalizes what
//! comes back. Nothing here fails outward: every intent has a deterministic
//! substitute, and the result says which one the caller got.

pub mod prompts;
pub mod text;

use std::sync::Arc;

use mindgrowth_domain::{fallback_scenarios, DomainError, Scenario, UserAnswer};
use mindgrowth_shared::{GenerateRequest, GenerationIntent};
use serde_json::Value;

use crate::ports::outbound::{ApiError, GenerationPort};

use self::text::{strip_code_fence, strip_markdown_emphasis};

pub const FEEDBACK_APOLOGY: &str = "피드백을 생성하는 중 오류가 발생했어요. 다시 시도해 주세요.";
pub const REPORT_APOLOGY: &str = "리포트를 생성하는 중 오류가 발생했어요. 다시 시도해 주세요.";

/// Where a piece of content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOrigin {
    Generated,
    Fallback,
}

/// Content plus its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated<T> {
    pub value: T,
    pub origin: ContentOrigin,
}

impl<T> Generated<T> {
    fn generated(value: T) -> Self {
        Self {
            value,
            origin: ContentOrigin::Generated,
        }
    }

    fn fallback(value: T) -> Self {
        Self {
            value,
            origin: ContentOrigin::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == ContentOrigin::Fallback
    }
}

/// Why generated content was rejected. Logged, never returned to callers.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Generated content is not valid JSON: {0}")]
    Parse(String),
    #[error("Generated content is not an array")]
    NotAnArray,
    #[error("Generated batch is empty")]
    EmptyBatch,
    #[error("Generated batch has {actual} scenarios, expected {expected}")]
    TooFew { expected: usize, actual: usize },
    #[error("Generated scenario is invalid: {0}")]
    Invalid(#[from] DomainError),
    #[error("Generated text is empty")]
    EmptyText,
}

pub struct ContentGateway {
    generation: Arc<dyn GenerationPort>,
    model: String,
}

impl ContentGateway {
    pub fn new(generation: Arc<dyn GenerationPort>) -> Self {
        Self {
            generation,
            model: prompts::DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Exactly `count` scenarios: all generated and valid, or all fallback.
    pub async fn generate_scenarios(&self, count: usize) -> Generated<Vec<Scenario>> {
        if count == 0 {
            return Generated::generated(Vec::new());
        }

        match self.try_generate_scenarios(count).await {
            Ok(scenarios) => Generated::generated(scenarios),
            Err(e) => {
                tracing::warn!(error = %e, count, "Scenario generation failed, using fallback");
                Generated::fallback(fallback_scenarios(count))
            }
        }
    }

    /// Coaching message for a written answer, without markdown emphasis.
    pub async fn provide_feedback_on_response(
        &self,
        scenario: &str,
        written_response: &str,
    ) -> Generated<String> {
        let request = GenerateRequest::new(
            GenerationIntent::ProvideFeedback,
            &self.model,
            prompts::feedback_prompt(scenario, written_response),
        )
        .with_temperature(prompts::FEEDBACK_TEMPERATURE);

        let result = self
            .generation
            .generate(request)
            .await
            .map_err(GenerationError::from)
            .and_then(|text| non_empty(strip_markdown_emphasis(&text)));

        match result {
            Ok(feedback) => Generated::generated(feedback),
            Err(e) => {
                tracing::warn!(error = %e, "Feedback generation failed");
                Generated::fallback(FEEDBACK_APOLOGY.to_string())
            }
        }
    }

    /// Markdown report over all answers, streamed and concatenated.
    pub async fn generate_mind_growth_report(&self, answers: &[UserAnswer]) -> Generated<String> {
        let request = GenerateRequest::new(
            GenerationIntent::GenerateReport,
            &self.model,
            prompts::report_prompt(answers),
        )
        .with_temperature(prompts::REPORT_TEMPERATURE);

        let result = self
            .generation
            .generate_streamed(request)
            .await
            .map_err(GenerationError::from)
            .and_then(non_empty);

        match result {
            Ok(report) => Generated::generated(report),
            Err(e) => {
                tracing::warn!(error = %e, answers = answers.len(), "Report generation failed");
                Generated::fallback(REPORT_APOLOGY.to_string())
            }
        }
    }

    async fn try_generate_scenarios(&self, count: usize) -> Result<Vec<Scenario>, GenerationError> {
        let request = GenerateRequest::new(
            GenerationIntent::GenerateScenarios,
            &self.model,
            prompts::scenarios_prompt(count),
        )
        .with_json_schema(prompts::scenario_batch_schema())
        .with_temperature(prompts::SCENARIO_TEMPERATURE);

        let raw = self.generation.generate(request).await?;
        parse_scenario_batch(&raw, count)
    }
}

/// Parse a generated batch. Extra scenarios are dropped; too few, or any
/// invalid one, rejects the whole batch.
pub fn parse_scenario_batch(raw: &str, count: usize) -> Result<Vec<Scenario>, GenerationError> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| GenerationError::Parse(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(GenerationError::NotAnArray);
    };
    if items.is_empty() {
        return Err(GenerationError::EmptyBatch);
    }
    if items.len() < count {
        return Err(GenerationError::TooFew {
            expected: count,
            actual: items.len(),
        });
    }

    let scenarios = items
        .into_iter()
        .take(count)
        .map(serde_json::from_value::<Scenario>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| GenerationError::Parse(e.to_string()))?;

    for scenario in &scenarios {
        scenario.validate()?;
    }
    Ok(scenarios)
}

fn non_empty(text: String) -> Result<String, GenerationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::EmptyText);
    }
    Ok(trimmed.to_string())
}
