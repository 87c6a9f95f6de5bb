use serde::{Deserialize, Serialize};

use mindgrowth_domain::UserAnswer;

/// What a generation call is for. Only used for logging on the engine side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationIntent {
    GenerateScenarios,
    ProvideFeedback,
    GenerateReport,
}

/// Body of `POST /api/generate` and `POST /api/generate/stream`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub intent: GenerationIntent,
    pub model: String,
    pub prompt: String,
    /// Structured output schema the model must follow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    /// e.g. `application/json` when a schema is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl GenerateRequest {
    pub fn new(
        intent: GenerationIntent,
        model: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            intent,
            model: model.into(),
            prompt: prompt.into(),
            response_schema: None,
            response_mime_type: None,
            temperature: None,
        }
    }

    /// Request JSON output matching `schema`.
    pub fn with_json_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self.response_mime_type = Some("application/json".to_string());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Body of `POST /api/save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub user_answers: Vec<UserAnswer>,
    pub mind_growth_report: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_omits_unset_options() {
        let request = GenerateRequest::new(GenerationIntent::ProvideFeedback, "m", "p");
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["intent"], "provide_feedback");
        assert!(value.get("responseSchema").is_none());
        assert!(value.get("temperature").is_none());
    }

    #[test]
    fn json_schema_sets_mime_type() {
        let request = GenerateRequest::new(GenerationIntent::GenerateScenarios, "m", "p")
            .with_json_schema(serde_json::json!({"type": "ARRAY"}))
            .with_temperature(1.0);
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["responseMimeType"], "application/json");
        assert_eq!(value["responseSchema"]["type"], "ARRAY");
        assert_eq!(value["temperature"], 1.0);
    }

    #[test]
    fn save_request_uses_client_field_names() {
        let json = r#"{"userAnswers": [], "mindGrowthReport": "r"}"#;
        let request: SaveRequest = serde_json::from_str(json).expect("deserialize");
        assert!(request.user_answers.is_empty());
        assert_eq!(request.mind_growth_report, "r");
    }
}
