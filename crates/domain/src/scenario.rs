//! Scenario entity and its option lists.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Emotion options a generated scenario must carry.
pub const EMOTIONS_PER_SCENARIO: usize = 4;

/// Response options a generated scenario must carry.
pub const RESPONSES_PER_SCENARIO: usize = 3;

/// One conflict situation with the options the player chooses from.
///
/// Immutable once created; the session controller only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Description of the situation
    pub scenario: String,
    /// Emotions the player may feel (multi-select, never graded)
    pub emotions: Vec<EmotionOption>,
    /// Possible reactions (single-select, graded)
    pub responses: Vec<ResponseOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionOption {
    pub id: String,
    pub text: String,
    pub emoji: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseOption {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
    pub feedback: String,
}

impl Scenario {
    pub fn emotion(&self, id: &str) -> Option<&EmotionOption> {
        self.emotions.iter().find(|e| e.id == id)
    }

    pub fn response(&self, id: &str) -> Option<&ResponseOption> {
        self.responses.iter().find(|r| r.id == id)
    }

    /// Texts of the emotions whose ids are in `selected`, in scenario order.
    pub fn emotion_texts<'a, I>(&self, selected: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let selected: HashSet<&str> = selected.into_iter().map(String::as_str).collect();
        self.emotions
            .iter()
            .filter(|e| selected.contains(e.id.as_str()))
            .map(|e| e.text.clone())
            .collect()
    }

    /// Checks the shape the generation collaborator is required to produce.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.scenario.trim().is_empty() {
            return Err(DomainError::validation("scenario text is empty"));
        }
        if self.emotions.len() != EMOTIONS_PER_SCENARIO {
            return Err(DomainError::validation(format!(
                "expected {} emotions, got {}",
                EMOTIONS_PER_SCENARIO,
                self.emotions.len()
            )));
        }
        if self.responses.len() != RESPONSES_PER_SCENARIO {
            return Err(DomainError::validation(format!(
                "expected {} responses, got {}",
                RESPONSES_PER_SCENARIO,
                self.responses.len()
            )));
        }

        let mut seen = HashSet::new();
        for emotion in &self.emotions {
            if !seen.insert(emotion.id.as_str()) {
                return Err(DomainError::duplicate_id("emotion", &emotion.id));
            }
        }

        seen.clear();
        for response in &self.responses {
            if !seen.insert(response.id.as_str()) {
                return Err(DomainError::duplicate_id("response", &response.id));
            }
        }

        Ok(())
    }
}
