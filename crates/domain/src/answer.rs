use serde::{Deserialize, Serialize};

/// What the player did in one completed scenario.
///
/// Appended once per scenario when the written response is submitted and never
/// changed afterwards. The ordered list of these is the only input to report
/// generation and persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnswer {
    pub scenario: String,
    pub selected_emotion_texts: Vec<String>,
    /// Empty when no response was ever selected
    pub selected_response_text: String,
    pub written_response: String,
}
