use std::collections::BTreeSet;

use mindgrowth_domain::{Scenario, UserAnswer};
use serde::Serialize;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    LoadingScenarios,
    Welcome,
    Playing,
    GeneratingReport,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStep {
    ChoosingEmotions,
    ChoosingResponse,
    WritingResponse,
}

/// Feedback waiting for the player to acknowledge it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub message: String,
    /// Positive styling; false only for a response marked incorrect
    pub positive: bool,
}

impl Feedback {
    pub fn positive(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            positive: true,
        }
    }
}

/// Everything a front end needs to render the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: GamePhase,
    pub scenarios: Vec<Scenario>,
    pub scenario_index: usize,
    pub step: ScenarioStep,
    pub selected_emotion_ids: Vec<String>,
    pub selected_response_id: Option<String>,
    pub draft: String,
    pub feedback: Option<Feedback>,
    pub is_submitting: bool,
    pub answers: Vec<UserAnswer>,
    pub advisory: Option<String>,
    pub report: Option<String>,
    pub report_failed: bool,
}

pub(super) struct SessionState {
    /// Bumped on restart; results from an older epoch are dropped
    pub epoch: u64,
    pub phase: GamePhase,
    pub scenarios: Vec<Scenario>,
    pub scenario_index: usize,
    pub step: ScenarioStep,
    pub selected_emotions: BTreeSet<String>,
    pub selected_response: Option<String>,
    pub draft: String,
    pub feedback: Option<Feedback>,
    pub submitting: bool,
    /// The current scenario's answer has been appended
    pub answered: bool,
    pub answers: Vec<UserAnswer>,
    pub advisory: Option<String>,
    pub report: Option<String>,
    pub report_failed: bool,
    /// Save attempts not yet awaited, across restarts
    pub persistence: Vec<JoinHandle<()>>,
}

impl SessionState {
    pub fn new(epoch: u64) -> Self {
        Self {
            epoch,
            phase: GamePhase::LoadingScenarios,
            scenarios: Vec::new(),
            scenario_index: 0,
            step: ScenarioStep::ChoosingEmotions,
            selected_emotions: BTreeSet::new(),
            selected_response: None,
            draft: String::new(),
            feedback: None,
            submitting: false,
            answered: false,
            answers: Vec::new(),
            advisory: None,
            report: None,
            report_failed: false,
            persistence: Vec::new(),
        }
    }

    pub fn reset_scenario(&mut self) {
        self.step = ScenarioStep::ChoosingEmotions;
        self.selected_emotions.clear();
        self.selected_response = None;
        self.draft.clear();
        self.feedback = None;
        self.submitting = false;
        self.answered = false;
        self.advisory = None;
    }

    pub fn current_scenario(&self) -> Option<&Scenario> {
        self.scenarios.get(self.scenario_index)
    }

    /// Scenarios this play-through will actually visit.
    pub fn total_scenarios(&self) -> usize {
        self.scenarios.len().min(mindgrowth_domain::TOTAL_SCENARIOS)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            scenarios: self.scenarios.clone(),
            scenario_index: self.scenario_index,
            step: self.step,
            selected_emotion_ids: self.selected_emotions.iter().cloned().collect(),
            selected_response_id: self.selected_response.clone(),
            draft: self.draft.clone(),
            feedback: self.feedback.clone(),
            is_submitting: self.submitting,
            answers: self.answers.clone(),
            advisory: self.advisory.clone(),
            report: self.report.clone(),
            report_failed: self.report_failed,
        }
    }
}
