use std::sync::Arc;

use mindgrowth_domain::{Scenario, UserAnswer, TOTAL_SCENARIOS};
use tokio::sync::Mutex;

use super::error::SessionError;
use super::state::{Feedback, GamePhase, ScenarioStep, SessionSnapshot, SessionState};
use super::{EMOTION_CONFIRMATION, REPORT_FAILURE_ADVISORY, SCENARIO_FALLBACK_ADVISORY};
use crate::application::content::{ContentGateway, ContentOrigin};
use crate::application::persistence::PersistenceForwarder;
use crate::ports::outbound::{GenerationPort, PersistencePort};

/// Where `advance` left the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    NextScenario { scenario_index: usize },
    Finished,
}

/// Owns one play-through. All mutation goes through these operations and
/// one mutex; the lock is never held while a gateway call is pending.
pub struct SessionController {
    gateway: ContentGateway,
    persistence: PersistenceForwarder,
    state: Mutex<SessionState>,
}

impl SessionController {
    pub fn new(gateway: ContentGateway, persistence: PersistenceForwarder) -> Self {
        Self {
            gateway,
            persistence,
            state: Mutex::new(SessionState::new(0)),
        }
    }

    pub fn from_ports(
        generation: Arc<dyn GenerationPort>,
        persistence: Arc<dyn PersistencePort>,
    ) -> Self {
        Self::new(
            ContentGateway::new(generation),
            PersistenceForwarder::new(persistence),
        )
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().await.snapshot()
    }

    pub async fn current_scenario(&self) -> Option<Scenario> {
        self.state.lock().await.current_scenario().cloned()
    }

    /// Fetch the play-through's scenarios, falling back to the catalog.
    /// Ends in `Welcome` unless the session was restarted meanwhile.
    pub async fn load_scenarios(&self) -> Result<ContentOrigin, SessionError> {
        let epoch = {
            let mut state = self.state.lock().await;
            require_phase(&state, GamePhase::LoadingScenarios)?;
            state.advisory = None;
            state.epoch
        };

        let batch = self.gateway.generate_scenarios(TOTAL_SCENARIOS).await;

        let mut state = self.state.lock().await;
        if state.epoch != epoch || state.phase != GamePhase::LoadingScenarios {
            return Err(SessionError::Superseded);
        }
        let origin = batch.origin;
        state.scenarios = batch.value;
        if origin == ContentOrigin::Fallback {
            state.advisory = Some(SCENARIO_FALLBACK_ADVISORY.to_string());
        }
        state.phase = GamePhase::Welcome;
        tracing::debug!(?origin, scenarios = state.scenarios.len(), "Scenarios loaded");
        Ok(origin)
    }

    /// Leave the welcome screen and start the first scenario.
    pub async fn begin(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        require_phase(&state, GamePhase::Welcome)?;
        if state.scenarios.is_empty() {
            return Err(SessionError::NoScenarios);
        }
        state.phase = GamePhase::Playing;
        state.scenario_index = 0;
        Ok(())
    }

    /// Toggle an emotion. Returns whether it is now selected.
    pub async fn select_emotion(&self, emotion_id: &str) -> Result<bool, SessionError> {
        let mut state = self.state.lock().await;
        require_step(&state, ScenarioStep::ChoosingEmotions)?;
        if state.feedback.is_some() {
            return Err(SessionError::EmotionsConfirmed);
        }

        if state.selected_emotions.remove(emotion_id) {
            Ok(false)
        } else {
            state.selected_emotions.insert(emotion_id.to_string());
            Ok(true)
        }
    }

    pub async fn confirm_emotions(&self) -> Result<Feedback, SessionError> {
        let mut state = self.state.lock().await;
        require_step(&state, ScenarioStep::ChoosingEmotions)?;
        if state.feedback.is_some() {
            return Err(SessionError::EmotionsConfirmed);
        }
        if state.selected_emotions.is_empty() {
            return Err(SessionError::NoEmotionSelected);
        }

        let feedback = Feedback::positive(EMOTION_CONFIRMATION);
        state.feedback = Some(feedback.clone());
        Ok(feedback)
    }

    /// Select (or reselect) a response and surface its graded feedback.
    /// Unknown ids grade as incorrect with empty feedback.
    pub async fn select_response(&self, response_id: &str) -> Result<Feedback, SessionError> {
        let mut state = self.state.lock().await;
        require_step(&state, ScenarioStep::ChoosingResponse)?;

        let feedback = match state.current_scenario().and_then(|s| s.response(response_id)) {
            Some(response) => Feedback {
                message: response.feedback.clone(),
                positive: response.is_correct,
            },
            None => Feedback {
                message: String::new(),
                positive: false,
            },
        };

        state.selected_response = Some(response_id.to_string());
        state.feedback = Some(feedback.clone());
        Ok(feedback)
    }

    /// Dismiss surfaced feedback and move to the next step.
    pub async fn acknowledge_feedback(&self) -> Result<ScenarioStep, SessionError> {
        let mut state = self.state.lock().await;
        require_phase(&state, GamePhase::Playing)?;

        let next = match state.step {
            ScenarioStep::ChoosingEmotions => ScenarioStep::ChoosingResponse,
            ScenarioStep::ChoosingResponse => ScenarioStep::WritingResponse,
            ScenarioStep::WritingResponse => return Err(SessionError::AcknowledgeNotApplicable),
        };
        if state.feedback.take().is_none() {
            return Err(SessionError::NoFeedback);
        }

        state.step = next;
        Ok(next)
    }

    pub async fn set_draft(&self, text: &str) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        require_writable(&state)?;
        state.draft = text.to_string();
        Ok(())
    }

    /// Ask for feedback on the written answer, then append this scenario's
    /// answer. At most one append per scenario, even with concurrent calls.
    pub async fn submit_written_response(&self, text: &str) -> Result<Feedback, SessionError> {
        let (epoch, scenario_text) = {
            let mut state = self.state.lock().await;
            require_writable(&state)?;
            if text.trim().is_empty() {
                return Err(SessionError::EmptyResponse);
            }
            let scenario_text = state
                .current_scenario()
                .map(|s| s.scenario.clone())
                .ok_or(SessionError::NoScenarios)?;

            state.submitting = true;
            state.draft = text.to_string();
            state.feedback = None;
            (state.epoch, scenario_text)
        };

        let generated = self
            .gateway
            .provide_feedback_on_response(&scenario_text, text)
            .await;

        let mut state = self.state.lock().await;
        if state.epoch != epoch {
            return Err(SessionError::Superseded);
        }

        let answer = build_answer(&state, text);
        state.answers.push(answer);
        state.answered = true;
        state.submitting = false;

        // Written answers are always styled as encouragement
        let feedback = Feedback::positive(generated.value);
        state.feedback = Some(feedback.clone());
        tracing::debug!(
            scenario_index = state.scenario_index,
            answers = state.answers.len(),
            "Written response recorded"
        );
        Ok(feedback)
    }

    /// Move past an answered scenario. After the last one this generates the
    /// report, hands the session to persistence and finishes.
    pub async fn advance(&self) -> Result<AdvanceOutcome, SessionError> {
        let (epoch, answers) = {
            let mut state = self.state.lock().await;
            require_step(&state, ScenarioStep::WritingResponse)?;
            if !state.answered {
                return Err(SessionError::NotAnswered);
            }

            if state.scenario_index + 1 < state.total_scenarios() {
                state.reset_scenario();
                state.scenario_index += 1;
                return Ok(AdvanceOutcome::NextScenario {
                    scenario_index: state.scenario_index,
                });
            }

            state.feedback = None;
            state.phase = GamePhase::GeneratingReport;
            (state.epoch, state.answers.clone())
        };

        let report = self.gateway.generate_mind_growth_report(&answers).await;

        let mut state = self.state.lock().await;
        if state.epoch != epoch {
            return Err(SessionError::Superseded);
        }

        state.report_failed = report.is_fallback();
        if state.report_failed {
            state.advisory = Some(REPORT_FAILURE_ADVISORY.to_string());
        }
        let save = self.persistence.forward(answers, report.value.clone());
        state.persistence.retain(|handle| !handle.is_finished());
        state.persistence.push(save);
        state.report = Some(report.value);
        state.phase = GamePhase::Finished;

        tracing::info!(
            answers = state.answers.len(),
            report_failed = state.report_failed,
            "Play-through finished"
        );
        Ok(AdvanceOutcome::Finished)
    }

    /// Start over: fresh state, new epoch, new scenarios. Results of calls
    /// still in flight for the old play-through are discarded.
    pub async fn restart(&self) -> Result<ContentOrigin, SessionError> {
        {
            let mut state = self.state.lock().await;
            let epoch = state.epoch + 1;
            let persistence = std::mem::take(&mut state.persistence);
            *state = SessionState::new(epoch);
            state.persistence = persistence;
        }
        tracing::debug!("Session restarted");
        self.load_scenarios().await
    }

    /// Wait for every outstanding persistence attempt, including those of
    /// play-throughs abandoned by `restart`.
    pub async fn flush_persistence(&self) {
        let handles = std::mem::take(&mut self.state.lock().await.persistence);
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Persistence task did not complete");
            }
        }
    }
}

fn require_phase(state: &SessionState, expected: GamePhase) -> Result<(), SessionError> {
    if state.phase != expected {
        return Err(SessionError::InvalidPhase {
            expected,
            actual: state.phase,
        });
    }
    Ok(())
}

fn require_step(state: &SessionState, expected: ScenarioStep) -> Result<(), SessionError> {
    require_phase(state, GamePhase::Playing)?;
    if state.step != expected {
        return Err(SessionError::InvalidStep {
            expected,
            actual: state.step,
        });
    }
    Ok(())
}

fn require_writable(state: &SessionState) -> Result<(), SessionError> {
    require_step(state, ScenarioStep::WritingResponse)?;
    if state.answered {
        return Err(SessionError::AlreadyAnswered);
    }
    if state.submitting {
        return Err(SessionError::SubmissionInFlight);
    }
    Ok(())
}

fn build_answer(state: &SessionState, written: &str) -> UserAnswer {
    let Some(scenario) = state.current_scenario() else {
        return UserAnswer {
            written_response: written.to_string(),
            ..UserAnswer::default()
        };
    };

    UserAnswer {
        scenario: scenario.scenario.clone(),
        selected_emotion_texts: scenario.emotion_texts(&state.selected_emotions),
        selected_response_text: state
            .selected_response
            .as_deref()
            .and_then(|id| scenario.response(id))
            .map(|r| r.text.clone())
            .unwrap_or_default(),
        written_response: written.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::content::{FEEDBACK_APOLOGY, REPORT_APOLOGY};
    use crate::infrastructure::testing::{
        RecordingPersistence, ScriptedGeneration, SAMPLE_FEEDBACK, SAMPLE_REPORT,
    };
    use crate::ports::outbound::ApiError;
    use mindgrowth_domain::{fallback_scenarios, ReportSections};
    use mindgrowth_shared::GenerationIntent;
    use std::time::Duration;

    struct Harness {
        controller: Arc<SessionController>,
        generation: Arc<ScriptedGeneration>,
        persistence: Arc<RecordingPersistence>,
    }

    fn harness_with(generation: ScriptedGeneration, persistence: RecordingPersistence) -> Harness {
        let generation = Arc::new(generation);
        let persistence = Arc::new(persistence);
        let controller = Arc::new(SessionController::from_ports(
            generation.clone(),
            persistence.clone(),
        ));
        Harness {
            controller,
            generation,
            persistence,
        }
    }

    fn harness() -> Harness {
        harness_with(ScriptedGeneration::new(), RecordingPersistence::new())
    }

    async fn started(h: &Harness) {
        h.controller.load_scenarios().await.expect("loaded");
        h.controller.begin().await.expect("begun");
    }

    fn correct_response_id(scenario: &Scenario) -> String {
        scenario
            .responses
            .iter()
            .find(|r| r.is_correct)
            .map(|r| r.id.clone())
            .expect("scenario has a correct response")
    }

    /// Walk the current scenario up to the written-response step.
    async fn reach_writing(controller: &SessionController) -> Scenario {
        let scenario = controller.current_scenario().await.expect("scenario");
        controller
            .select_emotion(&scenario.emotions[0].id)
            .await
            .expect("emotion selected");
        controller.confirm_emotions().await.expect("confirmed");
        controller.acknowledge_feedback().await.expect("ack emotions");
        controller
            .select_response(&correct_response_id(&scenario))
            .await
            .expect("response selected");
        controller.acknowledge_feedback().await.expect("ack response");
        scenario
    }

    async fn answer_current(controller: &SessionController, text: &str) {
        reach_writing(controller).await;
        controller
            .submit_written_response(text)
            .await
            .expect("submitted");
    }

    #[tokio::test]
    async fn starts_loading_and_lands_on_welcome() {
        let h = harness();
        assert_eq!(h.controller.snapshot().await.phase, GamePhase::LoadingScenarios);

        let origin = h.controller.load_scenarios().await.expect("loaded");
        let snapshot = h.controller.snapshot().await;
        assert_eq!(origin, ContentOrigin::Generated);
        assert_eq!(snapshot.phase, GamePhase::Welcome);
        assert_eq!(snapshot.scenarios.len(), TOTAL_SCENARIOS);
        assert!(snapshot.advisory.is_none());
    }

    #[tokio::test]
    async fn invalid_scenario_json_uses_catalog_with_advisory() {
        let h = harness_with(
            ScriptedGeneration::new().with_scenarios(Ok("{ 이건 JSON이 아니에요".to_string())),
            RecordingPersistence::new(),
        );

        let origin = h.controller.load_scenarios().await.expect("loaded");
        let snapshot = h.controller.snapshot().await;
        assert_eq!(origin, ContentOrigin::Fallback);
        assert_eq!(snapshot.phase, GamePhase::Welcome);
        assert_eq!(snapshot.scenarios, fallback_scenarios(TOTAL_SCENARIOS));
        assert_eq!(snapshot.advisory.as_deref(), Some(SCENARIO_FALLBACK_ADVISORY));
    }

    #[tokio::test]
    async fn actions_before_begin_are_rejected() {
        let h = harness();
        h.controller.load_scenarios().await.expect("loaded");

        let result = h.controller.select_emotion("e1-1").await;
        assert_eq!(
            result,
            Err(SessionError::InvalidPhase {
                expected: GamePhase::Playing,
                actual: GamePhase::Welcome
            })
        );
    }

    #[tokio::test]
    async fn confirming_without_emotions_changes_nothing() {
        let h = harness();
        started(&h).await;
        let before = h.controller.snapshot().await;

        let result = h.controller.confirm_emotions().await;

        assert_eq!(result, Err(SessionError::NoEmotionSelected));
        assert_eq!(h.controller.snapshot().await, before);
    }

    #[tokio::test]
    async fn emotion_selection_toggles() {
        let h = harness();
        started(&h).await;
        let scenario = h.controller.current_scenario().await.expect("scenario");
        let id = &scenario.emotions[1].id;

        assert_eq!(h.controller.select_emotion(id).await, Ok(true));
        assert_eq!(h.controller.select_emotion(id).await, Ok(false));
        assert!(h.controller.snapshot().await.selected_emotion_ids.is_empty());
    }

    #[tokio::test]
    async fn confirmation_is_positive_and_locks_emotions() {
        let h = harness();
        started(&h).await;
        let scenario = h.controller.current_scenario().await.expect("scenario");
        h.controller
            .select_emotion(&scenario.emotions[0].id)
            .await
            .expect("selected");

        let feedback = h.controller.confirm_emotions().await.expect("confirmed");
        assert_eq!(feedback, Feedback::positive(EMOTION_CONFIRMATION));
        assert!(h.controller.snapshot().await.answers.is_empty());

        assert_eq!(
            h.controller.select_emotion(&scenario.emotions[1].id).await,
            Err(SessionError::EmotionsConfirmed)
        );
        assert_eq!(
            h.controller.acknowledge_feedback().await,
            Ok(ScenarioStep::ChoosingResponse)
        );
    }

    #[tokio::test]
    async fn reselecting_a_response_overwrites_grading() {
        let h = harness();
        started(&h).await;
        let scenario = h.controller.current_scenario().await.expect("scenario");
        h.controller
            .select_emotion(&scenario.emotions[0].id)
            .await
            .expect("selected");
        h.controller.confirm_emotions().await.expect("confirmed");
        h.controller.acknowledge_feedback().await.expect("ack");

        let wrong = scenario
            .responses
            .iter()
            .find(|r| !r.is_correct)
            .expect("incorrect response");
        let first = h.controller.select_response(&wrong.id).await.expect("selected");
        assert!(!first.positive);
        assert_eq!(first.message, wrong.feedback);

        let right = correct_response_id(&scenario);
        let second = h.controller.select_response(&right).await.expect("reselected");
        assert!(second.positive);

        let snapshot = h.controller.snapshot().await;
        assert_eq!(snapshot.selected_response_id.as_deref(), Some(right.as_str()));
        assert_eq!(snapshot.feedback, Some(second));
    }

    #[tokio::test]
    async fn unknown_response_grades_incorrect_with_empty_feedback() {
        let h = harness();
        started(&h).await;
        let scenario = h.controller.current_scenario().await.expect("scenario");
        h.controller
            .select_emotion(&scenario.emotions[0].id)
            .await
            .expect("selected");
        h.controller.confirm_emotions().await.expect("confirmed");
        h.controller.acknowledge_feedback().await.expect("ack");

        let feedback = h
            .controller
            .select_response("no-such-response")
            .await
            .expect("selected");
        assert_eq!(
            feedback,
            Feedback {
                message: String::new(),
                positive: false
            }
        );
    }

    #[tokio::test]
    async fn acknowledge_does_not_advance_written_step() {
        let h = harness();
        started(&h).await;
        reach_writing(&h.controller).await;

        assert_eq!(
            h.controller.acknowledge_feedback().await,
            Err(SessionError::AcknowledgeNotApplicable)
        );
        h.controller.submit_written_response("같이 놀자").await.expect("submitted");
        assert_eq!(
            h.controller.acknowledge_feedback().await,
            Err(SessionError::AcknowledgeNotApplicable)
        );
    }

    #[tokio::test]
    async fn blank_written_response_is_rejected() {
        let h = harness();
        started(&h).await;
        reach_writing(&h.controller).await;

        assert_eq!(
            h.controller.submit_written_response("  \n\t").await,
            Err(SessionError::EmptyResponse)
        );
        assert!(h.controller.snapshot().await.answers.is_empty());
        assert_eq!(h.generation.count(GenerationIntent::ProvideFeedback).await, 0);
    }

    #[tokio::test]
    async fn first_scenario_end_to_end() {
        let h = harness();
        started(&h).await;

        let scenario = reach_writing(&h.controller).await;
        h.controller.set_draft("같이").await.expect("draft");
        let feedback = h
            .controller
            .submit_written_response("나도 같이 이야기하고 싶어!")
            .await
            .expect("submitted");
        assert_eq!(feedback, Feedback::positive(SAMPLE_FEEDBACK));

        let correct = scenario
            .responses
            .iter()
            .find(|r| r.is_correct)
            .expect("correct response");
        let snapshot = h.controller.snapshot().await;
        assert_eq!(
            snapshot.answers,
            vec![UserAnswer {
                scenario: scenario.scenario.clone(),
                selected_emotion_texts: vec![scenario.emotions[0].text.clone()],
                selected_response_text: correct.text.clone(),
                written_response: "나도 같이 이야기하고 싶어!".to_string(),
            }]
        );

        assert_eq!(
            h.controller.advance().await,
            Ok(AdvanceOutcome::NextScenario { scenario_index: 1 })
        );
        let snapshot = h.controller.snapshot().await;
        assert_eq!(snapshot.step, ScenarioStep::ChoosingEmotions);
        assert_eq!(snapshot.scenario_index, 1);
        assert!(snapshot.selected_emotion_ids.is_empty());
        assert!(snapshot.selected_response_id.is_none());
        assert!(snapshot.draft.is_empty());
        assert!(snapshot.feedback.is_none());
    }

    #[tokio::test]
    async fn answer_count_tracks_scenario_index() {
        let h = harness();
        started(&h).await;

        for index in 0..TOTAL_SCENARIOS {
            answer_current(&h.controller, "고마워").await;
            let snapshot = h.controller.snapshot().await;
            assert_eq!(snapshot.scenario_index, index);
            assert_eq!(snapshot.answers.len(), index + 1);
            h.controller.advance().await.expect("advanced");
        }

        let snapshot = h.controller.snapshot().await;
        assert_eq!(snapshot.phase, GamePhase::Finished);
        assert_eq!(snapshot.answers.len(), TOTAL_SCENARIOS);
    }

    #[tokio::test]
    async fn emotions_are_recorded_in_scenario_order() {
        let h = harness();
        started(&h).await;
        let scenario = h.controller.current_scenario().await.expect("scenario");
        for emotion in scenario.emotions.iter().rev().take(2) {
            h.controller.select_emotion(&emotion.id).await.expect("selected");
        }
        h.controller.confirm_emotions().await.expect("confirmed");
        h.controller.acknowledge_feedback().await.expect("ack");
        h.controller
            .select_response(&scenario.responses[0].id)
            .await
            .expect("selected");
        h.controller.acknowledge_feedback().await.expect("ack");
        h.controller.submit_written_response("응").await.expect("submitted");

        let answers = h.controller.snapshot().await.answers;
        assert_eq!(
            answers[0].selected_emotion_texts,
            vec![scenario.emotions[2].text.clone(), scenario.emotions[3].text.clone()]
        );
    }

    #[tokio::test]
    async fn cannot_advance_before_answering() {
        let h = harness();
        started(&h).await;
        reach_writing(&h.controller).await;

        assert_eq!(h.controller.advance().await, Err(SessionError::NotAnswered));
    }

    #[tokio::test]
    async fn duplicate_submission_appends_once() {
        let h = harness_with(
            ScriptedGeneration::new().gate(GenerationIntent::ProvideFeedback),
            RecordingPersistence::new(),
        );
        started(&h).await;
        reach_writing(&h.controller).await;

        let controller = h.controller.clone();
        let first =
            tokio::spawn(async move { controller.submit_written_response("미안해").await });
        h.generation
            .wait_for(GenerationIntent::ProvideFeedback, 1)
            .await;

        assert!(h.controller.snapshot().await.is_submitting);
        assert_eq!(
            h.controller.submit_written_response("미안해").await,
            Err(SessionError::SubmissionInFlight)
        );
        assert_eq!(
            h.controller.set_draft("다른 말").await,
            Err(SessionError::SubmissionInFlight)
        );

        h.generation.release(1);
        first.await.expect("join").expect("first submission");

        assert_eq!(
            h.controller.submit_written_response("또").await,
            Err(SessionError::AlreadyAnswered)
        );
        let snapshot = h.controller.snapshot().await;
        assert_eq!(snapshot.answers.len(), 1);
        assert!(!snapshot.is_submitting);
        assert_eq!(h.generation.count(GenerationIntent::ProvideFeedback).await, 1);
    }

    #[tokio::test]
    async fn feedback_failure_still_records_answer() {
        let h = harness_with(
            ScriptedGeneration::new().with_feedback(Err(ApiError::RequestFailed("offline".into()))),
            RecordingPersistence::new(),
        );
        started(&h).await;
        reach_writing(&h.controller).await;

        let feedback = h
            .controller
            .submit_written_response("괜찮아")
            .await
            .expect("submitted");
        assert_eq!(feedback, Feedback::positive(FEEDBACK_APOLOGY));
        assert_eq!(h.controller.snapshot().await.answers.len(), 1);
    }

    #[tokio::test]
    async fn finishing_generates_report_after_last_answer_and_saves() {
        let h = harness();
        started(&h).await;
        for _ in 0..TOTAL_SCENARIOS {
            answer_current(&h.controller, "같이 하자").await;
            h.controller.advance().await.expect("advanced");
        }
        h.controller.flush_persistence().await;

        let snapshot = h.controller.snapshot().await;
        assert_eq!(snapshot.phase, GamePhase::Finished);
        assert_eq!(snapshot.report.as_deref(), Some(SAMPLE_REPORT));
        assert!(!snapshot.report_failed);
        assert_eq!(
            ReportSections::parse(snapshot.report.as_deref()).blocks().len(),
            3
        );

        let requests = h.generation.requests().await;
        let report_request = requests
            .iter()
            .find(|r| r.intent == GenerationIntent::GenerateReport)
            .expect("report requested");
        let last_answer = &snapshot.answers[TOTAL_SCENARIOS - 1];
        assert!(report_request.prompt.contains(&last_answer.written_response));
        assert_eq!(h.generation.count(GenerationIntent::GenerateReport).await, 1);

        let saved = h.persistence.saved().await;
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].user_answers, snapshot.answers);
        assert_eq!(saved[0].mind_growth_report, SAMPLE_REPORT);
    }

    #[tokio::test]
    async fn persistence_failure_does_not_affect_finish() {
        let h = harness_with(
            ScriptedGeneration::new(),
            RecordingPersistence::failing(ApiError::ServerError {
                status: 500,
                message: "Failed to save data due to a server error.".into(),
            }),
        );
        started(&h).await;
        for _ in 0..TOTAL_SCENARIOS {
            answer_current(&h.controller, "응원할게").await;
            h.controller.advance().await.expect("advanced");
        }
        h.controller.flush_persistence().await;

        let snapshot = h.controller.snapshot().await;
        assert_eq!(snapshot.phase, GamePhase::Finished);
        assert_eq!(snapshot.report.as_deref(), Some(SAMPLE_REPORT));
        assert!(snapshot.advisory.is_none());
        assert_eq!(h.persistence.saved().await.len(), 1);
    }

    #[tokio::test]
    async fn report_failure_finishes_with_error_flag() {
        let h = harness_with(
            ScriptedGeneration::new().with_report(Err(ApiError::ServerError {
                status: 500,
                message: "An error occurred processing your request.".into(),
            })),
            RecordingPersistence::new(),
        );
        started(&h).await;
        for _ in 0..TOTAL_SCENARIOS {
            answer_current(&h.controller, "좋아").await;
            h.controller.advance().await.expect("advanced");
        }

        let snapshot = h.controller.snapshot().await;
        assert_eq!(snapshot.phase, GamePhase::Finished);
        assert!(snapshot.report_failed);
        assert_eq!(snapshot.report.as_deref(), Some(REPORT_APOLOGY));
        assert_eq!(snapshot.advisory.as_deref(), Some(REPORT_FAILURE_ADVISORY));
    }

    #[tokio::test]
    async fn restart_resets_session() {
        let h = harness();
        started(&h).await;
        answer_current(&h.controller, "하나").await;
        h.controller.advance().await.expect("advanced");

        h.controller.restart().await.expect("restarted");

        let snapshot = h.controller.snapshot().await;
        assert_eq!(snapshot.phase, GamePhase::Welcome);
        assert_eq!(snapshot.scenario_index, 0);
        assert!(snapshot.answers.is_empty());
        assert!(snapshot.report.is_none());
        assert_eq!(h.generation.count(GenerationIntent::GenerateScenarios).await, 2);
    }

    #[tokio::test]
    async fn restart_discards_report_still_in_flight() {
        let h = harness_with(
            ScriptedGeneration::new().gate(GenerationIntent::GenerateReport),
            RecordingPersistence::new(),
        );
        started(&h).await;
        for _ in 0..TOTAL_SCENARIOS - 1 {
            answer_current(&h.controller, "응").await;
            h.controller.advance().await.expect("advanced");
        }
        answer_current(&h.controller, "마지막").await;

        let controller = h.controller.clone();
        let finishing = tokio::spawn(async move { controller.advance().await });
        h.generation
            .wait_for(GenerationIntent::GenerateReport, 1)
            .await;
        assert_eq!(
            h.controller.snapshot().await.phase,
            GamePhase::GeneratingReport
        );

        h.controller.restart().await.expect("restarted");
        h.generation.release(1);

        assert_eq!(
            finishing.await.expect("join"),
            Err(SessionError::Superseded)
        );
        let snapshot = h.controller.snapshot().await;
        assert_eq!(snapshot.phase, GamePhase::Welcome);
        assert!(snapshot.report.is_none());
        assert!(snapshot.answers.is_empty());

        h.controller.flush_persistence().await;
        assert!(h.persistence.saved().await.is_empty());
    }

    #[tokio::test]
    async fn restart_discards_feedback_still_in_flight() {
        let h = harness_with(
            ScriptedGeneration::new().gate(GenerationIntent::ProvideFeedback),
            RecordingPersistence::new(),
        );
        started(&h).await;
        reach_writing(&h.controller).await;

        let controller = h.controller.clone();
        let submitting =
            tokio::spawn(async move { controller.submit_written_response("늦은 답").await });
        h.generation
            .wait_for(GenerationIntent::ProvideFeedback, 1)
            .await;

        h.controller.restart().await.expect("restarted");
        h.generation.release(1);

        assert_eq!(
            submitting.await.expect("join"),
            Err(SessionError::Superseded)
        );
        assert!(h.controller.snapshot().await.answers.is_empty());
    }

    async fn play_to_finish(controller: &SessionController) {
        for _ in 0..TOTAL_SCENARIOS {
            answer_current(controller, "같이 하자").await;
            controller.advance().await.expect("advanced");
        }
    }

    #[tokio::test]
    async fn flush_waits_for_saves_from_abandoned_play_throughs() {
        let h = harness_with(
            ScriptedGeneration::new(),
            RecordingPersistence::new().holding(1),
        );
        started(&h).await;
        play_to_finish(&h.controller).await;

        h.controller.restart().await.expect("restarted");
        h.controller.begin().await.expect("begun");
        play_to_finish(&h.controller).await;

        let flush = h.controller.flush_persistence();
        tokio::pin!(flush);
        assert!(
            tokio::time::timeout(Duration::from_millis(50), &mut flush)
                .await
                .is_err(),
            "flush returned while the first save was still held"
        );

        h.persistence.release(1);
        flush.await;
        assert_eq!(h.persistence.saved().await.len(), 2);
    }
}
