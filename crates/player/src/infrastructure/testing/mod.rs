//! Hand-written fakes for the outbound ports.
//!
//! Used where call order or in-flight timing matters; plain expectations use
//! the mockall mocks from `ports::outbound`.

use async_trait::async_trait;
use mindgrowth_domain::{fallback_scenarios, TOTAL_SCENARIOS};
use mindgrowth_shared::{GenerateRequest, GenerationIntent, SaveRequest};
use tokio::sync::{Mutex, Notify, Semaphore};

use crate::ports::outbound::{ApiError, GenerationPort, PersistencePort};

pub const SAMPLE_FEEDBACK: &str = "솔직하게 마음을 말해 줘서 멋져요.";

pub const SAMPLE_REPORT: &str = "# 마음 성장 리포트 쑥쑥 🌱\n\
## 감정 탐험하기 🎨\n여러 감정을 잘 알아차렸어요.\n\
## 생각과 행동의 힘 💪\n친구에게 먼저 다가갔어요.\n\
## 성장을 위한 제안 ✨\n다음에는 이렇게 해보면 어떨까요?";

/// Replies per intent, with an optional gate that holds one intent's calls
/// until the test releases them.
pub struct ScriptedGeneration {
    scenarios: Result<String, ApiError>,
    feedback: Result<String, ApiError>,
    report: Result<String, ApiError>,
    gated: Option<GenerationIntent>,
    gate: Semaphore,
    requests: Mutex<Vec<GenerateRequest>>,
    arrived: Notify,
}

impl ScriptedGeneration {
    /// Valid batch, sample feedback, sample report.
    pub fn new() -> Self {
        let batch = serde_json::to_string(&fallback_scenarios(TOTAL_SCENARIOS))
            .unwrap_or_else(|_| "[]".to_string());
        Self {
            scenarios: Ok(batch),
            feedback: Ok(SAMPLE_FEEDBACK.to_string()),
            report: Ok(SAMPLE_REPORT.to_string()),
            gated: None,
            gate: Semaphore::new(0),
            requests: Mutex::new(Vec::new()),
            arrived: Notify::new(),
        }
    }

    pub fn with_scenarios(mut self, reply: Result<String, ApiError>) -> Self {
        self.scenarios = reply;
        self
    }

    pub fn with_feedback(mut self, reply: Result<String, ApiError>) -> Self {
        self.feedback = reply;
        self
    }

    pub fn with_report(mut self, reply: Result<String, ApiError>) -> Self {
        self.report = reply;
        self
    }

    /// Hold calls for `intent` until [`release`](Self::release).
    pub fn gate(mut self, intent: GenerationIntent) -> Self {
        self.gated = Some(intent);
        self
    }

    pub fn release(&self, calls: usize) {
        self.gate.add_permits(calls);
    }

    pub async fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn count(&self, intent: GenerationIntent) -> usize {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|r| r.intent == intent)
            .count()
    }

    /// Resolves once `count` calls for `intent` have started.
    pub async fn wait_for(&self, intent: GenerationIntent, count: usize) {
        loop {
            let arrived = self.arrived.notified();
            if self.count(intent).await >= count {
                return;
            }
            arrived.await;
        }
    }

    async fn reply(&self, request: GenerateRequest) -> Result<String, ApiError> {
        let intent = request.intent;
        self.requests.lock().await.push(request);
        self.arrived.notify_waiters();

        if self.gated == Some(intent) {
            if let Ok(permit) = self.gate.acquire().await {
                permit.forget();
            }
        }

        match intent {
            GenerationIntent::GenerateScenarios => self.scenarios.clone(),
            GenerationIntent::ProvideFeedback => self.feedback.clone(),
            GenerationIntent::GenerateReport => self.report.clone(),
        }
    }
}

impl Default for ScriptedGeneration {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationPort for ScriptedGeneration {
    async fn generate(&self, request: GenerateRequest) -> Result<String, ApiError> {
        self.reply(request).await
    }

    async fn generate_streamed(&self, request: GenerateRequest) -> Result<String, ApiError> {
        self.reply(request).await
    }
}

/// Records every save attempt, optionally failing all of them. Held calls
/// wait for [`release`](Self::release) and are recorded once they finish.
pub struct RecordingPersistence {
    failure: Option<ApiError>,
    held: Mutex<usize>,
    gate: Semaphore,
    saved: Mutex<Vec<SaveRequest>>,
}

impl RecordingPersistence {
    pub fn new() -> Self {
        Self {
            failure: None,
            held: Mutex::new(0),
            gate: Semaphore::new(0),
            saved: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ApiError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new()
        }
    }

    /// Hold the next `calls` saves until released.
    pub fn holding(self, calls: usize) -> Self {
        Self {
            held: Mutex::new(calls),
            ..self
        }
    }

    pub fn release(&self, calls: usize) {
        self.gate.add_permits(calls);
    }

    pub async fn saved(&self) -> Vec<SaveRequest> {
        self.saved.lock().await.clone()
    }
}

impl Default for RecordingPersistence {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PersistencePort for RecordingPersistence {
    async fn save(&self, request: SaveRequest) -> Result<(), ApiError> {
        let hold = {
            let mut held = self.held.lock().await;
            let hold = *held > 0;
            *held = held.saturating_sub(1);
            hold
        };
        if hold {
            if let Ok(permit) = self.gate.acquire().await {
                permit.forget();
            }
        }

        self.saved.lock().await.push(request);
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}
