//! Persistence Forwarder - best-effort recording of a finished play-through.

use std::sync::Arc;

use mindgrowth_domain::UserAnswer;
use mindgrowth_shared::SaveRequest;
use tokio::task::JoinHandle;

use crate::ports::outbound::PersistencePort;

#[derive(Clone)]
pub struct PersistenceForwarder {
    persistence: Arc<dyn PersistencePort>,
}

impl PersistenceForwarder {
    pub fn new(persistence: Arc<dyn PersistencePort>) -> Self {
        Self { persistence }
    }

    /// Fire-and-forget. Failures are logged and dropped; the handle only
    /// exists so tests and shutdown code can wait for the attempt.
    pub fn forward(&self, answers: Vec<UserAnswer>, report: String) -> JoinHandle<()> {
        let persistence = Arc::clone(&self.persistence);
        let request = SaveRequest {
            user_answers: answers,
            mind_growth_report: report,
        };

        tokio::spawn(async move {
            let answers = request.user_answers.len();
            match persistence.save(request).await {
                Ok(()) => tracing::info!(answers, "Play-through saved"),
                Err(e) => tracing::warn!(error = %e, answers, "Could not save play-through"),
            }
        })
    }
}
