use super::state::{GamePhase, ScenarioStep};

/// A rejected session action. State is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("action needs phase {expected:?}, session is in {actual:?}")]
    InvalidPhase {
        expected: GamePhase,
        actual: GamePhase,
    },
    #[error("action needs step {expected:?}, scenario is at {actual:?}")]
    InvalidStep {
        expected: ScenarioStep,
        actual: ScenarioStep,
    },
    #[error("no scenarios are loaded")]
    NoScenarios,
    #[error("select at least one emotion first")]
    NoEmotionSelected,
    #[error("emotions are already confirmed")]
    EmotionsConfirmed,
    #[error("there is no feedback to acknowledge")]
    NoFeedback,
    #[error("written answers advance with submit, not acknowledge")]
    AcknowledgeNotApplicable,
    #[error("written response is empty")]
    EmptyResponse,
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("this scenario is already answered")]
    AlreadyAnswered,
    #[error("submit a written response before moving on")]
    NotAnswered,
    /// The session was restarted while this action was waiting on the network.
    #[error("session was restarted; result discarded")]
    Superseded,
}
