//! Session Controller - one play-through as an explicit state machine.
//!
//! ```text
//! LoadingScenarios -> Welcome -> Playing { ChoosingEmotions -> ChoosingResponse
//!                                          -> WritingResponse -> (next | report) }
//!                  -> GeneratingReport -> Finished
//! ```

mod controller;
mod error;
mod state;

pub use controller::{AdvanceOutcome, SessionController};
pub use error::SessionError;
pub use state::{Feedback, GamePhase, ScenarioStep, SessionSnapshot};

/// Shown after the player confirms their emotions.
pub const EMOTION_CONFIRMATION: &str = "그런 감정들을 느낄 수 있구나. 네 마음을 알려줘서 고마워!";

/// Shown when the play-through starts with the hand-authored scenarios.
pub const SCENARIO_FALLBACK_ADVISORY: &str =
    "새로운 이야기들을 만드는데 실패해서, 준비된 이야기들로 시작할게요!";

/// Shown next to the apology text when the report could not be generated.
pub const REPORT_FAILURE_ADVISORY: &str = "리포트를 생성하는 데 문제가 발생했어요.";
