pub mod content;
pub mod persistence;
pub mod session;

pub use content::{ContentGateway, ContentOrigin, Generated, GenerationError};
pub use persistence::PersistenceForwarder;
pub use session::{
    AdvanceOutcome, Feedback, GamePhase, ScenarioStep, SessionController, SessionError,
    SessionSnapshot,
};
