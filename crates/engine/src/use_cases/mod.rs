//! Use cases - request orchestration over the ports.

pub mod generation;
pub mod record_session;

pub use generation::{GenerateText, GenerationError};
pub use record_session::{RecordSession, RecordSessionError};
