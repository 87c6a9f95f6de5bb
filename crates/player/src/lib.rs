//! MindGrowth Player - the client side of a play-through.
//!
//! A front end drives [`SessionController`] and renders its
//! [`SessionSnapshot`]. Generated content comes from the engine through the
//! [`EngineHttpClient`] adapter; anything that fails to generate falls back
//! to prepared content so the session never stalls.

pub mod application;
pub mod infrastructure;
pub mod ports;

pub use application::{
    AdvanceOutcome, ContentGateway, ContentOrigin, Feedback, GamePhase, PersistenceForwarder,
    ScenarioStep, SessionController, SessionError, SessionSnapshot,
};
pub use infrastructure::{EngineHttpClient, DEFAULT_ENGINE_URL};

use std::sync::Arc;

/// Controller wired to an engine at `base_url`.
pub fn connect(base_url: &str) -> SessionController {
    let client = Arc::new(EngineHttpClient::new(base_url));
    SessionController::from_ports(client.clone(), client)
}
