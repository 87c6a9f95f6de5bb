//! Infrastructure layer - adapters for the engine HTTP endpoints.

pub mod http_client;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use http_client::{EngineHttpClient, DEFAULT_ENGINE_URL};
