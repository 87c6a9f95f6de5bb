//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing application services to interact with the engine without depending
//! on concrete implementations.

pub mod api_port;
pub mod generation_port;
pub mod persistence_port;

pub use api_port::ApiError;
pub use generation_port::GenerationPort;
pub use persistence_port::PersistencePort;

#[cfg(any(test, feature = "testing"))]
pub use generation_port::MockGenerationPort;
#[cfg(any(test, feature = "testing"))]
pub use persistence_port::MockPersistencePort;
