//! Infrastructure layer - external dependencies.

pub mod clock;
pub mod config;
pub mod gemini;
pub mod ports;
pub mod sheets;
