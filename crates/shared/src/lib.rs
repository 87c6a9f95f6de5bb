//! MindGrowth Shared - wire types between the Engine (proxy service) and the Player.
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - only serde, serde_json and the domain vocabulary
//! 2. **No business logic** - pure data types and serialization
//! 3. **camelCase on the wire** - matches what the browser client always sent

pub mod requests;
pub mod responses;

pub use requests::{GenerateRequest, GenerationIntent, SaveRequest};
pub use responses::{ErrorBody, GenerateResponse, SaveResponse};

/// Path of the single-shot generation endpoint.
pub const GENERATE_PATH: &str = "/api/generate";

/// Path of the streaming generation endpoint.
pub const GENERATE_STREAM_PATH: &str = "/api/generate/stream";

/// Path of the persistence endpoint.
pub const SAVE_PATH: &str = "/api/save";
