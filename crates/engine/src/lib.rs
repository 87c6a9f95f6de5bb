//! MindGrowth Engine library.
//!
//! The server side of the game: a small axum service that keeps the model key
//! and spreadsheet credentials away from the client.
//!
//! ## Structure
//!
//! - `use_cases/` - generation and session recording
//! - `infrastructure/` - external dependency implementations (ports + adapters)
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
