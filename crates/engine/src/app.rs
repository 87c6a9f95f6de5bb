//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    clock::SystemClock,
    config::EngineConfig,
    gemini::GeminiClient,
    ports::{ClockPort, LlmPort, SpreadsheetPort},
    sheets::GoogleSheetsClient,
};
use crate::use_cases::{GenerateText, RecordSession};

/// Main application state.
///
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub generate: Arc<GenerateText>,
    pub record_session: Arc<RecordSession>,
}

impl App {
    /// Wire adapters for whatever is configured. Missing secrets leave the
    /// matching port empty so requests fail with a fixed configuration error.
    pub fn from_config(config: &EngineConfig) -> Self {
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());

        let llm: Option<Arc<dyn LlmPort>> = match &config.gemini_api_key {
            Some(key) => Some(Arc::new(GeminiClient::new(&config.gemini_base_url, key))),
            None => {
                tracing::warn!("API_KEY not set; generation requests will fail");
                None
            }
        };

        let sheets: Option<Arc<dyn SpreadsheetPort>> = match &config.sheets {
            Some(sheets) => Some(Arc::new(GoogleSheetsClient::new(
                sheets.clone(),
                clock.clone(),
            ))),
            None => {
                tracing::warn!("Spreadsheet secrets incomplete; save requests will fail");
                None
            }
        };

        Self::new(llm, sheets, clock)
    }

    pub fn new(
        llm: Option<Arc<dyn LlmPort>>,
        sheets: Option<Arc<dyn SpreadsheetPort>>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            use_cases: UseCases {
                generate: Arc::new(GenerateText::new(llm)),
                record_session: Arc::new(RecordSession::new(sheets, clock)),
            },
        }
    }
}
