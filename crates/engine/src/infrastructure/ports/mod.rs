//! Port traits for infrastructure boundaries.
//!
//! Ports exist for:
//! - Text generation (Gemini today, any hosted model tomorrow)
//! - The results spreadsheet (Google Sheets)
//! - Clock (for testing)

mod error;
mod external;
mod testing;

pub use error::{LlmError, SheetError};
pub use external::{
    FinishReason, LlmPort, LlmRequest, LlmResponse, LlmTextStream, SpreadsheetPort,
};
pub use testing::ClockPort;

#[cfg(test)]
pub use external::{MockLlmPort, MockSpreadsheetPort};
