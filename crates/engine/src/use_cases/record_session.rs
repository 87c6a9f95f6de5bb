//! Append a finished play-through to the results spreadsheet.

use std::sync::Arc;

use mindgrowth_domain::build_sheet_row;
use mindgrowth_shared::SaveRequest;

use crate::infrastructure::ports::{ClockPort, SheetError, SpreadsheetPort};

#[derive(Debug, thiserror::Error)]
pub enum RecordSessionError {
    /// One of the spreadsheet secrets was missing at startup.
    #[error("Spreadsheet is not configured")]
    NotConfigured,
    #[error(transparent)]
    Sheet(#[from] SheetError),
}

pub struct RecordSession {
    sheets: Option<Arc<dyn SpreadsheetPort>>,
    clock: Arc<dyn ClockPort>,
}

impl RecordSession {
    pub fn new(sheets: Option<Arc<dyn SpreadsheetPort>>, clock: Arc<dyn ClockPort>) -> Self {
        Self { sheets, clock }
    }

    pub async fn execute(&self, request: SaveRequest) -> Result<(), RecordSessionError> {
        let sheets = self
            .sheets
            .as_ref()
            .ok_or(RecordSessionError::NotConfigured)?;

        let row = build_sheet_row(
            self.clock.now(),
            &request.user_answers,
            &request.mind_growth_report,
        );
        sheets.append_row(row).await?;

        tracing::info!(
            answers = request.user_answers.len(),
            "Recorded play-through"
        );
        Ok(())
    }
}
