//! Row layout appended to the results spreadsheet.
//!
//! `[timestamp, (scenario, emotions, response, written) x 3, report]`. The column
//! count never depends on how many scenarios were completed: missing slots are
//! padded with empty strings and answers past the last slot are dropped.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::answer::UserAnswer;

/// Scenario slots in a row.
pub const SHEET_SCENARIO_SLOTS: usize = 3;

const FIELDS_PER_SLOT: usize = 4;

/// Timestamp + slots + report.
pub const SHEET_ROW_COLUMNS: usize = 1 + SHEET_SCENARIO_SLOTS * FIELDS_PER_SLOT + 1;

pub fn build_sheet_row(
    recorded_at: DateTime<Utc>,
    answers: &[UserAnswer],
    report: &str,
) -> Vec<String> {
    let mut row = Vec::with_capacity(SHEET_ROW_COLUMNS);
    row.push(recorded_at.to_rfc3339_opts(SecondsFormat::Millis, true));

    for slot in 0..SHEET_SCENARIO_SLOTS {
        match answers.get(slot) {
            Some(answer) => {
                row.push(answer.scenario.clone());
                row.push(answer.selected_emotion_texts.join(", "));
                row.push(answer.selected_response_text.clone());
                row.push(answer.written_response.clone());
            }
            None => row.resize(row.len() + FIELDS_PER_SLOT, String::new()),
        }
    }

    row.push(report.to_string());
    row
}
