//! MindGrowth Domain - core types for the social-conflict scenario game.
//!
//! Pure data and rules, no I/O:
//!
//! - `scenario` - scenarios with their emotion and response options
//! - `answer` - the per-scenario record a play-through accumulates
//! - `catalog` - hand-authored scenarios used when generation fails
//! - `report` - splits a generated report into titled sections
//! - `sheet_row` - fixed-width row layout for the spreadsheet collaborator

pub mod answer;
pub mod catalog;
pub mod error;
pub mod report;
pub mod scenario;
pub mod sheet_row;

pub use answer::UserAnswer;
pub use catalog::{fallback_scenarios, FALLBACK_CATALOG_SIZE};
pub use error::DomainError;
pub use report::{ReportBlock, ReportSectionKind, ReportSections};
pub use scenario::{
    EmotionOption, ResponseOption, Scenario, EMOTIONS_PER_SCENARIO, RESPONSES_PER_SCENARIO,
};
pub use sheet_row::{build_sheet_row, SHEET_ROW_COLUMNS, SHEET_SCENARIO_SLOTS};

/// Number of scenarios in one play-through.
pub const TOTAL_SCENARIOS: usize = 3;
