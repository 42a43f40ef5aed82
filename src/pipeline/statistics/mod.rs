//! Fail-closed statistical audit over structured budget records.
//!
//! Independent of filing extraction: takes a JSON batch, returns a terminal
//! [`AuditVerdict`]. VETO and ABSTAIN are verdicts, not errors.

pub mod entropy;
pub mod loader;
pub mod orchestrator;
pub mod outliers;
pub mod schema;
pub mod types;

pub use entropy::*;
pub use loader::load_records;
pub use orchestrator::StatisticalAuditPipeline;
pub use outliers::*;
pub use schema::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatisticsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input must be a JSON array of records")]
    NotAnArray,

    #[error("Record at index {index} failed validation: {reason}")]
    Schema { index: usize, reason: String },
}
