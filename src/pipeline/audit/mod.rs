pub mod auditor;
pub mod coverage;
pub mod parsability;
pub mod quality;
pub mod ranking;
pub mod report;
pub mod telemetry;

pub use auditor::*;
pub use coverage::CoverageVector;
pub use parsability::*;
pub use quality::*;
pub use ranking::*;
pub use report::AuditReport;
pub use telemetry::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    #[error("No audited filing with id: {0}")]
    UnknownFiling(String),

    #[error("Shard target years {found:?} do not match auditor target years {expected:?}")]
    ShardMismatch { expected: Vec<i32>, found: Vec<i32> },
}

/// A whole filing refused at the filing boundary.
///
/// Recorded in telemetry and the filing outcome; never aborts the audit run.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "veto", rename_all = "snake_case")]
pub enum FilingVeto {
    #[error("Filing text is empty")]
    EmptyText,

    #[error("Filing text of {bytes} bytes exceeds the {max_bytes} byte processing budget")]
    BudgetExceeded { bytes: usize, max_bytes: usize },
}

impl FilingVeto {
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::EmptyText => "empty_input",
            Self::BudgetExceeded { .. } => "processing_budget_exceeded",
        }
    }
}
