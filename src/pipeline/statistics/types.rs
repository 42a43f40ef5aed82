use serde::{Deserialize, Serialize};

use crate::models::AuditStatus;

/// Pipeline phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelinePhase {
    Init,
    EntropyCheck,
    SchemaValidation,
    StatisticalAnalysis,
    Complete,
}

impl PipelinePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::EntropyCheck => "ENTROPY_CHECK",
            Self::SchemaValidation => "SCHEMA_VALIDATION",
            Self::StatisticalAnalysis => "STATISTICAL_ANALYSIS",
            Self::Complete => "COMPLETE",
        }
    }
}

/// A record excluded in permissive validation mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRejection {
    pub index: usize,
    pub reason: String,
}

/// Terminal result of one statistical audit run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditVerdict {
    pub status: AuditStatus,
    pub records_validated: usize,
    pub records_rejected: usize,
    pub risk_exposure: f64,
    pub outlier_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entropy_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub veto_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejections: Vec<RecordRejection>,
}

impl AuditVerdict {
    pub(crate) fn empty(status: AuditStatus) -> Self {
        Self {
            status,
            records_validated: 0,
            records_rejected: 0,
            risk_exposure: 0.0,
            outlier_count: 0,
            entropy_ratio: None,
            veto_reason: None,
            rejections: Vec::new(),
        }
    }

    /// Whether the batch passed every gate.
    pub fn is_complete(&self) -> bool {
        self.status == AuditStatus::Complete
    }
}
