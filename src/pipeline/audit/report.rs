use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::auditor::FilingOutcome;
use super::coverage::CoverageVector;
use super::quality::FilingQualityAlert;
use super::ranking::ReliabilityScore;

/// Issuer-level audit summary.
///
/// `report_id` is a v5 UUID over the issuer and the processed filings, so an
/// identical run always yields the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub report_id: Uuid,
    pub issuer: String,
    pub coverage_vector: CoverageVector,
    /// Target years never covered, ascending.
    pub gaps: Vec<i32>,
    pub total_rejections: usize,
    pub total_vetoes: usize,
    pub reliability_rankings: Vec<ReliabilityScore>,
    pub quality_alerts: Vec<FilingQualityAlert>,
    pub filings: Vec<FilingOutcome>,
}

impl AuditReport {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn is_fully_covered(&self) -> bool {
        self.gaps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_report(issuer: &str) -> AuditReport {
        AuditReport {
            report_id: Uuid::new_v5(&Uuid::NAMESPACE_OID, issuer.as_bytes()),
            issuer: issuer.into(),
            coverage_vector: CoverageVector::new([2022, 2023]),
            gaps: vec![2022, 2023],
            total_rejections: 0,
            total_vetoes: 0,
            reliability_rankings: Vec::new(),
            quality_alerts: Vec::new(),
            filings: Vec::new(),
        }
    }

    #[test]
    fn json_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&empty_report("ACME").to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["issuer"], "ACME");
        assert_eq!(json["coverage_vector"]["2022"], false);
        assert_eq!(json["gaps"], serde_json::json!([2022, 2023]));
        assert!(json["report_id"].is_string());
    }

    #[test]
    fn gaps_mean_not_fully_covered() {
        let mut report = empty_report("ACME");
        assert!(!report.is_fully_covered());
        report.gaps.clear();
        assert!(report.is_fully_covered());
    }
}
