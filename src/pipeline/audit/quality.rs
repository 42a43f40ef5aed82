use serde::{Deserialize, Serialize};

use super::telemetry::Telemetry;
use super::AuditError;
use crate::config::QualityConfig;
use crate::models::QualityStatus;

/// Per-filing rejection-rate verdict. Derived from telemetry; recomputable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingQualityAlert {
    pub filing_id: String,
    pub filing_type: String,
    pub rejection_rate: f64,
    pub threshold_applied: f64,
    pub status: QualityStatus,
}

/// Compare a filing's rejection rate against its type threshold.
///
/// `rate = rejections / total_matches`, 0 when nothing matched. Strictly
/// above the threshold sidelines the filing.
pub fn evaluate_quality(
    telemetry: &Telemetry,
    filing_id: &str,
    config: &QualityConfig,
) -> Result<FilingQualityAlert, AuditError> {
    let stats = telemetry
        .filing_stats(filing_id)
        .ok_or_else(|| AuditError::UnknownFiling(filing_id.to_string()))?;

    let rejection_rate = if stats.total_matches == 0 {
        0.0
    } else {
        stats.rejections as f64 / stats.total_matches as f64
    };
    let threshold_applied = config.threshold_for(&stats.filing_type);
    let status = if rejection_rate > threshold_applied {
        QualityStatus::SidelineForReview
    } else {
        QualityStatus::ReadyForProcessing
    };

    Ok(FilingQualityAlert {
        filing_id: filing_id.to_string(),
        filing_type: stats.filing_type.clone(),
        rejection_rate,
        threshold_applied,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnchorKind, RejectionContext, RejectionReason};
    use crate::pipeline::audit::telemetry::{AnchorValue, RejectionRecord};

    fn telemetry_with(filing_type: &str, matches: u64, rejections: usize) -> Telemetry {
        let mut telemetry = Telemetry::new();
        telemetry.record_matches("f1", filing_type, matches);
        for i in 0..rejections {
            telemetry.log_rejection(RejectionRecord {
                anchor_kind: AnchorKind::Currency,
                value: AnchorValue::Amount(1e9 + i as f64),
                filing_id: "f1".into(),
                filing_type: filing_type.into(),
                context: RejectionContext::FinancialOutlier,
                reason: RejectionReason::ExceedsDynamicCap,
                snippet: String::new(),
            });
        }
        telemetry
    }

    fn config_with(filing_type: &str, threshold: f64) -> QualityConfig {
        let mut config = QualityConfig::default();
        config.thresholds.insert(filing_type.into(), threshold);
        config
    }

    #[test]
    fn rate_above_threshold_sidelines() {
        let telemetry = telemetry_with("10-K", 10, 4);
        let alert = evaluate_quality(&telemetry, "f1", &config_with("10-K", 0.3)).unwrap();
        assert!((alert.rejection_rate - 0.4).abs() < 1e-12);
        assert!((alert.threshold_applied - 0.3).abs() < f64::EPSILON);
        assert_eq!(alert.status, QualityStatus::SidelineForReview);
    }

    #[test]
    fn rate_equal_to_threshold_is_ready() {
        let telemetry = telemetry_with("10-K", 10, 3);
        let alert = evaluate_quality(&telemetry, "f1", &config_with("10-K", 0.3)).unwrap();
        assert_eq!(alert.status, QualityStatus::ReadyForProcessing);
    }

    #[test]
    fn unlisted_type_uses_default_threshold() {
        let telemetry = telemetry_with("S-1", 10, 3);
        let alert = evaluate_quality(&telemetry, "f1", &config_with("10-K", 0.5)).unwrap();
        assert!((alert.threshold_applied - 0.25).abs() < f64::EPSILON);
        assert_eq!(alert.status, QualityStatus::SidelineForReview);
    }

    #[test]
    fn no_matches_means_zero_rate() {
        let telemetry = telemetry_with("10-K", 0, 2);
        let alert = evaluate_quality(&telemetry, "f1", &QualityConfig::default()).unwrap();
        assert_eq!(alert.rejection_rate, 0.0);
        assert_eq!(alert.status, QualityStatus::ReadyForProcessing);
    }

    #[test]
    fn unknown_filing_is_explicit_error() {
        let telemetry = Telemetry::new();
        let err = evaluate_quality(&telemetry, "missing", &QualityConfig::default()).unwrap_err();
        assert_eq!(err, AuditError::UnknownFiling("missing".into()));
    }

    #[test]
    fn evaluation_is_idempotent() {
        let telemetry = telemetry_with("10-K", 7, 2);
        let config = QualityConfig::default();
        let first = evaluate_quality(&telemetry, "f1", &config).unwrap();
        let second = evaluate_quality(&telemetry, "f1", &config).unwrap();
        assert_eq!(first, second);
    }
}
