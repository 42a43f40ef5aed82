//! StatisticalAuditPipeline: entropy veto → schema validation → robust outliers.
//!
//! Each phase either hands a narrower batch to the next one or ends the run
//! with a terminal verdict. Nothing partial is ever returned after a VETO.

use std::path::Path;

use serde_json::Value;

use super::entropy::entropy_ratio;
use super::loader::load_records;
use super::outliers::outlier_indices;
use super::schema::validate_record;
use super::types::{AuditVerdict, PipelinePhase, RecordRejection};
use super::StatisticsError;
use crate::config::{EntropyGate, StatisticsConfig, ValidationMode};
use crate::models::{AuditStatus, BudgetRecord};

pub struct StatisticalAuditPipeline {
    config: StatisticsConfig,
}

impl Default for StatisticalAuditPipeline {
    fn default() -> Self {
        Self::new(StatisticsConfig::default())
    }
}

impl StatisticalAuditPipeline {
    pub fn new(config: StatisticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StatisticsConfig {
        &self.config
    }

    /// Load a JSON array from disk and audit it.
    pub fn run_file(&self, path: &Path) -> Result<AuditVerdict, StatisticsError> {
        let records = load_records(path)?;
        self.run(&records)
    }

    /// Audit one batch of raw records.
    ///
    /// `Err` only for a strict-mode schema failure; VETO and ABSTAIN come
    /// back as verdicts.
    pub fn run(&self, records: &[Value]) -> Result<AuditVerdict, StatisticsError> {
        tracing::info!(
            phase = PipelinePhase::Init.as_str(),
            records = records.len(),
            "Statistical audit started"
        );

        // ── ENTROPY_CHECK ──
        let entropy = self.entropy_check(records);
        if let Some(ratio) = entropy {
            if ratio <= self.config.entropy_threshold {
                tracing::warn!(
                    phase = PipelinePhase::EntropyCheck.as_str(),
                    entropy_ratio = ratio,
                    threshold = self.config.entropy_threshold,
                    "Entropy veto: batch too uniform to be trusted"
                );
                let mut verdict = AuditVerdict::empty(AuditStatus::Veto);
                verdict.entropy_ratio = Some(ratio);
                verdict.veto_reason = Some(format!(
                    "entropy ratio {ratio:.4} at or below {:.2}",
                    self.config.entropy_threshold
                ));
                return Ok(verdict);
            }
        }

        // ── SCHEMA_VALIDATION ──
        let (validated, rejections) = self.validate(records)?;
        tracing::info!(
            phase = PipelinePhase::SchemaValidation.as_str(),
            validated = validated.len(),
            rejected = rejections.len(),
            "Schema validation finished"
        );

        // ── STATISTICAL_ANALYSIS ──
        if validated.is_empty() {
            tracing::info!(
                phase = PipelinePhase::StatisticalAnalysis.as_str(),
                "No validated records, abstaining"
            );
            let mut verdict = AuditVerdict::empty(AuditStatus::Abstain);
            verdict.records_rejected = rejections.len();
            verdict.entropy_ratio = entropy;
            verdict.rejections = rejections;
            return Ok(verdict);
        }

        let allocations: Vec<f64> = validated.iter().map(|r| r.budget_allocation).collect();
        let outliers = outlier_indices(
            &allocations,
            self.config.outlier_z_threshold,
            self.config.mad_zero_policy,
        );
        for &idx in &outliers {
            tracing::warn!(
                project = %validated[idx].project_name,
                allocation = allocations[idx],
                "Budget allocation flagged as outlier"
            );
        }
        let risk_exposure: f64 = outliers.iter().map(|&idx| allocations[idx]).sum();

        let verdict = AuditVerdict {
            status: AuditStatus::Complete,
            records_validated: validated.len(),
            records_rejected: rejections.len(),
            risk_exposure,
            outlier_count: outliers.len(),
            entropy_ratio: entropy,
            veto_reason: None,
            rejections,
        };
        tracing::info!(
            phase = PipelinePhase::Complete.as_str(),
            validated = verdict.records_validated,
            outliers = verdict.outlier_count,
            risk_exposure = verdict.risk_exposure,
            "Statistical audit complete"
        );
        Ok(verdict)
    }

    /// Entropy ratio of the raw allocations, or `None` when the gate does not apply.
    fn entropy_check(&self, records: &[Value]) -> Option<f64> {
        if self.config.entropy_gate == EntropyGate::Disabled {
            return None;
        }
        let samples: Vec<f64> = records
            .iter()
            .filter_map(|r| r.get("budget_allocation").and_then(Value::as_f64))
            .collect();
        if samples.len() < self.config.min_entropy_samples {
            tracing::debug!(
                samples = samples.len(),
                "Too few numeric samples for the entropy gate"
            );
            return None;
        }
        entropy_ratio(&samples, self.config.entropy_bins)
    }

    fn validate(
        &self,
        records: &[Value],
    ) -> Result<(Vec<BudgetRecord>, Vec<RecordRejection>), StatisticsError> {
        let mut validated = Vec::with_capacity(records.len());
        let mut rejections = Vec::new();
        for (index, raw) in records.iter().enumerate() {
            match validate_record(raw, &self.config) {
                Ok(record) => validated.push(record),
                Err(reason) => match self.config.validation_mode {
                    ValidationMode::Strict => {
                        tracing::warn!(index, reason = %reason, "Schema validation aborted batch");
                        return Err(StatisticsError::Schema { index, reason });
                    }
                    ValidationMode::Permissive => {
                        tracing::debug!(index, reason = %reason, "Record rejected");
                        rejections.push(RecordRejection { index, reason });
                    }
                },
            }
        }
        Ok((validated, rejections))
    }
}
