//! Filing auditor: runs anchor extraction over filings and keeps the audit state.
//!
//! Per filing: speculative classification → dynamic currency cap → year
//! bounds + coverage → currency outlier check → parsability grade.
//! Token failures are absorbed, filing failures are recorded, nothing here
//! aborts the run.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::coverage::CoverageVector;
use super::parsability::{assess_parsability, ParsabilityAssessment};
use super::quality::{evaluate_quality, FilingQualityAlert};
use super::ranking::reliability_rankings;
use super::report::AuditReport;
use super::telemetry::{AnchorValue, RejectionRecord, Telemetry, VetoRecord};
use super::{AuditError, FilingVeto};
use crate::config::{AuditConfig, AuditorConfig};
use crate::models::{AnchorKind, Filing, RejectionContext, RejectionReason};
use crate::pipeline::extraction::{
    extract_currency_with, extract_year_candidates, CurrencyAnchor, YearCandidate,
    YearMatchKind, YearResolution,
};

/// What auditing one filing produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingOutcome {
    pub filing_id: String,
    pub filing_type: String,
    pub content_digest: String,
    pub speculative: bool,
    pub year_ceiling: i32,
    pub currency_cap: f64,
    /// Accepted years, ascending and unique.
    pub accepted_years: Vec<i32>,
    /// Target years this filing covered for the first time.
    pub newly_covered: Vec<i32>,
    pub year_rejections: usize,
    pub currency_matches: usize,
    pub currency_rejections: usize,
    pub skipped_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub veto: Option<FilingVeto>,
    pub parsability: ParsabilityAssessment,
}

/// Owns the coverage vector, telemetry and quality alerts of one audit run.
#[derive(Debug, Clone)]
pub struct FilingAuditor {
    config: AuditConfig,
    coverage: CoverageVector,
    telemetry: Telemetry,
    alerts: BTreeMap<String, FilingQualityAlert>,
    outcomes: Vec<FilingOutcome>,
}

impl FilingAuditor {
    pub fn new(target_years: impl IntoIterator<Item = i32>) -> Self {
        Self::with_config(target_years, AuditConfig::default())
    }

    pub fn with_config(target_years: impl IntoIterator<Item = i32>, config: AuditConfig) -> Self {
        Self {
            config,
            coverage: CoverageVector::new(target_years),
            telemetry: Telemetry::new(),
            alerts: BTreeMap::new(),
            outcomes: Vec::new(),
        }
    }

    /// Continue a run on a caller-supplied ledger.
    pub fn with_telemetry(mut self, telemetry: Telemetry) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Hand the ledger back to the caller.
    pub fn into_telemetry(self) -> Telemetry {
        self.telemetry
    }

    pub fn coverage(&self) -> &CoverageVector {
        &self.coverage
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    pub fn outcomes(&self) -> &[FilingOutcome] {
        &self.outcomes
    }

    /// Alerts computed so far by [`Self::evaluate_filing_quality`].
    pub fn quality_alerts(&self) -> &BTreeMap<String, FilingQualityAlert> {
        &self.alerts
    }

    /// Audit one filing, updating coverage and telemetry.
    pub fn audit_filing(&mut self, filing: &Filing) -> FilingOutcome {
        let rules = &self.config.auditor;
        let text = filing.processed_text.as_str();
        self.telemetry
            .register_filing(&filing.identifier, &filing.filing_type);

        let speculative = is_speculative(text, &rules.speculative_keywords);
        let year_ceiling = if speculative {
            rules.speculative_year_ceiling
        } else {
            rules.year_ceiling
        };

        let mut outcome = FilingOutcome {
            filing_id: filing.identifier.clone(),
            filing_type: filing.filing_type.clone(),
            content_digest: filing.content_digest(),
            speculative,
            year_ceiling,
            currency_cap: rules.fallback_currency_cap,
            accepted_years: Vec::new(),
            newly_covered: Vec::new(),
            year_rejections: 0,
            currency_matches: 0,
            currency_rejections: 0,
            skipped_tokens: 0,
            veto: None,
            parsability: assess_parsability(&[], &[], None, &self.config.parsability),
        };

        if let Some(veto) = check_budget(text, rules) {
            tracing::warn!(
                filing_id = %filing.identifier,
                reason = veto.reason_code(),
                "Filing vetoed before extraction"
            );
            self.telemetry.log_veto(VetoRecord {
                filing_id: filing.identifier.clone(),
                filing_type: filing.filing_type.clone(),
                veto: veto.clone(),
            });
            outcome.parsability =
                assess_parsability(&[], &[], Some(&veto), &self.config.parsability);
            outcome.veto = Some(veto);
            self.outcomes.push(outcome.clone());
            return outcome;
        }

        // 1. Scale learning
        let currency = extract_currency_with(text, &self.config.extractor);
        let amounts: Vec<f64> = currency.iter().map(|a| a.amount).collect();
        let multiplier = if speculative {
            rules.speculative_cap_multiplier
        } else {
            rules.cap_multiplier
        };
        outcome.currency_cap = dynamic_currency_cap(
            &amounts,
            rules.cap_baseline_size,
            multiplier,
            rules.fallback_currency_cap,
        );

        // 2. Years
        let candidates =
            extract_year_candidates(text, filing.accepted_date, &self.config.extractor);
        let mut accepted = BTreeSet::new();
        for candidate in &candidates {
            self.audit_year_candidate(filing, candidate, year_ceiling, &mut outcome, &mut accepted);
        }
        outcome.accepted_years = accepted.into_iter().collect();

        // 3. Currency
        let mut accepted_currency: Vec<&CurrencyAnchor> = Vec::new();
        for anchor in &currency {
            self.telemetry
                .record_matches(&filing.identifier, &filing.filing_type, 1);
            outcome.currency_matches += 1;
            if anchor.amount.abs() > outcome.currency_cap {
                outcome.currency_rejections += 1;
                self.telemetry.log_rejection(RejectionRecord {
                    anchor_kind: AnchorKind::Currency,
                    value: AnchorValue::Amount(anchor.amount),
                    filing_id: filing.identifier.clone(),
                    filing_type: filing.filing_type.clone(),
                    context: RejectionContext::FinancialOutlier,
                    reason: RejectionReason::ExceedsDynamicCap,
                    snippet: anchor.snippet.clone(),
                });
            } else {
                accepted_currency.push(anchor);
            }
        }

        outcome.parsability = assess_parsability(
            &outcome.accepted_years,
            &accepted_currency,
            None,
            &self.config.parsability,
        );

        tracing::debug!(
            filing_id = %filing.identifier,
            accepted_years = outcome.accepted_years.len(),
            year_rejections = outcome.year_rejections,
            currency_matches = outcome.currency_matches,
            currency_rejections = outcome.currency_rejections,
            parsability = outcome.parsability.status.as_str(),
            "Filing audited"
        );

        self.outcomes.push(outcome.clone());
        outcome
    }

    fn audit_year_candidate(
        &mut self,
        filing: &Filing,
        candidate: &YearCandidate,
        year_ceiling: i32,
        outcome: &mut FilingOutcome,
        accepted: &mut BTreeSet<i32>,
    ) {
        let context = rejection_context(candidate.kind);
        let years = match &candidate.resolution {
            Ok(YearResolution::Years { years }) => years,
            Ok(YearResolution::BeyondWindow { start, .. }) => {
                outcome.year_rejections += 1;
                self.reject_year(
                    filing,
                    candidate,
                    *start,
                    context,
                    RejectionReason::BeyondRolloverWindow,
                );
                return;
            }
            Err(_) => {
                outcome.skipped_tokens += 1;
                return;
            }
        };

        for &year in years {
            if (self.config.auditor.year_floor..=year_ceiling).contains(&year) {
                if self.coverage.mark(year) {
                    outcome.newly_covered.push(year);
                }
                accepted.insert(year);
                self.telemetry
                    .record_matches(&filing.identifier, &filing.filing_type, 1);
            } else {
                outcome.year_rejections += 1;
                self.reject_year(filing, candidate, year, context, RejectionReason::OutOfBounds);
            }
        }
    }

    fn reject_year(
        &mut self,
        filing: &Filing,
        candidate: &YearCandidate,
        year: i32,
        context: RejectionContext,
        reason: RejectionReason,
    ) {
        self.telemetry.log_rejection(RejectionRecord {
            anchor_kind: AnchorKind::Year,
            value: AnchorValue::Year(year),
            filing_id: filing.identifier.clone(),
            filing_type: filing.filing_type.clone(),
            context,
            reason,
            snippet: candidate.snippet.clone(),
        });
    }

    /// Rejection-rate verdict for an audited filing. Recorded in the alert registry.
    pub fn evaluate_filing_quality(
        &mut self,
        filing_id: &str,
    ) -> Result<FilingQualityAlert, AuditError> {
        let alert = evaluate_quality(&self.telemetry, filing_id, &self.config.quality)?;
        self.alerts.insert(filing_id.to_string(), alert.clone());
        Ok(alert)
    }

    /// Coverage, gaps, reliability ranking and per-filing results.
    ///
    /// Read-only: alerts are recomputed from telemetry, so repeated calls on
    /// unchanged state return identical reports.
    pub fn get_report(&self, issuer: &str) -> AuditReport {
        let quality_alerts = self
            .telemetry
            .filing_ids()
            .filter_map(|id| evaluate_quality(&self.telemetry, id, &self.config.quality).ok())
            .collect();

        AuditReport {
            report_id: report_id(issuer, &self.outcomes),
            issuer: issuer.to_string(),
            coverage_vector: self.coverage.clone(),
            gaps: self.coverage.gaps(),
            total_rejections: self.telemetry.total_rejections(),
            total_vetoes: self.telemetry.vetoes().len(),
            reliability_rankings: reliability_rankings(&self.telemetry),
            quality_alerts,
            filings: self.outcomes.clone(),
        }
    }

    /// Fold a worker shard into this auditor. Shards must share target years;
    /// call in a fixed order to keep reports reproducible.
    ///
    /// Registered alerts from either side are recomputed against the merged
    /// ledger.
    pub fn absorb(&mut self, shard: FilingAuditor) -> Result<(), AuditError> {
        let expected = self.coverage.target_years();
        let found = shard.coverage.target_years();
        if expected != found {
            return Err(AuditError::ShardMismatch { expected, found });
        }
        let alerted: BTreeSet<String> = self
            .alerts
            .keys()
            .chain(shard.alerts.keys())
            .cloned()
            .collect();

        self.coverage.absorb(&shard.coverage);
        self.telemetry.merge(shard.telemetry);
        self.outcomes.extend(shard.outcomes);

        self.alerts = alerted
            .into_iter()
            .filter_map(|id| {
                evaluate_quality(&self.telemetry, &id, &self.config.quality)
                    .ok()
                    .map(|alert| (id, alert))
            })
            .collect();
        Ok(())
    }
}

/// Forward-looking language widens the audit bounds.
pub fn is_speculative(text: &str, keywords: &[String]) -> bool {
    let lower = text.to_lowercase();
    keywords
        .iter()
        .any(|kw| lower.contains(kw.to_lowercase().as_str()))
}

/// Learn the currency scale of a filing.
///
/// Median of the `baseline_size` smallest nonzero magnitudes (upper median
/// for even counts) times `multiplier`; `fallback` when there are none.
pub fn dynamic_currency_cap(
    amounts: &[f64],
    baseline_size: usize,
    multiplier: f64,
    fallback: f64,
) -> f64 {
    let mut magnitudes: Vec<f64> = amounts
        .iter()
        .map(|a| a.abs())
        .filter(|a| *a > 0.0)
        .collect();
    if magnitudes.is_empty() {
        return fallback;
    }
    magnitudes.sort_by(f64::total_cmp);
    magnitudes.truncate(baseline_size);
    magnitudes[magnitudes.len() / 2] * multiplier
}

fn check_budget(text: &str, rules: &AuditorConfig) -> Option<FilingVeto> {
    if text.trim().is_empty() {
        return Some(FilingVeto::EmptyText);
    }
    if text.len() > rules.max_document_bytes {
        return Some(FilingVeto::BudgetExceeded {
            bytes: text.len(),
            max_bytes: rules.max_document_bytes,
        });
    }
    None
}

fn rejection_context(kind: YearMatchKind) -> RejectionContext {
    match kind {
        YearMatchKind::Keyword => RejectionContext::StandardYear,
        YearMatchKind::Fiscal => RejectionContext::FiscalYear,
        YearMatchKind::Range => RejectionContext::RangeExpansion,
    }
}

/// Deterministic id over the issuer and the filings in processing order.
fn report_id(issuer: &str, outcomes: &[FilingOutcome]) -> Uuid {
    let mut name = issuer.to_string();
    for outcome in outcomes {
        name.push('\n');
        name.push_str(&outcome.filing_id);
        name.push(':');
        name.push_str(&outcome.content_digest);
    }
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
