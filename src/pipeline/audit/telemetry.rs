//! Rejection ledger and match counters for one audit run.
//!
//! A `Telemetry` value is owned by exactly one auditor. Parallel runs keep one
//! ledger per worker and fold them together with [`Telemetry::merge`] in a
//! fixed order, so the merged ledger equals the sequential one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::FilingVeto;
use crate::models::{AnchorKind, RejectionContext, RejectionReason};

/// The rejected value: a year or a currency amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnchorValue {
    Year(i32),
    Amount(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectionRecord {
    pub anchor_kind: AnchorKind,
    pub value: AnchorValue,
    pub filing_id: String,
    pub filing_type: String,
    pub context: RejectionContext,
    pub reason: RejectionReason,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VetoRecord {
    pub filing_id: String,
    pub filing_type: String,
    pub veto: FilingVeto,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingStats {
    pub filing_type: String,
    pub total_matches: u64,
    pub rejections: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeStats {
    pub filing_type: String,
    pub total_matches: u64,
    pub rejections: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    rejections: Vec<RejectionRecord>,
    vetoes: Vec<VetoRecord>,
    filing_stats: BTreeMap<String, FilingStats>,
    /// First-seen order; ranking ties resolve by this order.
    type_stats: Vec<TypeStats>,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a filing (and its type) known with zero counts.
    pub fn register_filing(&mut self, filing_id: &str, filing_type: &str) {
        self.filing_entry(filing_id, filing_type);
        self.type_entry(filing_type);
    }

    pub fn record_matches(&mut self, filing_id: &str, filing_type: &str, count: u64) {
        self.filing_entry(filing_id, filing_type).total_matches += count;
        self.type_entry(filing_type).total_matches += count;
    }

    pub fn log_rejection(&mut self, record: RejectionRecord) {
        self.filing_entry(&record.filing_id, &record.filing_type).rejections += 1;
        self.type_entry(&record.filing_type).rejections += 1;
        self.rejections.push(record);
    }

    pub fn log_veto(&mut self, record: VetoRecord) {
        self.register_filing(&record.filing_id, &record.filing_type);
        self.vetoes.push(record);
    }

    pub fn rejections(&self) -> &[RejectionRecord] {
        &self.rejections
    }

    pub fn vetoes(&self) -> &[VetoRecord] {
        &self.vetoes
    }

    pub fn filing_stats(&self, filing_id: &str) -> Option<&FilingStats> {
        self.filing_stats.get(filing_id)
    }

    pub fn type_stats(&self) -> &[TypeStats] {
        &self.type_stats
    }

    pub fn filing_ids(&self) -> impl Iterator<Item = &str> {
        self.filing_stats.keys().map(String::as_str)
    }

    pub fn total_rejections(&self) -> usize {
        self.rejections.len()
    }

    /// Fold another ledger into this one: counters summed, records appended
    /// after the existing ones, unseen filing types appended in their order.
    pub fn merge(&mut self, other: Telemetry) {
        for (filing_id, stats) in other.filing_stats {
            let entry = self.filing_entry(&filing_id, &stats.filing_type);
            entry.total_matches += stats.total_matches;
            entry.rejections += stats.rejections;
        }
        for stats in other.type_stats {
            let entry = self.type_entry(&stats.filing_type);
            entry.total_matches += stats.total_matches;
            entry.rejections += stats.rejections;
        }
        self.rejections.extend(other.rejections);
        self.vetoes.extend(other.vetoes);
    }

    fn filing_entry(&mut self, filing_id: &str, filing_type: &str) -> &mut FilingStats {
        self.filing_stats
            .entry(filing_id.to_string())
            .or_insert_with(|| FilingStats {
                filing_type: filing_type.to_string(),
                ..FilingStats::default()
            })
    }

    fn type_entry(&mut self, filing_type: &str) -> &mut TypeStats {
        let idx = match self.type_stats.iter().position(|t| t.filing_type == filing_type) {
            Some(idx) => idx,
            None => {
                self.type_stats.push(TypeStats {
                    filing_type: filing_type.to_string(),
                    total_matches: 0,
                    rejections: 0,
                });
                self.type_stats.len() - 1
            }
        };
        &mut self.type_stats[idx]
    }
}
