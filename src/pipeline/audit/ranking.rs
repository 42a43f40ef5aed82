use serde::{Deserialize, Serialize};

use super::telemetry::Telemetry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityScore {
    pub filing_type: String,
    pub reliability_score: f64,
    pub total_matches: u64,
    pub rejections: u64,
}

/// `1 − rejections / total_matches` per filing type, best first.
///
/// Types with no matches score 1.0. Scores are clamped to [0, 1] and rounded
/// to 4 decimals; equal scores keep first-seen type order.
pub fn reliability_rankings(telemetry: &Telemetry) -> Vec<ReliabilityScore> {
    let mut rankings: Vec<ReliabilityScore> = telemetry
        .type_stats()
        .iter()
        .map(|stats| ReliabilityScore {
            filing_type: stats.filing_type.clone(),
            reliability_score: reliability(stats.total_matches, stats.rejections),
            total_matches: stats.total_matches,
            rejections: stats.rejections,
        })
        .collect();

    // Stable sort: ties stay in first-seen order.
    rankings.sort_by(|a, b| b.reliability_score.total_cmp(&a.reliability_score));
    rankings
}

fn reliability(total_matches: u64, rejections: u64) -> f64 {
    if total_matches == 0 {
        return 1.0;
    }
    let score = (1.0 - rejections as f64 / total_matches as f64).clamp(0.0, 1.0);
    (score * 10_000.0).round() / 10_000.0
}
