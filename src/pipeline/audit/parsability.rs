use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::FilingVeto;
use crate::config::ParsabilityConfig;
use crate::models::ParsabilityStatus;
use crate::pipeline::extraction::CurrencyAnchor;

/// Whether a filing carried enough accepted anchors to be audited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsabilityAssessment {
    pub status: ParsabilityStatus,
    pub reason_code: String,
    pub year_anchors: usize,
    pub unique_currency_values: usize,
    pub currency_lines: usize,
}

/// Grade a filing from its accepted anchors.
///
/// Checks run in order (years, unique amounts, distinct lines); the first
/// shortfall names the reason.
pub fn assess_parsability(
    accepted_years: &[i32],
    accepted_currency: &[&CurrencyAnchor],
    veto: Option<&FilingVeto>,
    config: &ParsabilityConfig,
) -> ParsabilityAssessment {
    let year_anchors = accepted_years.iter().collect::<BTreeSet<_>>().len();
    let unique_currency_values = accepted_currency
        .iter()
        .map(|a| format!("{:.2}", a.amount))
        .collect::<BTreeSet<_>>()
        .len();
    let currency_lines = accepted_currency
        .iter()
        .map(|a| a.line)
        .collect::<BTreeSet<_>>()
        .len();

    let (status, reason_code) = if let Some(veto) = veto {
        (ParsabilityStatus::NonParsable, veto.reason_code())
    } else if year_anchors == 0 && accepted_currency.is_empty() {
        (ParsabilityStatus::NonParsable, "no_anchors")
    } else if year_anchors < config.min_year_anchors {
        (ParsabilityStatus::Partial, "insufficient_temporal_anchors")
    } else if unique_currency_values < config.min_fiscal_anchors_unique {
        (ParsabilityStatus::Partial, "insufficient_fiscal_anchors_unique")
    } else if currency_lines < config.min_fiscal_anchor_lines {
        (ParsabilityStatus::Partial, "insufficient_fiscal_anchor_lines")
    } else {
        (ParsabilityStatus::Complete, "sufficient_anchors")
    };

    ParsabilityAssessment {
        status,
        reason_code: reason_code.to_string(),
        year_anchors,
        unique_currency_values,
        currency_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(value: f64, line: usize) -> CurrencyAnchor {
        CurrencyAnchor {
            amount: value,
            unit: None,
            token: format!("${value}"),
            snippet: String::new(),
            source_offset: 0,
            line,
        }
    }

    fn assess(years: &[i32], currency: &[CurrencyAnchor]) -> ParsabilityAssessment {
        let refs: Vec<&CurrencyAnchor> = currency.iter().collect();
        assess_parsability(years, &refs, None, &ParsabilityConfig::default())
    }

    #[test]
    fn complete_when_all_minimums_met() {
        let result = assess(
            &[2022, 2023],
            &[amount(10.0, 0), amount(20.0, 1), amount(30.0, 1)],
        );
        assert_eq!(result.status, ParsabilityStatus::Complete);
        assert_eq!(result.reason_code, "sufficient_anchors");
    }

    #[test]
    fn nothing_accepted_is_non_parsable() {
        let result = assess(&[], &[]);
        assert_eq!(result.status, ParsabilityStatus::NonParsable);
        assert_eq!(result.reason_code, "no_anchors");
    }

    #[test]
    fn repeated_year_counts_once() {
        let result = assess(&[2023, 2023], &[amount(1.0, 0)]);
        assert_eq!(result.year_anchors, 1);
        assert_eq!(result.status, ParsabilityStatus::Partial);
        assert_eq!(result.reason_code, "insufficient_temporal_anchors");
    }

    #[test]
    fn duplicate_amounts_are_not_unique() {
        let result = assess(
            &[2022, 2023],
            &[amount(10.0, 0), amount(10.0, 1), amount(20.0, 2)],
        );
        assert_eq!(result.unique_currency_values, 2);
        assert_eq!(result.reason_code, "insufficient_fiscal_anchors_unique");
    }

    #[test]
    fn single_line_of_amounts_is_partial() {
        let result = assess(
            &[2022, 2023],
            &[amount(10.0, 4), amount(20.0, 4), amount(30.0, 4)],
        );
        assert_eq!(result.reason_code, "insufficient_fiscal_anchor_lines");
    }

    #[test]
    fn veto_wins() {
        let result = assess_parsability(
            &[2022, 2023],
            &[],
            Some(&FilingVeto::EmptyText),
            &ParsabilityConfig::default(),
        );
        assert_eq!(result.status, ParsabilityStatus::NonParsable);
        assert_eq!(result.reason_code, "empty_input");
    }
}
