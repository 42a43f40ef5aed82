use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Target fiscal year → whether an accepted anchor covered it.
///
/// Entries only move from uncovered to covered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoverageVector {
    years: BTreeMap<i32, bool>,
}

impl CoverageVector {
    pub fn new(target_years: impl IntoIterator<Item = i32>) -> Self {
        Self {
            years: target_years.into_iter().map(|y| (y, false)).collect(),
        }
    }

    /// Mark a year covered. Returns true only when a target flips to covered.
    pub fn mark(&mut self, year: i32) -> bool {
        match self.years.get_mut(&year) {
            Some(covered) if !*covered => {
                *covered = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_target(&self, year: i32) -> bool {
        self.years.contains_key(&year)
    }

    pub fn is_covered(&self, year: i32) -> bool {
        self.years.get(&year).copied().unwrap_or(false)
    }

    pub fn target_years(&self) -> Vec<i32> {
        self.years.keys().copied().collect()
    }

    /// Uncovered target years, ascending.
    pub fn gaps(&self) -> Vec<i32> {
        self.years
            .iter()
            .filter(|(_, covered)| !**covered)
            .map(|(year, _)| *year)
            .collect()
    }

    pub fn as_map(&self) -> &BTreeMap<i32, bool> {
        &self.years
    }

    /// OR another vector over the same targets into this one.
    pub fn absorb(&mut self, other: &CoverageVector) {
        for (year, covered) in &other.years {
            if *covered {
                self.mark(*year);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncovered() {
        let coverage = CoverageVector::new([2022, 2021, 2023]);
        assert_eq!(coverage.gaps(), vec![2021, 2022, 2023]);
        assert_eq!(coverage.target_years(), vec![2021, 2022, 2023]);
    }

    #[test]
    fn mark_only_affects_targets() {
        let mut coverage = CoverageVector::new([2021, 2022]);
        assert!(coverage.mark(2021));
        assert!(!coverage.mark(2030));
        assert!(!coverage.is_target(2030));
        assert_eq!(coverage.gaps(), vec![2022]);
    }

    #[test]
    fn coverage_is_monotonic() {
        let mut coverage = CoverageVector::new([2021]);
        assert!(coverage.mark(2021));
        assert!(!coverage.mark(2021));
        assert!(coverage.is_covered(2021));

        let uncovered = CoverageVector::new([2021]);
        coverage.absorb(&uncovered);
        assert!(coverage.is_covered(2021));
    }

    #[test]
    fn absorb_ors_coverage() {
        let mut left = CoverageVector::new([2021, 2022]);
        let mut right = CoverageVector::new([2021, 2022]);
        right.mark(2022);
        left.absorb(&right);
        assert!(left.is_covered(2022));
        assert!(!left.is_covered(2021));
    }

    #[test]
    fn serializes_as_map() {
        let mut coverage = CoverageVector::new([2021, 2022]);
        coverage.mark(2022);
        let json = serde_json::to_string(&coverage).unwrap();
        assert_eq!(json, r#"{"2021":false,"2022":true}"#);
    }
}
