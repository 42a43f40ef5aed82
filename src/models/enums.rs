use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {field} value: {value}")]
pub struct InvalidEnum {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The serialized form is the same string `as_str` returns.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(AuditStatus {
    Complete => "COMPLETE",
    Abstain => "ABSTAIN",
    Veto => "VETO",
});

str_enum!(QualityStatus {
    ReadyForProcessing => "READY_FOR_PROCESSING",
    SidelineForReview => "SIDELINE_FOR_REVIEW",
});

str_enum!(ParsabilityStatus {
    Complete => "R3_PARSABLE_COMPLETE",
    Partial => "R3_PARSABLE_PARTIAL",
    NonParsable => "R3_NON_PARSABLE",
});

str_enum!(AnchorKind {
    Year => "year",
    Currency => "currency",
});

// Grammar (or gate) that produced a rejected anchor.
str_enum!(RejectionContext {
    StandardYear => "standard_year",
    FiscalYear => "fiscal_year",
    RangeExpansion => "range_expansion",
    FinancialOutlier => "financial_outlier",
});

str_enum!(RejectionReason {
    OutOfBounds => "out_of_bounds",
    BeyondRolloverWindow => "beyond_rollover_window",
    ExceedsDynamicCap => "exceeds_dynamic_cap",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_strings_are_verbatim() {
        assert_eq!(AuditStatus::Complete.as_str(), "COMPLETE");
        assert_eq!(AuditStatus::Abstain.as_str(), "ABSTAIN");
        assert_eq!(AuditStatus::Veto.as_str(), "VETO");
        assert_eq!(QualityStatus::ReadyForProcessing.as_str(), "READY_FOR_PROCESSING");
        assert_eq!(QualityStatus::SidelineForReview.as_str(), "SIDELINE_FOR_REVIEW");
        assert_eq!(ParsabilityStatus::Complete.as_str(), "R3_PARSABLE_COMPLETE");
        assert_eq!(ParsabilityStatus::Partial.as_str(), "R3_PARSABLE_PARTIAL");
        assert_eq!(ParsabilityStatus::NonParsable.as_str(), "R3_NON_PARSABLE");
    }

    #[test]
    fn serializes_as_status_string() {
        let json = serde_json::to_string(&QualityStatus::SidelineForReview).unwrap();
        assert_eq!(json, "\"SIDELINE_FOR_REVIEW\"");
        let back: ParsabilityStatus = serde_json::from_str("\"R3_NON_PARSABLE\"").unwrap();
        assert_eq!(back, ParsabilityStatus::NonParsable);
    }

    #[test]
    fn from_str_rejects_unknown() {
        assert_eq!(AuditStatus::from_str("VETO").unwrap(), AuditStatus::Veto);
        let err = AuditStatus::from_str("veto").unwrap_err();
        assert_eq!(err.field, "AuditStatus");
        assert_eq!(err.value, "veto");
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(RejectionContext::FinancialOutlier.to_string(), "financial_outlier");
        assert_eq!(RejectionReason::OutOfBounds.to_string(), "out_of_bounds");
    }
}
