use serde::{Deserialize, Serialize};

use super::TokenError;

/// Which year grammar a match came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearMatchKind {
    /// Keyword-qualified numeral: "year 2023", "covers 24", "period 2021".
    Keyword,
    /// Explicit fiscal form: "FY24", "fiscal year 2023".
    Fiscal,
    /// Hyphen or slash range: "2019-21", "2020/2022".
    Range,
}

/// One year-grammar match, borrowed from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearMatch<'t> {
    Keyword { keyword: &'t str, token: &'t str },
    Fiscal { token: &'t str },
    Range { start: &'t str, end: &'t str },
}

impl YearMatch<'_> {
    pub fn kind(&self) -> YearMatchKind {
        match self {
            Self::Keyword { .. } => YearMatchKind::Keyword,
            Self::Fiscal { .. } => YearMatchKind::Fiscal,
            Self::Range { .. } => YearMatchKind::Range,
        }
    }
}

/// Resolved years for one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum YearResolution {
    /// One year, or every year of an inclusive range, ascending.
    Years { years: Vec<i32> },
    /// A range spanning more than the rollover window. Expands to nothing;
    /// kept distinct from a malformed token.
    BeyondWindow { start: i32, end: i32 },
}

/// Every year match in a document, with how it resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCandidate {
    pub kind: YearMatchKind,
    /// The numeric token as written ("FY" and keywords excluded).
    pub token: String,
    /// Byte offset of `token` in the source text.
    pub source_offset: usize,
    pub snippet: String,
    pub resolution: Result<YearResolution, TokenError>,
}

/// An accepted-shape year anchor. Bounds are applied later by the auditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearAnchor {
    pub year: i32,
    pub kind: YearMatchKind,
    pub token: String,
    pub snippet: String,
    pub source_offset: usize,
}

/// Shorthand magnitude suffix on a currency amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyUnit {
    Million,
    Billion,
}

impl CurrencyUnit {
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Million => 1e6,
            Self::Billion => 1e9,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "m" | "mn" | "million" => Some(Self::Million),
            "b" | "bn" | "billion" => Some(Self::Billion),
            _ => None,
        }
    }
}

/// A `$` amount found in the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyAnchor {
    pub amount: f64,
    pub unit: Option<CurrencyUnit>,
    /// The matched text, sign and unit included.
    pub token: String,
    pub snippet: String,
    pub source_offset: usize,
    /// Zero-based line number of the match.
    pub line: usize,
}
