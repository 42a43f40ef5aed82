pub mod currency;
pub mod snippet;
pub mod types;
pub mod years;

pub use currency::*;
pub use types::*;
pub use years::*;

use thiserror::Error;

/// A single malformed anchor token.
///
/// Always recoverable: the token is skipped and extraction continues with the
/// rest of the document.
#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum TokenError {
    #[error("Empty numeric token")]
    Empty,

    #[error("Numeric token out of range: {0}")]
    NonNumeric(String),

    #[error("Ambiguous year token: {0}")]
    Ambiguous(String),

    #[error("Range end {end} precedes start {start}")]
    InvertedRange { start: i32, end: i32 },

    #[error("Currency magnitude is not finite: {0}")]
    NonFinite(String),
}
