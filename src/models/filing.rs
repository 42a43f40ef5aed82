use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A single disclosure document submitted for audit.
///
/// `accepted_date` is the reference date every relative token in
/// `processed_text` is resolved against. It serializes as an ISO-8601 date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filing {
    pub identifier: String,
    pub filing_type: String,
    pub accepted_date: NaiveDate,
    pub processed_text: String,
}

impl Filing {
    pub fn new(
        identifier: impl Into<String>,
        filing_type: impl Into<String>,
        accepted_date: NaiveDate,
        processed_text: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            filing_type: filing_type.into(),
            accepted_date,
            processed_text: processed_text.into(),
        }
    }

    /// Build a filing from an ISO-8601 (`YYYY-MM-DD`) acceptance date.
    pub fn from_iso_date(
        identifier: impl Into<String>,
        filing_type: impl Into<String>,
        accepted_date: &str,
        processed_text: impl Into<String>,
    ) -> Result<Self, chrono::ParseError> {
        let date = NaiveDate::parse_from_str(accepted_date.trim(), "%Y-%m-%d")?;
        Ok(Self::new(identifier, filing_type, date, processed_text))
    }

    /// SHA-256 of the processed text, lowercase hex.
    pub fn content_digest(&self) -> String {
        Sha256::digest(self.processed_text.as_bytes())
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_date() {
        let filing = Filing::from_iso_date("0001-24-000001", "10-K", "2024-01-15", "text").unwrap();
        assert_eq!(filing.accepted_date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn rejects_non_iso_date() {
        assert!(Filing::from_iso_date("a", "10-K", "15/01/2024", "text").is_err());
    }

    #[test]
    fn deserializes_from_json() {
        let filing: Filing = serde_json::from_str(
            r#"{"identifier":"f1","filing_type":"10-Q","accepted_date":"2023-06-30","processed_text":"FY 23"}"#,
        )
        .unwrap();
        assert_eq!(filing.filing_type, "10-Q");
        assert_eq!(filing.accepted_date, NaiveDate::from_ymd_opt(2023, 6, 30).unwrap());
    }

    #[test]
    fn digest_is_stable_hex() {
        let a = Filing::from_iso_date("a", "10-K", "2024-01-15", "same text").unwrap();
        let b = Filing::from_iso_date("b", "8-K", "2020-01-01", "same text").unwrap();
        assert_eq!(a.content_digest(), b.content_digest());
        assert_eq!(a.content_digest().len(), 64);
        // SHA-256 of the empty string
        let empty = Filing::from_iso_date("c", "10-K", "2024-01-15", "").unwrap();
        assert_eq!(
            empty.content_digest(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
