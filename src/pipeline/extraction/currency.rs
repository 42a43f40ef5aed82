use std::sync::LazyLock;

use regex::Regex;

use super::snippet::line_snippet;
use super::types::{CurrencyAnchor, CurrencyUnit};
use super::TokenError;
use crate::config::ExtractorConfig;

/// `$` amount with optional sign, thousands separators, cents and unit.
/// The regex crate has no look-around; boundaries are checked in `has_clean_boundaries`.
static CURRENCY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?P<sign>-)?\$(?P<value>[0-9]{1,3}(?:,[0-9]{3})+|[0-9]+)(?P<cents>\.[0-9]{2})?(?:[ \t]*(?P<unit>million|billion|mn|bn|m|b)\b)?",
    )
    .unwrap()
});

/// Currency anchors with the default extractor bounds.
pub fn extract_currency(text: &str) -> Vec<CurrencyAnchor> {
    extract_currency_with(text, &ExtractorConfig::default())
}

/// Currency anchors in source order.
///
/// Matches touching a larger numeral or identifier are dropped whole, never
/// truncated to the part that happens to parse.
pub fn extract_currency_with(text: &str, config: &ExtractorConfig) -> Vec<CurrencyAnchor> {
    let mut anchors = Vec::new();
    let mut line = 0usize;
    let mut scanned_to = 0usize;

    for caps in CURRENCY_PATTERN.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if !has_clean_boundaries(text, whole.start(), whole.end()) {
            tracing::debug!(
                token = whole.as_str(),
                "Skipping currency token overlapping a larger numeral or word"
            );
            continue;
        }
        if anchors.len() >= config.max_anchors_per_document {
            tracing::warn!(
                budget = config.max_anchors_per_document,
                "Currency anchor budget exhausted, ignoring remaining matches"
            );
            break;
        }

        let amount = match parse_amount(
            caps.name("sign").is_some(),
            caps.name("value").map(|m| m.as_str()).unwrap_or(""),
            caps.name("cents").map(|m| m.as_str()),
            caps.name("unit").and_then(|m| CurrencyUnit::parse(m.as_str())),
        ) {
            Ok(amount) => amount,
            Err(e) => {
                tracing::debug!(
                    token = whole.as_str(),
                    error = %e,
                    "Skipping malformed currency token"
                );
                continue;
            }
        };

        line += text[scanned_to..whole.start()].matches('\n').count();
        scanned_to = whole.start();

        anchors.push(CurrencyAnchor {
            amount,
            unit: caps.name("unit").and_then(|m| CurrencyUnit::parse(m.as_str())),
            token: whole.as_str().to_string(),
            snippet: line_snippet(text, whole.start(), whole.end(), config.max_snippet_chars),
            source_offset: whole.start(),
            line,
        });
    }

    anchors
}

/// Convert matched parts to a signed magnitude.
pub fn parse_amount(
    negative: bool,
    value: &str,
    cents: Option<&str>,
    unit: Option<CurrencyUnit>,
) -> Result<f64, TokenError> {
    let digits: String = value.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() {
        return Err(TokenError::Empty);
    }
    let raw = format!("{digits}{}", cents.unwrap_or(""));
    let mut amount: f64 = raw
        .parse()
        .map_err(|_| TokenError::NonNumeric(raw.clone()))?;
    if let Some(unit) = unit {
        amount *= unit.multiplier();
    }
    if !amount.is_finite() {
        return Err(TokenError::NonFinite(raw));
    }
    Ok(if negative { -amount } else { amount })
}

/// No word character or `.` before the match; no word character, and no
/// `,`/`.` introducing another digit, after it.
fn has_clean_boundaries(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    if before.is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '.') {
        return false;
    }

    let mut after = text[end..].chars();
    match after.next() {
        Some(c) if c.is_alphanumeric() || c == '_' => false,
        Some(',') | Some('.') => !after.next().is_some_and(|c| c.is_ascii_digit()),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amounts(text: &str) -> Vec<f64> {
        extract_currency(text).iter().map(|a| a.amount).collect()
    }

    #[test]
    fn thousands_and_cents() {
        assert_eq!(amounts("Total: $1,234.56 due"), vec![1234.56]);
    }

    #[test]
    fn shorthand_units() {
        assert_eq!(amounts("raised $2m"), vec![2_000_000.0]);
        assert_eq!(amounts("raised $3 million"), vec![3_000_000.0]);
        assert_eq!(amounts("debt of $1.25 Billion"), vec![1_250_000_000.0]);
        assert_eq!(amounts("grant $4B."), vec![4_000_000_000.0]);
        assert_eq!(amounts("raised $3bn in debt"), vec![3_000_000_000.0]);
        assert_eq!(amounts("a $7mn facility"), vec![7_000_000.0]);
    }

    #[test]
    fn rejects_amount_running_into_a_word() {
        assert!(amounts("code $3bnx here").is_empty());
        assert!(amounts("sku $40k").is_empty());
        assert!(amounts("ref $12_a").is_empty());
    }

    #[test]
    fn negative_sign() {
        assert_eq!(amounts("loss of -$500 this quarter"), vec![-500.0]);
    }

    #[test]
    fn unit_must_be_a_whole_word() {
        let anchors = extract_currency("paid $5 members each");
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].amount, 5.0);
        assert_eq!(anchors[0].unit, None);
    }

    #[test]
    fn unit_does_not_cross_lines() {
        assert_eq!(amounts("$5\nmillion reasons"), vec![5.0]);
    }

    #[test]
    fn rejects_overlap_with_larger_numeral() {
        assert!(amounts("$1,234.567").is_empty());
        assert!(amounts("$1.5 million").is_empty());
        assert!(amounts("$12,34").is_empty());
    }

    #[test]
    fn rejects_identifier_prefix() {
        assert!(amounts("US$500").is_empty());
        assert!(amounts("ref.$500").is_empty());
        assert_eq!(amounts("($500)"), vec![500.0]);
    }

    #[test]
    fn trailing_sentence_punctuation_is_fine() {
        assert_eq!(amounts("It cost $500. Then $20, later."), vec![500.0, 20.0]);
    }

    #[test]
    fn line_numbers_and_snippets() {
        let text = "header\n$10 first\nnothing\ntwo $20 and $30";
        let anchors = extract_currency(text);
        let lines: Vec<usize> = anchors.iter().map(|a| a.line).collect();
        assert_eq!(lines, vec![1, 3, 3]);
        assert_eq!(anchors[2].snippet, "two $20 and $30");
        assert_eq!(&text[anchors[0].source_offset..anchors[0].source_offset + 3], "$10");
    }

    #[test]
    fn non_finite_amount_skipped() {
        let huge = format!("${} billion and $7", "9".repeat(400));
        assert_eq!(amounts(&huge), vec![7.0]);
    }

    #[test]
    fn budget_is_enforced() {
        let config = ExtractorConfig {
            max_anchors_per_document: 2,
            ..ExtractorConfig::default()
        };
        assert_eq!(extract_currency_with("$1 $2 $3 $4", &config).len(), 2);
    }

    #[test]
    fn extraction_is_deterministic() {
        let text = "$1,000 then -$2.50 and $3bn and $4 billion\n$5m";
        let first = extract_currency(text);
        let values: Vec<f64> = first.iter().map(|a| a.amount).collect();
        assert_eq!(values, vec![1_000.0, -2.5, 3e9, 4e9, 5e6]);
        for _ in 0..5 {
            assert_eq!(extract_currency(text), first);
        }
    }
}
