use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use super::snippet::line_snippet;
use super::types::{YearAnchor, YearCandidate, YearMatch, YearMatchKind, YearResolution};
use super::TokenError;
use crate::config::ExtractorConfig;

/// Keyword immediately followed by a 2–4 digit numeral or a numeral range.
/// `fiscal year` / `calendar year` come before `year` so the longer keyword wins.
static YEAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?P<kw>fiscal\s+year|calendar\s+year|year|period|fy|dates|through|covers|ending|starting)\s*(?P<val>[0-9]{2,4}(?:[-/][0-9]{2,4})?)\b",
    )
    .unwrap()
});

/// Year anchors with the default extractor bounds.
pub fn extract_years(text: &str, reference_date: NaiveDate) -> Vec<YearAnchor> {
    extract_years_with(text, reference_date, &ExtractorConfig::default())
}

/// Year anchors ordered by `(source_offset, year)`, duplicates removed.
///
/// Malformed tokens and ranges beyond the rollover window contribute nothing.
pub fn extract_years_with(
    text: &str,
    reference_date: NaiveDate,
    config: &ExtractorConfig,
) -> Vec<YearAnchor> {
    let mut anchors: Vec<YearAnchor> = extract_year_candidates(text, reference_date, config)
        .into_iter()
        .filter_map(|candidate| match candidate.resolution {
            Ok(YearResolution::Years { years }) => Some(
                years
                    .into_iter()
                    .map(|year| YearAnchor {
                        year,
                        kind: candidate.kind,
                        token: candidate.token.clone(),
                        snippet: candidate.snippet.clone(),
                        source_offset: candidate.source_offset,
                    })
                    .collect::<Vec<_>>(),
            ),
            Ok(YearResolution::BeyondWindow { .. }) | Err(_) => None,
        })
        .flatten()
        .collect();

    anchors.sort_by_key(|a| (a.source_offset, a.year));
    anchors.dedup_by_key(|a| (a.source_offset, a.year));
    anchors
}

/// Every year-grammar match in `text`, in source order, with its resolution.
///
/// Stops after `config.max_anchors_per_document` matches.
pub fn extract_year_candidates(
    text: &str,
    reference_date: NaiveDate,
    config: &ExtractorConfig,
) -> Vec<YearCandidate> {
    let reference_year = reference_date.year();
    let mut candidates = Vec::new();

    for caps in YEAR_PATTERN.captures_iter(text) {
        if candidates.len() >= config.max_anchors_per_document {
            tracing::warn!(
                budget = config.max_anchors_per_document,
                "Year anchor budget exhausted, ignoring remaining matches"
            );
            break;
        }
        let (Some(keyword), Some(value)) = (caps.name("kw"), caps.name("val")) else {
            continue;
        };

        // A further `-DD` / `/DD` means a calendar date: only its year counts.
        let token = if continues_as_date(text, value.end()) {
            root_token(value.as_str())
        } else {
            value.as_str()
        };
        let year_match = classify(keyword.as_str(), token);
        let resolution = resolve_match(&year_match, reference_year, config);
        if let Err(e) = &resolution {
            tracing::debug!(token = value.as_str(), error = %e, "Skipping malformed year token");
        }

        candidates.push(YearCandidate {
            kind: year_match.kind(),
            token: value.as_str().to_string(),
            source_offset: value.start(),
            snippet: line_snippet(text, keyword.start(), value.end(), config.max_snippet_chars),
            resolution,
        });
    }

    candidates
}

/// Tag a keyword + numeral pair with its grammar.
///
/// A separator after a four-digit start means a range. A shorter start
/// ("03/15") is a date fragment and only its root is read.
/// `fy` / `fiscal year` mean the fiscal form.
pub fn classify<'t>(keyword: &'t str, token: &'t str) -> YearMatch<'t> {
    let token = match token.find(['-', '/']) {
        Some(4) => {
            return YearMatch::Range {
                start: &token[..4],
                end: &token[5..],
            };
        }
        Some(pos) => &token[..pos],
        None => token,
    };
    let normalized = keyword.to_ascii_lowercase();
    if normalized == "fy" || normalized.starts_with("fiscal") {
        YearMatch::Fiscal { token }
    } else {
        YearMatch::Keyword { keyword, token }
    }
}

fn root_token(token: &str) -> &str {
    token.split(['-', '/']).next().unwrap_or(token)
}

/// True when `[-/]` and a digit follow `end`.
fn continues_as_date(text: &str, end: usize) -> bool {
    let mut after = text[end..].chars();
    matches!(after.next(), Some('-' | '/')) && after.next().is_some_and(|c| c.is_ascii_digit())
}

/// Resolve any year grammar. The single dispatch point for all match kinds.
pub fn resolve_match(
    year_match: &YearMatch<'_>,
    reference_year: i32,
    config: &ExtractorConfig,
) -> Result<YearResolution, TokenError> {
    match year_match {
        YearMatch::Keyword { token, .. } | YearMatch::Fiscal { token } => {
            let year = resolve_year_token(token, reference_year, config.pivot_window)?;
            Ok(YearResolution::Years { years: vec![year] })
        }
        YearMatch::Range { start, end } => expand_range(start, end, reference_year, config),
    }
}

/// Resolve a 2- or 4-digit year token relative to the reference year.
///
/// Two-digit tokens land in the reference century and fall back one century
/// when that would put them more than `pivot_window` years ahead.
pub fn resolve_year_token(
    token: &str,
    reference_year: i32,
    pivot_window: i32,
) -> Result<i32, TokenError> {
    let digits: String = token.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(TokenError::Empty);
    }
    let value: i32 = digits
        .parse()
        .map_err(|_| TokenError::NonNumeric(token.to_string()))?;

    match digits.len() {
        4 => Ok(value),
        2 => {
            let century = reference_year.div_euclid(100) * 100;
            let mut year = century + value;
            if year > reference_year + pivot_window {
                year -= 100;
            }
            Ok(year)
        }
        _ => Err(TokenError::Ambiguous(token.to_string())),
    }
}

/// Expand `start-end` into an inclusive range of years.
///
/// A two-digit end takes the start's century, rolling over once if it would
/// precede the start ("1998-02" is 1998..=2002). Spans wider than the
/// rollover window yield [`YearResolution::BeyondWindow`].
pub fn expand_range(
    start: &str,
    end: &str,
    reference_year: i32,
    config: &ExtractorConfig,
) -> Result<YearResolution, TokenError> {
    let first = resolve_year_token(start, reference_year, config.pivot_window)?;

    let end_digits: String = end.chars().filter(|c| c.is_ascii_digit()).collect();
    let end_value: i32 = end_digits
        .parse()
        .map_err(|_| TokenError::NonNumeric(end.to_string()))?;
    let last = match end_digits.len() {
        2 => {
            let mut year = first.div_euclid(100) * 100 + end_value;
            if year < first {
                year += 100;
            }
            year
        }
        4 => {
            if end_value < first {
                return Err(TokenError::InvertedRange {
                    start: first,
                    end: end_value,
                });
            }
            end_value
        }
        _ => return Err(TokenError::Ambiguous(format!("{start}-{end}"))),
    };

    if last - first > config.rollover_window {
        return Ok(YearResolution::BeyondWindow {
            start: first,
            end: last,
        });
    }
    Ok(YearResolution::Years {
        years: (first..=last).collect(),
    })
}
