use serde_json::Value;

use crate::config::StatisticsConfig;
use crate::models::BudgetRecord;

/// Validate one raw record into a [`BudgetRecord`].
///
/// The error string names the first rule the record breaks.
pub fn validate_record(raw: &Value, config: &StatisticsConfig) -> Result<BudgetRecord, String> {
    if !raw.is_object() {
        return Err("record is not a JSON object".into());
    }
    let record: BudgetRecord =
        serde_json::from_value(raw.clone()).map_err(|e| format!("malformed record: {e}"))?;

    if record.project_name.trim().is_empty() {
        return Err("project_name must not be blank".into());
    }
    if !record.budget_allocation.is_finite() || record.budget_allocation <= 0.0 {
        return Err(format!(
            "budget_allocation must be a positive finite number, got {}",
            record.budget_allocation
        ));
    }
    let bounds = config.fiscal_year_min..=config.fiscal_year_max;
    for (field, year) in [
        ("fiscal_start", record.fiscal_start),
        ("fiscal_end", record.fiscal_end),
    ] {
        if !bounds.contains(&year) {
            return Err(format!(
                "{field} {year} outside {}..={}",
                config.fiscal_year_min, config.fiscal_year_max
            ));
        }
    }
    if record.fiscal_end < record.fiscal_start {
        return Err(format!(
            "fiscal_end {} precedes fiscal_start {}",
            record.fiscal_end, record.fiscal_start
        ));
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(raw: Value) -> Result<BudgetRecord, String> {
        validate_record(&raw, &StatisticsConfig::default())
    }

    #[test]
    fn valid_record_passes() {
        let record = check(json!({
            "project_name": "Bridge repair",
            "budget_allocation": 1200,
            "fiscal_start": 2024,
            "fiscal_end": 2026
        }))
        .unwrap();
        assert_eq!(record.budget_allocation, 1200.0);
        assert_eq!(record.fiscal_end, 2026);
    }

    #[test]
    fn blank_project_name_rejected() {
        let err = check(json!({
            "project_name": "   ",
            "budget_allocation": 10.0,
            "fiscal_start": 2024,
            "fiscal_end": 2024
        }))
        .unwrap_err();
        assert!(err.contains("project_name"));
    }

    #[test]
    fn non_positive_allocation_rejected() {
        let err = check(json!({
            "project_name": "Park",
            "budget_allocation": 0,
            "fiscal_start": 2024,
            "fiscal_end": 2024
        }))
        .unwrap_err();
        assert!(err.contains("budget_allocation"));
    }

    #[test]
    fn fiscal_bounds_enforced() {
        let err = check(json!({
            "project_name": "Park",
            "budget_allocation": 5.0,
            "fiscal_start": 2019,
            "fiscal_end": 2024
        }))
        .unwrap_err();
        assert!(err.starts_with("fiscal_start 2019"));

        let err = check(json!({
            "project_name": "Park",
            "budget_allocation": 5.0,
            "fiscal_start": 2024,
            "fiscal_end": 2046
        }))
        .unwrap_err();
        assert!(err.starts_with("fiscal_end 2046"));
    }

    #[test]
    fn inverted_chronology_rejected() {
        let err = check(json!({
            "project_name": "Park",
            "budget_allocation": 5.0,
            "fiscal_start": 2030,
            "fiscal_end": 2025
        }))
        .unwrap_err();
        assert!(err.contains("precedes"));
    }

    #[test]
    fn missing_field_and_wrong_shape_rejected() {
        assert!(check(json!({ "project_name": "Park" })).is_err());
        assert!(check(json!([1, 2, 3])).unwrap_err().contains("not a JSON object"));
        assert!(check(json!({
            "project_name": "Park",
            "budget_allocation": "lots",
            "fiscal_start": 2024,
            "fiscal_end": 2024
        }))
        .is_err());
    }
}
