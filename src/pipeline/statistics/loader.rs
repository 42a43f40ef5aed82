use std::path::Path;

use serde_json::Value;

use super::StatisticsError;

/// Read a JSON array of raw budget records from disk.
pub fn load_records(path: &Path) -> Result<Vec<Value>, StatisticsError> {
    let raw = std::fs::read_to_string(path)?;
    parse_records(&raw)
}

/// Parse a JSON array of raw budget records. Any other top-level shape is refused.
pub fn parse_records(json: &str) -> Result<Vec<Value>, StatisticsError> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(records) => Ok(records),
        _ => Err(StatisticsError::NotAnArray),
    }
}
