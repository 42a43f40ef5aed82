use serde::{Deserialize, Serialize};

/// One structured capital-budget line item.
///
/// Deserializing does not validate; the statistical pipeline's schema phase does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRecord {
    pub project_name: String,
    pub budget_allocation: f64,
    pub fiscal_start: i32,
    pub fiscal_end: i32,
}
