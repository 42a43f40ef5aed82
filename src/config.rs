use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "disclosure-gate";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV_VAR: &str = "DISCLOSURE_GATE_CONFIG";

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "disclosure_gate_lib=info,disclosure_gate=info,warn"
}

/// Get the configuration directory (~/.disclosure-gate/).
/// Falls back to the working directory when no home directory is known.
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".disclosure-gate")
}

/// Get the default config file path.
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.json")
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ═══════════════════════════════════════════════════════════
// Extraction
// ═══════════════════════════════════════════════════════════

/// Bounds for the anchor extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum span (in years) a range token may expand to.
    pub rollover_window: i32,
    /// Two-digit tokens resolving past `reference_year + pivot_window` fall back a century.
    pub pivot_window: i32,
    /// Snippets longer than this are abbreviated around a `[...]` marker.
    pub max_snippet_chars: usize,
    /// Per-document budget of anchors of each kind.
    pub max_anchors_per_document: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            rollover_window: 20,
            pivot_window: 20,
            max_snippet_chars: 500,
            max_anchors_per_document: 10_000,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Filing audit
// ═══════════════════════════════════════════════════════════

/// Bounds applied by the filing auditor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditorConfig {
    pub year_floor: i32,
    pub year_ceiling: i32,
    /// Ceiling for filings containing forward-looking language.
    pub speculative_year_ceiling: i32,
    pub speculative_keywords: Vec<String>,
    /// Number of smallest nonzero magnitudes used to learn the currency scale.
    pub cap_baseline_size: usize,
    pub cap_multiplier: f64,
    pub speculative_cap_multiplier: f64,
    /// Cap used when a filing has no nonzero currency anchors.
    pub fallback_currency_cap: f64,
    /// Texts above this many bytes are vetoed before extraction.
    pub max_document_bytes: usize,
}

impl Default for AuditorConfig {
    fn default() -> Self {
        Self {
            year_floor: 1900,
            year_ceiling: 2100,
            speculative_year_ceiling: 2200,
            speculative_keywords: ["outlook", "forecast", "projection", "planned"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            cap_baseline_size: 5,
            cap_multiplier: 10.0,
            speculative_cap_multiplier: 1_000.0,
            fallback_currency_cap: 1e12,
            max_document_bytes: 4 * 1024 * 1024,
        }
    }
}

/// Rejection-rate thresholds per filing type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Used for any filing type not listed in `thresholds`.
    pub default_threshold: f64,
    pub thresholds: BTreeMap<String, f64>,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            default_threshold: 0.25,
            thresholds: BTreeMap::new(),
        }
    }
}

impl QualityConfig {
    /// Threshold for a filing type, with the default fallback.
    pub fn threshold_for(&self, filing_type: &str) -> f64 {
        self.thresholds
            .get(filing_type)
            .copied()
            .unwrap_or(self.default_threshold)
    }
}

/// Minimum accepted anchors for a filing to count as fully parsable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsabilityConfig {
    pub min_year_anchors: usize,
    pub min_fiscal_anchors_unique: usize,
    pub min_fiscal_anchor_lines: usize,
}

impl Default for ParsabilityConfig {
    fn default() -> Self {
        Self {
            min_year_anchors: 2,
            min_fiscal_anchors_unique: 3,
            min_fiscal_anchor_lines: 2,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Statistical pipeline
// ═══════════════════════════════════════════════════════════

/// How invalid records are handled during schema validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// First invalid record aborts the batch.
    Strict,
    /// Invalid records are counted as rejected and excluded.
    Permissive,
}

/// Whether the entropy veto runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntropyGate {
    /// Runs for every batch with enough numeric samples.
    Mandatory,
    Disabled,
}

/// Outlier behaviour when the median absolute deviation is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MadZeroPolicy {
    /// Score against the mean absolute deviation instead.
    MeanAbsoluteDeviation,
    /// Report no outliers.
    NoOutliers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    pub validation_mode: ValidationMode,
    pub entropy_gate: EntropyGate,
    pub min_entropy_samples: usize,
    pub entropy_bins: usize,
    /// Ratios at or below this veto the batch.
    pub entropy_threshold: f64,
    pub fiscal_year_min: i32,
    pub fiscal_year_max: i32,
    pub outlier_z_threshold: f64,
    pub mad_zero_policy: MadZeroPolicy,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            validation_mode: ValidationMode::Strict,
            entropy_gate: EntropyGate::Mandatory,
            min_entropy_samples: 5,
            entropy_bins: 10,
            entropy_threshold: 0.40,
            fiscal_year_min: 2020,
            fiscal_year_max: 2045,
            outlier_z_threshold: 3.5,
            mad_zero_policy: MadZeroPolicy::MeanAbsoluteDeviation,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Aggregate
// ═══════════════════════════════════════════════════════════

/// Full engine configuration. Every section falls back to its defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub extractor: ExtractorConfig,
    pub auditor: AuditorConfig,
    pub quality: QualityConfig,
    pub parsability: ParsabilityConfig,
    pub statistics: StatisticsConfig,
}

impl AuditConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AuditConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Resolve config: `$DISCLOSURE_GATE_CONFIG`, then the default path, then defaults.
    /// An explicitly named file that does not exist is an error.
    pub fn resolve() -> Result<Self, ConfigError> {
        if let Ok(explicit) = std::env::var(CONFIG_ENV_VAR) {
            return Self::load(Path::new(&explicit));
        }
        let path = default_config_path();
        if path.is_file() {
            tracing::debug!(path = %path.display(), "Loading config file");
            return Self::load(&path);
        }
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ex = &self.extractor;
        if ex.rollover_window < 0 {
            return Err(invalid("extractor.rollover_window", "must be >= 0"));
        }
        if ex.pivot_window < 0 || ex.pivot_window > 99 {
            return Err(invalid("extractor.pivot_window", "must be within 0..=99"));
        }
        if ex.max_snippet_chars < 40 {
            return Err(invalid("extractor.max_snippet_chars", "must be >= 40"));
        }

        let au = &self.auditor;
        if au.year_ceiling < au.year_floor || au.speculative_year_ceiling < au.year_floor {
            return Err(invalid("auditor.year_ceiling", "must not precede year_floor"));
        }
        if au.cap_baseline_size == 0 {
            return Err(invalid("auditor.cap_baseline_size", "must be >= 1"));
        }
        for (field, value) in [
            ("auditor.cap_multiplier", au.cap_multiplier),
            ("auditor.speculative_cap_multiplier", au.speculative_cap_multiplier),
            ("auditor.fallback_currency_cap", au.fallback_currency_cap),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(field, "must be a positive finite number"));
            }
        }

        let q = &self.quality;
        let thresholds_ok = std::iter::once(q.default_threshold)
            .chain(q.thresholds.values().copied())
            .all(|t| (0.0..=1.0).contains(&t));
        if !thresholds_ok {
            return Err(invalid("quality.thresholds", "rates must be within 0.0..=1.0"));
        }

        let st = &self.statistics;
        if st.entropy_bins == 0 {
            return Err(invalid("statistics.entropy_bins", "must be >= 1"));
        }
        if !(0.0..=1.0).contains(&st.entropy_threshold) {
            return Err(invalid("statistics.entropy_threshold", "must be within 0.0..=1.0"));
        }
        if st.fiscal_year_max < st.fiscal_year_min {
            return Err(invalid("statistics.fiscal_year_max", "must not precede fiscal_year_min"));
        }
        if !st.outlier_z_threshold.is_finite() || st.outlier_z_threshold <= 0.0 {
            return Err(invalid("statistics.outlier_z_threshold", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
