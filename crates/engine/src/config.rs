//! Engine configuration — thresholds and rates with TOML parsing and
//! explicit validation. Defaults reproduce the production heuristics.

use serde::Deserialize;

use auditgrid_core::AuditError;

use crate::aging::DEFAULT_ALLOWANCE_RATES;
use crate::sampler::CENSUS_SIZE;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Gap magnitude at or below which ledger and subledger are declared
    /// matched.
    pub materiality: i64,
    /// Strict upper bound on the absolute difference when matching an
    /// invoice amount against a variance.
    pub match_tolerance: i64,
    /// Round-figure multiple that marks a gap as a manual top-side entry.
    pub round_journal_multiple: i64,
    /// Days on each side of the reporting date scanned by the cutoff test.
    pub cutoff_window_days: i64,
    /// Per-bucket allowance percentages, not-yet-due first.
    pub allowance_rates: [f64; 5],
    /// Confirmation sample size, census items included.
    pub sample_size: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            materiality: 1_000,
            match_tolerance: 100,
            round_journal_multiple: 1_000_000,
            cutoff_window_days: 7,
            allowance_rates: DEFAULT_ALLOWANCE_RATES,
            sample_size: 5,
        }
    }
}

impl AuditConfig {
    pub fn from_toml(input: &str) -> Result<Self, AuditError> {
        let config: AuditConfig =
            toml::from_str(input).map_err(|e| AuditError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AuditError> {
        if self.materiality < 0 {
            return Err(AuditError::ConfigValidation(
                "materiality must be non-negative".into(),
            ));
        }
        if self.match_tolerance <= 0 {
            return Err(AuditError::ConfigValidation(
                "match tolerance must be positive".into(),
            ));
        }
        if self.round_journal_multiple <= 0 {
            return Err(AuditError::ConfigValidation(
                "round journal multiple must be positive".into(),
            ));
        }
        if self.cutoff_window_days < 0 {
            return Err(AuditError::ConfigValidation(
                "cutoff window must be non-negative".into(),
            ));
        }
        for rate in &self.allowance_rates {
            if !(0.0..=100.0).contains(rate) {
                return Err(AuditError::ConfigValidation(format!(
                    "allowance rate {rate} outside 0-100"
                )));
            }
        }
        if self.sample_size < CENSUS_SIZE {
            return Err(AuditError::ConfigValidation(format!(
                "sample size must cover the census of {CENSUS_SIZE}"
            )));
        }
        Ok(())
    }
}
