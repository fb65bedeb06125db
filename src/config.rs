//! Tunables for the analyzers, loadable from JSON.
//!
//! Every section and field has a default, so a config file only needs the
//! values it changes:
//!
//! ```
//! use poker_coach::config::CoachConfig;
//!
//! let cfg = CoachConfig::from_json_str(r#"{ "equity": { "iterations": 20000 } }"#).unwrap();
//! assert_eq!(cfg.equity.iterations, 20000);
//! assert_eq!(cfg.range.min_hands_for_stats, 20);
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Monte Carlo settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquityConfig {
    /// Simulated runouts per calculation.
    pub iterations: usize,
    /// Fixed seed for reproducible runs; drawn fresh when `None`.
    pub seed: Option<u64>,
    /// Runouts per independently seeded batch.
    pub batch_size: usize,
}

impl Default for EquityConfig {
    fn default() -> Self {
        Self { iterations: 5000, seed: None, batch_size: 500 }
    }
}

impl EquityConfig {
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Range estimation thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    /// Hands observed before VPIP/PFR are trusted.
    pub min_hands_for_stats: u32,
    /// Aggression factor below which a bet narrows the range.
    pub passive_aggression_factor: f64,
    /// Aggression factor above which a bet says little.
    pub aggressive_aggression_factor: f64,
    /// Share of the range a passive bettor keeps.
    pub passive_keep_fraction: f64,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            min_hands_for_stats: 20,
            passive_aggression_factor: 0.8,
            aggressive_aggression_factor: 2.5,
            passive_keep_fraction: 0.7,
        }
    }
}

/// Equity change sizes worth reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwingThresholds {
    pub notable: f64,
    pub dramatic: f64,
}

impl Default for SwingThresholds {
    fn default() -> Self {
        Self { notable: 0.15, dramatic: 0.25 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachConfig {
    pub equity: EquityConfig,
    pub range: RangeConfig,
    pub swings: SwingThresholds,
}

impl CoachConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: CoachConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let cfg = Self::from_json_str(&text)?;
        log::debug!("loaded config from {}", path.display());
        Ok(cfg)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.equity.seed = Some(seed);
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.equity.batch_size == 0 {
            return Err(ConfigError::Invalid("equity.batch_size must be positive".into()));
        }
        let r = &self.range;
        if !(0.0..=1.0).contains(&r.passive_keep_fraction) {
            return Err(ConfigError::Invalid(
                "range.passive_keep_fraction must be within 0..=1".into(),
            ));
        }
        if r.passive_aggression_factor > r.aggressive_aggression_factor {
            return Err(ConfigError::Invalid(
                "range.passive_aggression_factor must not exceed aggressive_aggression_factor"
                    .into(),
            ));
        }
        let s = &self.swings;
        if !(0.0 <= s.notable && s.notable <= s.dramatic) {
            return Err(ConfigError::Invalid("swings.notable must be in 0..=dramatic".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_all_defaults() {
        assert_eq!(CoachConfig::from_json_str("{}").unwrap(), CoachConfig::default());
    }

    #[test]
    fn nested_partial_overrides() {
        let cfg = CoachConfig::from_json_str(
            r#"{ "equity": { "seed": 7 }, "swings": { "dramatic": 0.4 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.equity.seed, Some(7));
        assert_eq!(cfg.equity.iterations, 5000);
        assert_eq!(cfg.swings.notable, 0.15);
        assert_eq!(cfg.swings.dramatic, 0.4);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            CoachConfig::from_json_str(r#"{ "equity": { "batch_size": 0 } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            CoachConfig::from_json_str(
                r#"{ "range": { "passive_aggression_factor": 3.0, "aggressive_aggression_factor": 2.0 } }"#
            ),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(CoachConfig::from_json_str("[1]"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            CoachConfig::from_path("/definitely/not/here.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}
