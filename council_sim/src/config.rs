//! Harness configuration: engine parameters plus pacing and seeding.

use crate::error::SimError;
use council_core::CouncilParams;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

/// Member counts the harness accepts.
pub const MEMBER_RANGE: RangeInclusive<usize> = 1..=50;

/// Step counts the harness accepts.
pub const STEP_RANGE: RangeInclusive<usize> = 2..=100;

/// Pacing delays (milliseconds per step) the harness accepts.
pub const DELAY_RANGE_MS: RangeInclusive<u64> = 10..=300;

/// Configuration for a simulation run.
///
/// Loadable from TOML:
///
/// ```toml
/// delay_ms = 50
/// seed = 42
///
/// [params]
/// member_count = 10
/// conformity = 0.5
/// noise = 0.1
/// step_count = 30
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Engine parameters
    pub params: CouncilParams,

    /// Pause between steps, owned by the stepping loop
    pub delay_ms: u64,

    /// Master seed for determinism (None = OS entropy)
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            params: CouncilParams::default(),
            delay_ms: 50,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Creates a config around the given engine parameters.
    pub fn with_params(params: CouncilParams) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    /// Parses a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, SimError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Pacing delay between steps.
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Checks the harness ranges, then the engine's own.
    pub fn validate(&self) -> Result<(), SimError> {
        if !MEMBER_RANGE.contains(&self.params.member_count) {
            return Err(SimError::invalid(format!(
                "members must be in {}..={}, got {}",
                MEMBER_RANGE.start(),
                MEMBER_RANGE.end(),
                self.params.member_count
            )));
        }
        if !STEP_RANGE.contains(&self.params.step_count) {
            return Err(SimError::invalid(format!(
                "steps must be in {}..={}, got {}",
                STEP_RANGE.start(),
                STEP_RANGE.end(),
                self.params.step_count
            )));
        }
        if !DELAY_RANGE_MS.contains(&self.delay_ms) {
            return Err(SimError::invalid(format!(
                "delay must be in {}..={} ms, got {}",
                DELAY_RANGE_MS.start(),
                DELAY_RANGE_MS.end(),
                self.delay_ms
            )));
        }
        self.params.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pacing(), Duration::from_millis(50));
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_harness_ranges() {
        let mut config = SimConfig::default();
        config.params.member_count = 51;
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));

        let mut config = SimConfig::default();
        config.params.step_count = 1;
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));

        let mut config = SimConfig::default();
        config.delay_ms = 5;
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_engine_ranges_still_checked() {
        let mut config = SimConfig::default();
        config.params.noise = 1.5;
        assert!(matches!(config.validate(), Err(SimError::Council(_))));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SimConfig::from_toml_str(
            r#"
            seed = 7

            [params]
            conformity = 0.9
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.delay_ms, 50);
        assert_eq!(config.params.conformity, 0.9);
        assert_eq!(config.params.member_count, 10);
    }

    #[test]
    fn test_bad_toml_rejected() {
        let err = SimConfig::from_toml_str("delay_ms = \"fast\"").unwrap_err();
        assert!(matches!(err, SimError::ConfigFile(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "delay_ms = 120\n[params]\nmember_count = 3\nstep_count = 8").unwrap();

        let config = SimConfig::load(file.path()).unwrap();
        assert_eq!(config.delay_ms, 120);
        assert_eq!(config.params.member_count, 3);
        assert_eq!(config.params.step_count, 8);
        assert!(config.validate().is_ok());
    }

    proptest::proptest! {
        #[test]
        fn prop_in_range_configs_validate(
            members in 1usize..=50,
            steps in 2usize..=100,
            delay_ms in 10u64..=300,
            alpha in 0.0f64..=1.0,
            noise in 0.0f64..=1.0,
        ) {
            let config = SimConfig {
                params: CouncilParams::new(members, alpha, noise, steps),
                delay_ms,
                seed: None,
            };
            proptest::prop_assert!(config.validate().is_ok());
        }
    }
}
