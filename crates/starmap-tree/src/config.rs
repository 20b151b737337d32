//! Engine configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables of the reconciliation rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Coordinate change (degrees) below which a repeated approach report
    /// leaves the stored location alone.
    pub approach_update_tolerance_deg: f64,

    /// Distance (degrees, per axis) within which two surface reports
    /// describe the same place.
    pub proximity_tolerance_deg: f64,

    /// Codex entries recorded with a system address below this are bogus.
    pub min_codex_system_address: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            approach_update_tolerance_deg: 0.01,
            proximity_tolerance_deg: 0.1,
            min_codex_system_address: 1000,
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables with defaults for the rest.
    ///
    /// - `STARMAP_APPROACH_TOLERANCE`
    /// - `STARMAP_PROXIMITY_TOLERANCE`
    /// - `STARMAP_MIN_CODEX_ADDRESS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Create config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = parse_var(&lookup, "STARMAP_APPROACH_TOLERANCE")? {
            config.approach_update_tolerance_deg = v;
        }
        if let Some(v) = parse_var(&lookup, "STARMAP_PROXIMITY_TOLERANCE")? {
            config.proximity_tolerance_deg = v;
        }
        if let Some(v) = parse_var(&lookup, "STARMAP_MIN_CODEX_ADDRESS")? {
            config.min_codex_system_address = v;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject tolerances that would make every comparison fail or pass.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_tolerance("approach_update_tolerance_deg", self.approach_update_tolerance_deg)?;
        check_tolerance("proximity_tolerance_deg", self.proximity_tolerance_deg)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value: raw }),
    }
}

fn check_tolerance(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidTolerance { field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.proximity_tolerance_deg, 0.1);
        assert_eq!(config.approach_update_tolerance_deg, 0.01);
    }

    #[test]
    fn variables_override_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("STARMAP_PROXIMITY_TOLERANCE", "0.25"),
            ("STARMAP_MIN_CODEX_ADDRESS", " 5 "),
        ]))
        .unwrap();
        assert_eq!(config.proximity_tolerance_deg, 0.25);
        assert_eq!(config.min_codex_system_address, 5);
    }

    #[test]
    fn unparsable_variable_is_an_error() {
        let err = EngineConfig::from_lookup(lookup(&[("STARMAP_MIN_CODEX_ADDRESS", "lots")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var: "STARMAP_MIN_CODEX_ADDRESS", .. }
        ));
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let err = EngineConfig::from_lookup(lookup(&[("STARMAP_APPROACH_TOLERANCE", "-1")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTolerance { .. }));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "min_codex_system_address": 10 }"#).unwrap();
        assert_eq!(config.min_codex_system_address, 10);
        assert_eq!(config.proximity_tolerance_deg, 0.1);
    }
}
