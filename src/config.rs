//! Runtime configuration.
//!
//! Defaults are overridden by environment variables (a `.env` file is read
//! first), which are in turn overridden by command line flags.

use crate::error::{ChurnError, Result};
use crate::schema::DEFAULT_DATA_FILE;
use std::path::PathBuf;

pub const ENV_DATA_FILE: &str = "CHURNSHIELD_DATA_FILE";
pub const ENV_ALLOW_DERIVED_RISK: &str = "CHURNSHIELD_ALLOW_DERIVED_RISK";
pub const ENV_BIND: &str = "CHURNSHIELD_BIND";

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// How strictly an uploaded file's columns are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadValidation {
    /// All three required columns must be present, `Risk Level` included.
    #[default]
    Strict,
    /// `Risk Level` may be absent; the classifier derives it.
    Derive,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub upload_validation: UploadValidation,
    pub bind: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            upload_validation: UploadValidation::default(),
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DATA_FILE).filter(|v| !v.trim().is_empty()) {
            config.data_file = PathBuf::from(path.trim());
        }

        if let Some(raw) = lookup(ENV_ALLOW_DERIVED_RISK) {
            if parse_flag(ENV_ALLOW_DERIVED_RISK, &raw)? {
                config.upload_validation = UploadValidation::Derive;
            }
        }

        if let Some(bind) = lookup(ENV_BIND).filter(|v| !v.trim().is_empty()) {
            config.bind = bind.trim().to_string();
        }

        Ok(config)
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ChurnError::Config(format!(
            "{} must be a boolean (got '{}')",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.data_file, PathBuf::from("Churn_predictions.csv"));
        assert_eq!(config.upload_validation, UploadValidation::Strict);
        assert_eq!(config.bind, DEFAULT_BIND);
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_DATA_FILE, "data/churn.csv"),
            (ENV_ALLOW_DERIVED_RISK, "Yes"),
            (ENV_BIND, "0.0.0.0:9000"),
        ]))
        .unwrap();
        assert_eq!(config.data_file, PathBuf::from("data/churn.csv"));
        assert_eq!(config.upload_validation, UploadValidation::Derive);
        assert_eq!(config.bind, "0.0.0.0:9000");
    }

    #[test]
    fn test_invalid_flag_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[(ENV_ALLOW_DERIVED_RISK, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ChurnError::Config(_)));
    }
}
