//! Trainer configuration loaded from JSON.
//!
//! Every field has a default, so `{}` is a valid configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::range_engine::{
    error::ConfigError,
    parser::ParseOptions,
    quiz::AbsentPolicy,
};

/// Environment variable that overrides [`TrainerConfig::relay_url`].
pub const RELAY_URL_ENV: &str = "PREFLOP_RELAY_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Endpoint of the advice relay.
    #[serde(default = "default_relay_url")]
    pub relay_url: String,
    /// Reject untitled grids and keep AA/KK fold markers as entered.
    #[serde(default)]
    pub strict: bool,
    /// How grading treats a question whose hand has no entry.
    #[serde(default)]
    pub absent_policy: AbsentPolicy,
    /// Fixed seed for question draws; entropy when absent.
    #[serde(default)]
    pub rng_seed: Option<u64>,
    /// Optional 13×13 rank-bucket matrix for hints.
    #[serde(default)]
    pub bucket_path: Option<PathBuf>,
}

fn default_relay_url() -> String {
    "http://localhost:8787/api/advice".to_string()
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            relay_url: default_relay_url(),
            strict: false,
            absent_policy: AbsentPolicy::default(),
            rng_seed: None,
            bucket_path: None,
        }
    }
}

impl TrainerConfig {
    /// Load configuration from a JSON file, then apply environment overrides.
    /// Validation runs after the overrides, so `PREFLOP_RELAY_URL` can supply a
    /// relay URL the file leaves empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the merged
    /// configuration is invalid.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let mut config: Self = serde_json::from_str(&content)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or a field fails validation.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(RELAY_URL_ENV) {
            if !url.trim().is_empty() {
                self.relay_url = url;
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.relay_url.trim().is_empty() {
            return Err(ConfigError::EmptyRelayUrl);
        }
        Ok(())
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions { strict: self.strict }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = TrainerConfig::from_json("{}").unwrap();
        assert_eq!(config, TrainerConfig::default());
        assert_eq!(config.relay_url, "http://localhost:8787/api/advice");
        assert!(!config.parse_options().strict);
    }

    #[test]
    fn fields_are_read() {
        let config = TrainerConfig::from_json(
            r#"{
                "relay_url": "https://relay.example/api/advice",
                "strict": true,
                "absent_policy": "fold_only",
                "rng_seed": 42,
                "bucket_path": "buckets.json"
            }"#,
        )
        .unwrap();
        assert!(config.strict);
        assert_eq!(config.absent_policy, AbsentPolicy::FoldOnly);
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.bucket_path, Some(PathBuf::from("buckets.json")));
        assert!(config.parse_options().strict);
    }

    #[test]
    fn empty_relay_url_rejected() {
        let err = TrainerConfig::from_json(r#"{ "relay_url": "  " }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyRelayUrl));
    }

    #[test]
    fn malformed_json_rejected() {
        let err = TrainerConfig::from_json("{ strict: yes }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn env_relay_url_fills_empty_file_value() {
        let path = std::env::temp_dir().join(format!("preflop_trainer_{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "relay_url": "", "rng_seed": 3 }"#).unwrap();

        std::env::set_var(RELAY_URL_ENV, "https://relay.test/api/advice");
        let loaded = TrainerConfig::load(&path);
        std::env::remove_var(RELAY_URL_ENV);
        std::fs::remove_file(&path).unwrap();

        let config = loaded.unwrap();
        assert_eq!(config.relay_url, "https://relay.test/api/advice");
        assert_eq!(config.rng_seed, Some(3));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = TrainerConfig::load("/nonexistent/trainer.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }
}
