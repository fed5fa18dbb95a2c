//! Configuration file handling

use serde::Deserialize;
use std::path::Path;

use super::paths::config_path;
use super::Result;

/// Environment variable overriding `comparator.endpoint`
pub const ENV_ENDPOINT: &str = "SCENARIO_ASSERT_ENDPOINT";
/// Environment variable overriding `comparator.api_key`
pub const ENV_API_KEY: &str = "SCENARIO_ASSERT_API_KEY";
/// Environment variable overriding `comparator.model`
pub const ENV_MODEL: &str = "SCENARIO_ASSERT_MODEL";

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Semantic comparator settings
    #[serde(default)]
    pub comparator: ComparatorConfig,

    /// Scenario runner settings
    #[serde(default)]
    pub runner: RunnerConfig,
}

/// Settings for the semantic comparator
#[derive(Debug, Deserialize, Clone)]
pub struct ComparatorConfig {
    /// Chat-completions endpoint of the model backing the comparator
    #[serde(default)]
    pub endpoint: Option<String>,

    /// API credential sent with every request
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model name put in the request body
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Minimum word overlap for the offline lexical comparator
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
}

impl Default for ComparatorConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            model: default_model(),
            timeout_secs: default_timeout(),
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_timeout() -> u64 {
    60
}
fn default_similarity_threshold() -> f64 {
    0.5
}

/// Settings for the scenario runner
#[derive(Debug, Deserialize)]
pub struct RunnerConfig {
    /// Line logged between scenarios of a batch
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Reject semantic failures whose kind differs from the expected one
    #[serde(default)]
    pub strict_failure_kind: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            strict_failure_kind: false,
        }
    }
}

pub(crate) fn default_separator() -> String {
    "-".repeat(34)
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist. Environment
    /// overrides are applied in both cases.
    pub fn load() -> Result<Self> {
        let mut config = match config_path() {
            Some(path) if path.exists() => Self::read(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from an explicit file, then apply environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::read(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| super::Error::file_read(path, e))?;
        toml::from_str(&content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.comparator.endpoint = Some(endpoint);
        }
        if let Some(api_key) = lookup(ENV_API_KEY) {
            self.comparator.api_key = Some(api_key);
        }
        if let Some(model) = lookup(ENV_MODEL) {
            self.comparator.model = model;
        }
    }
}

impl ComparatorConfig {
    /// Endpoint and credential, or a configuration error naming what is missing
    ///
    /// Empty or whitespace-only values are treated as missing.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let endpoint = present(&self.endpoint).ok_or_else(|| {
            super::Error::Config(format!(
                "No comparator endpoint configured. Set comparator.endpoint or {ENV_ENDPOINT}"
            ))
        })?;
        let api_key = present(&self.api_key).ok_or_else(|| {
            super::Error::Config(format!(
                "No comparator API key configured. Set comparator.api_key or {ENV_API_KEY}"
            ))
        })?;
        Ok((endpoint, api_key))
    }

    /// Credential with everything but the last four characters hidden
    pub fn masked_api_key(&self) -> String {
        match &self.api_key {
            Some(key) if key.chars().count() > 4 => {
                let tail: String = key.chars().skip(key.chars().count() - 4).collect();
                format!("****{tail}")
            }
            Some(_) => "****".to_string(),
            None => "(unset)".to_string(),
        }
    }
}

/// Blank values count as unset
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.comparator.model, "gpt-4o-mini");
        assert_eq!(config.comparator.timeout_secs, 60);
        assert_eq!(config.runner.separator, "----------------------------------");
        assert!(!config.runner.strict_failure_kind);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[comparator]
endpoint = "https://models.example.com/v1"
api_key = "sk-test-1234"
timeout_secs = 5

[runner]
strict_failure_kind = true
"#
        )
        .unwrap();

        let config = Config::read(file.path()).unwrap();
        assert_eq!(
            config.comparator.endpoint.as_deref(),
            Some("https://models.example.com/v1")
        );
        assert_eq!(config.comparator.timeout_secs, 5);
        assert_eq!(config.comparator.model, "gpt-4o-mini");
        assert!(config.runner.strict_failure_kind);
        assert_eq!(config.comparator.masked_api_key(), "****1234");
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[comparator\nendpoint = ").unwrap();
        let err = Config::read(file.path()).unwrap_err();
        assert!(matches!(err, crate::Error::ConfigParse(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            ENV_ENDPOINT => Some("http://localhost:8080".to_string()),
            ENV_MODEL => Some("local-model".to_string()),
            _ => None,
        });
        assert_eq!(config.comparator.endpoint.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.comparator.model, "local-model");
        assert!(config.comparator.api_key.is_none());
    }

    #[test]
    fn test_missing_credentials() {
        let config = ComparatorConfig::default();
        assert!(matches!(config.credentials(), Err(crate::Error::Config(_))));
        assert_eq!(config.masked_api_key(), "(unset)");

        let blank = ComparatorConfig {
            endpoint: Some("https://models.example.com/v1".to_string()),
            api_key: Some("  ".to_string()),
            ..ComparatorConfig::default()
        };
        match blank.credentials() {
            Err(crate::Error::Config(msg)) => assert!(msg.contains(ENV_API_KEY)),
            other => panic!("Expected missing API key, got {other:?}"),
        }
    }
}
