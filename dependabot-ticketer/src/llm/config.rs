//! Language model configuration.

use crate::config::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Model used when neither the environment nor the config file names one.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// GitHub Models API host.
pub const DEFAULT_ENDPOINT: &str = "https://models.github.ai";

/// Pull request body characters forwarded to the model.
pub const DEFAULT_MAX_BODY_CHARS: usize = 4000;

/// Top-level structure for the config file with a single `[llm]` section.
#[derive(Debug, Clone, Default, Deserialize)]
struct LlmConfigFile {
    #[serde(default)]
    llm: LlmConfigSection,
}

/// The `[llm]` section; every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct LlmConfigSection {
    model: Option<String>,
    endpoint: Option<String>,
    temperature: Option<f64>,
    timeout_secs: Option<u64>,
    max_body_chars: Option<usize>,
    json_response_format: Option<bool>,
}

/// Resolved language model settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    /// Model identifier, e.g. `openai/gpt-4o-mini`.
    pub model: String,
    /// API host for chat completions.
    pub endpoint: String,
    /// Sampling temperature, if any.
    pub temperature: Option<f64>,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum pull request body characters embedded in the prompt.
    pub max_body_chars: usize,
    /// Whether to request `response_format: json_object`.
    pub json_response_format: bool,
}

impl LlmConfig {
    /// Returns the defaults with the given request timeout.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            temperature: None,
            timeout,
            max_body_chars: DEFAULT_MAX_BODY_CHARS,
            json_response_format: true,
        }
    }

    /// Resolves settings from an optional config file and a model override.
    ///
    /// The override (from `LLM_MODEL`) takes precedence over the file, which
    /// takes precedence over [`DEFAULT_MODEL`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
    pub fn load(
        path: Option<&Path>,
        model_override: Option<&str>,
        default_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let section = match path {
            Some(path) => load_section(path)?,
            None => LlmConfigSection::default(),
        };

        let mut config = Self::with_timeout(default_timeout);
        if let Some(model) = non_blank(model_override).or(non_blank(section.model.as_deref())) {
            config.model = model.to_string();
        }
        if let Some(endpoint) = non_blank(section.endpoint.as_deref()) {
            config.endpoint = endpoint.trim_end_matches('/').to_string();
        }
        config.temperature = section.temperature.and_then(validate_temperature);
        if let Some(secs) = section.timeout_secs.filter(|s| *s > 0) {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(chars) = section.max_body_chars {
            config.max_body_chars = chars;
        }
        if let Some(json) = section.json_response_format {
            config.json_response_format = json;
        }
        Ok(config)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Validates that a temperature value is finite and within 0.0-2.0.
fn validate_temperature(value: f64) -> Option<f64> {
    if !value.is_finite() || !(0.0..=2.0).contains(&value) {
        warn!("Invalid temperature {value} in LLM config: must be finite and in range 0.0-2.0");
        return None;
    }
    Some(value)
}

/// Loads the `[llm]` section if the file exists.
fn load_section(path: &Path) -> Result<LlmConfigSection, ConfigError> {
    if !path.exists() {
        warn!(path = %path.display(), "LLM config file not found, using defaults");
        return Ok(LlmConfigSection::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.display().to_string(),
        source,
    })?;
    let parsed: LlmConfigFile =
        toml::from_str(&contents).map_err(|source| ConfigError::TomlError {
            path: path.display().to_string(),
            source,
        })?;
    Ok(parsed.llm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TIMEOUT: Duration = Duration::from_secs(20);

    fn write_config(temp: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = temp.path().join("config.toml");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults_without_file_or_override() {
        let config = LlmConfig::load(None, None, TIMEOUT).unwrap();
        assert_eq!(config, LlmConfig::with_timeout(TIMEOUT));
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.toml");
        let config = LlmConfig::load(Some(&path), None, TIMEOUT).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn parses_file() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
[llm]
model = "openai/gpt-4.1"
endpoint = "https://models.example.com/"
temperature = 0.2
timeout-secs = 45
max-body-chars = 1000
json-response-format = false
"#,
        );
        let config = LlmConfig::load(Some(&path), None, TIMEOUT).unwrap();

        assert_eq!(config.model, "openai/gpt-4.1");
        assert_eq!(config.endpoint, "https://models.example.com");
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(config.timeout, Duration::from_secs(45));
        assert_eq!(config.max_body_chars, 1000);
        assert!(!config.json_response_format);
    }

    #[test]
    fn override_beats_file_model() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "[llm]\nmodel = \"openai/gpt-4.1\"\n");
        let config = LlmConfig::load(Some(&path), Some("meta/llama-3"), TIMEOUT).unwrap();
        assert_eq!(config.model, "meta/llama-3");
    }

    #[test]
    fn drops_out_of_range_temperature() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "[llm]\ntemperature = 3.5\n");
        let config = LlmConfig::load(Some(&path), None, TIMEOUT).unwrap();
        assert_eq!(config.temperature, None);
    }

    #[test]
    fn reports_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "not = [valid");
        let error = LlmConfig::load(Some(&path), None, TIMEOUT).unwrap_err();
        assert!(matches!(error, ConfigError::TomlError { .. }));
    }
}
