//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while collecting and validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting is absent or empty.
    #[error("Missing required configuration: {variable}")]
    Missing { variable: &'static str },

    /// A setting is present but unusable.
    #[error("Invalid value for {variable}: {message}")]
    InvalidValue {
        variable: &'static str,
        message: String,
    },

    /// Neither gateway shape has the inputs it needs.
    #[error(
        "No Jira endpoint configured: set JIRA_BASE_URL for site mode, \
or JIRA_CLOUD_ID together with JIRA_GATEWAY_URL for proxy mode"
    )]
    EndpointUnresolved,

    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
