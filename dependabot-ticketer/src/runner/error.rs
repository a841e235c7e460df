//! Runner error types.

use crate::config::ConfigError;
use crate::jira::JiraError;
use crate::llm::LlmError;
use crate::templates::TemplateError;

/// Fatal errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Missing or invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The Jira HTTP client could not be built.
    #[error("Failed to build Jira client: {0}")]
    Client(#[source] JiraError),

    /// Jira rejected the identity check.
    #[error("Jira authentication failed: {0}")]
    Authentication(#[source] JiraError),

    /// No ticket content could be produced.
    #[error("Ticket content generation failed: {0}")]
    Generation(#[from] LlmError),

    /// Templated content could not be rendered.
    #[error("Failed to render ticket content: {0}")]
    Template(#[from] TemplateError),

    /// Jira rejected issue creation.
    #[error("Jira issue creation failed: {0}")]
    Creation(#[source] JiraError),
}

impl RunnerError {
    /// Returns remote diagnostic detail (status, error messages, body), if any.
    #[must_use]
    pub fn diagnostics(&self) -> Option<String> {
        match self {
            Self::Client(e) | Self::Authentication(e) | Self::Creation(e) => Some(e.diagnostics()),
            Self::Generation(LlmError::Api(e)) => Some(format!("{e:?}")),
            Self::Config(_) | Self::Generation(_) | Self::Template(_) => None,
        }
    }
}
