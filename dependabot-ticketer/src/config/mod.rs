//! Run configuration.
//!
//! Settings are collected once at startup into [`Settings`], validated into an
//! immutable [`RunnerConfig`], and passed down to every component from there.

mod error;
mod pull_request;
mod settings;
mod tracker;

pub use error::ConfigError;
pub use pull_request::PullRequestContext;
pub use settings::{Settings, DEFAULT_ISSUE_TYPE};
pub use tracker::{IssueTypeSetting, TrackerConfig};

use crate::llm::LlmConfig;
use std::time::Duration;

/// Timeout applied to every outbound request unless overridden.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// How ticket content is produced.
#[derive(Debug, Clone)]
pub enum GenerationMode {
    /// Draft content with a hosted language model; failures abort the run.
    Model {
        /// Model settings.
        config: LlmConfig,
        /// GitHub token for the models API.
        token: String,
    },
    /// Render content deterministically from templates.
    Template,
}

/// Validated configuration for a single run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    tracker: TrackerConfig,
    pull_request: PullRequestContext,
    generation: GenerationMode,
    debug: bool,
}

impl RunnerConfig {
    /// Creates a configuration from validated parts.
    #[must_use]
    pub fn new(
        tracker: TrackerConfig,
        pull_request: PullRequestContext,
        generation: GenerationMode,
        debug: bool,
    ) -> Self {
        Self {
            tracker,
            pull_request,
            generation,
            debug,
        }
    }

    /// Returns the Jira settings.
    pub fn tracker(&self) -> &TrackerConfig {
        &self.tracker
    }

    /// Returns the triggering pull request.
    pub fn pull_request(&self) -> &PullRequestContext {
        &self.pull_request
    }

    /// Returns the content generation mode.
    pub fn generation(&self) -> &GenerationMode {
        &self.generation
    }

    /// Returns whether verbose diagnostics are enabled.
    pub fn debug(&self) -> bool {
        self.debug
    }
}
