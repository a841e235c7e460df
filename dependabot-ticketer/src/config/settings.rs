//! Raw settings and validation.

use super::{
    ConfigError, GenerationMode, IssueTypeSetting, PullRequestContext, RunnerConfig,
    TrackerConfig, REQUEST_TIMEOUT,
};
use crate::endpoint::{Endpoint, EndpointSettings, GatewayMode};
use crate::llm::LlmConfig;
use std::path::PathBuf;
use tracing::debug;
use url::Url;

/// Issue type name used when none is configured.
pub const DEFAULT_ISSUE_TYPE: &str = "Task";

/// Unvalidated settings as collected from the environment.
///
/// Empty strings are treated as unset, since CI systems commonly pass `""`
/// for secrets that are not defined.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// `JIRA_BASE_URL`: site root for site mode and browse links.
    pub jira_base_url: Option<String>,
    /// `JIRA_GATEWAY_URL`: gateway root for proxy mode.
    pub jira_gateway_url: Option<String>,
    /// `JIRA_CLOUD_ID`: cloud id for proxy mode.
    pub jira_cloud_id: Option<String>,
    /// `JIRA_MODE`: `site`, `proxy` or `auto`.
    pub jira_mode: Option<String>,
    /// `JIRA_EMAIL`.
    pub jira_email: Option<String>,
    /// `JIRA_API_TOKEN`.
    pub jira_api_token: Option<String>,
    /// `JIRA_PROJECT_KEY`.
    pub jira_project_key: Option<String>,
    /// `JIRA_BROWSE_BASE_URL`.
    pub jira_browse_base_url: Option<String>,
    /// `JIRA_ISSUE_TYPE`.
    pub jira_issue_type: Option<String>,
    /// `JIRA_ISSUE_TYPE_ID`.
    pub jira_issue_type_id: Option<String>,
    /// `JIRA_DEFAULT_LABELS`: comma separated.
    pub default_labels: Option<String>,
    /// `JIRA_STORY_POINTS_FIELD`.
    pub story_points_field: Option<String>,
    /// `JIRA_STORY_POINTS`.
    pub story_points: Option<String>,
    /// `USE_LLM`.
    pub use_llm: bool,
    /// `LLM_MODEL`.
    pub llm_model: Option<String>,
    /// `LLM_CONFIG_PATH`.
    pub llm_config_path: Option<PathBuf>,
    /// `GITHUB_TOKEN`: used for GitHub Models.
    pub github_token: Option<String>,
    /// `GITHUB_REPOSITORY`.
    pub repository: Option<String>,
    /// `PR_NUMBER`.
    pub pr_number: Option<String>,
    /// `PR_TITLE`.
    pub pr_title: Option<String>,
    /// `PR_BODY`.
    pub pr_body: Option<String>,
    /// `PR_URL`.
    pub pr_url: Option<String>,
    /// `DEBUG`.
    pub debug: bool,
}

impl Settings {
    /// Validates the settings into an immutable [`RunnerConfig`].
    ///
    /// Checks run in a fixed order and stop at the first problem, naming the
    /// environment variable to fix. No network calls are made.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for missing or invalid values.
    pub fn validate(&self) -> Result<RunnerConfig, ConfigError> {
        let pull_request = PullRequestContext {
            repository: required(&self.repository, "GITHUB_REPOSITORY")?,
            number: parse_number(&self.pr_number, "PR_NUMBER")?,
            title: required(&self.pr_title, "PR_TITLE")?,
            body: optional(&self.pr_body),
            url: parse_url(&required(&self.pr_url, "PR_URL")?, "PR_URL")?,
        };

        let email = required(&self.jira_email, "JIRA_EMAIL")?;
        let api_token = required(&self.jira_api_token, "JIRA_API_TOKEN")?;
        let project_key = required(&self.jira_project_key, "JIRA_PROJECT_KEY")?;

        let endpoint = Endpoint::resolve(&EndpointSettings {
            site_url: self.jira_base_url.as_deref(),
            gateway_url: self.jira_gateway_url.as_deref(),
            cloud_id: self.jira_cloud_id.as_deref(),
            mode: GatewayMode::parse_override(self.jira_mode.as_deref())?,
        })?;

        let browse_base_url = match optional(&self.jira_browse_base_url) {
            Some(url) => parse_url(&url, "JIRA_BROWSE_BASE_URL")?,
            None => match optional(&self.jira_base_url) {
                Some(url) => parse_url(&url, "JIRA_BASE_URL")?,
                None => {
                    return Err(ConfigError::Missing {
                        variable: "JIRA_BROWSE_BASE_URL",
                    })
                }
            },
        };

        let tracker = TrackerConfig {
            endpoint,
            email,
            api_token,
            project_key,
            browse_base_url: browse_base_url.trim_end_matches('/').to_string(),
            issue_type: IssueTypeSetting {
                id: optional(&self.jira_issue_type_id),
                name: optional(&self.jira_issue_type)
                    .unwrap_or_else(|| DEFAULT_ISSUE_TYPE.to_string()),
            },
            default_labels: split_labels(self.default_labels.as_deref()),
            story_points_field: optional(&self.story_points_field),
            story_points: optional(&self.story_points),
            timeout: REQUEST_TIMEOUT,
        };

        let generation = if self.use_llm {
            GenerationMode::Model {
                token: required(&self.github_token, "GITHUB_TOKEN")?,
                config: LlmConfig::load(
                    self.llm_config_path.as_deref(),
                    self.llm_model.as_deref(),
                    REQUEST_TIMEOUT,
                )?,
            }
        } else {
            GenerationMode::Template
        };

        debug!(
            mode = tracker.endpoint.mode().as_str(),
            project = %tracker.project_key,
            use_llm = self.use_llm,
            "Configuration validated"
        );

        Ok(RunnerConfig::new(tracker, pull_request, generation, self.debug))
    }
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required(value: &Option<String>, variable: &'static str) -> Result<String, ConfigError> {
    optional(value).ok_or(ConfigError::Missing { variable })
}

fn parse_number(value: &Option<String>, variable: &'static str) -> Result<Option<u64>, ConfigError> {
    optional(value)
        .map(|v| {
            v.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                variable,
                message: format!("'{v}' is not a pull request number: {e}"),
            })
        })
        .transpose()
}

fn parse_url(value: &str, variable: &'static str) -> Result<String, ConfigError> {
    Url::parse(value)
        .map(|_| value.to_string())
        .map_err(|e| ConfigError::InvalidValue {
            variable,
            message: e.to_string(),
        })
}

fn split_labels(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> Settings {
        Settings {
            jira_base_url: Some("https://acme.atlassian.net".to_string()),
            jira_email: Some("bot@acme.test".to_string()),
            jira_api_token: Some("secret".to_string()),
            jira_project_key: Some("OPS".to_string()),
            default_labels: Some("dependabot, deps ,".to_string()),
            use_llm: true,
            github_token: Some("ghp_test".to_string()),
            repository: Some("acme/web".to_string()),
            pr_number: Some("7".to_string()),
            pr_title: Some("Bump lodash from 4.17.20 to 4.17.21".to_string()),
            pr_url: Some("https://github.com/acme/web/pull/7".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn validates_complete_settings() {
        let config = complete().validate().unwrap();
        let tracker = config.tracker();

        assert_eq!(tracker.project_key, "OPS");
        assert_eq!(tracker.endpoint.mode(), GatewayMode::Site);
        assert_eq!(
            tracker.browse_url("OPS-1"),
            "https://acme.atlassian.net/browse/OPS-1"
        );
        assert_eq!(tracker.issue_type.name, DEFAULT_ISSUE_TYPE);
        assert_eq!(tracker.default_labels, vec!["dependabot", "deps"]);
        assert_eq!(tracker.timeout, REQUEST_TIMEOUT);
        assert!(matches!(config.generation(), GenerationMode::Model { .. }));
        assert_eq!(config.pull_request().number, Some(7));
    }

    #[test]
    fn names_first_missing_value() {
        let mut settings = complete();
        settings.jira_api_token = Some("   ".to_string());

        let error = settings.validate().unwrap_err();
        assert!(matches!(
            error,
            ConfigError::Missing {
                variable: "JIRA_API_TOKEN"
            }
        ));
        assert!(error.to_string().contains("JIRA_API_TOKEN"));
    }

    #[test]
    fn blank_pull_request_number_is_unset() {
        let mut settings = complete();
        settings.pr_number = Some(String::new());

        let config = settings.validate().unwrap();
        assert_eq!(config.pull_request().number, None);
    }

    #[test]
    fn rejects_non_numeric_pull_request_number() {
        let mut settings = complete();
        settings.pr_number = Some("seven".to_string());

        let error = settings.validate().unwrap_err();
        assert!(matches!(
            error,
            ConfigError::InvalidValue {
                variable: "PR_NUMBER",
                ..
            }
        ));
        assert!(error.to_string().contains("PR_NUMBER"));
    }

    #[test]
    fn requires_pull_request_url() {
        let mut settings = complete();
        settings.pr_url = None;

        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Missing { variable: "PR_URL" })
        ));
    }

    #[test]
    fn rejects_malformed_pull_request_url() {
        let mut settings = complete();
        settings.pr_url = Some("not a url".to_string());

        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue {
                variable: "PR_URL",
                ..
            })
        ));
    }

    #[test]
    fn github_token_only_required_with_llm() {
        let mut settings = complete();
        settings.github_token = None;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Missing {
                variable: "GITHUB_TOKEN"
            })
        ));

        settings.use_llm = false;
        let config = settings.validate().unwrap();
        assert!(matches!(config.generation(), GenerationMode::Template));
    }

    #[test]
    fn proxy_mode_needs_browse_base() {
        let mut settings = complete();
        settings.jira_base_url = None;
        settings.jira_gateway_url = Some("https://api.atlassian.com".to_string());
        settings.jira_cloud_id = Some("cloud-1".to_string());

        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Missing {
                variable: "JIRA_BROWSE_BASE_URL"
            })
        ));

        settings.jira_browse_base_url = Some("https://acme.atlassian.net/".to_string());
        let config = settings.validate().unwrap();
        assert_eq!(config.tracker().endpoint.mode(), GatewayMode::Proxy);
        assert_eq!(
            config.tracker().browse_url("OPS-2"),
            "https://acme.atlassian.net/browse/OPS-2"
        );
    }

    #[test]
    fn reports_unresolvable_endpoint() {
        let mut settings = complete();
        settings.jira_base_url = None;
        settings.jira_browse_base_url = Some("https://acme.atlassian.net".to_string());

        assert!(matches!(
            settings.validate(),
            Err(ConfigError::EndpointUnresolved)
        ));
    }
}
