//! Jira tracker settings.

use crate::endpoint::Endpoint;
use std::time::Duration;

/// How the issue type of new tickets is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueTypeSetting {
    /// Explicit issue type id; used as-is when set.
    pub id: Option<String>,
    /// Issue type name matched case-insensitively against the project's types.
    pub name: String,
}

/// Validated Jira configuration.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Resolved REST endpoint.
    pub endpoint: Endpoint,

    /// Account e-mail used for basic auth.
    pub email: String,

    /// API token used for basic auth.
    pub api_token: String,

    /// Project that tickets are searched in and created in.
    pub project_key: String,

    /// Base URL for `/browse/<key>` links, without trailing slash.
    pub browse_base_url: String,

    /// Issue type selection.
    pub issue_type: IssueTypeSetting,

    /// Labels added to every ticket.
    pub default_labels: Vec<String>,

    /// Custom field id for story points (e.g. `customfield_10016`).
    pub story_points_field: Option<String>,

    /// Raw story point value; parsed when the issue is assembled.
    pub story_points: Option<String>,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl TrackerConfig {
    /// Returns the browse URL for an issue key.
    #[must_use]
    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{key}", self.browse_base_url)
    }
}
