//! Jira REST client.
//!
//! Thin authenticated wrapper over the endpoints this tool needs:
//! `GET /myself`, issue search, `GET /issue/createmeta` and `POST /issue`.
//! Requests go through the resolved [`Endpoint`], so callers never deal with
//! the gateway shape.

mod error;
mod fields;
mod issue_type;
mod search;

pub use error::JiraError;
pub use fields::{build_description, parse_story_points, IssueFields};
pub use issue_type::{select_issue_type, IssueType, IssueTypeRef};
pub use search::{build_text_query, escape_jql};

use crate::config::TrackerConfig;
use crate::endpoint::Endpoint;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

/// The authenticated account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
    /// Atlassian account id.
    pub account_id: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
}

/// Response of `POST /issue`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedIssue {
    /// Issue id.
    pub id: String,
    /// Issue key, e.g. `OPS-43`.
    pub key: String,
}

/// Authenticated Jira client bound to one endpoint.
pub struct JiraClient {
    http: Client,
    endpoint: Endpoint,
    email: String,
    api_token: String,
}

impl JiraClient {
    /// Builds a client from tracker settings.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Request`] if the HTTP client cannot be built.
    pub fn new(config: &TrackerConfig) -> Result<Self, JiraError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(concat!("dependabot-ticketer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            email: config.email.clone(),
            api_token: config.api_token.clone(),
        })
    }

    /// Starts an authenticated request for a logical path.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.endpoint.url(path))
            .basic_auth(&self.email, Some(&self.api_token))
            .header(ACCEPT, "application/json")
    }

    /// Sends a request and decodes a successful JSON response.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, JiraError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "Jira request failed");
            return Err(JiraError::from_response(status, body));
        }
        Ok(response.json::<T>().await?)
    }

    /// Checks the credentials by fetching the current user.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError`] if Jira rejects the credentials or is unreachable.
    pub async fn myself(&self) -> Result<JiraUser, JiraError> {
        self.send(self.request(Method::GET, "/myself")).await
    }

    /// Creates an issue and returns its id and key.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError`] if Jira rejects the issue.
    pub async fn create_issue(&self, fields: &IssueFields) -> Result<CreatedIssue, JiraError> {
        let created: CreatedIssue = self
            .send(self.request(Method::POST, "/issue").json(&fields.to_payload()))
            .await?;
        info!(key = %created.key, "Issue created");
        Ok(created)
    }
}
