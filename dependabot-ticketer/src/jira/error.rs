//! Jira error types.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors returned by the Jira REST API wrapper.
#[derive(Debug, Error)]
pub enum JiraError {
    /// Transport failure, timeout, or undecodable response.
    #[error("Jira request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Jira answered with a non-success status.
    #[error("Jira returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Messages from Jira's error envelope.
        messages: Vec<String>,
        /// Raw response body.
        body: String,
    },
}

/// Jira's error envelope: `{"errorMessages": [...], "errors": {"field": "msg"}}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorEnvelope {
    #[serde(default)]
    error_messages: Vec<String>,
    #[serde(default)]
    errors: std::collections::BTreeMap<String, String>,
}

impl JiraError {
    /// Builds a status error from a response body.
    pub(crate) fn from_response(status: StatusCode, body: String) -> Self {
        let envelope: ErrorEnvelope = serde_json::from_str(&body).unwrap_or_default();
        let messages = envelope
            .error_messages
            .into_iter()
            .chain(
                envelope
                    .errors
                    .into_iter()
                    .map(|(field, message)| format!("{field}: {message}")),
            )
            .collect();
        Self::Status {
            status: status.as_u16(),
            messages,
            body,
        }
    }

    /// Returns the HTTP status, if Jira answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
        }
    }

    /// Returns true if Jira rejected the shape of a query rather than failing.
    #[must_use]
    pub fn is_query_rejection(&self) -> bool {
        matches!(
            self,
            Self::Status {
                status: 400 | 404 | 405 | 410,
                ..
            }
        )
    }

    /// Returns full diagnostic detail for verbose output.
    #[must_use]
    pub fn diagnostics(&self) -> String {
        match self {
            Self::Status {
                status,
                messages,
                body,
            } => format!("status={status} errors={messages:?} body={body}"),
            Self::Request(e) => format!("{e:?}"),
        }
    }
}
