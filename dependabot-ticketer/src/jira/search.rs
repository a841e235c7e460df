//! Duplicate lookup by full-text search.

use super::{JiraClient, JiraError};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<IssueKey>,
}

#[derive(Debug, Deserialize)]
struct IssueKey {
    key: String,
}

/// Escapes backslashes and double quotes for a JQL string literal.
#[must_use]
pub fn escape_jql(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Builds a query matching issues in `project_key` whose text contains
/// `text` as an exact phrase, newest first.
#[must_use]
pub fn build_text_query(project_key: &str, text: &str) -> String {
    format!(
        "project = \"{}\" AND text ~ \"\\\"{}\\\"\" ORDER BY created DESC",
        escape_jql(project_key),
        escape_jql(text)
    )
}

impl JiraClient {
    /// Returns the key of the newest issue in `project_key` mentioning `text`.
    ///
    /// Uses `POST /search/jql` first. If Jira rejects that request shape, the
    /// legacy `GET /search` shape is tried once.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError`] if both shapes fail, or on transport errors.
    pub async fn search_text(
        &self,
        project_key: &str,
        text: &str,
    ) -> Result<Option<String>, JiraError> {
        let jql = build_text_query(project_key, text);
        debug!(jql = %jql, "Searching for existing ticket");

        let primary = self
            .send::<SearchResponse>(self.request(Method::POST, "/search/jql").json(&json!({
                "jql": jql,
                "maxResults": 1,
                "fields": ["key"],
            })))
            .await;

        let response = match primary {
            Err(e) if e.is_query_rejection() => {
                warn!(error = %e, "Search request shape rejected, retrying with legacy shape");
                self.send::<SearchResponse>(self.request(Method::GET, "/search").query(&[
                    ("jql", jql.as_str()),
                    ("maxResults", "1"),
                    ("fields", "key"),
                ]))
                .await?
            }
            other => other?,
        };

        Ok(response.issues.into_iter().next().map(|issue| issue.key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(escape_jql(r#"a"b\c"#), r#"a\"b\\c"#);
    }

    #[test]
    fn builds_phrase_query() {
        assert_eq!(
            build_text_query("OPS", "https://github.com/acme/web/pull/7"),
            r#"project = "OPS" AND text ~ "\"https://github.com/acme/web/pull/7\"" ORDER BY created DESC"#
        );
    }
}
