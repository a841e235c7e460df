//! Issue type resolution.

use super::{JiraClient, JiraError};
use crate::config::IssueTypeSetting;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

/// How the issue type is referenced in the create payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueTypeRef {
    /// By id.
    Id(String),
    /// By name.
    Name(String),
}

impl IssueTypeRef {
    /// Returns the `issuetype` field value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Id(id) => json!({ "id": id }),
            Self::Name(name) => json!({ "name": name }),
        }
    }
}

/// An issue type available in a project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueType {
    /// Issue type id.
    pub id: String,
    /// Display name.
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct CreateMeta {
    #[serde(default)]
    projects: Vec<CreateMetaProject>,
}

#[derive(Debug, Deserialize)]
struct CreateMetaProject {
    #[serde(default)]
    issuetypes: Vec<IssueType>,
}

/// Picks an issue type by case-insensitive name, else the first available.
#[must_use]
pub fn select_issue_type(types: &[IssueType], name: &str) -> Option<IssueTypeRef> {
    if let Some(found) = types.iter().find(|t| t.name.eq_ignore_ascii_case(name)) {
        return Some(IssueTypeRef::Id(found.id.clone()));
    }
    let first = types.first()?;
    warn!(
        requested = name,
        using = %first.name,
        "Issue type not found in project, using first available"
    );
    Some(IssueTypeRef::Id(first.id.clone()))
}

impl JiraClient {
    /// Lists the issue types that can be created in a project.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError`] if the request fails.
    pub async fn issue_types(&self, project_key: &str) -> Result<Vec<IssueType>, JiraError> {
        let meta: CreateMeta = self
            .send(self.request(Method::GET, "/issue/createmeta").query(&[
                ("projectKeys", project_key),
                ("expand", "projects.issuetypes"),
            ]))
            .await?;
        Ok(meta
            .projects
            .into_iter()
            .flat_map(|project| project.issuetypes)
            .collect())
    }

    /// Resolves the issue type for new tickets. Never fails: a configured id is
    /// used directly, and lookup problems fall back to the configured name.
    pub async fn resolve_issue_type(
        &self,
        project_key: &str,
        setting: &IssueTypeSetting,
    ) -> IssueTypeRef {
        if let Some(id) = &setting.id {
            return IssueTypeRef::Id(id.clone());
        }

        match self.issue_types(project_key).await {
            Ok(types) => {
                debug!(count = types.len(), "Fetched project issue types");
                select_issue_type(&types, &setting.name)
                    .unwrap_or_else(|| IssueTypeRef::Name(setting.name.clone()))
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch issue types, using configured name");
                IssueTypeRef::Name(setting.name.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types() -> Vec<IssueType> {
        vec![
            IssueType {
                id: "10001".to_string(),
                name: "Story".to_string(),
            },
            IssueType {
                id: "10002".to_string(),
                name: "Task".to_string(),
            },
        ]
    }

    #[test]
    fn matches_name_case_insensitively() {
        assert_eq!(
            select_issue_type(&types(), "task"),
            Some(IssueTypeRef::Id("10002".to_string()))
        );
    }

    #[test]
    fn falls_back_to_first_type() {
        assert_eq!(
            select_issue_type(&types(), "Chore"),
            Some(IssueTypeRef::Id("10001".to_string()))
        );
    }

    #[test]
    fn no_types_yields_none() {
        assert_eq!(select_issue_type(&[], "Task"), None);
    }

    #[test]
    fn serializes_reference() {
        assert_eq!(
            IssueTypeRef::Name("Task".to_string()).to_json(),
            json!({"name": "Task"})
        );
        assert_eq!(
            IssueTypeRef::Id("1".to_string()).to_json(),
            json!({"id": "1"})
        );
    }
}
