//! Issue field assembly.

use super::IssueTypeRef;
use crate::tickets::TicketContent;
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;
use tracing::warn;

/// Everything needed to create an issue.
#[derive(Debug, Clone)]
pub struct IssueFields {
    /// Target project key.
    pub project_key: String,
    /// Issue type.
    pub issue_type: IssueTypeRef,
    /// Summary line.
    pub summary: String,
    /// Atlassian Document Format description.
    pub description: Value,
    /// Labels.
    pub labels: BTreeSet<String>,
    /// Story point field id and value.
    pub story_points: Option<(String, f64)>,
}

impl IssueFields {
    /// Returns the `POST /issue` request body.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        let mut fields = Map::new();
        fields.insert("project".into(), json!({ "key": self.project_key }));
        fields.insert("issuetype".into(), self.issue_type.to_json());
        fields.insert("summary".into(), json!(self.summary));
        fields.insert("description".into(), self.description.clone());
        fields.insert("labels".into(), json!(self.labels));
        if let Some((field, points)) = &self.story_points {
            fields.insert(field.clone(), json!(points));
        }
        json!({ "fields": fields })
    }
}

/// Parses the story point setting.
///
/// Returns a value only when both the field id and a finite number are
/// configured. Non-numeric values are logged and ignored.
#[must_use]
pub fn parse_story_points(field: Option<&str>, value: Option<&str>) -> Option<(String, f64)> {
    let (field, value) = (field?, value?);
    match value.trim().parse::<f64>() {
        Ok(points) if points.is_finite() => Some((field.to_string(), points)),
        _ => {
            warn!(value, field, "Story points value is not a finite number, omitting field");
            None
        }
    }
}

/// Builds the rich-text description.
///
/// Layout: the generated description (one paragraph per blank-line separated
/// block), then "Acceptance Criteria" and "Definition of Done" bullet lists
/// when non-empty, then a link to the pull request.
#[must_use]
pub fn build_description(content: &TicketContent, pr_url: &str) -> Value {
    let mut blocks: Vec<Value> = content
        .description
        .split("\n\n")
        .filter_map(paragraph_from_text)
        .collect();

    for (title, items) in [
        ("Acceptance Criteria", &content.acceptance_criteria),
        ("Definition of Done", &content.definition_of_done),
    ] {
        if items.is_empty() {
            continue;
        }
        blocks.push(heading(title));
        blocks.push(bullet_list(items));
    }

    blocks.push(json!({
        "type": "paragraph",
        "content": [
            text("Pull request: "),
            {
                "type": "text",
                "text": pr_url,
                "marks": [{ "type": "link", "attrs": { "href": pr_url } }]
            }
        ]
    }));

    json!({ "type": "doc", "version": 1, "content": blocks })
}

fn text(value: &str) -> Value {
    json!({ "type": "text", "text": value })
}

/// Lines become text nodes joined by hard breaks; blank blocks are skipped.
fn paragraph_from_text(block: &str) -> Option<Value> {
    let lines: Vec<&str> = block
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .collect();
    if lines.is_empty() {
        return None;
    }

    let mut content = Vec::with_capacity(lines.len() * 2);
    for (i, line) in lines.into_iter().enumerate() {
        if i > 0 {
            content.push(json!({ "type": "hardBreak" }));
        }
        content.push(text(line));
    }
    Some(json!({ "type": "paragraph", "content": content }))
}

fn heading(title: &str) -> Value {
    json!({ "type": "heading", "attrs": { "level": 3 }, "content": [text(title)] })
}

fn bullet_list(items: &[String]) -> Value {
    let items: Vec<Value> = items
        .iter()
        .map(|item| {
            json!({
                "type": "listItem",
                "content": [{ "type": "paragraph", "content": [text(item)] }]
            })
        })
        .collect();
    json!({ "type": "bulletList", "content": items })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> TicketContent {
        TicketContent {
            title: "[Dependabot] Upgrade lodash".to_string(),
            description: "First line\nsecond line\n\n\nSecond paragraph".to_string(),
            acceptance_criteria: vec!["Tests pass".to_string()],
            definition_of_done: Vec::new(),
            labels: BTreeSet::new(),
        }
    }

    #[test]
    fn builds_document() {
        let doc = build_description(&content(), "https://github.com/acme/web/pull/7");
        let blocks = doc["content"].as_array().unwrap();

        assert_eq!(doc["type"], "doc");
        // two paragraphs, AC heading + list, PR link
        assert_eq!(blocks.len(), 5);
        assert_eq!(blocks[0]["content"][1]["type"], "hardBreak");
        assert_eq!(blocks[1]["content"][0]["text"], "Second paragraph");
        assert_eq!(blocks[2]["content"][0]["text"], "Acceptance Criteria");
        assert_eq!(
            blocks[3]["content"][0]["content"][0]["content"][0]["text"],
            "Tests pass"
        );
        assert_eq!(
            blocks[4]["content"][1]["marks"][0]["attrs"]["href"],
            "https://github.com/acme/web/pull/7"
        );
    }

    #[test]
    fn empty_description_only_links_pr() {
        let mut content = content();
        content.description = String::new();
        content.acceptance_criteria.clear();

        let doc = build_description(&content, "https://example.com/pr/1");
        assert_eq!(doc["content"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn parses_story_points() {
        assert_eq!(
            parse_story_points(Some("customfield_10016"), Some(" 3 ")),
            Some(("customfield_10016".to_string(), 3.0))
        );
        assert_eq!(parse_story_points(Some("customfield_10016"), Some("abc")), None);
        assert_eq!(parse_story_points(Some("customfield_10016"), Some("inf")), None);
        assert_eq!(parse_story_points(None, Some("3")), None);
        assert_eq!(parse_story_points(Some("customfield_10016"), None), None);
    }

    #[test]
    fn payload_includes_optional_story_points() {
        let mut fields = IssueFields {
            project_key: "OPS".to_string(),
            issue_type: IssueTypeRef::Name("Task".to_string()),
            summary: "[Dependabot] Upgrade lodash".to_string(),
            description: json!({"type": "doc"}),
            labels: ["dependabot".to_string()].into_iter().collect(),
            story_points: None,
        };
        let payload = fields.to_payload();
        assert_eq!(payload["fields"]["project"]["key"], "OPS");
        assert_eq!(payload["fields"]["labels"], json!(["dependabot"]));
        assert_eq!(payload["fields"].as_object().unwrap().len(), 5);

        fields.story_points = Some(("customfield_10016".to_string(), 2.5));
        let payload = fields.to_payload();
        assert_eq!(payload["fields"]["customfield_10016"], json!(2.5));
    }
}
