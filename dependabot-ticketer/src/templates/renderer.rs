//! Template renderer.

use crate::config::PullRequestContext;
use crate::extract::Extraction;
use handlebars::{no_escape, Handlebars};
use serde_json::{json, Value};

/// User message sent to the language model.
const USER_PROMPT_TEMPLATE: &str = "\
Draft a Jira ticket for the following dependency upgrade pull request.

Repository: {{repository}}
Pull request: {{pr_url}}
Title: {{pr_title}}

Parsed upgrades:
{{#each upgrades}}
- {{name}}: {{from}} -> {{to}}
{{else}}
- (none detected, infer from the title and body)
{{/each}}

Pull request body (truncated):
{{pr_body}}
";

/// Description used when tickets are rendered without a language model.
const DESCRIPTION_TEMPLATE: &str = "\
Dependabot opened {{pr_url}} in {{repository}}.
{{#if upgrades}}

The pull request upgrades:
{{#each upgrades}}
- {{name}} from {{from}} to {{to}}
{{/each}}
{{else}}

No package versions could be parsed from the pull request; see the pull request for details.
{{/if}}";

/// Creates a configured Handlebars registry.
///
/// The registry is configured with:
/// - No HTML escaping (prompts and descriptions are plain text)
/// - Strict mode (catches missing variables)
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);
    hbs
}

/// Renders prompts and templated ticket text.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Creates a new template renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlebars: create_handlebars_registry(),
        }
    }

    /// Renders the user message for the language model.
    ///
    /// The pull request body is cut to `max_body_chars` characters.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_user_prompt(
        &self,
        pull_request: &PullRequestContext,
        extraction: &Extraction,
        max_body_chars: usize,
    ) -> Result<String, super::TemplateError> {
        let body = pull_request.body.as_deref().unwrap_or_default();
        let mut data = template_data(pull_request, extraction);
        data["pr_body"] = json!(truncate_chars(body, max_body_chars));

        self.render_template(USER_PROMPT_TEMPLATE, &data)
    }

    /// Renders a ticket description without a language model.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_description(
        &self,
        pull_request: &PullRequestContext,
        extraction: &Extraction,
    ) -> Result<String, super::TemplateError> {
        let data = template_data(pull_request, extraction);
        self.render_template(DESCRIPTION_TEMPLATE, &data)
            .map(|text| text.trim_end().to_string())
    }

    /// Renders a template with the given data.
    fn render_template(&self, template: &str, data: &Value) -> Result<String, super::TemplateError> {
        Ok(self.handlebars.render_template(template, data)?)
    }
}

fn template_data(pull_request: &PullRequestContext, extraction: &Extraction) -> Value {
    json!({
        "repository": pull_request.repository,
        "pr_url": pull_request.url,
        "pr_title": pull_request.title,
        "upgrades": extraction.upgrades,
    })
}

/// Returns at most `max` characters of `text`, cut on a char boundary.
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_upgrades;

    fn sample_pull_request(body: Option<&str>) -> PullRequestContext {
        PullRequestContext {
            repository: "acme/web".to_string(),
            number: Some(7),
            title: "Bump lodash from 4.17.20 to 4.17.21".to_string(),
            body: body.map(str::to_string),
            url: "https://github.com/acme/web/pull/7".to_string(),
        }
    }

    #[test]
    fn renders_user_prompt_with_upgrades() {
        let renderer = TemplateRenderer::new();
        let pr = sample_pull_request(Some("Release notes <b>here</b>"));
        let extraction = extract_upgrades(&pr.title, pr.body.as_deref());

        let prompt = renderer.render_user_prompt(&pr, &extraction, 4000).unwrap();

        assert!(prompt.contains("Repository: acme/web"));
        assert!(prompt.contains("- lodash: 4.17.20 -> 4.17.21"));
        // Should NOT escape HTML entities
        assert!(prompt.contains("<b>here</b>"));
    }

    #[test]
    fn user_prompt_truncates_body() {
        let renderer = TemplateRenderer::new();
        let long_body = "x".repeat(50);
        let pr = sample_pull_request(Some(&long_body));
        let extraction = extract_upgrades(&pr.title, None);

        let prompt = renderer.render_user_prompt(&pr, &extraction, 10).unwrap();

        assert!(prompt.contains(&"x".repeat(10)));
        assert!(!prompt.contains(&"x".repeat(11)));
    }

    #[test]
    fn user_prompt_handles_no_upgrades() {
        let renderer = TemplateRenderer::new();
        let mut pr = sample_pull_request(None);
        pr.title = "Update CI images".to_string();
        let extraction = extract_upgrades(&pr.title, None);

        let prompt = renderer.render_user_prompt(&pr, &extraction, 4000).unwrap();

        assert!(prompt.contains("(none detected"));
    }

    #[test]
    fn renders_description() {
        let renderer = TemplateRenderer::new();
        let pr = sample_pull_request(None);
        let extraction = extract_upgrades(&pr.title, None);

        let description = renderer.render_description(&pr, &extraction).unwrap();

        assert!(description.starts_with("Dependabot opened https://github.com/acme/web/pull/7"));
        assert!(description.contains("- lodash from 4.17.20 to 4.17.21"));
    }

    #[test]
    fn strict_mode_reports_missing_fields() {
        let error = TemplateRenderer::new()
            .render_template("{{missing}}", &json!({}))
            .unwrap_err();

        assert!(matches!(error, crate::templates::TemplateError::Render(_)));
        assert!(error.to_string().starts_with("Failed to render ticket template"));
    }

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
