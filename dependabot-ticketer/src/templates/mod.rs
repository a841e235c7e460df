//! Prompt and ticket text rendering using Handlebars.

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, truncate_chars, TemplateRenderer};

use crate::config::PullRequestContext;
use crate::extract::Extraction;
use crate::tickets::TicketContent;

/// System instruction for the language model.
pub const SYSTEM_PROMPT: &str = "\
You are a release and QA engineer triaging automated dependency upgrades. \
Given a dependency upgrade pull request, draft a Jira ticket that a developer can pick up. \
Respond with ONLY a JSON object, no prose and no code fences, with exactly these keys:
{\"title\": string, \"description\": string, \"acceptance_criteria\": [string], \
\"definition_of_done\": [string], \"labels\": [string]}
The description should summarize what changes, notable release-note items, and risks. \
Acceptance criteria and definition of done must be concrete, testable statements.";

/// Generates a ticket title from the pull request and its upgrades.
///
/// One upgrade: `Upgrade <name> from <from> to <to>`; several:
/// `Upgrade <n> dependencies in <repository>`; none: the pull request title.
#[must_use]
pub fn generate_ticket_title(pull_request: &PullRequestContext, extraction: &Extraction) -> String {
    match extraction.packages.len() {
        0 => pull_request.title.clone(),
        1 => {
            let upgrade = &extraction.upgrades[0];
            format!(
                "Upgrade {} from {} to {}",
                upgrade.name, upgrade.from, upgrade.to
            )
        }
        n => format!("Upgrade {n} dependencies in {}", pull_request.repository),
    }
}

/// Renders complete ticket content without a language model.
///
/// # Errors
///
/// Returns [`TemplateError`] if rendering fails.
pub fn templated_content(
    renderer: &TemplateRenderer,
    pull_request: &PullRequestContext,
    extraction: &Extraction,
) -> Result<TicketContent, TemplateError> {
    let content = TicketContent {
        title: generate_ticket_title(pull_request, extraction),
        description: renderer.render_description(pull_request, extraction)?,
        acceptance_criteria: vec![
            "The upgraded dependencies build and pass the existing test suite.".to_string(),
            "Release notes between the old and new versions were reviewed for breaking changes."
                .to_string(),
        ],
        definition_of_done: vec![
            "The pull request is reviewed, approved, and merged.".to_string(),
            "CI is green on the default branch after merge.".to_string(),
        ],
        labels: Default::default(),
    };
    Ok(content.normalized())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_upgrades;

    fn sample_pull_request(title: &str) -> PullRequestContext {
        PullRequestContext {
            repository: "acme/web".to_string(),
            number: None,
            title: title.to_string(),
            body: None,
            url: "https://github.com/acme/web/pull/9".to_string(),
        }
    }

    #[test]
    fn titles_single_upgrade() {
        let pr = sample_pull_request("Bump lodash from 4.17.20 to 4.17.21");
        let extraction = extract_upgrades(&pr.title, None);
        assert_eq!(
            generate_ticket_title(&pr, &extraction),
            "Upgrade lodash from 4.17.20 to 4.17.21"
        );
    }

    #[test]
    fn titles_grouped_upgrade() {
        let pr = sample_pull_request("Bump the npm group with 2 updates");
        let body = "Updates `react` from 18.2.0 to 18.3.1\nUpdates `vite` from 5.0.0 to 5.1.0\n";
        let extraction = extract_upgrades(&pr.title, Some(body));
        assert_eq!(
            generate_ticket_title(&pr, &extraction),
            "Upgrade 2 dependencies in acme/web"
        );
    }

    #[test]
    fn templated_content_is_complete() {
        let renderer = TemplateRenderer::new();
        let pr = sample_pull_request("Bump lodash from 4.17.20 to 4.17.21");
        let extraction = extract_upgrades(&pr.title, None);

        let content = templated_content(&renderer, &pr, &extraction).unwrap();

        assert_eq!(
            content.title,
            "[Dependabot] Upgrade lodash from 4.17.20 to 4.17.21"
        );
        assert!(content.description.contains("lodash from 4.17.20 to 4.17.21"));
        assert_eq!(content.acceptance_criteria.len(), 2);
        assert_eq!(content.definition_of_done.len(), 2);
    }
}
