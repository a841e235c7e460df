//! Ticket content generation with a hosted language model.
//!
//! One chat completion is requested per run. The reply is parsed tolerantly
//! (see [`parse`]); if no content can be produced the caller must abort the
//! run rather than create a ticket without reviewed content.

mod client;
mod config;
mod error;
pub mod parse;

pub use client::ModelsClient;
pub use config::{LlmConfig, DEFAULT_ENDPOINT, DEFAULT_MAX_BODY_CHARS, DEFAULT_MODEL};
pub use error::LlmError;
pub use parse::{parse_completion, ContentSource, ParsedContent};

use crate::config::PullRequestContext;
use crate::extract::Extraction;
use crate::templates::{generate_ticket_title, TemplateRenderer, SYSTEM_PROMPT};
use crate::tickets::TicketContent;
use client::{ChatMessage, ChatRequest};
use tracing::{debug, info, info_span, warn, Instrument};

/// Drafts ticket content for a pull request.
///
/// # Arguments
///
/// * `client` - Models API client
/// * `config` - Model settings
/// * `renderer` - Prompt renderer
/// * `pull_request` - Triggering pull request
/// * `extraction` - Upgrades parsed from the pull request
///
/// # Errors
///
/// Returns [`LlmError`] if the request fails, times out, returns nothing, or
/// cannot be parsed.
pub async fn generate_ticket_content(
    client: &ModelsClient,
    config: &LlmConfig,
    renderer: &TemplateRenderer,
    pull_request: &PullRequestContext,
    extraction: &Extraction,
) -> Result<TicketContent, LlmError> {
    let span = info_span!("generate", model = %config.model);

    async {
        let user_prompt =
            renderer.render_user_prompt(pull_request, extraction, config.max_body_chars)?;
        let request = ChatRequest::new(
            &config.model,
            vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(&user_prompt),
            ],
        )
        .temperature(config.temperature)
        .json_object(config.json_response_format);

        info!("Requesting ticket content");
        let completion = client.complete(&request).await?;
        debug!(chars = completion.len(), "Received completion");

        let fallback_title = generate_ticket_title(pull_request, extraction);
        let parsed = parse_completion(&completion, &fallback_title)?;
        match parsed.source {
            ContentSource::Json => info!("Parsed ticket content from JSON"),
            ContentSource::Coerced => warn!("Completion was not JSON, coerced free text"),
        }
        Ok(parsed.content)
    }
    .instrument(span)
    .await
}

/// Logs the models visible to the token. Failures are only logged.
pub async fn log_visible_models(client: &ModelsClient) {
    match client.list_models().await {
        Ok(models) => info!(models = %models.join(", "), "Models visible to token"),
        Err(e) => debug!(error = %e, "Failed to list models"),
    }
}
