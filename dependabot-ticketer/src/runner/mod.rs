//! Orchestrates a single ticketing run.
//!
//! `authenticate -> search -> (existing | generate -> assemble -> create)`.
//! Issue creation is the only mutating call and always comes last.

mod error;

pub use error::RunnerError;

use crate::config::{GenerationMode, RunnerConfig};
use crate::extract::{extract_upgrades, Extraction};
use crate::jira::{build_description, parse_story_points, IssueFields, JiraClient};
use crate::llm::{generate_ticket_content, log_visible_models, LlmConfig, ModelsClient};
use crate::templates::{templated_content, TemplateRenderer};
use crate::tickets::{derive_labels, TicketContent, TicketReference, TicketStatus};
use tracing::{debug, info, info_span, warn, Instrument};

enum Generator {
    Model {
        client: ModelsClient,
        config: LlmConfig,
    },
    Template,
}

/// Runs the ticketing flow for one pull request.
pub struct Runner {
    config: RunnerConfig,
    jira: JiraClient,
    generator: Generator,
    renderer: TemplateRenderer,
}

impl Runner {
    /// Builds a runner from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if an HTTP client cannot be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let jira = JiraClient::new(config.tracker()).map_err(RunnerError::Client)?;
        let generator = match config.generation() {
            GenerationMode::Model {
                config: llm_config,
                token,
            } => Generator::Model {
                client: ModelsClient::new(&llm_config.endpoint, token, llm_config.timeout)?,
                config: llm_config.clone(),
            },
            GenerationMode::Template => Generator::Template,
        };
        Ok(Self {
            config,
            jira,
            generator,
            renderer: TemplateRenderer::new(),
        })
    }

    /// Finds or creates the ticket for the configured pull request.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] on authentication, generation, or creation
    /// failure. Search failures are logged and treated as "no duplicate".
    pub async fn run(&self) -> Result<TicketStatus, RunnerError> {
        let pull_request = self.config.pull_request();
        let extraction = extract_upgrades(&pull_request.title, pull_request.body.as_deref());
        info!(
            repository = %pull_request.repository,
            number = ?pull_request.number,
            packages = extraction.packages.len(),
            upgrades = extraction.upgrades.len(),
            "Extracted upgrades"
        );

        self.authenticate().await?;

        if let Some(ticket) = self.find_existing().await {
            info!(key = %ticket.key, url = %ticket.url, "Ticket already exists");
            return Ok(TicketStatus::Existing { ticket });
        }

        let content = self.generate(&extraction).await?;
        let fields = self.assemble(&extraction, &content).await;

        let tracker = self.config.tracker();
        let created = self
            .jira
            .create_issue(&fields)
            .instrument(info_span!("create", project = %tracker.project_key))
            .await
            .map_err(RunnerError::Creation)?;

        Ok(TicketStatus::Created {
            ticket: TicketReference {
                url: tracker.browse_url(&created.key),
                key: created.key,
            },
        })
    }

    async fn authenticate(&self) -> Result<(), RunnerError> {
        let user = self
            .jira
            .myself()
            .instrument(info_span!("authenticate"))
            .await
            .map_err(RunnerError::Authentication)?;
        debug!(
            account = user.display_name.as_deref().unwrap_or("unknown"),
            "Authenticated with Jira"
        );
        Ok(())
    }

    async fn find_existing(&self) -> Option<TicketReference> {
        let tracker = self.config.tracker();
        let url = &self.config.pull_request().url;
        let span = info_span!("search", project = %tracker.project_key);

        match self
            .jira
            .search_text(&tracker.project_key, url)
            .instrument(span)
            .await
        {
            Ok(Some(key)) => Some(TicketReference {
                url: tracker.browse_url(&key),
                key,
            }),
            Ok(None) => {
                info!("No existing ticket found");
                None
            }
            Err(e) => {
                warn!(error = %e, "Duplicate search failed, continuing as if none found");
                if self.config.debug() {
                    debug!(detail = %e.diagnostics(), "Search failure detail");
                }
                None
            }
        }
    }

    async fn generate(&self, extraction: &Extraction) -> Result<TicketContent, RunnerError> {
        let pull_request = self.config.pull_request();
        match &self.generator {
            Generator::Model { client, config } => {
                match generate_ticket_content(client, config, &self.renderer, pull_request, extraction)
                    .await
                {
                    Ok(content) => Ok(content),
                    Err(e) => {
                        if self.config.debug() {
                            log_visible_models(client).await;
                        }
                        Err(e.into())
                    }
                }
            }
            Generator::Template => {
                info!("Language model disabled, rendering templated content");
                Ok(templated_content(&self.renderer, pull_request, extraction)?)
            }
        }
    }

    async fn assemble(&self, extraction: &Extraction, content: &TicketContent) -> IssueFields {
        let tracker = self.config.tracker();
        let issue_type = self
            .jira
            .resolve_issue_type(&tracker.project_key, &tracker.issue_type)
            .await;
        let labels = derive_labels(&tracker.default_labels, extraction, &content.labels);
        let story_points = parse_story_points(
            tracker.story_points_field.as_deref(),
            tracker.story_points.as_deref(),
        );
        debug!(labels = ?labels, "Assembled issue fields");

        IssueFields {
            project_key: tracker.project_key.clone(),
            issue_type,
            summary: content.title.clone(),
            description: build_description(content, &self.config.pull_request().url),
            labels,
            story_points,
        }
    }
}
