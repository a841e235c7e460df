//! GitHub Models chat-completions client.

use super::LlmError;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const COMPLETIONS_ROUTE: &str = "/inference/chat/completions";
const CATALOG_ROUTE: &str = "/catalog/models";

/// A chat message.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> ChatMessage<'a> {
    pub(crate) fn system(content: &'a str) -> Self {
        Self {
            role: "system",
            content,
        }
    }

    pub(crate) fn user(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ResponseFormat {
    r#type: &'static str,
}

/// Chat-completion request body.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

impl<'a> ChatRequest<'a> {
    pub(crate) fn new(model: &'a str, messages: Vec<ChatMessage<'a>>) -> Self {
        Self {
            model,
            messages,
            temperature: None,
            response_format: None,
        }
    }

    pub(crate) fn temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    pub(crate) fn json_object(mut self, enabled: bool) -> Self {
        self.response_format = enabled.then_some(ResponseFormat {
            r#type: "json_object",
        });
        self
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogModel {
    id: String,
}

/// Client for the GitHub Models REST API.
pub struct ModelsClient {
    octocrab: Octocrab,
    timeout: Duration,
}

impl ModelsClient {
    /// Builds a client for `endpoint` authenticated with a GitHub token.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Api`] if the endpoint is not a valid URI or the
    /// client cannot be built.
    pub fn new(endpoint: &str, token: &str, timeout: Duration) -> Result<Self, LlmError> {
        let octocrab = Octocrab::builder()
            .base_uri(endpoint)?
            .personal_token(token.to_string())
            .set_connect_timeout(Some(timeout))
            .set_read_timeout(Some(timeout))
            .build()?;
        Ok(Self { octocrab, timeout })
    }

    /// Sends a chat completion and returns the first choice's text.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Timeout`] when the request exceeds the timeout,
    /// [`LlmError::EmptyCompletion`] when no text comes back, and
    /// [`LlmError::Api`] for any other failure.
    pub(crate) async fn complete(&self, request: &ChatRequest<'_>) -> Result<String, LlmError> {
        debug!(model = request.model, "Requesting chat completion");

        let response: ChatResponse = tokio::time::timeout(
            self.timeout,
            self.octocrab.post(COMPLETIONS_ROUTE, Some(request)),
        )
        .await
        .map_err(|_| LlmError::Timeout(self.timeout.as_secs()))??;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyCompletion)
    }

    /// Lists the model ids visible to the token.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] if the catalog request fails or times out.
    pub async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let models: Vec<CatalogModel> = tokio::time::timeout(
            self.timeout,
            self.octocrab.get(CATALOG_ROUTE, None::<&()>),
        )
        .await
        .map_err(|_| LlmError::Timeout(self.timeout.as_secs()))??;

        Ok(models.into_iter().map(|model| model.id).collect())
    }
}
