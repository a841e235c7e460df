//! LLM error types.

use thiserror::Error;

/// Errors that prevent ticket content from being generated.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Models API request failed (transport, HTTP status, or decoding).
    #[error("Models API error: {0}")]
    Api(#[from] octocrab::Error),

    /// LLM request timed out.
    #[error("LLM timed out after {0} seconds")]
    Timeout(u64),

    /// The model returned no usable text.
    #[error("LLM returned an empty completion")]
    EmptyCompletion,

    /// The completion could not be turned into ticket content.
    #[error("LLM completion could not be parsed into ticket content")]
    Unparseable,

    /// Prompt rendering failed.
    #[error(transparent)]
    Template(#[from] crate::templates::TemplateError),
}
