//! Rendering errors for prompts and templated ticket text.

use thiserror::Error;

/// A prompt or description template failed to render.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Handlebars rejected the template or its data (strict mode reports
    /// missing fields here).
    #[error("Failed to render ticket template: {0}")]
    Render(#[from] handlebars::RenderError),
}
