#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod endpoint;
pub mod extract;
pub mod jira;
pub mod llm;
pub mod runner;
pub mod templates;
pub mod tickets;

pub use config::{
    ConfigError, GenerationMode, IssueTypeSetting, PullRequestContext, RunnerConfig, Settings,
    TrackerConfig,
};
pub use endpoint::{Endpoint, EndpointSettings, GatewayMode};
pub use extract::{extract_upgrades, Extraction, Upgrade};
pub use jira::{JiraClient, JiraError};
pub use llm::{LlmConfig, LlmError, ModelsClient};
pub use runner::{Runner, RunnerError};
pub use templates::{TemplateError, TemplateRenderer};
pub use tickets::{
    derive_labels, ensure_title_prefix, sanitize_label, TicketContent, TicketReference,
    TicketStatus,
};
