//! CLI for the Dependabot ticketer.
//!
//! Reads the pull request and Jira settings from the environment (as provided by
//! a GitHub Actions workflow), finds or creates the matching Jira ticket, and
//! publishes its key and URL as step outputs.

use clap::Parser;
use dependabot_ticketer::{Runner, RunnerError, Settings, TicketStatus};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Dependabot Ticketer - Create Jira tickets for Dependabot upgrade pull requests.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Jira site root, e.g. https://acme.atlassian.net.
    #[arg(long, env = "JIRA_BASE_URL")]
    jira_base_url: Option<String>,

    /// Atlassian API gateway root used in proxy mode.
    #[arg(long, env = "JIRA_GATEWAY_URL", default_value = "https://api.atlassian.com")]
    jira_gateway_url: String,

    /// Jira cloud id used in proxy mode.
    #[arg(long, env = "JIRA_CLOUD_ID")]
    jira_cloud_id: Option<String>,

    /// Gateway mode override: site, proxy or auto.
    #[arg(long, env = "JIRA_MODE")]
    jira_mode: Option<String>,

    /// Jira account e-mail.
    #[arg(long, env = "JIRA_EMAIL")]
    jira_email: Option<String>,

    /// Jira API token.
    #[arg(long, env = "JIRA_API_TOKEN", hide_env_values = true)]
    jira_api_token: Option<String>,

    /// Project key tickets are created in.
    #[arg(long, env = "JIRA_PROJECT_KEY")]
    jira_project_key: Option<String>,

    /// Base URL for ticket links. Defaults to the site root.
    #[arg(long, env = "JIRA_BROWSE_BASE_URL")]
    jira_browse_base_url: Option<String>,

    /// Issue type name.
    #[arg(long, env = "JIRA_ISSUE_TYPE")]
    jira_issue_type: Option<String>,

    /// Issue type id; skips the name lookup.
    #[arg(long, env = "JIRA_ISSUE_TYPE_ID")]
    jira_issue_type_id: Option<String>,

    /// Comma separated labels added to every ticket.
    #[arg(long, env = "JIRA_DEFAULT_LABELS", default_value = "dependabot")]
    jira_default_labels: String,

    /// Custom field id for story points.
    #[arg(long, env = "JIRA_STORY_POINTS_FIELD")]
    jira_story_points_field: Option<String>,

    /// Story point value.
    #[arg(long, env = "JIRA_STORY_POINTS")]
    jira_story_points: Option<String>,

    /// Draft ticket content with GitHub Models (default on).
    #[arg(long, env = "USE_LLM")]
    use_llm: Option<String>,

    /// Model identifier.
    #[arg(long, env = "LLM_MODEL")]
    llm_model: Option<String>,

    /// Path to the LLM config file.
    #[arg(long, env = "LLM_CONFIG_PATH")]
    llm_config_path: Option<PathBuf>,

    /// GitHub token for GitHub Models.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Repository in owner/name form.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// Pull request number.
    #[arg(long, env = "PR_NUMBER")]
    pr_number: Option<String>,

    /// Pull request title.
    #[arg(long, env = "PR_TITLE")]
    pr_title: Option<String>,

    /// Pull request body.
    #[arg(long, env = "PR_BODY")]
    pr_body: Option<String>,

    /// Pull request URL.
    #[arg(long, env = "PR_URL")]
    pr_url: Option<String>,

    /// File receiving step outputs.
    #[arg(long, env = "GITHUB_OUTPUT")]
    github_output: Option<PathBuf>,

    /// Verbose logging and full remote error detail (default off).
    #[arg(long, env = "DEBUG")]
    debug: Option<String>,
}

impl Args {
    fn use_llm(&self) -> bool {
        toggle(self.use_llm.as_deref(), true)
    }

    fn debug(&self) -> bool {
        toggle(self.debug.as_deref(), false)
    }

    fn settings(&self) -> Settings {
        Settings {
            jira_base_url: self.jira_base_url.clone(),
            jira_gateway_url: Some(self.jira_gateway_url.clone()),
            jira_cloud_id: self.jira_cloud_id.clone(),
            jira_mode: self.jira_mode.clone(),
            jira_email: self.jira_email.clone(),
            jira_api_token: self.jira_api_token.clone(),
            jira_project_key: self.jira_project_key.clone(),
            jira_browse_base_url: self.jira_browse_base_url.clone(),
            jira_issue_type: self.jira_issue_type.clone(),
            jira_issue_type_id: self.jira_issue_type_id.clone(),
            default_labels: Some(self.jira_default_labels.clone()),
            story_points_field: self.jira_story_points_field.clone(),
            story_points: self.jira_story_points.clone(),
            use_llm: self.use_llm(),
            llm_model: self.llm_model.clone(),
            llm_config_path: self.llm_config_path.clone(),
            github_token: self.github_token.clone(),
            repository: self.repository.clone(),
            pr_number: self.pr_number.clone(),
            pr_title: self.pr_title.clone(),
            pr_body: self.pr_body.clone(),
            pr_url: self.pr_url.clone(),
            debug: self.debug(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.debug());
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    match run(&args).await {
        Ok(status) => {
            report(&status, args.github_output.as_deref());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Run failed");
            if args.debug() {
                if let Some(detail) = e.diagnostics() {
                    error!(detail = %detail, "Failure detail");
                }
            }
            ExitCode::from(1)
        }
    }
}

/// Reads a boolean toggle. Blank means `default`; `0`, `false`, `no`, `off`,
/// `n` and `f` (any case) mean off; anything else means on.
fn toggle(value: Option<&str>, default: bool) -> bool {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => default,
        Some(v) => !["0", "false", "no", "off", "n", "f"]
            .iter()
            .any(|off| v.eq_ignore_ascii_case(off)),
    }
}

/// Sets up compact single-line logging filtered by `RUST_LOG`, defaulting to
/// `info` (or `debug` with `--debug`).
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();
}

async fn run(args: &Args) -> Result<TicketStatus, RunnerError> {
    let config = args.settings().validate()?;
    let runner = Runner::new(config)?;
    runner.run().await
}

/// Prints the outcome and appends it to the step output file, if any.
fn report(status: &TicketStatus, github_output: Option<&Path>) {
    let ticket = status.ticket();
    info!(status = status.as_str(), key = %ticket.key, url = %ticket.url, "Done");
    println!("ticket_key={}", ticket.key);
    println!("ticket_url={}", ticket.url);

    if let Some(path) = github_output {
        match write_outputs(path, status) {
            Ok(()) => debug!(path = %path.display(), "Wrote step outputs"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to write step outputs"),
        }
    }
}

fn write_outputs(path: &Path, status: &TicketStatus) -> std::io::Result<()> {
    let ticket = status.ticket();
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "ticket_key={}", ticket.key)?;
    writeln!(file, "ticket_url={}", ticket.url)?;
    Ok(())
}
