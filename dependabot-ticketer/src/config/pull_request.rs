//! Pull request context.

/// The pull request that triggered the run.
#[derive(Debug, Clone)]
pub struct PullRequestContext {
    /// Repository in `owner/name` format.
    pub repository: String,

    /// Pull request number, when known.
    pub number: Option<u64>,

    /// Pull request title.
    pub title: String,

    /// Pull request body (may be absent).
    pub body: Option<String>,

    /// Pull request URL, used for duplicate detection and linking.
    pub url: String,
}
