//! Ticket content schema.

use std::collections::BTreeSet;

/// Marker every ticket title starts with.
pub const TITLE_PREFIX: &str = "[Dependabot]";

/// Drafted content for a new ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketContent {
    /// Ticket summary; always starts with [`TITLE_PREFIX`] once normalized.
    pub title: String,

    /// Free-form description.
    pub description: String,

    /// Acceptance criteria, in order.
    pub acceptance_criteria: Vec<String>,

    /// Definition of done, in order.
    pub definition_of_done: Vec<String>,

    /// Suggested labels (unsanitized).
    pub labels: BTreeSet<String>,
}

impl TicketContent {
    /// Applies the title prefix convention.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.title = ensure_title_prefix(&self.title);
        self
    }
}

/// Prepends [`TITLE_PREFIX`] unless the title already starts with it
/// (case-insensitive). Idempotent.
#[must_use]
pub fn ensure_title_prefix(title: &str) -> String {
    let title = title.trim();
    let has_prefix = title
        .get(..TITLE_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(TITLE_PREFIX));

    if has_prefix {
        title.to_string()
    } else if title.is_empty() {
        TITLE_PREFIX.to_string()
    } else {
        format!("{TITLE_PREFIX} {title}")
    }
}
