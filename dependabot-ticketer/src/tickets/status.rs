//! Run outcome types.

/// A Jira issue, by key and browse link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketReference {
    /// Issue key, e.g. `OPS-42`.
    pub key: String,
    /// Browse URL for the issue.
    pub url: String,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketStatus {
    /// A ticket already referencing the pull request was found.
    Existing {
        /// The ticket found.
        ticket: TicketReference,
    },

    /// A new ticket was created.
    Created {
        /// The ticket created.
        ticket: TicketReference,
    },
}

impl TicketStatus {
    /// Returns the ticket reference.
    #[must_use]
    pub fn ticket(&self) -> &TicketReference {
        match self {
            Self::Existing { ticket } | Self::Created { ticket } => ticket,
        }
    }

    /// Returns the status as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Existing { .. } => "existing",
            Self::Created { .. } => "created",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_ticket_for_both_outcomes() {
        let ticket = TicketReference {
            key: "OPS-42".to_string(),
            url: "https://acme.atlassian.net/browse/OPS-42".to_string(),
        };
        let existing = TicketStatus::Existing {
            ticket: ticket.clone(),
        };
        let created = TicketStatus::Created {
            ticket: ticket.clone(),
        };

        assert_eq!(existing.ticket(), &ticket);
        assert_eq!(created.ticket(), &ticket);
        assert_eq!(existing.as_str(), "existing");
        assert_eq!(created.as_str(), "created");
    }
}
