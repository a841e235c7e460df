//! Parsed upgrade records.

use serde::Serialize;
use std::collections::BTreeSet;

/// A single package version transition found in pull request text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Upgrade {
    /// Package identifier, possibly scoped (e.g. `@types/node`).
    pub name: String,

    /// Version being replaced.
    pub from: String,

    /// Version being installed.
    pub to: String,
}

/// Everything extracted from one pull request.
///
/// `packages` is de-duplicated; `upgrades` is append-only and keeps one entry
/// per matched line, so a package matched by two patterns appears twice.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Distinct package names.
    pub packages: BTreeSet<String>,

    /// Upgrades in match order.
    pub upgrades: Vec<Upgrade>,
}

impl Extraction {
    /// Records a match.
    pub(crate) fn push(&mut self, name: &str, from: &str, to: &str) {
        self.packages.insert(name.to_string());
        self.upgrades.push(Upgrade {
            name: name.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    /// Returns true if nothing was matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.upgrades.is_empty()
    }
}
