//! Upgrade extraction from Dependabot pull request text.
//!
//! Dependabot writes version transitions in a handful of textual shapes. This
//! module recognizes them with regular expressions:
//!
//! - Title: `Bump <package> from <version> to <version>`
//! - Body bullet: `- <package> from <version> to <version>`
//! - Grouped body line: ``Updates `<package>` from <version> to <version>``
//! - Table row: `| <package> | <version> | <version> |`
//!
//! Extraction never fails; text without matches yields empty collections.

mod upgrade;

pub use upgrade::{Extraction, Upgrade};

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static TITLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i:bump)\s+(?P<name>[\w@/.\-]+)\s+from\s+(?P<from>[A-Za-z0-9.+\-]+)\s+to\s+(?P<to>[A-Za-z0-9.+\-]+)",
    )
    .expect("pattern is valid")
});

static BULLET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\s*[-*+]\s+(?P<name>[\w@/.\-]+)\s+from\s+(?P<from>[A-Za-z0-9.+\-]+)\s+to\s+(?P<to>[A-Za-z0-9.+\-]+)",
    )
    .expect("pattern is valid")
});

static GROUPED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Updates\s+`(?P<name>[\w@/.\-]+)`\s+from\s+(?P<from>[A-Za-z0-9.+\-]+)\s+to\s+(?P<to>[A-Za-z0-9.+\-]+)",
    )
    .expect("pattern is valid")
});

static TABLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\s*\|\s*`?(?P<name>[\w@/.\-]+)`?\s*\|\s*`?(?P<from>[A-Za-z0-9.+\-]+)`?\s*\|\s*`?(?P<to>[A-Za-z0-9.+\-]+)`?\s*\|",
    )
    .expect("pattern is valid")
});

/// Extracts package upgrades from a pull request title and optional body.
///
/// Patterns are applied in order (title, bullets, grouped lines, table rows)
/// and every match is recorded.
#[must_use]
pub fn extract_upgrades(title: &str, body: Option<&str>) -> Extraction {
    let mut extraction = Extraction::default();

    collect(&TITLE_PATTERN, title, &mut extraction, false);
    if let Some(body) = body {
        collect(&BULLET_PATTERN, body, &mut extraction, false);
        collect(&GROUPED_PATTERN, body, &mut extraction, false);
        collect(&TABLE_PATTERN, body, &mut extraction, true);
    }

    debug!(
        packages = extraction.packages.len(),
        upgrades = extraction.upgrades.len(),
        "Extracted upgrades"
    );
    extraction
}

fn collect(pattern: &Regex, text: &str, extraction: &mut Extraction, table: bool) {
    for captures in pattern.captures_iter(text) {
        let name = &captures["name"];
        let from = trim_version(&captures["from"]);
        let to = trim_version(&captures["to"]);

        if from.is_empty() || to.is_empty() {
            continue;
        }
        // Header and separator rows have no digits in their version cells.
        if table && !(has_digit(from) && has_digit(to)) {
            continue;
        }
        extraction.push(name, from, to);
    }
}

/// Strips sentence punctuation that the version token would otherwise absorb.
fn trim_version(version: &str) -> &str {
    version.trim_end_matches('.')
}

fn has_digit(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
}
