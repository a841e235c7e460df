//! Label derivation and sanitizing.

use crate::extract::Extraction;
use std::collections::BTreeSet;

/// Label carried by every ticket.
pub const BASE_LABEL: &str = "dependabot";

/// Converts free text into a Jira label.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9._-]` into a
/// single `-`, and trims dashes from the ends. Returns `None` if nothing is left.
#[must_use]
pub fn sanitize_label(raw: &str) -> Option<String> {
    let mut label = String::with_capacity(raw.len());
    let mut pending_dash = false;

    for c in raw.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            if pending_dash && !label.is_empty() {
                label.push('-');
            }
            pending_dash = false;
            label.push(c);
        } else {
            pending_dash = true;
        }
    }

    let label = label.trim_matches('-');
    (!label.is_empty()).then(|| label.to_string())
}

/// Builds the final label set for a ticket.
///
/// Union of the configured defaults, [`BASE_LABEL`], every extracted package
/// name, and any labels suggested with the ticket content.
#[must_use]
pub fn derive_labels<'a>(
    defaults: impl IntoIterator<Item = &'a String>,
    extraction: &'a Extraction,
    suggested: impl IntoIterator<Item = &'a String>,
) -> BTreeSet<String> {
    std::iter::once(BASE_LABEL)
        .chain(defaults.into_iter().map(String::as_str))
        .chain(extraction.packages.iter().map(String::as_str))
        .chain(suggested.into_iter().map(String::as_str))
        .filter_map(sanitize_label)
        .collect()
}
