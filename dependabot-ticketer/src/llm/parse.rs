//! Tolerant parsing of model completions into [`TicketContent`].
//!
//! Attempts run in order and each either yields content or signals that it
//! could not parse:
//!
//! 1. The first brace-balanced JSON object in the completion that yields
//!    content.
//! 2. A line-based pass over `Summary:` / `Acceptance Criteria:` /
//!    `Definition of Done:` / `Labels:` sections.
//!
//! Content counts only if it has a title, description text, or list entries.

use super::LlmError;
use crate::tickets::TicketContent;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Which attempt produced the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    /// Parsed from a JSON object.
    Json,
    /// Recovered from free text.
    Coerced,
}

/// Content parsed from a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedContent {
    /// Normalized content.
    pub content: TicketContent,
    /// Attempt that produced it.
    pub source: ContentSource,
}

/// Parses a completion into normalized ticket content.
///
/// `fallback_title` is used when the completion yields no title.
///
/// # Errors
///
/// Returns [`LlmError::EmptyCompletion`] for blank input and
/// [`LlmError::Unparseable`] when no attempt succeeds.
pub fn parse_completion(completion: &str, fallback_title: &str) -> Result<ParsedContent, LlmError> {
    if completion.trim().is_empty() {
        return Err(LlmError::EmptyCompletion);
    }

    let (mut content, source) = if let Some(content) = parse_json_content(completion) {
        (content, ContentSource::Json)
    } else if let Some(content) = coerce_free_text(completion) {
        (content, ContentSource::Coerced)
    } else {
        return Err(LlmError::Unparseable);
    };

    if content.title.trim().is_empty() {
        content.title = fallback_title.to_string();
    }
    Ok(ParsedContent {
        content: content.normalized(),
        source,
    })
}

/// Parses the first JSON object in `text` that yields content.
pub(crate) fn parse_json_content(text: &str) -> Option<TicketContent> {
    json_object_candidates(text).find_map(|candidate| {
        match serde_json::from_str::<Value>(candidate).ok()? {
            Value::Object(map) => Some(from_object(&map)).filter(has_substance),
            _ => None,
        }
    })
}

/// Yields every brace-balanced `{...}` substring, in order of its opening brace.
fn json_object_candidates(text: &str) -> impl Iterator<Item = &str> {
    text.match_indices('{')
        .filter_map(move |(start, _)| balanced_object(&text[start..]))
}

/// Returns the balanced object starting at the `{` that opens `text`,
/// ignoring braces in strings.
fn balanced_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[..=offset]);
                }
            }
            _ => {}
        }
    }
    None
}

fn has_substance(content: &TicketContent) -> bool {
    !content.title.trim().is_empty()
        || content.description.chars().any(char::is_alphanumeric)
        || !content.acceptance_criteria.is_empty()
        || !content.definition_of_done.is_empty()
}

fn from_object(map: &Map<String, Value>) -> TicketContent {
    TicketContent {
        title: first_string(map, &["title", "summary"]),
        description: first_string(map, &["description"]),
        acceptance_criteria: first_list(map, &["acceptance_criteria", "acceptanceCriteria"]),
        definition_of_done: first_list(map, &["definition_of_done", "definitionOfDone"]),
        labels: first_list(map, &["labels"]).into_iter().collect(),
    }
}

fn first_string(map: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| map.get(*key))
        .map(coerce_string)
        .unwrap_or_default()
}

fn first_list(map: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .find_map(|key| map.get(*key))
        .map(string_entries)
        .unwrap_or_default()
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Null | Value::Object(_) => String::new(),
    }
}

/// Keeps only non-empty string entries; anything not list-shaped is empty.
fn string_entries(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Summary,
    AcceptanceCriteria,
    DefinitionOfDone,
    Labels,
}

const HEADERS: &[(&str, Section)] = &[
    ("Summary", Section::Summary),
    ("Title", Section::Summary),
    ("Acceptance Criteria", Section::AcceptanceCriteria),
    ("Definition of Done", Section::DefinitionOfDone),
    ("Labels", Section::Labels),
];

/// Buckets free text into sections.
///
/// The first line of the `Summary:` section (inline or on the next line)
/// becomes the title. List sections collect one entry per line with bullet
/// markers stripped. Every other line is kept verbatim in the description.
/// Returns `None` if nothing usable remains.
pub(crate) fn coerce_free_text(text: &str) -> Option<TicketContent> {
    if text.trim().is_empty() {
        return None;
    }

    let mut content = TicketContent::default();
    let mut description: Vec<&str> = Vec::new();
    let mut section: Option<Section> = None;

    for line in text.lines() {
        if let Some((header, rest)) = match_header(line) {
            section = Some(header);
            if !rest.is_empty() {
                bucket(&mut content, &mut description, header, rest, rest);
            }
            continue;
        }

        let trimmed = line.trim();
        match section {
            Some(header) if !trimmed.is_empty() => {
                bucket(&mut content, &mut description, header, trimmed, line);
            }
            None | Some(Section::Summary) => description.push(line),
            Some(_) => {}
        }
    }

    content.description = description
        .join("\n")
        .trim_matches(|c| c == '\n' || c == '\r')
        .to_string();
    has_substance(&content).then_some(content)
}

fn bucket<'a>(
    content: &mut TicketContent,
    description: &mut Vec<&'a str>,
    section: Section,
    value: &'a str,
    raw: &'a str,
) {
    match section {
        Section::Summary if content.title.is_empty() => content.title = value.to_string(),
        Section::Summary => description.push(raw),
        Section::AcceptanceCriteria => push_item(&mut content.acceptance_criteria, value),
        Section::DefinitionOfDone => push_item(&mut content.definition_of_done, value),
        Section::Labels => add_labels(&mut content.labels, value),
    }
}

fn push_item(items: &mut Vec<String>, line: &str) {
    let item = strip_bullet(line);
    if !item.is_empty() {
        items.push(item.to_string());
    }
}

fn add_labels(labels: &mut BTreeSet<String>, line: &str) {
    labels.extend(
        strip_bullet(line)
            .split(',')
            .map(|l| l.trim().trim_matches('`'))
            .filter(|l| !l.is_empty())
            .map(str::to_string),
    );
}

/// Removes `-`, `*`, `•`, `1.` and `1)` list markers.
fn strip_bullet(line: &str) -> &str {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix(['-', '*', '•']) {
        return rest.trim();
    }
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(['.', ')']) {
            return rest.trim();
        }
    }
    line
}

/// Recognizes `Header:` lines, tolerating markdown `#` and `**` decoration.
fn match_header(line: &str) -> Option<(Section, &str)> {
    let cleaned = line.trim().trim_start_matches(['#', '*', ' ']);
    HEADERS.iter().find_map(|(name, section)| {
        let head = cleaned.get(..name.len())?;
        if !head.eq_ignore_ascii_case(name) {
            return None;
        }
        let rest = cleaned[name.len()..].trim_start_matches('*').strip_prefix(':')?;
        Some((*section, rest.trim_start_matches('*').trim()))
    })
}
