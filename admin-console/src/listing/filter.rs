// Client-side filtering of the identities table
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::DisplayRecord;

/// Which column(s) a search query is tested against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    #[default]
    All,
    Id,
    State,
    Schema,
    /// Aliases the flattened verifiable addresses column
    Email,
}

impl SearchField {
    fn matches(self, record: &DisplayRecord, matcher: &Matcher) -> bool {
        match self {
            SearchField::All => [
                record.id.as_str(),
                record.state.as_str(),
                record.schema.as_str(),
                record.addresses.as_str(),
            ]
            .into_iter()
            .any(|value| matcher.is_match(value)),
            SearchField::Id => matcher.is_match(&record.id),
            SearchField::State => matcher.is_match(&record.state),
            SearchField::Schema => matcher.is_match(&record.schema),
            SearchField::Email => matcher.is_match(&record.addresses),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMode {
    #[serde(default)]
    pub field: SearchField,
    #[serde(default)]
    pub use_regex: bool,
}

impl SearchMode {
    pub fn new(field: SearchField, use_regex: bool) -> Self {
        Self { field, use_regex }
    }
}

enum Matcher {
    Pattern(Regex),
    Substring(String),
}

impl Matcher {
    /// Case-insensitive matcher; a pattern that fails to compile becomes a
    /// substring search for the raw query
    fn new(query: &str, use_regex: bool) -> Self {
        if use_regex {
            match RegexBuilder::new(query).case_insensitive(true).build() {
                Ok(pattern) => return Matcher::Pattern(pattern),
                Err(err) => debug!(error = %err, "search pattern rejected, using substring match"),
            }
        }
        Matcher::Substring(query.to_lowercase())
    }

    fn is_match(&self, value: &str) -> bool {
        match self {
            Matcher::Pattern(pattern) => pattern.is_match(value),
            Matcher::Substring(needle) => value.to_lowercase().contains(needle.as_str()),
        }
    }
}

/// Filter `records` by `query` under `mode`, preserving input order.
///
/// An empty query returns every record regardless of mode.
pub fn filter(records: &[DisplayRecord], query: &str, mode: SearchMode) -> Vec<DisplayRecord> {
    if query.is_empty() {
        return records.to_vec();
    }

    let matcher = Matcher::new(query, mode.use_regex);
    records
        .iter()
        .filter(|record| mode.field.matches(record, &matcher))
        .cloned()
        .collect()
}
