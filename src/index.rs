//! Core types for the shared catalog index document

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Categories every freshly created index document starts with.
///
/// The document is open-ended and gains further categories on demand; these
/// four exist by convention and are materialized empty when the document is
/// first created.
pub const DEFAULT_CATEGORIES: [&str; 4] = ["juggernaut", "client", "tools", "rbin"];

/// A single catalog record describing one uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// File name; the unique merge key within a category
    pub name: String,
    /// Web URL of the uploaded file
    pub url: String,
    /// Free-form reference value
    pub reference: String,
    /// Ordered section labels classifying the file
    pub section: Vec<String>,
}

/// The shared index document: category name to ordered entry sequence.
///
/// Serializes as a flat JSON object (`{"juggernaut": [...], ...}`). The map
/// preserves insertion order, so re-serializing after a merge never reorders
/// categories or untouched entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexDocument {
    /// Categories in document order
    pub categories: IndexMap<String, Vec<Entry>>,
}

impl IndexDocument {
    /// Skeleton used when no document exists yet: every default category
    /// present and empty.
    pub fn skeleton() -> Self {
        let categories = DEFAULT_CATEGORIES
            .iter()
            .map(|name| ((*name).to_string(), Vec::new()))
            .collect();
        Self { categories }
    }

    /// Entries currently recorded under `category`, if it exists
    pub fn entries(&self, category: &str) -> Option<&[Entry]> {
        self.categories.get(category).map(Vec::as_slice)
    }
}

/// Whether the winning merge inserted a new entry or replaced an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    /// No prior entry with the name existed in the category
    Inserted,
    /// An entry with the name existed and was replaced
    Updated,
}

impl std::fmt::Display for MergeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inserted => write!(f, "inserted"),
            Self::Updated => write!(f, "updated"),
        }
    }
}

/// Result of a successful [`apply_entry`](crate::merge::MergeEngine::apply_entry)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    /// What the winning round's merge did, determined at that round
    pub action: MergeAction,
}
