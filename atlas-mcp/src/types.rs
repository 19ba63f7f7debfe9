//! Request and result types passed between the dispatcher, the Gateway and
//! the normalizer.
//!
//! Every normalized value is either a [`Normalized::Record`] with the
//! canonical shape or a [`Normalized::Raw`] passthrough of what upstream
//! returned. Both serialize transparently, so the caller only ever sees the
//! JSON document.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::consts::ALL_FIELDS;

/// Which issue fields the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelection {
  All,
  Named(Vec<String>),
}

impl FieldSelection {
  /// Parse a comma-separated field list. Names are trimmed, blanks dropped
  /// and duplicates removed while keeping first-seen order. `*all` and
  /// `*navigable` select every field.
  pub fn parse(fields: &str) -> Self {
    let mut names: Vec<String> = Vec::new();
    for name in fields.split(',').map(str::trim).filter(|name| !name.is_empty()) {
      if name == ALL_FIELDS || name == "*navigable" {
        return Self::All;
      }
      if !names.iter().any(|existing| existing == name) {
        names.push(name.to_string());
      }
    }
    Self::Named(names)
  }

  pub fn includes(&self, field: &str) -> bool {
    match self {
      Self::All => true,
      Self::Named(names) => names.iter().any(|name| name == field),
    }
  }

  /// The same selection with `field` appended when not already present.
  pub fn with_field(self, field: &str) -> Self {
    match self {
      Self::All => Self::All,
      Self::Named(mut names) => {
        if !names.iter().any(|name| name == field) {
          names.push(field.to_string());
        }
        Self::Named(names)
      }
    }
  }
}

/// Validated input for a single-issue fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRequest {
  pub key: String,
  pub fields: String,
  pub expand: Option<String>,
  pub comment_limit: u32,
}

impl IssueRequest {
  /// Fields the normalizer keeps on the returned record.
  pub fn selection(&self) -> FieldSelection {
    let selection = FieldSelection::parse(&self.fields);
    if self.comment_limit > 0 {
      selection.with_field("comment")
    } else {
      selection
    }
  }
}

/// Validated input for a JQL search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
  pub jql: String,
  pub fields: String,
  pub limit: u32,
  pub start_at: u64,
}

impl SearchRequest {
  pub fn selection(&self) -> FieldSelection {
    FieldSelection::parse(&self.fields)
  }
}

/// An upstream value after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Normalized<T> {
  /// Reduced to the canonical shape.
  Record(T),
  /// Passed through unchanged because it did not have the expected shape.
  Raw(Value),
}

impl<T> Normalized<T> {
  pub fn is_raw(&self) -> bool {
    matches!(self, Self::Raw(_))
  }
}

/// Canonical form of one Jira issue: its key plus the selected fields,
/// flattened into a single object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedIssue {
  pub key: String,
  #[serde(flatten)]
  pub fields: BTreeMap<String, Value>,
}

/// Canonical form of a search page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
  pub total: u64,
  pub start_at: u64,
  pub max_results: u32,
  pub issues: Vec<Normalized<NormalizedIssue>>,
}
