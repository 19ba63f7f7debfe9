//! Reduction of upstream Jira payloads to compact, stable JSON.
//!
//! Jira issues arrive as deeply nested objects: users carry avatar maps,
//! statuses carry categories and icon URLs, and rich text may be an Atlassian
//! Document Format tree. The functions here keep the selected fields and
//! boil each one down to the part a reader actually needs.
//!
//! Anything that does not look like the expected upstream shape is handed
//! back as [`Normalized::Raw`] instead of failing.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::consts::PAGE_CAP;
use crate::error::NormalizeError;
use crate::types::{FieldSelection, Normalized, NormalizedIssue, SearchResult};

/// Normalize a single upstream issue.
pub fn normalize_issue(
  upstream: Value,
  selection: &FieldSelection,
) -> Result<Normalized<NormalizedIssue>, NormalizeError> {
  if !is_issue_shaped(&upstream) {
    return Ok(Normalized::Raw(upstream));
  }
  Ok(Normalized::Record(simplify_issue(upstream, selection)?))
}

/// Normalize an upstream search page.
///
/// Issue order is kept exactly as upstream returned it. A page without an
/// `issues` list is returned verbatim.
pub fn normalize_search(
  upstream: Value,
  selection: &FieldSelection,
) -> Result<Normalized<SearchResult>, NormalizeError> {
  let Value::Object(mut page) = upstream else {
    return Ok(Normalized::Raw(upstream));
  };
  let issues = match page.remove("issues") {
    Some(Value::Array(issues)) => issues,
    other => {
      if let Some(value) = other {
        page.insert("issues".into(), value);
      }
      return Ok(Normalized::Raw(Value::Object(page)));
    }
  };

  let issue_count = u32::try_from(issues.len()).unwrap_or(u32::MAX);
  let total = page.get("total").and_then(Value::as_u64).unwrap_or(0);
  let start_at = page.get("startAt").and_then(Value::as_u64).unwrap_or(0);
  let max_results = page
    .get("maxResults")
    .and_then(Value::as_u64)
    .map_or(issue_count, |max| u32::try_from(max).unwrap_or(u32::MAX))
    .min(PAGE_CAP);

  let issues = issues
    .into_iter()
    .map(|issue| normalize_issue(issue, selection))
    .collect::<Result<Vec<_>, _>>()?;

  Ok(Normalized::Record(SearchResult {
    total,
    start_at,
    max_results,
    issues,
  }))
}

/// Serialize a result as pretty-printed JSON with two-space indentation.
pub fn render<T: Serialize>(value: &T) -> Result<String, NormalizeError> {
  Ok(serde_json::to_string_pretty(value)?)
}

fn is_issue_shaped(value: &Value) -> bool {
  match value {
    Value::Object(map) => map.contains_key("key") || map.get("fields").is_some_and(Value::is_object),
    _ => false,
  }
}

fn simplify_issue(upstream: Value, selection: &FieldSelection) -> Result<NormalizedIssue, NormalizeError> {
  let Value::Object(mut issue) = upstream else {
    return Err(NormalizeError::MissingKey);
  };

  let key = match issue.remove("key") {
    Some(Value::String(key)) if !key.trim().is_empty() => key,
    _ => return Err(NormalizeError::MissingKey),
  };

  let upstream_fields = match issue.remove("fields") {
    Some(Value::Object(fields)) => fields,
    _ => Map::new(),
  };

  let mut fields = BTreeMap::new();
  for (name, value) in upstream_fields {
    if name == "key" || !selection.includes(&name) {
      continue;
    }
    // With every field selected, unset fields would only add noise.
    if *selection == FieldSelection::All && value.is_null() {
      continue;
    }
    let simplified = simplify_field(&name, value);
    fields.insert(name, simplified);
  }

  Ok(NormalizedIssue { key, fields })
}

fn simplify_field(name: &str, value: Value) -> Value {
  if value.is_null() {
    return value;
  }
  match name {
    "status" | "priority" | "issuetype" | "resolution" => named(value),
    "assignee" | "reporter" | "creator" => user_name(value),
    "description" | "environment" => Value::String(plain_text(&value)),
    "components" | "fixVersions" | "versions" => names(value),
    "project" => pick(&value, &["key", "name"]),
    "parent" => json!({
      "key": value.get("key").cloned().unwrap_or(Value::Null),
      "summary": value.pointer("/fields/summary").cloned().unwrap_or(Value::Null),
    }),
    "subtasks" => match value {
      Value::Array(items) => Value::Array(
        items
          .into_iter()
          .map(|subtask| {
            json!({
              "key": subtask.get("key").cloned().unwrap_or(Value::Null),
              "summary": subtask.pointer("/fields/summary").cloned().unwrap_or(Value::Null),
              "status": subtask.pointer("/fields/status/name").cloned().unwrap_or(Value::Null),
            })
          })
          .collect(),
      ),
      other => other,
    },
    "comment" => comments(value),
    _ => reduce(value),
  }
}

/// `{ "name": ... }` objects reduce to the name.
fn named(value: Value) -> Value {
  match value {
    Value::Object(mut map) => map.remove("name").unwrap_or(Value::Object(map)),
    other => other,
  }
}

fn user_name(value: Value) -> Value {
  match value {
    Value::Object(mut map) => ["displayName", "name", "emailAddress"]
      .iter()
      .find_map(|field| map.remove(*field).filter(|v| !v.is_null()))
      .unwrap_or(Value::Object(map)),
    other => other,
  }
}

fn names(value: Value) -> Value {
  match value {
    Value::Array(items) => Value::Array(items.into_iter().map(named).collect()),
    other => named(other),
  }
}

fn pick(value: &Value, keys: &[&str]) -> Value {
  let mut picked = Map::new();
  for key in keys {
    picked.insert((*key).to_string(), value.get(*key).cloned().unwrap_or(Value::Null));
  }
  Value::Object(picked)
}

fn comments(value: Value) -> Value {
  let items = match value {
    Value::Object(mut container) => match container.remove("comments") {
      Some(Value::Array(items)) => items,
      _ => return Value::Array(Vec::new()),
    },
    Value::Array(items) => items,
    other => return other,
  };

  Value::Array(
    items
      .into_iter()
      .map(|comment| {
        json!({
          "id": comment.get("id").cloned().unwrap_or(Value::Null),
          "author": comment.get("author").cloned().map_or(Value::Null, user_name),
          "body": comment.get("body").map_or(Value::Null, |body| Value::String(plain_text(body))),
          "created": comment.get("created").cloned().unwrap_or(Value::Null),
        })
      })
      .collect(),
  )
}

/// Fallback reduction for fields without a dedicated rule.
fn reduce(value: Value) -> Value {
  match value {
    Value::Object(mut map) => {
      for field in ["displayName", "name", "value"] {
        if let Some(reduced) = map.remove(field) {
          return reduced;
        }
      }
      Value::Object(map)
    }
    Value::Array(items) => Value::Array(items.into_iter().map(reduce).collect()),
    scalar => scalar,
  }
}

/// Flatten a rich-text value to plain text. Wiki-markup strings pass
/// through; Atlassian Document Format trees are walked depth-first.
fn plain_text(value: &Value) -> String {
  match value {
    Value::String(text) => text.clone(),
    Value::Object(_) => {
      let mut out = String::new();
      collect_adf_text(value, &mut out);
      out.trim_end().to_string()
    }
    Value::Null => String::new(),
    other => other.to_string(),
  }
}

fn collect_adf_text(node: &Value, out: &mut String) {
  match node.get("type").and_then(Value::as_str) {
    Some("text") => {
      if let Some(text) = node.get("text").and_then(Value::as_str) {
        out.push_str(text);
      }
    }
    Some("hardBreak") => out.push('\n'),
    Some("mention") | Some("emoji") => {
      if let Some(text) = node.pointer("/attrs/text").and_then(Value::as_str) {
        out.push_str(text);
      }
    }
    _ => {}
  }

  if let Some(children) = node.get("content").and_then(Value::as_array) {
    for child in children {
      collect_adf_text(child, out);
    }
  }

  if is_adf_block(node) && !out.is_empty() && !out.ends_with('\n') {
    out.push('\n');
  }
}

fn is_adf_block(node: &Value) -> bool {
  matches!(
    node.get("type").and_then(Value::as_str),
    Some("paragraph" | "heading" | "codeBlock" | "blockquote" | "listItem" | "rule" | "panel")
  )
}
