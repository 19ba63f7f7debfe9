//! Registry of the tools this server exposes.
//!
//! Each [`ToolDefinition`] carries its parameter schema. The validator reads
//! the schema to coerce arguments, and the server turns it into the JSON
//! schema advertised to clients. The catalogue is built once and never
//! mutated afterwards.

use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use serde_json::{Value, json};

use crate::consts::{DEFAULT_COMMENT_LIMIT, DEFAULT_FIELDS, DEFAULT_LIMIT, PAGE_CAP};
use crate::error::ValidationError;

pub const GET_ISSUE: &str = "get_issue";
pub const SEARCH: &str = "search";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
  String,
  Number,
  Integer,
}

impl ParamType {
  fn schema_type(self) -> &'static str {
    match self {
      Self::String => "string",
      Self::Number => "number",
      Self::Integer => "integer",
    }
  }
}

/// Range enforcement for integer parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounds {
  /// Out-of-range values are silently pulled into range.
  Clamp { min: i64, max: Option<i64> },
  /// Values below the minimum are rejected.
  AtLeast(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
  pub name: &'static str,
  pub param_type: ParamType,
  pub required: bool,
  pub description: &'static str,
  pub default: Option<Value>,
  /// Value used when the caller passes an explicit `null`. Without one,
  /// `null` counts as absent and the default applies.
  pub null_value: Option<Value>,
  pub bounds: Option<Bounds>,
}

impl ParameterSpec {
  fn required(name: &'static str, param_type: ParamType, description: &'static str) -> Self {
    Self {
      name,
      param_type,
      required: true,
      description,
      default: None,
      null_value: None,
      bounds: None,
    }
  }

  fn optional(name: &'static str, param_type: ParamType, description: &'static str) -> Self {
    Self {
      required: false,
      ..Self::required(name, param_type, description)
    }
  }

  fn with_default(mut self, default: Value) -> Self {
    self.default = Some(default);
    self
  }

  fn with_null_value(mut self, value: Value) -> Self {
    self.null_value = Some(value);
    self
  }

  fn with_bounds(mut self, bounds: Bounds) -> Self {
    self.bounds = Some(bounds);
    self
  }
}

/// Which Gateway operation a tool maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
  GetIssue,
  Search,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
  pub name: &'static str,
  pub description: &'static str,
  pub kind: ToolKind,
  pub parameters: Vec<ParameterSpec>,
}

impl ToolDefinition {
  pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
    self.parameters.iter().find(|param| param.name == name)
  }

  /// JSON schema describing the tool's arguments.
  pub fn input_schema(&self) -> JsonObject {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();

    for param in &self.parameters {
      let mut property = serde_json::Map::new();
      property.insert("type".into(), json!(param.param_type.schema_type()));
      property.insert("description".into(), json!(param.description));
      if let Some(default) = &param.default {
        property.insert("default".into(), default.clone());
      }
      match param.bounds {
        Some(Bounds::Clamp { min, max }) => {
          property.insert("minimum".into(), json!(min));
          if let Some(max) = max {
            property.insert("maximum".into(), json!(max));
          }
        }
        Some(Bounds::AtLeast(min)) => {
          property.insert("minimum".into(), json!(min));
        }
        None => {}
      }
      properties.insert(param.name.into(), Value::Object(property));
      if param.required {
        required.push(json!(param.name));
      }
    }

    let mut schema = JsonObject::new();
    schema.insert("type".into(), json!("object"));
    schema.insert("properties".into(), Value::Object(properties));
    schema.insert("required".into(), Value::Array(required));
    schema
  }

  pub fn to_mcp_tool(&self) -> Tool {
    Tool::new(self.name, self.description, Arc::new(self.input_schema()))
  }
}

/// The immutable set of tools offered to callers.
#[derive(Debug, Clone)]
pub struct ToolCatalogue {
  tools: Vec<ToolDefinition>,
}

impl Default for ToolCatalogue {
  fn default() -> Self {
    Self::new()
  }
}

impl ToolCatalogue {
  pub fn new() -> Self {
    Self {
      tools: vec![get_issue_definition(), search_definition()],
    }
  }

  pub fn list(&self) -> &[ToolDefinition] {
    &self.tools
  }

  pub fn resolve(&self, name: &str) -> Result<&ToolDefinition, ValidationError> {
    self
      .tools
      .iter()
      .find(|tool| tool.name == name)
      .ok_or_else(|| ValidationError::UnknownTool(name.to_string()))
  }
}

fn get_issue_definition() -> ToolDefinition {
  ToolDefinition {
    name: GET_ISSUE,
    description: "Get details of a specific Jira issue, optionally with its most recent comments.",
    kind: ToolKind::GetIssue,
    parameters: vec![
      ParameterSpec::required("issue_key", ParamType::String, "Jira issue key (e.g., 'PROJ-123')"),
      ParameterSpec::optional(
        "fields",
        ParamType::String,
        "Comma-separated list of fields to return (e.g., 'summary,status,customfield_10010'), \
         or '*all' for all fields",
      )
      .with_default(json!(DEFAULT_FIELDS)),
      ParameterSpec::optional(
        "expand",
        ParamType::String,
        "Optional fields to expand. Examples: 'renderedFields', 'transitions', 'changelog'",
      ),
      ParameterSpec::optional(
        "comment_limit",
        ParamType::Integer,
        "Maximum number of comments to include (0 or null for no comments)",
      )
      .with_default(json!(DEFAULT_COMMENT_LIMIT))
      .with_null_value(json!(0))
      .with_bounds(Bounds::AtLeast(0)),
    ],
  }
}

fn search_definition() -> ToolDefinition {
  ToolDefinition {
    name: SEARCH,
    description: "Search Jira issues using JQL (Jira Query Language).",
    kind: ToolKind::Search,
    parameters: vec![
      ParameterSpec::required(
        "jql",
        ParamType::String,
        "JQL query string. Examples: 'project = PROJ AND status = \"In Progress\"', 'assignee = currentUser()'",
      ),
      ParameterSpec::optional(
        "fields",
        ParamType::String,
        "Comma-separated fields to return in the results. Use '*all' for all fields",
      )
      .with_default(json!(DEFAULT_FIELDS)),
      ParameterSpec::optional("limit", ParamType::Integer, "Maximum number of results (1-50)")
        .with_default(json!(DEFAULT_LIMIT))
        .with_bounds(Bounds::Clamp {
          min: 1,
          max: Some(i64::from(PAGE_CAP)),
        }),
      ParameterSpec::optional("startAt", ParamType::Integer, "Starting index for pagination (0-based)")
        .with_default(json!(0))
        .with_bounds(Bounds::Clamp { min: 0, max: None }),
    ],
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_catalogue_lists_tools_in_order() {
    let catalogue = ToolCatalogue::new();
    let names: Vec<_> = catalogue.list().iter().map(|tool| tool.name).collect();
    assert_eq!(names, vec![GET_ISSUE, SEARCH]);
  }

  #[test]
  fn test_resolve_unknown_tool() {
    let catalogue = ToolCatalogue::new();
    assert_eq!(
      catalogue.resolve("delete_issue").unwrap_err(),
      ValidationError::UnknownTool("delete_issue".into())
    );
    assert_eq!(catalogue.resolve(SEARCH).unwrap().kind, ToolKind::Search);
  }

  #[test]
  fn test_search_schema() {
    let catalogue = ToolCatalogue::new();
    let schema = catalogue.resolve(SEARCH).unwrap().input_schema();

    assert_eq!(schema["type"], "object");
    assert_eq!(schema["required"], json!(["jql"]));
    assert_eq!(schema["properties"]["limit"]["minimum"], 1);
    assert_eq!(schema["properties"]["limit"]["maximum"], 50);
    assert_eq!(schema["properties"]["limit"]["default"], 10);
    assert_eq!(schema["properties"]["startAt"]["minimum"], 0);
    assert!(schema["properties"]["startAt"].get("maximum").is_none());
    assert_eq!(schema["properties"]["fields"]["default"], DEFAULT_FIELDS);
  }

  #[test]
  fn test_get_issue_schema() {
    let catalogue = ToolCatalogue::new();
    let definition = catalogue.resolve(GET_ISSUE).unwrap();
    let schema = definition.input_schema();

    assert_eq!(schema["required"], json!(["issue_key"]));
    assert_eq!(schema["properties"]["comment_limit"]["type"], "integer");
    assert!(definition.parameter("expand").unwrap().default.is_none());
    assert_eq!(definition.parameter("comment_limit").unwrap().null_value, Some(json!(0)));
    assert_eq!(
      definition.description,
      "Get details of a specific Jira issue, optionally with its most recent comments."
    );

    let tool = definition.to_mcp_tool();
    assert_eq!(tool.name, GET_ISSUE);
  }
}
