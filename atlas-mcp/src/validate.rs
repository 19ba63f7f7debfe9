//! Argument validation and coercion against a tool's parameter schema.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::catalogue::{Bounds, ParamType, ParameterSpec, ToolDefinition};
use crate::error::ValidationError;

/// A single argument after coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
  String(String),
  Integer(i64),
  Number(f64),
}

/// Arguments that passed validation, keyed by parameter name. Optional
/// parameters without a default and without a caller value are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedArguments {
  values: BTreeMap<&'static str, ArgValue>,
}

impl ValidatedArguments {
  pub fn string(&self, name: &str) -> Option<&str> {
    match self.values.get(name) {
      Some(ArgValue::String(value)) => Some(value),
      _ => None,
    }
  }

  pub fn integer(&self, name: &str) -> Option<i64> {
    match self.values.get(name) {
      Some(ArgValue::Integer(value)) => Some(*value),
      _ => None,
    }
  }

  pub fn require_string(&self, name: &'static str) -> Result<&str, ValidationError> {
    self.string(name).ok_or(ValidationError::MissingRequired(name))
  }
}

/// Check `raw` against `definition` and produce typed, defaulted, bounded
/// arguments.
///
/// A missing payload is treated like an empty mapping. Any other non-mapping
/// payload is rejected. `null` takes the parameter's null value when it
/// declares one and otherwise counts as absent. Keys the tool does not
/// declare are ignored.
pub fn validate(definition: &ToolDefinition, raw: Option<&Value>) -> Result<ValidatedArguments, ValidationError> {
  let empty = Map::new();
  let args = match raw {
    None | Some(Value::Null) => &empty,
    Some(Value::Object(map)) => map,
    Some(other) => return Err(ValidationError::MalformedArguments(kind_of(other))),
  };

  for key in args.keys() {
    if definition.parameter(key).is_none() {
      debug!(tool = definition.name, argument = %key, "Ignoring undeclared argument");
    }
  }

  let mut values = BTreeMap::new();
  for param in &definition.parameters {
    let supplied = match args.get(param.name) {
      Some(Value::Null) => param.null_value.as_ref(),
      other => other,
    };

    let value = match supplied {
      Some(value) => Some(coerce(param, value)?),
      None => param.default.as_ref().map(|default| coerce(param, default)).transpose()?,
    };

    let value = match value {
      Some(ArgValue::String(text)) if param.required && text.is_empty() => None,
      other => other,
    };

    match value {
      Some(value) => {
        values.insert(param.name, apply_bounds(param, value)?);
      }
      None if param.required => return Err(ValidationError::MissingRequired(param.name)),
      None => {}
    }
  }

  Ok(ValidatedArguments { values })
}

fn coerce(param: &ParameterSpec, value: &Value) -> Result<ArgValue, ValidationError> {
  let invalid = || ValidationError::InvalidType {
    name: param.name,
    expected: param_type_name(param.param_type),
    found: kind_of(value),
  };

  match param.param_type {
    ParamType::String => coerce_string(value).map(ArgValue::String).ok_or_else(invalid),
    ParamType::Integer => coerce_integer(value).map(ArgValue::Integer).ok_or_else(invalid),
    ParamType::Number => coerce_number(value).map(ArgValue::Number).ok_or_else(invalid),
  }
}

fn coerce_string(value: &Value) -> Option<String> {
  match value {
    Value::String(text) => Some(text.trim().to_string()),
    Value::Number(number) => Some(number.to_string()),
    Value::Bool(flag) => Some(flag.to_string()),
    // A list of field names is accepted in place of a comma-separated string.
    Value::Array(items) => items
      .iter()
      .map(|item| item.as_str().map(str::trim))
      .collect::<Option<Vec<_>>>()
      .map(|parts| parts.join(",")),
    Value::Null | Value::Object(_) => None,
  }
}

fn coerce_integer(value: &Value) -> Option<i64> {
  match value {
    Value::Number(number) => {
      if let Some(int) = number.as_i64() {
        Some(int)
      } else if number.as_u64().is_some() {
        Some(i64::MAX)
      } else {
        number.as_f64().filter(|float| float.is_finite()).map(|float| float.trunc() as i64)
      }
    }
    Value::String(text) => {
      let text = text.trim();
      text.parse::<i64>().ok().or_else(|| {
        text
          .parse::<f64>()
          .ok()
          .filter(|float| float.is_finite())
          .map(|float| float.trunc() as i64)
      })
    }
    _ => None,
  }
}

fn coerce_number(value: &Value) -> Option<f64> {
  match value {
    Value::Number(number) => number.as_f64(),
    Value::String(text) => text.trim().parse::<f64>().ok().filter(|float| float.is_finite()),
    _ => None,
  }
}

fn apply_bounds(param: &ParameterSpec, value: ArgValue) -> Result<ArgValue, ValidationError> {
  let ArgValue::Integer(int) = value else {
    return Ok(value);
  };

  match param.bounds {
    Some(Bounds::Clamp { min, max }) => {
      let int = int.max(min);
      Ok(ArgValue::Integer(max.map_or(int, |max| int.min(max))))
    }
    Some(Bounds::AtLeast(minimum)) if int < minimum => Err(ValidationError::BelowMinimum {
      name: param.name,
      minimum,
      value: int,
    }),
    _ => Ok(ArgValue::Integer(int)),
  }
}

fn param_type_name(param_type: ParamType) -> &'static str {
  match param_type {
    ParamType::String => "a string",
    ParamType::Number => "a number",
    ParamType::Integer => "an integer",
  }
}

fn kind_of(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "a list",
    Value::Object(_) => "a mapping",
  }
}
