//! Error types for each layer of a tool invocation.
//!
//! Validation, upstream and normalization failures keep their own types so
//! that each layer can be tested on its own. They all collapse into a
//! [`DispatchError`] at the dispatcher boundary, and from there into a single
//! uniform message for the caller.

use thiserror::Error;

use crate::consts::UNIFORM_ERROR_PREFIX;

/// Raised when a tool name or its arguments are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("Unknown tool: {0}")]
  UnknownTool(String),

  #[error("malformed arguments: expected a mapping of parameter names to values, got {0}")]
  MalformedArguments(&'static str),

  #[error("missing required parameter: {0}")]
  MissingRequired(&'static str),

  #[error("invalid value for parameter '{name}': expected {expected}, got {found}")]
  InvalidType {
    name: &'static str,
    expected: &'static str,
    found: &'static str,
  },

  #[error("parameter '{name}' must be at least {minimum}, got {value}")]
  BelowMinimum {
    name: &'static str,
    minimum: i64,
    value: i64,
  },
}

/// A failed Gateway call. The message carries the whole context chain of
/// the underlying client error.
#[derive(Debug, Error)]
#[error("{0:#}")]
pub struct GatewayError(#[from] anyhow::Error);

impl GatewayError {
  pub fn msg(message: impl std::fmt::Display + std::fmt::Debug + Send + Sync + 'static) -> Self {
    Self(anyhow::anyhow!(message))
  }
}

/// Raised while reducing an upstream object to its canonical shape.
#[derive(Debug, Error)]
pub enum NormalizeError {
  #[error("upstream issue has no key")]
  MissingKey,

  #[error("failed to serialize result: {0}")]
  Serialization(#[from] serde_json::Error),
}

/// Broad category of a failed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchErrorKind {
  UnknownTool,
  InvalidArguments,
  UpstreamFailure,
  Serialization,
  Internal,
}

/// The single error type returned by the dispatcher.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DispatchError {
  kind: DispatchErrorKind,
  message: String,
}

impl DispatchError {
  pub fn new(kind: DispatchErrorKind, message: impl Into<String>) -> Self {
    Self {
      kind,
      message: message.into(),
    }
  }

  pub fn internal(message: impl Into<String>) -> Self {
    Self::new(DispatchErrorKind::Internal, message)
  }

  pub fn kind(&self) -> DispatchErrorKind {
    self.kind
  }

  pub fn message(&self) -> &str {
    &self.message
  }

  /// The message surfaced to the caller, identical in shape for every kind.
  pub fn uniform_message(&self) -> String {
    format!("{UNIFORM_ERROR_PREFIX}{}", self.message)
  }
}

impl From<ValidationError> for DispatchError {
  fn from(err: ValidationError) -> Self {
    let kind = match err {
      ValidationError::UnknownTool(_) => DispatchErrorKind::UnknownTool,
      _ => DispatchErrorKind::InvalidArguments,
    };
    Self::new(kind, err.to_string())
  }
}

impl From<GatewayError> for DispatchError {
  fn from(err: GatewayError) -> Self {
    Self::new(DispatchErrorKind::UpstreamFailure, err.to_string())
  }
}

impl From<NormalizeError> for DispatchError {
  fn from(err: NormalizeError) -> Self {
    let kind = match err {
      NormalizeError::MissingKey => DispatchErrorKind::UpstreamFailure,
      NormalizeError::Serialization(_) => DispatchErrorKind::Serialization,
    };
    Self::new(kind, err.to_string())
  }
}
