//! Error types for the boundary-validation pipeline.
//!
//! The taxonomy separates expected failures (bad caller input, bad wire
//! response, failed remapping) from fatal configuration defects. Expected
//! failures travel inside an [`Outcome`](crate::outcome::Outcome) as a
//! [`StageError`]; configuration defects surface as [`ContractViolation`] on
//! the invocation's outer `Result` and never mix with user-input errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field-level schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// The offending field name.
    pub field: String,
    /// Why the field was rejected.
    pub reason: String,
}

impl FieldViolation {
    /// Creates a new field violation.
    #[must_use]
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// A failed validation attempt against a schema.
///
/// Carries every field violation found in the pass, never just the first,
/// and keeps the field-level detail when propagated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Name of the schema the fields were validated against.
    pub schema: String,
    /// All violations found in the validation pass.
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Creates an empty validation error for a schema.
    #[must_use]
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            violations: Vec::new(),
        }
    }

    /// Adds a violation.
    #[must_use]
    pub fn with_violation(mut self, field: impl Into<String>, reason: impl Into<String>) -> Self {
        self.violations.push(FieldViolation::new(field, reason));
        self
    }

    /// Records a violation in place.
    pub fn push(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.violations.push(FieldViolation::new(field, reason));
    }

    /// Returns true if no violations were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Names of all offending fields, in the order found.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }

    /// Returns true if the given field is among the violations.
    #[must_use]
    pub fn mentions(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let detail = self
            .violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "validation against schema '{}' failed: {}", self.schema, detail)
    }
}

impl std::error::Error for ValidationError {}

/// A response parser explicitly reported a failed remapping.
///
/// This is an expected failure (e.g. an unresolvable symbol in the wire
/// payload), distinct from the fatal [`ContractViolation`] channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    /// Why the remapping failed.
    pub reason: String,
    /// The field involved, if the failure is field-scoped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            field: None,
        }
    }

    /// Creates a parse error scoped to a specific field.
    #[must_use]
    pub fn for_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            field: Some(field.into()),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "response parsing failed for field '{}': {}", field, self.reason),
            None => write!(f, "response parsing failed: {}", self.reason),
        }
    }
}

impl std::error::Error for ParseError {}

/// Payload retrieval from a wrapped-call response failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("payload retrieval failed: {reason}")]
pub struct PayloadError {
    /// Why the payload could not be produced.
    pub reason: String,
}

impl PayloadError {
    /// Creates a new payload error.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The expected-failure union carried inside an `Outcome::Err`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum StageError {
    /// Field-level schema violation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The response parser reported a failed remapping.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// Payload retrieval failed.
    #[error("{0}")]
    Payload(#[from] PayloadError),
}

impl StageError {
    /// Returns the inner validation error, if that is what this is.
    #[must_use]
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

/// A request parser broke its contract with the schemas around it.
///
/// This marks a programmer/configuration defect, not bad user input. It
/// travels on the invocation's outer `Result` channel so misconfigured
/// pipelines fail loudly instead of producing an `Outcome::Err`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("request parser contract violated for schema '{schema}': {reason}")]
pub struct ContractViolation {
    /// The schema whose validated value could not be remapped.
    pub schema: String,
    /// What the parser could not do.
    pub reason: String,
}

impl ContractViolation {
    /// Creates a new contract violation.
    #[must_use]
    pub fn new(schema: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            reason: reason.into(),
        }
    }
}

/// A schema declaration was rejected at build time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid schema definition '{schema}': {reason}")]
pub struct SchemaDefinitionError {
    /// The schema being declared.
    pub schema: String,
    /// Why the declaration was rejected.
    pub reason: String,
}

impl SchemaDefinitionError {
    /// Creates a new schema definition error.
    #[must_use]
    pub fn new(schema: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            reason: reason.into(),
        }
    }
}

/// A pipeline declaration was rejected at build time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid pipeline definition '{pipeline}': {reason}")]
pub struct PipelineDefinitionError {
    /// The pipeline being declared.
    pub pipeline: String,
    /// Why the declaration was rejected.
    pub reason: String,
}

impl PipelineDefinitionError {
    /// Creates a new pipeline definition error.
    #[must_use]
    pub fn new(pipeline: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            pipeline: pipeline.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_collects_all_violations() {
        let err = ValidationError::new("order")
            .with_violation("amount", "required field is missing")
            .with_violation("symbol", "expected string, got number");

        assert_eq!(err.fields(), vec!["amount", "symbol"]);
        assert!(err.mentions("amount"));
        assert!(!err.mentions("price"));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("order").with_violation("amount", "required field is missing");
        assert_eq!(
            err.to_string(),
            "validation against schema 'order' failed: amount: required field is missing"
        );
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("unexpected symbol format");
        assert_eq!(err.to_string(), "response parsing failed: unexpected symbol format");

        let err = ParseError::for_field("sym", "no mapping for 'XBTUSD'");
        assert_eq!(
            err.to_string(),
            "response parsing failed for field 'sym': no mapping for 'XBTUSD'"
        );
    }

    #[test]
    fn test_stage_error_wraps_leaves() {
        let err: StageError = ValidationError::new("order")
            .with_violation("qty", "expected number, got string")
            .into();
        assert!(err.as_validation().is_some());

        let err: StageError = ParseError::new("bad shape").into();
        assert!(err.as_validation().is_none());
    }

    #[test]
    fn test_contract_violation_display() {
        let err = ContractViolation::new("order", "field 'amount' absent from validated value");
        assert!(err.to_string().contains("order"));
        assert!(err.to_string().contains("amount"));
    }

    #[test]
    fn test_stage_error_serialization() {
        let err: StageError = PayloadError::new("connection reset").into();
        let json = serde_json::to_string(&err).unwrap();
        let deserialized: StageError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, deserialized);
    }
}
