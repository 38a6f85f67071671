//! Schema declarations and field-map validation.
//!
//! A [`Schema`] is a named, ordered set of field declarations built once at
//! pipeline-definition time and immutable thereafter. Validation takes a
//! plain [`FieldMap`] and produces a [`Validated`] value or a
//! [`ValidationError`] carrying every violation found in the pass.

mod constraint;
mod validated;

pub use constraint::FieldConstraint;
pub use validated::Validated;

use crate::errors::{SchemaDefinitionError, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A plain mapping of field name to raw value, used at every stage boundary.
pub type FieldMap = HashMap<String, serde_json::Value>;

/// The JSON kind of a value, for violation messages.
#[must_use]
pub fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// The expected type of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// A JSON string.
    String,
    /// Any JSON number.
    Number,
    /// An integral JSON number. Floats with a zero fraction are folded.
    Integer,
    /// A JSON boolean.
    Boolean,
    /// A JSON array.
    Array,
    /// A JSON object.
    Object,
    /// Any non-null JSON value.
    Any,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Any => "any",
        };
        write!(f, "{name}")
    }
}

impl FieldType {
    /// Checks a non-null value against this type, applying the declared
    /// coercions. Returns the (possibly coerced) value, or a violation
    /// reason.
    ///
    /// # Errors
    ///
    /// Returns the human-readable reason when the value does not match.
    pub fn check(&self, value: &serde_json::Value) -> Result<serde_json::Value, String> {
        let ok = match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => {
                if value.is_i64() || value.is_u64() {
                    true
                } else if let Some(f) = value.as_f64() {
                    // fold 2.0 -> 2; reject 2.5
                    if f.is_finite() && f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 {
                        return Ok(serde_json::json!(f as i64));
                    }
                    false
                } else {
                    false
                }
            }
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
            Self::Any => !value.is_null(),
        };

        if ok {
            Ok(value.clone())
        } else {
            Err(format!("expected {self}, got {}", value_kind(value)))
        }
    }
}

/// A single field declaration inside a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// The field name.
    pub name: String,
    /// The expected type.
    pub field_type: FieldType,
    /// Whether the field must be present and non-null.
    pub required: bool,
    /// Declared constraints, checked only on well-typed values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<FieldConstraint>,
}

impl FieldSpec {
    /// Declares a required field.
    #[must_use]
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            constraints: Vec::new(),
        }
    }

    /// Declares an optional field.
    #[must_use]
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            constraints: Vec::new(),
        }
    }

    /// Adds a constraint to the declaration.
    #[must_use]
    pub fn with_constraint(mut self, constraint: FieldConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// A named, ordered set of field declarations.
///
/// Schemas are built once via [`Schema::builder`] and never mutated;
/// validation against a schema never mutates the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    name: String,
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Starts a schema declaration.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// The schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared fields, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Validates a field map against this schema.
    ///
    /// Every declared field is checked before returning, so the error
    /// carries all violations, not just the first. Undeclared fields are
    /// ignored. Absent optional fields are recorded as explicit nulls in the
    /// validated value.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming every missing, mistyped, or
    /// constraint-violating field.
    pub fn validate(&self, fields: &FieldMap) -> Result<Validated, ValidationError> {
        let mut error = ValidationError::new(&self.name);
        let mut values: Vec<(String, serde_json::Value)> = Vec::with_capacity(self.fields.len());

        for spec in &self.fields {
            let raw = fields.get(&spec.name).filter(|v| !v.is_null());
            match raw {
                None => {
                    if spec.required {
                        error.push(&spec.name, "required field is missing");
                    } else {
                        values.push((spec.name.clone(), serde_json::Value::Null));
                    }
                }
                Some(value) => match spec.field_type.check(value) {
                    Err(reason) => error.push(&spec.name, reason),
                    Ok(coerced) => {
                        let mut valid = true;
                        for constraint in &spec.constraints {
                            if let Err(reason) = constraint.check(&coerced) {
                                error.push(&spec.name, reason);
                                valid = false;
                            }
                        }
                        if valid {
                            values.push((spec.name.clone(), coerced));
                        }
                    }
                },
            }
        }

        if error.is_empty() {
            Ok(Validated::new(&self.name, values))
        } else {
            tracing::warn!(
                schema = %self.name,
                violations = error.violations.len(),
                "field validation failed"
            );
            Err(error)
        }
    }
}

/// Builder for [`Schema`] declarations.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    /// Declares a required field.
    #[must_use]
    pub fn required(self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.field(FieldSpec::required(name, field_type))
    }

    /// Declares an optional field.
    #[must_use]
    pub fn optional(self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.field(FieldSpec::optional(name, field_type))
    }

    /// Adds a full field declaration.
    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Finalizes the declaration.
    ///
    /// # Errors
    ///
    /// Rejects empty schema or field names, duplicate field names, and
    /// pattern constraints that do not compile.
    pub fn build(self) -> Result<Schema, SchemaDefinitionError> {
        if self.name.trim().is_empty() {
            return Err(SchemaDefinitionError::new(self.name, "schema name cannot be empty"));
        }

        let mut seen = HashSet::new();
        for spec in &self.fields {
            if spec.name.trim().is_empty() {
                return Err(SchemaDefinitionError::new(&self.name, "field name cannot be empty"));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(SchemaDefinitionError::new(
                    &self.name,
                    format!("duplicate field '{}'", spec.name),
                ));
            }
            for constraint in &spec.constraints {
                constraint.verify().map_err(|reason| {
                    SchemaDefinitionError::new(
                        &self.name,
                        format!("field '{}': {reason}", spec.name),
                    )
                })?;
            }
        }

        Ok(Schema {
            name: self.name,
            fields: self.fields,
        })
    }
}
