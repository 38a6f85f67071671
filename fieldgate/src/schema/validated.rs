//! The structured value produced by a successful validation.

use super::FieldMap;
use serde::{Deserialize, Serialize};

/// A schema-validated set of field values, in schema declaration order.
///
/// Absent optional fields are present as explicit nulls;
/// [`without_nulls`](Validated::without_nulls) produces the field map with
/// them dropped, which is what gets sent downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validated {
    schema: String,
    fields: Vec<(String, serde_json::Value)>,
}

impl Validated {
    /// Creates a validated value. Only the schema validator constructs
    /// these.
    #[must_use]
    pub(crate) fn new(schema: impl Into<String>, fields: Vec<(String, serde_json::Value)>) -> Self {
        Self {
            schema: schema.into(),
            fields,
        }
    }

    /// Name of the schema this value was validated against.
    #[must_use]
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    /// Looks up a field value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Iterates fields in schema declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields, explicit nulls included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the value holds no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The full field map, explicit nulls included.
    #[must_use]
    pub fn to_field_map(&self) -> FieldMap {
        self.fields.iter().cloned().collect()
    }

    /// The field map with null-valued fields dropped.
    ///
    /// This is the shape handed to the wrapped call: absent optional fields
    /// are never sent downstream.
    #[must_use]
    pub fn without_nulls(&self) -> FieldMap {
        self.fields
            .iter()
            .filter(|(_, value)| !value.is_null())
            .cloned()
            .collect()
    }
}
