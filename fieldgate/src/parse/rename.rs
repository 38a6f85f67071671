//! Ready-made parsers for the common remapping shapes.

use super::{ParseContext, RequestParser, ResponseParser};
use crate::errors::{ContractViolation, ParseError};
use crate::schema::{FieldMap, Validated};
use std::collections::HashMap;

/// A parser that remaps field names 1:1 through a rename table.
///
/// Fields without an entry keep their name; values pass through untouched,
/// explicit nulls included (the input stage drops nulls after wire
/// validation, not here). Usable in both directions.
#[derive(Debug, Clone, Default)]
pub struct RenameParser {
    renames: HashMap<String, String>,
}

impl RenameParser {
    /// Creates an empty rename table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rename entry.
    #[must_use]
    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.insert(from.into(), to.into());
        self
    }

    fn remap(&self, validated: &Validated) -> FieldMap {
        validated
            .iter()
            .map(|(name, value)| {
                let target = self.renames.get(name).map_or(name, String::as_str);
                (target.to_string(), value.clone())
            })
            .collect()
    }
}

impl RequestParser for RenameParser {
    fn parse(&self, validated: &Validated) -> Result<FieldMap, ContractViolation> {
        Ok(self.remap(validated))
    }
}

impl ResponseParser for RenameParser {
    fn parse(&self, validated: &Validated, _ctx: &ParseContext) -> Result<FieldMap, ParseError> {
        Ok(self.remap(validated))
    }
}

/// A parser that passes the validated fields through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityParser;

impl IdentityParser {
    /// Creates the identity parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl RequestParser for IdentityParser {
    fn parse(&self, validated: &Validated) -> Result<FieldMap, ContractViolation> {
        Ok(validated.to_field_map())
    }
}

impl ResponseParser for IdentityParser {
    fn parse(&self, validated: &Validated, _ctx: &ParseContext) -> Result<FieldMap, ParseError> {
        Ok(validated.to_field_map())
    }
}
