//! Field parsers bridging caller shape and wire shape.
//!
//! Parsers are pure: no I/O, and the same input and context always produce
//! the same output. The two directions carry different failure channels —
//! a request parser that cannot remap a validated value has a broken
//! contract with its schemas ([`ContractViolation`]), while a response
//! parser may legitimately fail on an unexpected wire payload
//! ([`ParseError`]).

mod rename;

pub use rename::{IdentityParser, RenameParser};

use crate::errors::{ContractViolation, ParseError};
use crate::schema::{FieldMap, Validated};
use std::collections::HashMap;

/// Auxiliary data threaded into a response parser alongside the validated
/// wire payload.
///
/// Built from the original caller fields at invocation time; optional and
/// empty by default. Carries the identifiers a remapping may need — the
/// symbol the call was made for and a caller-symbol to wire-symbol mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseContext {
    symbol: Option<String>,
    symbol_mapping: HashMap<String, String>,
}

impl ParseContext {
    /// Caller field carrying the symbol identifier.
    pub const SYMBOL_FIELD: &'static str = "symbol";
    /// Caller field carrying the symbol-to-wire-name mapping.
    pub const SYMBOL_MAPPING_FIELD: &'static str = "symbol_mapping";

    /// An empty context.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Extracts the context from the original caller fields.
    ///
    /// Absent or differently-typed fields are simply left out; the context
    /// defaults to empty.
    #[must_use]
    pub fn from_fields(fields: &FieldMap) -> Self {
        let symbol = fields
            .get(Self::SYMBOL_FIELD)
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string);

        let symbol_mapping = fields
            .get(Self::SYMBOL_MAPPING_FIELD)
            .and_then(serde_json::Value::as_object)
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            symbol,
            symbol_mapping,
        }
    }

    /// The symbol the call was made for, if one was supplied.
    #[must_use]
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    /// Maps a caller symbol to its wire name.
    #[must_use]
    pub fn wire_symbol(&self, symbol: &str) -> Option<&str> {
        self.symbol_mapping.get(symbol).map(String::as_str)
    }

    /// Maps a wire name back to the caller symbol (reverse lookup).
    #[must_use]
    pub fn caller_symbol(&self, wire: &str) -> Option<&str> {
        self.symbol_mapping
            .iter()
            .find(|(_, v)| v.as_str() == wire)
            .map(|(k, _)| k.as_str())
    }

    /// Returns true if the context carries nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbol.is_none() && self.symbol_mapping.is_empty()
    }
}

/// Converts a validated caller value into wire-shaped fields.
///
/// Failure means the parser and the schemas around it disagree — a
/// configuration defect surfaced on the fatal channel, never as an
/// expected `Err`.
pub trait RequestParser: Send + Sync {
    /// Remaps the validated caller value into a wire-shaped field map.
    ///
    /// # Errors
    ///
    /// Returns a [`ContractViolation`] when the validated value cannot be
    /// remapped at all.
    fn parse(&self, validated: &Validated) -> Result<FieldMap, ContractViolation>;
}

/// Converts a validated wire payload into caller-shaped fields.
pub trait ResponseParser: Send + Sync {
    /// Remaps the validated wire payload into a caller-shaped field map.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the payload cannot be remapped, e.g.
    /// an unexpected symbol format.
    fn parse(&self, validated: &Validated, ctx: &ParseContext) -> Result<FieldMap, ParseError>;
}

/// A request parser backed by a closure.
pub struct RequestParserFn<F>(F);

impl<F> std::fmt::Debug for RequestParserFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestParserFn").finish()
    }
}

impl<F> RequestParser for RequestParserFn<F>
where
    F: Fn(&Validated) -> Result<FieldMap, ContractViolation> + Send + Sync,
{
    fn parse(&self, validated: &Validated) -> Result<FieldMap, ContractViolation> {
        (self.0)(validated)
    }
}

/// Wraps a closure as a [`RequestParser`].
pub fn request_parser_fn<F>(f: F) -> RequestParserFn<F>
where
    F: Fn(&Validated) -> Result<FieldMap, ContractViolation> + Send + Sync,
{
    RequestParserFn(f)
}

/// A response parser backed by a closure.
pub struct ResponseParserFn<F>(F);

impl<F> std::fmt::Debug for ResponseParserFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseParserFn").finish()
    }
}

impl<F> ResponseParser for ResponseParserFn<F>
where
    F: Fn(&Validated, &ParseContext) -> Result<FieldMap, ParseError> + Send + Sync,
{
    fn parse(&self, validated: &Validated, ctx: &ParseContext) -> Result<FieldMap, ParseError> {
        (self.0)(validated, ctx)
    }
}

/// Wraps a closure as a [`ResponseParser`].
pub fn response_parser_fn<F>(f: F) -> ResponseParserFn<F>
where
    F: Fn(&Validated, &ParseContext) -> Result<FieldMap, ParseError> + Send + Sync,
{
    ResponseParserFn(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldType, Schema};

    fn fields(value: serde_json::Value) -> FieldMap {
        match value {
            serde_json::Value::Object(map) => map.into_iter().collect(),
            _ => panic!("expected an object literal"),
        }
    }

    #[test]
    fn test_context_from_fields() {
        let ctx = ParseContext::from_fields(&fields(serde_json::json!({
            "symbol": "BTC",
            "symbol_mapping": {"BTC": "XBTUSD", "ETH": "ETHUSD"},
            "amount": 1.5
        })));

        assert_eq!(ctx.symbol(), Some("BTC"));
        assert_eq!(ctx.wire_symbol("BTC"), Some("XBTUSD"));
        assert_eq!(ctx.caller_symbol("ETHUSD"), Some("ETH"));
        assert_eq!(ctx.wire_symbol("DOGE"), None);
        assert!(!ctx.is_empty());
    }

    #[test]
    fn test_context_defaults_to_absent() {
        let ctx = ParseContext::from_fields(&fields(serde_json::json!({"amount": 1.5})));
        assert!(ctx.is_empty());
        assert_eq!(ctx.symbol(), None);

        // mistyped entries are left out rather than erroring
        let ctx = ParseContext::from_fields(&fields(serde_json::json!({
            "symbol": 42,
            "symbol_mapping": "not an object"
        })));
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_closure_parsers() {
        let schema = Schema::builder("order")
            .required("symbol", FieldType::String)
            .build()
            .unwrap();
        let validated = schema
            .validate(&fields(serde_json::json!({"symbol": "BTC"})))
            .unwrap();

        let request = request_parser_fn(|v: &Validated| {
            let mut out = FieldMap::new();
            out.insert("sym".to_string(), v.get("symbol").cloned().unwrap_or_default());
            Ok(out)
        });
        let mapped = request.parse(&validated).unwrap();
        assert_eq!(mapped.get("sym"), Some(&serde_json::json!("BTC")));

        let response = response_parser_fn(|_: &Validated, ctx: &ParseContext| {
            Err(ParseError::new(format!(
                "no mapping for symbol {:?}",
                ctx.symbol()
            )))
        });
        assert!(response.parse(&validated, &ParseContext::empty()).is_err());
    }

    #[test]
    fn test_parsers_are_deterministic() {
        let schema = Schema::builder("order")
            .required("symbol", FieldType::String)
            .build()
            .unwrap();
        let validated = schema
            .validate(&fields(serde_json::json!({"symbol": "BTC"})))
            .unwrap();

        let parser = RenameParser::new().rename("symbol", "sym");
        let first = RequestParser::parse(&parser, &validated).unwrap();
        let second = RequestParser::parse(&parser, &validated).unwrap();
        assert_eq!(first, second);
    }
}
