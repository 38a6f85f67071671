//! The output validation stage.

use super::BoundaryCall;
use crate::errors::{ContractViolation, StageError};
use crate::outcome::Outcome;
use crate::parse::{ParseContext, ResponseParser};
use crate::payload::{fields_from_value, PayloadSource};
use crate::schema::{FieldMap, Schema, Validated};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Wraps a [`BoundaryCall`] with wire-side and caller-side response
/// validation.
///
/// An upstream `Err` outcome passes through unchanged — output validation
/// never runs on an already-failed pipeline. On success the stage resolves
/// the response payload (immediate or deferred), validates it against the
/// wire-response schema, remaps it with the response parser, and validates
/// the remapped fields against the caller-response schema.
pub struct ResponseStage<C> {
    wire_schema: Arc<Schema>,
    caller_schema: Arc<Schema>,
    parser: Arc<dyn ResponseParser>,
    inner: C,
}

impl<C> ResponseStage<C> {
    /// Creates the stage around an inner call.
    pub fn new(
        wire_schema: Arc<Schema>,
        caller_schema: Arc<Schema>,
        parser: Arc<dyn ResponseParser>,
        inner: C,
    ) -> Self {
        Self {
            wire_schema,
            caller_schema,
            parser,
            inner,
        }
    }
}

impl<C> std::fmt::Debug for ResponseStage<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseStage")
            .field("wire_schema", &self.wire_schema.name())
            .field("caller_schema", &self.caller_schema.name())
            .finish()
    }
}

#[async_trait]
impl<C> BoundaryCall for ResponseStage<C>
where
    C: BoundaryCall,
    C::Value: PayloadSource,
{
    type Value = Validated;

    async fn invoke(
        &self,
        fields: FieldMap,
    ) -> Result<Outcome<Validated, StageError>, ContractViolation> {
        // the context reads the original caller fields before they move
        // inward
        let ctx = ParseContext::from_fields(&fields);

        let response = match self.inner.invoke(fields).await? {
            Outcome::Ok(response) => response,
            Outcome::Err(error) => return Ok(Outcome::Err(error)),
        };

        let raw = match response.payload().resolve().await {
            Ok(value) => value,
            Err(err) => return Ok(Outcome::Err(err.into())),
        };
        let raw_fields = match fields_from_value(raw) {
            Ok(map) => map,
            Err(err) => return Ok(Outcome::Err(err.into())),
        };

        let wire_value = match self.wire_schema.validate(&raw_fields) {
            Ok(validated) => validated,
            Err(err) => return Ok(Outcome::Err(err.into())),
        };

        let caller_fields = match self.parser.parse(&wire_value, &ctx) {
            Ok(map) => map,
            Err(err) => return Ok(Outcome::Err(err.into())),
        };

        match self.caller_schema.validate(&caller_fields) {
            Ok(validated) => {
                debug!(
                    schema = %self.caller_schema.name(),
                    fields = validated.len(),
                    "response validated"
                );
                Ok(Outcome::Ok(validated))
            }
            Err(err) => Ok(Outcome::Err(err.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ParseError, PayloadError, ValidationError};
    use crate::parse::RenameParser;
    use crate::schema::FieldType;
    use crate::stages::{RequestStage, WireCall};
    use crate::testing::{fields, FailingBoundaryCall, MockWireCall, StaticResponse};
    use pretty_assertions::assert_eq;

    fn wire_response_schema() -> Arc<Schema> {
        Arc::new(
            Schema::builder("ticker_wire")
                .required("last_px", FieldType::Number)
                .required("sym", FieldType::String)
                .build()
                .unwrap(),
        )
    }

    fn caller_response_schema() -> Arc<Schema> {
        Arc::new(
            Schema::builder("ticker")
                .required("price", FieldType::Number)
                .required("symbol", FieldType::String)
                .build()
                .unwrap(),
        )
    }

    fn response_parser() -> Arc<RenameParser> {
        Arc::new(RenameParser::new().rename("last_px", "price").rename("sym", "symbol"))
    }

    /// A passthrough inner call that skips request validation, so these
    /// tests exercise the output stage alone.
    struct Passthrough(Arc<MockWireCall>);

    #[async_trait]
    impl BoundaryCall for Passthrough {
        type Value = StaticResponse;

        async fn invoke(
            &self,
            fields: FieldMap,
        ) -> Result<Outcome<StaticResponse, StageError>, ContractViolation> {
            Ok(Outcome::Ok(self.0.call(fields).await))
        }
    }

    fn stage(call: Arc<MockWireCall>) -> ResponseStage<Passthrough> {
        ResponseStage::new(
            wire_response_schema(),
            caller_response_schema(),
            response_parser(),
            Passthrough(call),
        )
    }

    #[tokio::test]
    async fn test_valid_payload_is_remapped_and_validated() {
        let call = Arc::new(MockWireCall::returning(
            serde_json::json!({"last_px": 64000.5, "sym": "XBTUSD"}),
        ));
        let outcome = stage(call).invoke(FieldMap::new()).await.unwrap();

        let validated = outcome.into_value();
        assert_eq!(validated.schema_name(), "ticker");
        assert_eq!(validated.get("price"), Some(&serde_json::json!(64000.5)));
        assert_eq!(validated.get("symbol"), Some(&serde_json::json!("XBTUSD")));
    }

    #[tokio::test]
    async fn test_deferred_payload_is_awaited() {
        let call = Arc::new(
            MockWireCall::returning(serde_json::json!({"last_px": 1.0, "sym": "X"})).deferred(),
        );
        let outcome = stage(call).invoke(FieldMap::new()).await.unwrap();
        assert!(outcome.is_ok());
    }

    #[tokio::test]
    async fn test_upstream_err_passes_through_unchanged() {
        let upstream: StageError = ValidationError::new("order")
            .with_violation("amount", "required field is missing")
            .into();
        let inner = FailingBoundaryCall::new(upstream.clone());
        let stage = ResponseStage::new(
            wire_response_schema(),
            caller_response_schema(),
            response_parser(),
            inner,
        );

        let outcome = stage.invoke(FieldMap::new()).await.unwrap();
        assert_eq!(outcome.into_error(), upstream);
    }

    #[tokio::test]
    async fn test_payload_failure_becomes_err() {
        let call = Arc::new(MockWireCall::failing_payload("connection reset"));
        let outcome = stage(call).invoke(FieldMap::new()).await.unwrap();

        let error = outcome.into_error();
        assert_eq!(error, PayloadError::new("connection reset").into());
    }

    #[tokio::test]
    async fn test_non_object_payload_becomes_err() {
        let call = Arc::new(MockWireCall::returning(serde_json::json!([1, 2, 3])));
        let outcome = stage(call).invoke(FieldMap::new()).await.unwrap();
        assert!(matches!(outcome.into_error(), StageError::Payload(_)));
    }

    #[tokio::test]
    async fn test_wire_response_violations_are_reported() {
        let call = Arc::new(MockWireCall::returning(
            serde_json::json!({"last_px": "not a number"}),
        ));
        let outcome = stage(call).invoke(FieldMap::new()).await.unwrap();

        let error = outcome.into_error();
        let validation = error.as_validation().unwrap();
        assert_eq!(validation.schema, "ticker_wire");
        assert_eq!(validation.fields(), vec!["last_px", "sym"]);
    }

    #[tokio::test]
    async fn test_parser_err_short_circuits_caller_validation() {
        let call = Arc::new(MockWireCall::returning(
            serde_json::json!({"last_px": 1.0, "sym": "XBTUSD"}),
        ));
        let parser = crate::parse::response_parser_fn(|_, ctx: &ParseContext| {
            Err(ParseError::new(format!(
                "no caller symbol for wire name, context symbol {:?}",
                ctx.symbol()
            )))
        });
        let stage = ResponseStage::new(
            wire_response_schema(),
            caller_response_schema(),
            Arc::new(parser),
            Passthrough(call),
        );

        let outcome = stage.invoke(FieldMap::new()).await.unwrap();
        assert!(matches!(outcome.into_error(), StageError::Parse(_)));
    }

    #[tokio::test]
    async fn test_context_carries_original_caller_fields() {
        let call = Arc::new(MockWireCall::returning(
            serde_json::json!({"last_px": 1.0, "sym": "XBTUSD"}),
        ));
        let parser = crate::parse::response_parser_fn(|v: &Validated, ctx: &ParseContext| {
            let mut out = FieldMap::new();
            out.insert("price".to_string(), v.get("last_px").cloned().unwrap_or_default());
            // remap the wire symbol back through the caller-supplied table
            let wire = v.get("sym").and_then(serde_json::Value::as_str).unwrap_or_default();
            let symbol = ctx
                .caller_symbol(wire)
                .ok_or_else(|| ParseError::for_field("sym", format!("no mapping for '{wire}'")))?;
            out.insert("symbol".to_string(), serde_json::json!(symbol));
            Ok(out)
        });
        let stage = ResponseStage::new(
            wire_response_schema(),
            caller_response_schema(),
            Arc::new(parser),
            Passthrough(call),
        );

        let outcome = stage
            .invoke(fields(serde_json::json!({
                "symbol": "BTC",
                "symbol_mapping": {"BTC": "XBTUSD"}
            })))
            .await
            .unwrap();

        let validated = outcome.into_value();
        assert_eq!(validated.get("symbol"), Some(&serde_json::json!("BTC")));
    }

    #[tokio::test]
    async fn test_stacked_on_request_stage() {
        let caller_schema = Arc::new(
            Schema::builder("ticker_req")
                .required("symbol", FieldType::String)
                .build()
                .unwrap(),
        );
        let wire_schema = Arc::new(
            Schema::builder("ticker_req_wire")
                .required("sym", FieldType::String)
                .build()
                .unwrap(),
        );
        let call = Arc::new(MockWireCall::returning(
            serde_json::json!({"last_px": 2.5, "sym": "XBTUSD"}),
        ));
        let request = RequestStage::new(
            caller_schema,
            wire_schema,
            Arc::new(RenameParser::new().rename("symbol", "sym")),
            Arc::clone(&call),
        );
        let stage = ResponseStage::new(
            wire_response_schema(),
            caller_response_schema(),
            response_parser(),
            request,
        );

        let outcome = stage
            .invoke(fields(serde_json::json!({"symbol": "XBTUSD"})))
            .await
            .unwrap();

        assert!(outcome.is_ok());
        assert_eq!(call.call_count(), 1);
    }
}
