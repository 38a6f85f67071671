//! The input validation stage.

use super::{BoundaryCall, WireCall};
use crate::errors::{ContractViolation, StageError};
use crate::outcome::Outcome;
use crate::parse::RequestParser;
use crate::schema::{FieldMap, Schema};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Wraps a [`WireCall`] with caller-side and wire-side request validation.
///
/// Invocation order is fixed: validate the caller fields, remap them to wire
/// shape, validate the wire fields, drop nulls, invoke the call once, lift
/// its response into `Ok`. A validation failure returns before the call is
/// made.
pub struct RequestStage<C> {
    caller_schema: Arc<Schema>,
    wire_schema: Arc<Schema>,
    parser: Arc<dyn RequestParser>,
    call: C,
}

impl<C> RequestStage<C> {
    /// Creates the stage around a call.
    pub fn new(
        caller_schema: Arc<Schema>,
        wire_schema: Arc<Schema>,
        parser: Arc<dyn RequestParser>,
        call: C,
    ) -> Self {
        Self {
            caller_schema,
            wire_schema,
            parser,
            call,
        }
    }
}

impl<C> std::fmt::Debug for RequestStage<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestStage")
            .field("caller_schema", &self.caller_schema.name())
            .field("wire_schema", &self.wire_schema.name())
            .finish()
    }
}

#[async_trait]
impl<C: WireCall> BoundaryCall for RequestStage<C> {
    type Value = C::Response;

    async fn invoke(
        &self,
        fields: FieldMap,
    ) -> Result<Outcome<Self::Value, StageError>, ContractViolation> {
        let caller_value = match self.caller_schema.validate(&fields) {
            Ok(validated) => validated,
            Err(err) => return Ok(Outcome::Err(err.into())),
        };

        // parser failures are contract bugs and take the fatal channel
        let wire_fields = self.parser.parse(&caller_value)?;

        let wire_value = match self.wire_schema.validate(&wire_fields) {
            Ok(validated) => validated,
            Err(err) => return Ok(Outcome::Err(err.into())),
        };

        let outgoing = wire_value.without_nulls();
        debug!(
            schema = %self.wire_schema.name(),
            fields = outgoing.len(),
            "dispatching wire call"
        );

        let response = self.call.call(outgoing).await;
        Ok(Outcome::Ok(response))
    }
}
