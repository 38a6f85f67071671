//! Pipeline composition.
//!
//! A [`Pipeline`] stacks the output stage around the input stage around the
//! underlying call, with the ordering fixed at construction: input
//! validation sits innermost (closest to the call) and output validation
//! outermost, because the output stage inspects the outcome that only the
//! input stage's invocation produces. Schemas and parsers are captured once
//! by the builder and are read-only afterwards.

mod identity;


pub use identity::CallIdentity;

use crate::errors::{ContractViolation, PipelineDefinitionError, StageError};
use crate::outcome::Outcome;
use crate::parse::{RequestParser, ResponseParser};
use crate::payload::PayloadSource;
use crate::schema::{FieldMap, Schema, Validated};
use crate::stages::{BoundaryCall, RequestStage, ResponseStage, WireCall};
use std::sync::Arc;
use tracing::Instrument;

/// A composed boundary-validation pipeline around one underlying call.
///
/// The observable contract: accepts caller-facing named fields, returns
/// exactly one [`Outcome`] of caller-facing response or structured error.
/// Invocations share no mutable state and are safe to run concurrently.
pub struct Pipeline<C> {
    name: String,
    stack: ResponseStage<RequestStage<C>>,
}

impl<C> Pipeline<C>
where
    C: WireCall,
    C::Response: PayloadSource,
{
    /// The pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the composed pipeline with caller-facing named fields.
    ///
    /// # Errors
    ///
    /// Returns a [`ContractViolation`] only when the request parser breaks
    /// its contract with the schemas around it; every expected failure
    /// arrives inside the outcome.
    pub async fn call(
        &self,
        fields: FieldMap,
    ) -> Result<Outcome<Validated, StageError>, ContractViolation> {
        let call_id = CallIdentity::new();
        let span = tracing::debug_span!(
            "pipeline_call",
            pipeline.name = %self.name,
            pipeline.call_id = %call_id,
        );
        self.stack.invoke(fields).instrument(span).await
    }
}

impl<C> std::fmt::Debug for Pipeline<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("stack", &self.stack)
            .finish()
    }
}

/// Builder capturing schemas and parsers at pipeline-definition time.
pub struct PipelineBuilder {
    name: String,
    caller_request: Option<Schema>,
    wire_request: Option<Schema>,
    request_parser: Option<Arc<dyn RequestParser>>,
    wire_response: Option<Schema>,
    caller_response: Option<Schema>,
    response_parser: Option<Arc<dyn ResponseParser>>,
}

impl PipelineBuilder {
    /// Starts a pipeline declaration.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            caller_request: None,
            wire_request: None,
            request_parser: None,
            wire_response: None,
            caller_response: None,
            response_parser: None,
        }
    }

    /// Declares the request side: the caller-facing schema, the wire
    /// schema, and the parser remapping the first into the second.
    #[must_use]
    pub fn request(
        mut self,
        caller: Schema,
        wire: Schema,
        parser: impl RequestParser + 'static,
    ) -> Self {
        self.caller_request = Some(caller);
        self.wire_request = Some(wire);
        self.request_parser = Some(Arc::new(parser));
        self
    }

    /// Declares the response side: the wire-response schema, the
    /// caller-facing schema, and the parser remapping the first into the
    /// second.
    #[must_use]
    pub fn response(
        mut self,
        wire: Schema,
        caller: Schema,
        parser: impl ResponseParser + 'static,
    ) -> Self {
        self.wire_response = Some(wire);
        self.caller_response = Some(caller);
        self.response_parser = Some(Arc::new(parser));
        self
    }

    /// Composes the stages around the underlying call.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineDefinitionError`] naming the missing declaration
    /// when either side is incomplete.
    pub fn build<C>(self, call: C) -> Result<Pipeline<C>, PipelineDefinitionError>
    where
        C: WireCall,
        C::Response: PayloadSource,
    {
        let missing = |part: &str| PipelineDefinitionError::new(&self.name, format!("missing {part}"));

        let caller_request = self.caller_request.ok_or_else(|| missing("request declaration"))?;
        let wire_request = self.wire_request.ok_or_else(|| missing("request declaration"))?;
        let request_parser = self.request_parser.ok_or_else(|| missing("request declaration"))?;
        let wire_response = self.wire_response.ok_or_else(|| missing("response declaration"))?;
        let caller_response = self.caller_response.ok_or_else(|| missing("response declaration"))?;
        let response_parser = self.response_parser.ok_or_else(|| missing("response declaration"))?;

        let request = RequestStage::new(
            Arc::new(caller_request),
            Arc::new(wire_request),
            request_parser,
            call,
        );
        let stack = ResponseStage::new(
            Arc::new(wire_response),
            Arc::new(caller_response),
            response_parser,
            request,
        );

        Ok(Pipeline {
            name: self.name,
            stack,
        })
    }
}

impl std::fmt::Debug for PipelineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineBuilder")
            .field("name", &self.name)
            .field("request_declared", &self.caller_request.is_some())
            .field("response_declared", &self.wire_response.is_some())
            .finish()
    }
}
