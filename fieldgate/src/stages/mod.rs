//! The composable validation stages and the call contracts they wrap.
//!
//! A stage is a value wrapping a callable: [`RequestStage`] turns a raw
//! [`WireCall`] into a [`BoundaryCall`], and [`ResponseStage`] wraps any
//! `BoundaryCall` whose success value exposes a payload. Stacking the two
//! gives the full validate → parse → invoke → validate → parse pipeline.

mod request;
mod response;

pub use request::RequestStage;
pub use response::ResponseStage;

use crate::errors::{ContractViolation, StageError};
use crate::outcome::Outcome;
use crate::schema::FieldMap;
use async_trait::async_trait;
use std::sync::Arc;

/// The underlying asynchronous call being wrapped.
///
/// Accepts wire-shaped named fields and returns a payload-bearing response
/// value. Transport failures belong to the response's payload accessor, not
/// to this signature.
#[async_trait]
pub trait WireCall: Send + Sync {
    /// The response value the call produces.
    type Response: Send;

    /// Performs the call with wire-shaped fields.
    async fn call(&self, fields: FieldMap) -> Self::Response;
}

#[async_trait]
impl<C: WireCall> WireCall for Arc<C> {
    type Response = C::Response;

    async fn call(&self, fields: FieldMap) -> Self::Response {
        C::call(self, fields).await
    }
}

/// A composed, invocable stage stack.
///
/// Every expected failure comes back as `Outcome::Err`; the outer `Result`
/// carries only [`ContractViolation`] — the fatal channel for misconfigured
/// schema/parser pairs.
#[async_trait]
pub trait BoundaryCall: Send + Sync {
    /// The success value inside the outcome.
    type Value: Send;

    /// Invokes the stage stack with named fields.
    ///
    /// # Errors
    ///
    /// Returns a [`ContractViolation`] when a request parser breaks its
    /// contract with the schemas around it.
    async fn invoke(
        &self,
        fields: FieldMap,
    ) -> Result<Outcome<Self::Value, StageError>, ContractViolation>;
}

#[async_trait]
impl<C: BoundaryCall> BoundaryCall for Arc<C> {
    type Value = C::Value;

    async fn invoke(
        &self,
        fields: FieldMap,
    ) -> Result<Outcome<Self::Value, StageError>, ContractViolation> {
        C::invoke(self, fields).await
    }
}
