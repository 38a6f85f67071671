//! Test doubles for pipeline collaborators.
//!
//! Mocks record invocation counts so tests can assert how often (and with
//! which fields) the wrapped call was actually reached.

use crate::errors::{ContractViolation, PayloadError, StageError};
use crate::outcome::Outcome;
use crate::payload::{PayloadSource, RawPayload};
use crate::schema::FieldMap;
use crate::stages::{BoundaryCall, WireCall};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Builds a [`FieldMap`] from a `serde_json::json!` object literal.
///
/// # Panics
///
/// Panics when the value is not an object; this is a test helper.
#[must_use]
pub fn fields(value: serde_json::Value) -> FieldMap {
    match value {
        serde_json::Value::Object(map) => map.into_iter().collect(),
        other => panic!("expected an object literal, got {other}"),
    }
}

/// A scripted response value with a declared payload capability.
#[derive(Debug)]
pub struct StaticResponse {
    payload: Result<serde_json::Value, PayloadError>,
    deferred: bool,
}

impl StaticResponse {
    /// A response whose payload is immediately available.
    #[must_use]
    pub const fn ready(payload: serde_json::Value) -> Self {
        Self {
            payload: Ok(payload),
            deferred: false,
        }
    }

    /// A response whose payload requires suspension to produce.
    #[must_use]
    pub const fn deferred(payload: serde_json::Value) -> Self {
        Self {
            payload: Ok(payload),
            deferred: true,
        }
    }

    /// A response whose payload retrieval fails.
    #[must_use]
    pub const fn failing(error: PayloadError) -> Self {
        Self {
            payload: Err(error),
            deferred: false,
        }
    }
}

impl PayloadSource for StaticResponse {
    fn payload(self) -> RawPayload {
        if self.deferred {
            RawPayload::deferred(async move { self.payload })
        } else {
            RawPayload::Ready(self.payload)
        }
    }
}

/// A wire call returning a scripted payload, with a call counter and the
/// last-seen wire fields.
#[derive(Debug)]
pub struct MockWireCall {
    payload: Result<serde_json::Value, PayloadError>,
    defer_payload: bool,
    calls: AtomicUsize,
    last_fields: Mutex<Option<FieldMap>>,
}

impl MockWireCall {
    /// A call whose response carries the given payload.
    #[must_use]
    pub const fn returning(payload: serde_json::Value) -> Self {
        Self {
            payload: Ok(payload),
            defer_payload: false,
            calls: AtomicUsize::new(0),
            last_fields: Mutex::new(None),
        }
    }

    /// A call whose response fails to produce a payload.
    #[must_use]
    pub fn failing_payload(reason: impl Into<String>) -> Self {
        Self {
            payload: Err(PayloadError::new(reason)),
            defer_payload: false,
            calls: AtomicUsize::new(0),
            last_fields: Mutex::new(None),
        }
    }

    /// Makes the response declare its payload as deferred.
    #[must_use]
    pub const fn deferred(mut self) -> Self {
        self.defer_payload = true;
        self
    }

    /// How many times the call was invoked.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The wire fields from the most recent invocation.
    ///
    /// # Panics
    ///
    /// Panics if the recording mutex was poisoned; this is a test helper.
    #[must_use]
    pub fn last_fields(&self) -> Option<FieldMap> {
        self.last_fields.lock().unwrap().clone()
    }
}

#[async_trait]
impl WireCall for MockWireCall {
    type Response = StaticResponse;

    async fn call(&self, fields: FieldMap) -> StaticResponse {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_fields.lock().unwrap() = Some(fields);
        StaticResponse {
            payload: self.payload.clone(),
            deferred: self.defer_payload,
        }
    }
}

/// An inner call that always produces the given `Err` outcome, for
/// short-circuit tests.
#[derive(Debug)]
pub struct FailingBoundaryCall {
    error: StageError,
    invocations: AtomicUsize,
}

impl FailingBoundaryCall {
    /// Creates the failing call.
    #[must_use]
    pub const fn new(error: StageError) -> Self {
        Self {
            error,
            invocations: AtomicUsize::new(0),
        }
    }

    /// How many times the call was invoked.
    #[must_use]
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BoundaryCall for FailingBoundaryCall {
    type Value = StaticResponse;

    async fn invoke(
        &self,
        _fields: FieldMap,
    ) -> Result<Outcome<StaticResponse, StageError>, ContractViolation> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        Ok(Outcome::Err(self.error.clone()))
    }
}
