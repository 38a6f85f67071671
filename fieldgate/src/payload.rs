//! Payload retrieval from wrapped-call responses.
//!
//! Different collaborators expose their payload either as an
//! already-available value or as a deferred one. The response value declares
//! which through [`RawPayload`], and the output stage awaits either shape
//! without the caller knowing which applies.

use crate::errors::PayloadError;
use crate::schema::FieldMap;
use futures::future::BoxFuture;

/// A raw payload as declared by the response value: immediate or deferred.
pub enum RawPayload {
    /// The payload is already available.
    Ready(Result<serde_json::Value, PayloadError>),
    /// Producing the payload requires suspension.
    Deferred(BoxFuture<'static, Result<serde_json::Value, PayloadError>>),
}

impl std::fmt::Debug for RawPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
            Self::Deferred(_) => f.debug_tuple("Deferred").finish(),
        }
    }
}

impl RawPayload {
    /// An immediately-available payload.
    #[must_use]
    pub const fn ready(value: serde_json::Value) -> Self {
        Self::Ready(Ok(value))
    }

    /// An immediately-available retrieval failure.
    #[must_use]
    pub const fn ready_err(error: PayloadError) -> Self {
        Self::Ready(Err(error))
    }

    /// A payload produced by awaiting a future.
    pub fn deferred<F>(future: F) -> Self
    where
        F: std::future::Future<Output = Result<serde_json::Value, PayloadError>> + Send + 'static,
    {
        Self::Deferred(Box::pin(future))
    }

    /// Returns true if the payload is already available.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Produces the payload value, suspending only when deferred.
    ///
    /// # Errors
    ///
    /// Returns a [`PayloadError`] when retrieval itself fails.
    pub async fn resolve(self) -> Result<serde_json::Value, PayloadError> {
        match self {
            Self::Ready(result) => result,
            Self::Deferred(future) => future.await,
        }
    }
}

/// Contract for the success value produced by an underlying call.
///
/// The output stage consumes the response and retrieves the raw payload
/// through this accessor.
pub trait PayloadSource: Send {
    /// Hands over the payload, declaring whether it is immediate or
    /// deferred.
    fn payload(self) -> RawPayload;
}

/// Interprets a payload value as a field map.
///
/// # Errors
///
/// Returns a [`PayloadError`] when the payload is not a JSON object and so
/// cannot be validated field by field.
pub fn fields_from_value(value: serde_json::Value) -> Result<FieldMap, PayloadError> {
    match value {
        serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(PayloadError::new(format!(
            "payload is not an object, got {}",
            crate::schema::value_kind(&other)
        ))),
    }
}
