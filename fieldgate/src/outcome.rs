//! The Ok/Err value passed across stage boundaries.
//!
//! Every expected failure mode travels inside an [`Outcome`]; stages never
//! panic across a boundary for bad input or a bad wire response.

use serde::{Deserialize, Serialize};

/// A two-variant value: success with a value, or failure with an error.
///
/// `Outcome` is immutable once constructed and is the sole error-propagation
/// channel between stages. Accessing the wrong variant through [`value`] or
/// [`error`] is a programming error and panics; recoverable callers use
/// [`ok`], [`err`], or pattern matching instead.
///
/// [`value`]: Outcome::value
/// [`error`]: Outcome::error
/// [`ok`]: Outcome::ok
/// [`err`]: Outcome::err
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome<T, E> {
    /// The operation succeeded.
    Ok(T),
    /// The operation failed with a structured error.
    Err(E),
}

impl<T, E> Outcome<T, E> {
    /// Returns true if this is an `Ok` outcome.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Returns true if this is an `Err` outcome.
    #[must_use]
    pub const fn is_err(&self) -> bool {
        matches!(self, Self::Err(_))
    }

    /// Returns a reference to the held value.
    ///
    /// # Panics
    ///
    /// Panics if the outcome is `Err`. Only call this after checking
    /// [`is_ok`](Self::is_ok), or use [`ok`](Self::ok) instead.
    #[must_use]
    pub fn value(&self) -> &T {
        match self {
            Self::Ok(value) => value,
            Self::Err(_) => panic!("called `Outcome::value()` on an `Err` outcome"),
        }
    }

    /// Returns a reference to the held error.
    ///
    /// # Panics
    ///
    /// Panics if the outcome is `Ok`. Only call this after checking
    /// [`is_err`](Self::is_err), or use [`err`](Self::err) instead.
    #[must_use]
    pub fn error(&self) -> &E {
        match self {
            Self::Ok(_) => panic!("called `Outcome::error()` on an `Ok` outcome"),
            Self::Err(error) => error,
        }
    }

    /// Consumes the outcome and returns the value.
    ///
    /// # Panics
    ///
    /// Panics if the outcome is `Err`.
    #[must_use]
    pub fn into_value(self) -> T {
        match self {
            Self::Ok(value) => value,
            Self::Err(_) => panic!("called `Outcome::into_value()` on an `Err` outcome"),
        }
    }

    /// Consumes the outcome and returns the error.
    ///
    /// # Panics
    ///
    /// Panics if the outcome is `Ok`.
    #[must_use]
    pub fn into_error(self) -> E {
        match self {
            Self::Ok(_) => panic!("called `Outcome::into_error()` on an `Ok` outcome"),
            Self::Err(error) => error,
        }
    }

    /// Consumes the outcome, returning the value if `Ok`.
    #[must_use]
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Err(_) => None,
        }
    }

    /// Consumes the outcome, returning the error if `Err`.
    #[must_use]
    pub fn err(self) -> Option<E> {
        match self {
            Self::Ok(_) => None,
            Self::Err(error) => Some(error),
        }
    }

    /// Maps the success value, leaving an error untouched.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U, E> {
        match self {
            Self::Ok(value) => Outcome::Ok(f(value)),
            Self::Err(error) => Outcome::Err(error),
        }
    }

    /// Maps the error, leaving a success value untouched.
    pub fn map_err<F, O: FnOnce(E) -> F>(self, f: O) -> Outcome<T, F> {
        match self {
            Self::Ok(value) => Outcome::Ok(value),
            Self::Err(error) => Outcome::Err(f(error)),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(error) => Self::Err(error),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        match outcome {
            Outcome::Ok(value) => Ok(value),
            Outcome::Err(error) => Err(error),
        }
    }
}
