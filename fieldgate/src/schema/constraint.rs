//! Declared per-field constraints.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A constraint attached to a field declaration.
///
/// Constraints run only on values that already matched the declared type;
/// a mistyped field reports the type violation alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldConstraint {
    /// Strings and arrays must be non-empty.
    NonEmpty,
    /// Numbers must be at least this value.
    MinNumber {
        /// The inclusive lower bound.
        min: f64,
    },
    /// Numbers must be at most this value.
    MaxNumber {
        /// The inclusive upper bound.
        max: f64,
    },
    /// Strings must match the given regex.
    // TODO: cache compiled patterns once schemas sit on hot paths
    Pattern {
        /// The regex pattern, verified at schema build time.
        pattern: String,
    },
    /// Strings must be one of the listed options.
    OneOf {
        /// The allowed values.
        options: Vec<String>,
    },
}

impl FieldConstraint {
    /// A non-empty constraint.
    #[must_use]
    pub const fn non_empty() -> Self {
        Self::NonEmpty
    }

    /// An inclusive numeric lower bound.
    #[must_use]
    pub fn min_number(min: f64) -> Self {
        Self::MinNumber { min }
    }

    /// An inclusive numeric upper bound.
    #[must_use]
    pub fn max_number(max: f64) -> Self {
        Self::MaxNumber { max }
    }

    /// A regex pattern constraint.
    #[must_use]
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
        }
    }

    /// An enumeration constraint.
    #[must_use]
    pub fn one_of<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Verifies the constraint declaration itself (used at schema build
    /// time).
    ///
    /// # Errors
    ///
    /// Returns the reason when the declaration is unusable, e.g. a pattern
    /// that does not compile.
    pub fn verify(&self) -> Result<(), String> {
        match self {
            Self::Pattern { pattern } => Regex::new(pattern)
                .map(|_| ())
                .map_err(|e| format!("pattern does not compile: {e}")),
            Self::OneOf { options } if options.is_empty() => {
                Err("one_of requires at least one option".to_string())
            }
            _ => Ok(()),
        }
    }

    /// Checks a well-typed value against the constraint.
    ///
    /// # Errors
    ///
    /// Returns the human-readable violation reason.
    pub fn check(&self, value: &serde_json::Value) -> Result<(), String> {
        match self {
            Self::NonEmpty => {
                let empty = match value {
                    serde_json::Value::String(s) => s.is_empty(),
                    serde_json::Value::Array(a) => a.is_empty(),
                    _ => false,
                };
                if empty {
                    Err("must not be empty".to_string())
                } else {
                    Ok(())
                }
            }
            Self::MinNumber { min } => match value.as_f64() {
                Some(n) if n < *min => Err(format!("must be at least {min}, got {n}")),
                _ => Ok(()),
            },
            Self::MaxNumber { max } => match value.as_f64() {
                Some(n) if n > *max => Err(format!("must be at most {max}, got {n}")),
                _ => Ok(()),
            },
            Self::Pattern { pattern } => {
                let Ok(regex) = Regex::new(pattern) else {
                    // unreachable for built schemas; builders verify patterns
                    return Err(format!("pattern does not compile: {pattern}"));
                };
                match value.as_str() {
                    Some(s) if !regex.is_match(s) => {
                        Err(format!("does not match pattern '{pattern}'"))
                    }
                    _ => Ok(()),
                }
            }
            Self::OneOf { options } => match value.as_str() {
                Some(s) if !options.iter().any(|o| o == s) => {
                    Err(format!("must be one of [{}]", options.join(", ")))
                }
                _ => Ok(()),
            },
        }
    }
}
