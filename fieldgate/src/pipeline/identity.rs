//! Per-invocation correlation identity.

use uuid::Uuid;

/// Identifies one pipeline invocation in tracing output.
///
/// Generated fresh per call; the pipeline itself stays stateless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallIdentity {
    id: Uuid,
}

impl CallIdentity {
    /// Generates a new identity.
    #[must_use]
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }

    /// The raw uuid.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.id
    }
}

impl Default for CallIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CallIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
