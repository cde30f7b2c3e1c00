//! Error handling for the geometry kernel.
//!
//! Every failure carries a stable kind identifier, a stable English message,
//! and optional slot/span context so it can be serialized across the JSON
//! surface and asserted on in tests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable error kind identifiers for programmatic handling by adapters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A parameter violates a mathematical precondition.
    #[serde(rename = "DomainError")]
    Domain,
    /// The dispatcher could not extract a required slot or intent.
    #[serde(rename = "QueryError")]
    Query,
    /// Declared inputs exceed configured soft budgets.
    #[serde(rename = "ResourceLimit")]
    ResourceLimit,
    /// Invariant violation; surfacing this is always a bug.
    #[serde(rename = "Internal")]
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Domain => write!(f, "DomainError"),
            ErrorKind::Query => write!(f, "QueryError"),
            ErrorKind::ResourceLimit => write!(f, "ResourceLimit"),
            ErrorKind::Internal => write!(f, "Internal"),
        }
    }
}

/// Kernel error with context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeometryError {
    pub kind: ErrorKind,
    pub message: String,
    /// Name of the offending slot, when a query slot is involved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    /// Offending substring of the originating request text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<String>,
}

impl GeometryError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        GeometryError {
            kind,
            message: message.into(),
            slot: None,
            span: None,
        }
    }

    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = Some(slot.into());
        self
    }

    pub fn with_span(mut self, span: impl Into<String>) -> Self {
        self.span = Some(span.into());
        self
    }
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for GeometryError {}

/// Type alias for Result with GeometryError.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Convenience constructors for common errors.
impl GeometryError {
    pub fn domain(msg: impl Into<String>) -> Self {
        GeometryError::new(ErrorKind::Domain, msg)
    }

    pub fn non_finite(name: &str) -> Self {
        GeometryError::new(
            ErrorKind::Domain,
            format!("Parameter '{}' must be a finite number", name),
        )
        .with_slot(name)
    }

    pub fn negative(name: &str) -> Self {
        GeometryError::new(
            ErrorKind::Domain,
            format!("Parameter '{}' must be non-negative", name),
        )
        .with_slot(name)
    }

    pub fn wrong_arity(expected: usize, got: usize) -> Self {
        GeometryError::new(
            ErrorKind::Domain,
            format!("Expected {} parameter(s), got {}", expected, got),
        )
    }

    pub fn dimension_too_small(min: u32, got: u32) -> Self {
        GeometryError::new(
            ErrorKind::Domain,
            format!("Dimension must be at least {}, got {}", min, got),
        )
        .with_slot("dimension")
    }

    pub fn query(msg: impl Into<String>) -> Self {
        GeometryError::new(ErrorKind::Query, msg)
    }

    pub fn missing_slot(slot: &str) -> Self {
        GeometryError::new(
            ErrorKind::Query,
            format!("Could not extract required slot: {}", slot),
        )
        .with_slot(slot)
    }

    pub fn resource_limit(msg: impl Into<String>) -> Self {
        GeometryError::new(ErrorKind::ResourceLimit, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        GeometryError::new(ErrorKind::Internal, msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_identifiers_are_stable() {
        assert_eq!(ErrorKind::Domain.to_string(), "DomainError");
        assert_eq!(ErrorKind::Query.to_string(), "QueryError");
        assert_eq!(ErrorKind::ResourceLimit.to_string(), "ResourceLimit");
        assert_eq!(ErrorKind::Internal.to_string(), "Internal");
    }

    #[test]
    fn test_serialized_kind_matches_display() {
        let err = GeometryError::domain("bad radius");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"DomainError\""));
        assert!(json.contains("bad radius"));
    }

    #[test]
    fn test_slot_and_span_context() {
        let err = GeometryError::missing_slot("dimension").with_span("a sphere");
        assert_eq!(err.slot.as_deref(), Some("dimension"));
        assert_eq!(err.span.as_deref(), Some("a sphere"));
    }

    #[test]
    fn test_identical_causes_have_identical_messages() {
        let a = GeometryError::negative("radius");
        let b = GeometryError::negative("radius");
        assert_eq!(a, b);
    }
}
