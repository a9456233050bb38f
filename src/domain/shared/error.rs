//! Domain errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("Agent unavailable: {0}")]
    AgentUnavailable(String),

    #[error("Unknown call: {0}")]
    UnknownCall(String),

    #[error("Not a party to call {0}")]
    NotCallParty(String),

    #[error("Invalid call state: {0}")]
    InvalidCallState(String),

    #[error("Malformed event: {0}")]
    MalformedEvent(String),
}

impl DomainError {
    /// Stable wire code for this error
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::AgentNotFound(_) => "AgentNotFound",
            DomainError::AgentUnavailable(_) => "AgentUnavailable",
            DomainError::UnknownCall(_) => "UnknownCall",
            DomainError::NotCallParty(_) => "NotCallParty",
            DomainError::InvalidCallState(_) => "InvalidCallState",
            DomainError::MalformedEvent(_) => "MalformedEvent",
        }
    }

    /// Placement failures are answered with `call-error`, everything else
    /// with `request-rejected`.
    pub fn is_placement_failure(&self) -> bool {
        matches!(
            self,
            DomainError::AgentNotFound(_) | DomainError::AgentUnavailable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(DomainError::AgentNotFound("a".into()).code(), "AgentNotFound");
        assert_eq!(DomainError::AgentUnavailable("a".into()).code(), "AgentUnavailable");
        assert_eq!(DomainError::MalformedEvent("x".into()).code(), "MalformedEvent");
    }

    #[test]
    fn test_placement_failure_classification() {
        assert!(DomainError::AgentNotFound("a".into()).is_placement_failure());
        assert!(DomainError::AgentUnavailable("a".into()).is_placement_failure());
        assert!(!DomainError::UnknownCall("c".into()).is_placement_failure());
    }
}
