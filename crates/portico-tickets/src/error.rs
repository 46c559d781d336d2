//! Error types for ticket domain operations.

use thiserror::Error;

/// Errors raised while building, parsing, or serializing tickets.
///
/// Each variant maps to a specific failure mode so callers can translate
/// them into protocol-level "invalid ticket" responses without string
/// matching.
#[derive(Debug, Clone, Error)]
pub enum TicketError {
    /// The ticket id does not carry a recognizable kind prefix.
    #[error("Unknown ticket prefix: {0}")]
    UnknownPrefix(String),

    /// The ticket id is structurally malformed (missing header sections).
    #[error("Malformed ticket id: {0}")]
    MalformedId(String),

    /// A header timestamp could not be parsed as epoch milliseconds.
    #[error("Invalid timestamp in ticket id: {0}")]
    InvalidTimestamp(String),

    /// Full-fidelity serialization of a ticket failed.
    #[error("Ticket serialization failed: {0}")]
    Serialization(String),

    /// Full-fidelity deserialization of a ticket failed.
    #[error("Ticket deserialization failed: {0}")]
    Deserialization(String),
}

impl TicketError {
    /// Check if this error indicates a malformed or unrecognized id.
    ///
    /// Callers map these to "invalid ticket" at the protocol layer; they are
    /// deterministic and must never be retried.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            TicketError::UnknownPrefix(_)
                | TicketError::MalformedId(_)
                | TicketError::InvalidTimestamp(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TicketError::UnknownPrefix("XYZ".to_string());
        assert_eq!(err.to_string(), "Unknown ticket prefix: XYZ");

        let err = TicketError::MalformedId("no header".to_string());
        assert_eq!(err.to_string(), "Malformed ticket id: no header");
    }

    #[test]
    fn test_is_malformed() {
        assert!(TicketError::UnknownPrefix("A".to_string()).is_malformed());
        assert!(TicketError::MalformedId("x".to_string()).is_malformed());
        assert!(TicketError::InvalidTimestamp("x".to_string()).is_malformed());
        assert!(!TicketError::Serialization("x".to_string()).is_malformed());
    }
}
