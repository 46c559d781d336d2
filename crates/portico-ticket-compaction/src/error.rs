//! Error types for ticket compaction and expansion.
//!
//! Compaction errors signal caller misuse or outputs the transport cannot
//! carry; expansion errors signal malformed or tampered ids. Both are
//! deterministic: nothing here is ever worth retrying.

use portico_tickets::{TicketError, TicketKind};
use thiserror::Error;

/// Errors raised while compacting a ticket into its id.
#[derive(Debug, Clone, Error)]
pub enum CompactionError {
    /// The ticket handed in is not the kind this compactor serves.
    #[error("Cannot compact a {actual} ticket with the {expected} compactor")]
    UnsupportedTicketType {
        /// The kind this compactor serves.
        expected: TicketKind,
        /// The kind actually handed in.
        actual: TicketKind,
    },

    /// A proxy-family ticket carried an authentication with zero successful
    /// handlers. Expansion cannot synthesize a handler-keyed result map from
    /// nothing, so this is a programming error upstream.
    #[error("Proxy tickets require at least one successful authentication handler")]
    MissingSuccessfulHandlers,

    /// The compacted string would exceed the configured maximum length.
    /// Truncation would produce an unparsable token, so compaction fails.
    #[error("Compacted ticket length {length} exceeds the configured maximum of {maximum}")]
    ExceedsMaximumLength {
        /// Length of the compacted string.
        length: usize,
        /// Configured maximum.
        maximum: usize,
    },

    /// A field value contains a delimiter reserved by the wire grammar and
    /// would produce an id that can never be expanded.
    #[error("Field '{field}' contains a reserved delimiter: {value}")]
    ReservedDelimiter {
        /// The semantic name of the offending field.
        field: String,
        /// The offending value.
        value: String,
    },

    /// Full-fidelity serialization failed.
    #[error(transparent)]
    Ticket(#[from] TicketError),
}

/// Errors raised while expanding a compacted id back into a ticket.
#[derive(Debug, Clone, Error)]
pub enum ExpansionError {
    /// The common header could not be parsed.
    #[error(transparent)]
    Header(#[from] TicketError),

    /// The id declares a different kind than this compactor serves.
    #[error("Ticket id declares kind {actual}, expected {expected}")]
    KindMismatch {
        /// The kind this compactor serves.
        expected: TicketKind,
        /// The kind declared by the id prefix.
        actual: TicketKind,
    },

    /// A required trailer element is absent.
    #[error("Compacted ticket is missing element {index} ({name})")]
    MissingElement {
        /// Position of the missing element.
        index: usize,
        /// Semantic name of the missing element.
        name: &'static str,
    },

    /// A boolean element held something other than `0` or `1`.
    #[error("Invalid boolean flag: '{0}'")]
    InvalidFlag(String),

    /// The authentication attempt segment did not match its sub-grammar.
    #[error("Malformed authentication attempt: {0}")]
    MalformedAuthenticationAttempt(String),

    /// The transient-session properties element did not match its grammar.
    #[error("Malformed properties element: {0}")]
    MalformedProperties(String),
}
