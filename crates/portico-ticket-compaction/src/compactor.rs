//! The shared compactor contract.

use crate::error::{CompactionError, ExpansionError};
use portico_tickets::{CompactTicket, CompactTicketHeader, Ticket, TicketKind};

/// Default upper bound on a compacted ticket id, in characters.
///
/// Compacted ids travel in URLs and headers; anything longer risks being
/// rejected by downstream transports.
pub const DEFAULT_MAXIMUM_TICKET_LENGTH: usize = 256;

/// Sentinel marking an absent optional trailer field.
pub const ABSENT_SENTINEL: &str = "*";

/// Configuration shared by the delimited compactors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactionConfig {
    /// Maximum length of a compacted ticket id. Compaction fails rather
    /// than truncate when the encoded output would exceed this.
    pub maximum_ticket_length: usize,
}

impl Default for CompactionConfig {
    fn default() -> Self {
        Self {
            maximum_ticket_length: DEFAULT_MAXIMUM_TICKET_LENGTH,
        }
    }
}

/// Encodes tickets of one kind into self-describing ids and back.
///
/// Implementations are pure functions over their inputs plus injected
/// factories: no mutable state, no I/O, safe to call concurrently from any
/// number of threads.
///
/// `expand(compact(t))` preserves the service id, proxy-chain pointer,
/// authentication summary, creation time, and expiration time of `t`. It
/// does not preserve original credential objects, attributes beyond the
/// summary, or handler ordering.
pub trait TicketCompactor: Send + Sync {
    /// The ticket kind this compactor serves.
    fn ticket_kind(&self) -> TicketKind;

    /// Encodes the ticket's full state into its identifier string.
    fn compact(&self, ticket: &Ticket) -> Result<String, CompactionError>;

    /// Reconstructs an equivalent in-memory ticket from a compacted id,
    /// without consulting any backing store.
    fn expand(&self, id: &str) -> Result<Ticket, ExpansionError>;
}

/// Builds the common header for a ticket, deriving the expiration timestamp
/// from the carried policy (falling back to the creation time when the
/// policy has no fixed instant).
pub(crate) fn build_header(ticket: &Ticket) -> String {
    let creation_time = ticket.creation_time();
    let expiration_time = ticket
        .expiration_policy()
        .expiration_time()
        .unwrap_or(creation_time);
    CompactTicketHeader::build(ticket.kind(), creation_time, expiration_time)
}

/// Appends one trailer element after the current end of the id.
pub(crate) fn push_element(id: &mut String, value: &str) {
    id.push(portico_tickets::header::ELEMENT_DELIMITER);
    id.push_str(value);
}

/// Rejects a trailer field whose value contains the element delimiter.
///
/// Such a value would split into extra elements on parse, so the resulting
/// id could never be expanded; compaction fails instead of emitting it.
pub(crate) fn check_element(field: &str, value: &str) -> Result<(), CompactionError> {
    if value.contains(portico_tickets::header::ELEMENT_DELIMITER) {
        return Err(CompactionError::ReservedDelimiter {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Parses a compacted id and checks it declares the expected kind.
pub(crate) fn parse_for_kind(
    id: &str,
    expected: TicketKind,
) -> Result<CompactTicket, ExpansionError> {
    let compact = CompactTicketHeader::parse(id)?;
    if compact.kind != expected {
        return Err(ExpansionError::KindMismatch {
            expected,
            actual: compact.kind,
        });
    }
    Ok(compact)
}

/// Rejects compacted output the configured transport cannot carry.
pub(crate) fn enforce_maximum_length(
    id: String,
    config: &CompactionConfig,
) -> Result<String, CompactionError> {
    if id.len() > config.maximum_ticket_length {
        return Err(CompactionError::ExceedsMaximumLength {
            length: id.len(),
            maximum: config.maximum_ticket_length,
        });
    }
    Ok(id)
}

/// Fails when a ticket of the wrong kind reaches a compactor.
pub(crate) fn expect_kind(
    ticket: &Ticket,
    expected: TicketKind,
) -> Result<(), CompactionError> {
    if ticket.kind() != expected {
        return Err(CompactionError::UnsupportedTicketType {
            expected,
            actual: ticket.kind(),
        });
    }
    Ok(())
}

/// Fetches a required element or reports which semantic field is missing.
pub(crate) fn require_element<'a>(
    compact: &'a CompactTicket,
    index: usize,
    name: &'static str,
) -> Result<&'a str, ExpansionError> {
    compact
        .element(index)
        .ok_or(ExpansionError::MissingElement { index, name })
}
