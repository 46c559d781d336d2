//! Full-fidelity ticket serialization.
//!
//! Root-of-trust tickets are never reduced to a lossy summary: they round
//! trip through JSON wrapped in URL-safe base64, prefixed with the kind so
//! the result is still a self-describing ticket id.

use crate::error::TicketError;
use crate::kind::TicketKind;
use crate::ticket::Ticket;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

/// Serializes and deserializes whole tickets without loss.
///
/// # Example
///
/// ```
/// use portico_tickets::{
///     Authentication, Principal, Ticket, TicketGrantingTicket, TicketSerializationManager,
/// };
/// use chrono::Utc;
///
/// let manager = TicketSerializationManager::default();
/// let authentication = Authentication::builder(Principal::new("alice")).build();
/// let ticket: Ticket =
///     TicketGrantingTicket::new("TGT-1".to_string(), authentication, Utc::now()).into();
///
/// let serialized = manager.serialize(&ticket).unwrap();
/// assert!(serialized.starts_with("TGT-"));
/// assert_eq!(manager.deserialize(&serialized).unwrap(), ticket);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TicketSerializationManager;

impl TicketSerializationManager {
    /// Serializes a ticket into a self-describing opaque string.
    pub fn serialize(&self, ticket: &Ticket) -> Result<String, TicketError> {
        let json = serde_json::to_vec(ticket)
            .map_err(|e| TicketError::Serialization(e.to_string()))?;
        Ok(format!(
            "{}-{}",
            ticket.kind().prefix(),
            URL_SAFE_NO_PAD.encode(json)
        ))
    }

    /// Deserializes a ticket previously produced by [`serialize`].
    ///
    /// The declared prefix must match the kind found inside the payload.
    ///
    /// [`serialize`]: TicketSerializationManager::serialize
    pub fn deserialize(&self, value: &str) -> Result<Ticket, TicketError> {
        let (prefix, payload) = value
            .split_once('-')
            .ok_or_else(|| TicketError::MalformedId(value.to_string()))?;
        let kind: TicketKind = prefix.parse()?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| TicketError::Deserialization(e.to_string()))?;
        let ticket: Ticket = serde_json::from_slice(&json)
            .map_err(|e| TicketError::Deserialization(e.to_string()))?;

        if ticket.kind() != kind {
            return Err(TicketError::Deserialization(format!(
                "payload kind {} does not match prefix {}",
                ticket.kind(),
                kind
            )));
        }
        Ok(ticket)
    }
}
