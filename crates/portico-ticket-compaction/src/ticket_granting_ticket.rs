//! Compactor for ticket-granting tickets.
//!
//! The root-of-trust ticket is never reduced to a lossy summary: this
//! compactor delegates wholesale to the full-fidelity serialization manager.
//! It carries no field grammar of its own and no length ceiling, since the
//! complete session state legitimately outgrows the delimited kinds.

use crate::compactor::{expect_kind, TicketCompactor};
use crate::error::{CompactionError, ExpansionError};
use portico_tickets::{Ticket, TicketKind, TicketSerializationManager};

/// Compacts and expands [`portico_tickets::TicketGrantingTicket`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicketGrantingTicketCompactor {
    manager: TicketSerializationManager,
}

impl TicketGrantingTicketCompactor {
    /// Creates a compactor delegating to the given serialization manager.
    #[must_use]
    pub fn new(manager: TicketSerializationManager) -> Self {
        Self { manager }
    }
}

impl TicketCompactor for TicketGrantingTicketCompactor {
    fn ticket_kind(&self) -> TicketKind {
        TicketKind::TicketGrantingTicket
    }

    fn compact(&self, ticket: &Ticket) -> Result<String, CompactionError> {
        expect_kind(ticket, self.ticket_kind())?;
        let id = self.manager.serialize(ticket)?;
        tracing::debug!(length = id.len(), "compacted ticket-granting ticket");
        Ok(id)
    }

    fn expand(&self, id: &str) -> Result<Ticket, ExpansionError> {
        let ticket = self.manager.deserialize(id)?;
        if ticket.kind() != self.ticket_kind() {
            return Err(ExpansionError::KindMismatch {
                expected: self.ticket_kind(),
                actual: ticket.kind(),
            });
        }
        tracing::trace!("expanded ticket-granting ticket");
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use portico_tickets::{Authentication, Principal, TicketGrantingTicket};

    fn ticket() -> Ticket {
        let authentication = Authentication::builder(Principal::new("alice"))
            .successful_handler("LdapAuthenticationHandler")
            .credential_type("UsernamePasswordCredential")
            .remember_me(true)
            .attribute("authentication_method", vec!["mfa-duo".to_string()])
            .build();
        TicketGrantingTicket::new("TGT-original".to_string(), authentication, Utc::now()).into()
    }

    #[test]
    fn test_full_fidelity_round_trip() {
        let compactor = TicketGrantingTicketCompactor::default();
        let original = ticket();
        let id = compactor.compact(&original).unwrap();
        assert!(id.starts_with("TGT-"));

        // Unlike the delimited kinds, nothing is lost: the expanded ticket is
        // equal to the original, extra attributes included.
        assert_eq!(compactor.expand(&id).unwrap(), original);
    }

    #[test]
    fn test_wrong_kind_is_rejected() {
        let compactor = TicketGrantingTicketCompactor::default();
        let st: Ticket = portico_tickets::ServiceTicket::new(
            "ST-1".to_string(),
            None,
            None,
            false,
            Utc::now(),
        )
        .into();
        assert!(matches!(
            compactor.compact(&st).unwrap_err(),
            CompactionError::UnsupportedTicketType { .. }
        ));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let compactor = TicketGrantingTicketCompactor::default();
        let id = compactor.compact(&ticket()).unwrap();
        let tampered = format!("{}x!", &id[..id.len() - 2]);
        assert!(compactor.expand(&tampered).is_err());
    }
}
