//! Ticket kinds and their wire prefixes.
//!
//! Every compacted ticket id starts with the prefix of its kind, so the
//! kind can be recovered from the id alone without a registry lookup.
//!
//! # Example
//!
//! ```
//! use portico_tickets::TicketKind;
//!
//! assert_eq!(TicketKind::ServiceTicket.prefix(), "ST");
//! assert_eq!("PGT".parse::<TicketKind>().unwrap(), TicketKind::ProxyGrantingTicket);
//! ```

use crate::error::TicketError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The five ticket kinds issued by portico.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketKind {
    /// Short-lived ticket presented to a single service.
    ServiceTicket,
    /// Service ticket issued on a principal's behalf via a proxy-granting ticket.
    ProxyTicket,
    /// Allows issuing further tickets on a principal's behalf.
    ProxyGrantingTicket,
    /// Short-lived carrier of in-flight protocol properties.
    TransientSessionTicket,
    /// Root-of-trust session ticket.
    TicketGrantingTicket,
}

impl TicketKind {
    /// The wire prefix this kind uses at the start of a compacted id.
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            TicketKind::ServiceTicket => "ST",
            TicketKind::ProxyTicket => "PT",
            TicketKind::ProxyGrantingTicket => "PGT",
            TicketKind::TransientSessionTicket => "TST",
            TicketKind::TicketGrantingTicket => "TGT",
        }
    }
}

impl Display for TicketKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

impl FromStr for TicketKind {
    type Err = TicketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ST" => Ok(TicketKind::ServiceTicket),
            "PT" => Ok(TicketKind::ProxyTicket),
            "PGT" => Ok(TicketKind::ProxyGrantingTicket),
            "TST" => Ok(TicketKind::TransientSessionTicket),
            "TGT" => Ok(TicketKind::TicketGrantingTicket),
            other => Err(TicketError::UnknownPrefix(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [TicketKind; 5] = [
        TicketKind::ServiceTicket,
        TicketKind::ProxyTicket,
        TicketKind::ProxyGrantingTicket,
        TicketKind::TransientSessionTicket,
        TicketKind::TicketGrantingTicket,
    ];

    #[test]
    fn test_prefix_round_trip() {
        for kind in ALL {
            assert_eq!(kind.prefix().parse::<TicketKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_prefixes_are_distinct() {
        for a in ALL {
            for b in ALL {
                if a != b {
                    assert_ne!(a.prefix(), b.prefix());
                }
            }
        }
    }

    #[test]
    fn test_unknown_prefix_fails() {
        let err = "SESSION".parse::<TicketKind>().unwrap_err();
        assert!(matches!(err, TicketError::UnknownPrefix(_)));
    }
}
