//! Stateless ticket compaction for portico.
//!
//! This crate turns an entire authentication grant (principal, proxy chain,
//! credential provenance, remember-me flag, in-flight protocol properties)
//! into a single self-describing ticket id, and rebuilds an equivalent
//! in-memory ticket from that id without consulting any backing store.
//! Session state stops being "looked up in a registry" and becomes
//! "recoverable from the identifier itself".
//!
//! One [`TicketCompactor`] exists per ticket kind. All of them are pure,
//! synchronous, and safe to share across threads; cost is linear in the
//! input length and bounded by the configured maximum id length.
//!
//! Signing or encrypting the produced string is a transport concern left to
//! the caller, as is deciding expiry from the carried timestamps.
//!
//! # Example
//!
//! ```
//! use portico_ticket_compaction::{ServiceTicketCompactor, TicketCompactor};
//! use portico_tickets::{Authentication, Principal, Service, ServiceTicket, Ticket};
//! use chrono::Utc;
//!
//! let authentication = Authentication::builder(Principal::new("alice"))
//!     .successful_handler("LdapAuthenticationHandler")
//!     .credential_type("UsernamePasswordCredential")
//!     .remember_me(true)
//!     .build();
//! let ticket: Ticket = ServiceTicket::new(
//!     "ST-1".to_string(),
//!     Some(Service::new("https://app.example.org")),
//!     Some(authentication),
//!     true,
//!     Utc::now(),
//! )
//! .into();
//!
//! let compactor = ServiceTicketCompactor::default();
//! let id = compactor.compact(&ticket).unwrap();
//! let expanded = compactor.expand(&id).unwrap();
//! assert_eq!(expanded.id(), id);
//! ```

pub mod attempt;
pub mod compactor;
pub mod error;
pub mod indexes;
mod proxy_granting_ticket;
mod proxy_ticket;
mod service_ticket;
mod ticket_granting_ticket;
mod transient_session_ticket;

pub use attempt::PrincipalIdEncoding;
pub use compactor::{
    CompactionConfig, TicketCompactor, ABSENT_SENTINEL, DEFAULT_MAXIMUM_TICKET_LENGTH,
};
pub use error::{CompactionError, ExpansionError};
pub use proxy_granting_ticket::ProxyGrantingTicketCompactor;
pub use proxy_ticket::ProxyTicketCompactor;
pub use service_ticket::ServiceTicketCompactor;
pub use ticket_granting_ticket::TicketGrantingTicketCompactor;
pub use transient_session_ticket::TransientSessionTicketCompactor;

use portico_tickets::TicketSerializationManager;

/// Builds one compactor per ticket kind with the given configuration.
///
/// The ticket-granting compactor ignores the length ceiling; see
/// [`TicketGrantingTicketCompactor`].
#[must_use]
pub fn default_compactors(config: CompactionConfig) -> Vec<Box<dyn TicketCompactor>> {
    vec![
        Box::new(ServiceTicketCompactor::new(config)),
        Box::new(ProxyTicketCompactor::new(config)),
        Box::new(ProxyGrantingTicketCompactor::new(config)),
        Box::new(TransientSessionTicketCompactor::new(config)),
        Box::new(TicketGrantingTicketCompactor::new(
            TicketSerializationManager,
        )),
    ]
}
