//! Ticket domain model for portico.
//!
//! This crate provides the ticket types issued by the portico SSO server and
//! the collaborators the stateless compaction layer needs to rebuild them:
//!
//! - [`kind`] - Ticket kinds and their wire prefixes (ST, PT, PGT, TST, TGT)
//! - [`service`] - The `Service` a ticket is bound to (urn/URL identifier)
//! - [`principal`] - Authenticated principals and their factory
//! - [`authentication`] - The reduced authentication summary carried by tickets
//! - [`expiration`] - Expiration policies (carried, never evaluated here)
//! - [`ticket`] - The five ticket variants and their capability facets
//! - [`header`] - The common compact-id header builder/parser
//! - [`factory`] - Factories that materialize tickets during expansion
//! - [`serialization`] - Full-fidelity serde round trip for root-of-trust tickets
//!
//! # Example
//!
//! ```
//! use portico_tickets::{Authentication, Principal, Service, ServiceTicket, Ticket};
//! use chrono::Utc;
//!
//! let authentication = Authentication::builder(Principal::new("alice"))
//!     .successful_handler("LdapAuthenticationHandler")
//!     .credential_type("UsernamePasswordCredential")
//!     .build();
//!
//! let ticket = ServiceTicket::new(
//!     "ST-1".to_string(),
//!     Some(Service::new("https://app.example.org")),
//!     Some(authentication),
//!     true,
//!     Utc::now(),
//! );
//! assert!(Ticket::from(ticket).facets().service.is_some());
//! ```

pub mod authentication;
pub mod error;
pub mod expiration;
pub mod factory;
pub mod header;
pub mod kind;
pub mod principal;
pub mod serialization;
pub mod service;
pub mod ticket;

pub use authentication::{attribute_names, Authentication, AuthenticationBuilder, HandlerResult};
pub use error::TicketError;
pub use expiration::ExpirationPolicy;
pub use factory::{
    PrincipalFactory, ProxyGrantingTicketFactory, ProxyTicketFactory, ServiceFactory,
    ServiceTicketFactory, TransientSessionTicketFactory,
};
pub use header::{CompactTicket, CompactTicketHeader};
pub use kind::TicketKind;
pub use principal::Principal;
pub use serialization::TicketSerializationManager;
pub use service::Service;
pub use ticket::{
    ProxyGrantingTicket, ProxyTicket, PropertyValue, ServiceTicket, Ticket, TicketFacets,
    TicketGrantingTicket, TransientSessionTicket,
};
