//! The five ticket variants and their capability facets.
//!
//! Tickets are tagged variants of one [`Ticket`] enum rather than a class
//! hierarchy. What a ticket *can* carry (a service, an authentication, a
//! renewable flag) is exposed through [`TicketFacets`], a normalized record
//! computed once at the boundary so codecs never probe concrete variants.

use crate::authentication::Authentication;
use crate::expiration::ExpirationPolicy;
use crate::kind::TicketKind;
use crate::service::Service;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A value in the transient-session properties bag.
///
/// Arity is significant: a key holding one value stays a scalar through the
/// compaction round trip, a key holding several stays a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// A single scalar value.
    Single(String),
    /// Multiple values for one key.
    Many(Vec<String>),
}

impl PropertyValue {
    /// The values as a slice, regardless of arity.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        match self {
            PropertyValue::Single(value) => vec![value.as_str()],
            PropertyValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

/// Short-lived ticket presented to a single service.
///
/// Service, authentication, and the renewable flag are all independently
/// optional so degraded variants (anonymous or stub tickets) flow through the
/// same code paths as fully populated ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceTicket {
    id: String,
    service: Option<Service>,
    authentication: Option<Authentication>,
    credentials_provided: bool,
    creation_time: DateTime<Utc>,
    expiration_policy: ExpirationPolicy,
}

impl ServiceTicket {
    /// Creates a service ticket with a [`ExpirationPolicy::Never`] policy.
    #[must_use]
    pub fn new(
        id: String,
        service: Option<Service>,
        authentication: Option<Authentication>,
        credentials_provided: bool,
        creation_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            service,
            authentication,
            credentials_provided,
            creation_time,
            expiration_policy: ExpirationPolicy::Never,
        }
    }

    /// The ticket identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The associated service, if any.
    #[must_use]
    pub fn service(&self) -> Option<&Service> {
        self.service.as_ref()
    }

    /// The authentication summary, if the ticket carries one.
    #[must_use]
    pub fn authentication(&self) -> Option<&Authentication> {
        self.authentication.as_ref()
    }

    /// Whether the ticket was created from a fresh credential presentation.
    #[must_use]
    pub fn is_credentials_provided(&self) -> bool {
        self.credentials_provided
    }
}

/// A service ticket issued on a principal's behalf via a proxy-granting
/// ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyTicket {
    id: String,
    service: Service,
    authentication: Authentication,
    proxy_granting_ticket_id: String,
    creation_time: DateTime<Utc>,
    expiration_policy: ExpirationPolicy,
}

impl ProxyTicket {
    /// Creates a proxy ticket issued against the given proxy-granting ticket.
    #[must_use]
    pub fn new(
        id: String,
        service: Service,
        authentication: Authentication,
        proxy_granting_ticket_id: String,
        creation_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            service,
            authentication,
            proxy_granting_ticket_id,
            creation_time,
            expiration_policy: ExpirationPolicy::Never,
        }
    }

    /// The ticket identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The target service.
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// The authentication summary backing this ticket.
    #[must_use]
    pub fn authentication(&self) -> &Authentication {
        &self.authentication
    }

    /// Id of the proxy-granting ticket this ticket was issued from.
    #[must_use]
    pub fn proxy_granting_ticket_id(&self) -> &str {
        &self.proxy_granting_ticket_id
    }
}

/// Allows issuing further tickets on a principal's behalf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyGrantingTicket {
    id: String,
    service: Option<Service>,
    authentication: Authentication,
    proxied_by: Option<String>,
    creation_time: DateTime<Utc>,
    expiration_policy: ExpirationPolicy,
}

impl ProxyGrantingTicket {
    /// Creates a proxy-granting ticket.
    #[must_use]
    pub fn new(
        id: String,
        service: Option<Service>,
        authentication: Authentication,
        proxied_by: Option<String>,
        creation_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            service,
            authentication,
            proxied_by,
            creation_time,
            expiration_policy: ExpirationPolicy::Never,
        }
    }

    /// The ticket identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The service this ticket was granted towards, if any.
    #[must_use]
    pub fn service(&self) -> Option<&Service> {
        self.service.as_ref()
    }

    /// The authentication summary backing this ticket.
    #[must_use]
    pub fn authentication(&self) -> &Authentication {
        &self.authentication
    }

    /// Id of the immediate predecessor in the proxy chain, if any.
    ///
    /// Captured as an opaque string; never re-resolved against a registry.
    #[must_use]
    pub fn proxied_by(&self) -> Option<&str> {
        self.proxied_by.as_deref()
    }
}

/// Short-lived carrier of in-flight protocol properties.
///
/// The properties bag is fixed at issuance and travels fully inside the
/// compacted id; there is no backing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransientSessionTicket {
    id: String,
    service: Option<Service>,
    properties: BTreeMap<String, PropertyValue>,
    creation_time: DateTime<Utc>,
    expiration_policy: ExpirationPolicy,
}

impl TransientSessionTicket {
    /// Creates a transient-session ticket.
    #[must_use]
    pub fn new(
        id: String,
        service: Option<Service>,
        properties: BTreeMap<String, PropertyValue>,
        creation_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            service,
            properties,
            creation_time,
            expiration_policy: ExpirationPolicy::Never,
        }
    }

    /// The ticket identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The associated service, if any.
    #[must_use]
    pub fn service(&self) -> Option<&Service> {
        self.service.as_ref()
    }

    /// The protocol properties captured at issuance.
    #[must_use]
    pub fn properties(&self) -> &BTreeMap<String, PropertyValue> {
        &self.properties
    }
}

/// Root-of-trust session ticket.
///
/// Unlike the delimited kinds, this ticket is never reduced to a summary; it
/// survives compaction through full-fidelity serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketGrantingTicket {
    id: String,
    authentication: Authentication,
    creation_time: DateTime<Utc>,
    expiration_policy: ExpirationPolicy,
}

impl TicketGrantingTicket {
    /// Creates a ticket-granting ticket.
    #[must_use]
    pub fn new(id: String, authentication: Authentication, creation_time: DateTime<Utc>) -> Self {
        Self {
            id,
            authentication,
            creation_time,
            expiration_policy: ExpirationPolicy::Never,
        }
    }

    /// The ticket identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The full authentication backing the session.
    #[must_use]
    pub fn authentication(&self) -> &Authentication {
        &self.authentication
    }
}

/// Capability facets of a ticket, normalized once at the boundary.
///
/// Codecs consume this record instead of matching on [`Ticket`] variants:
/// an absent facet is `None`, never a panic or a downcast.
#[derive(Debug, Clone, Copy)]
pub struct TicketFacets<'a> {
    /// The associated service, when the ticket is service-aware.
    pub service: Option<&'a Service>,
    /// The authentication summary, when the ticket carries one.
    pub authentication: Option<&'a Authentication>,
    /// The renewable flag, when the ticket kind has one.
    pub credentials_provided: Option<bool>,
}

/// Any ticket issued by portico.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Ticket {
    /// See [`ServiceTicket`].
    Service(ServiceTicket),
    /// See [`ProxyTicket`].
    Proxy(ProxyTicket),
    /// See [`ProxyGrantingTicket`].
    ProxyGranting(ProxyGrantingTicket),
    /// See [`TransientSessionTicket`].
    TransientSession(TransientSessionTicket),
    /// See [`TicketGrantingTicket`].
    TicketGranting(TicketGrantingTicket),
}

impl Ticket {
    /// The kind of this ticket.
    #[must_use]
    pub fn kind(&self) -> TicketKind {
        match self {
            Ticket::Service(_) => TicketKind::ServiceTicket,
            Ticket::Proxy(_) => TicketKind::ProxyTicket,
            Ticket::ProxyGranting(_) => TicketKind::ProxyGrantingTicket,
            Ticket::TransientSession(_) => TicketKind::TransientSessionTicket,
            Ticket::TicketGranting(_) => TicketKind::TicketGrantingTicket,
        }
    }

    /// The ticket identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Ticket::Service(t) => &t.id,
            Ticket::Proxy(t) => &t.id,
            Ticket::ProxyGranting(t) => &t.id,
            Ticket::TransientSession(t) => &t.id,
            Ticket::TicketGranting(t) => &t.id,
        }
    }

    /// Replaces the ticket identifier.
    pub fn set_id(&mut self, id: String) {
        match self {
            Ticket::Service(t) => t.id = id,
            Ticket::Proxy(t) => t.id = id,
            Ticket::ProxyGranting(t) => t.id = id,
            Ticket::TransientSession(t) => t.id = id,
            Ticket::TicketGranting(t) => t.id = id,
        }
    }

    /// The instant the ticket was created.
    #[must_use]
    pub fn creation_time(&self) -> DateTime<Utc> {
        match self {
            Ticket::Service(t) => t.creation_time,
            Ticket::Proxy(t) => t.creation_time,
            Ticket::ProxyGranting(t) => t.creation_time,
            Ticket::TransientSession(t) => t.creation_time,
            Ticket::TicketGranting(t) => t.creation_time,
        }
    }

    /// Overwrites the creation time, used when an expanded ticket adopts the
    /// timestamps recovered from its id header.
    pub fn set_creation_time(&mut self, at: DateTime<Utc>) {
        match self {
            Ticket::Service(t) => t.creation_time = at,
            Ticket::Proxy(t) => t.creation_time = at,
            Ticket::ProxyGranting(t) => t.creation_time = at,
            Ticket::TransientSession(t) => t.creation_time = at,
            Ticket::TicketGranting(t) => t.creation_time = at,
        }
    }

    /// The expiration policy the ticket carries.
    #[must_use]
    pub fn expiration_policy(&self) -> &ExpirationPolicy {
        match self {
            Ticket::Service(t) => &t.expiration_policy,
            Ticket::Proxy(t) => &t.expiration_policy,
            Ticket::ProxyGranting(t) => &t.expiration_policy,
            Ticket::TransientSession(t) => &t.expiration_policy,
            Ticket::TicketGranting(t) => &t.expiration_policy,
        }
    }

    /// Replaces the expiration policy.
    pub fn set_expiration_policy(&mut self, policy: ExpirationPolicy) {
        match self {
            Ticket::Service(t) => t.expiration_policy = policy,
            Ticket::Proxy(t) => t.expiration_policy = policy,
            Ticket::ProxyGranting(t) => t.expiration_policy = policy,
            Ticket::TransientSession(t) => t.expiration_policy = policy,
            Ticket::TicketGranting(t) => t.expiration_policy = policy,
        }
    }

    /// Normalizes the capability facets of this ticket.
    #[must_use]
    pub fn facets(&self) -> TicketFacets<'_> {
        match self {
            Ticket::Service(t) => TicketFacets {
                service: t.service.as_ref(),
                authentication: t.authentication.as_ref(),
                credentials_provided: Some(t.credentials_provided),
            },
            Ticket::Proxy(t) => TicketFacets {
                service: Some(&t.service),
                authentication: Some(&t.authentication),
                credentials_provided: None,
            },
            Ticket::ProxyGranting(t) => TicketFacets {
                service: t.service.as_ref(),
                authentication: Some(&t.authentication),
                credentials_provided: None,
            },
            Ticket::TransientSession(t) => TicketFacets {
                service: t.service.as_ref(),
                authentication: None,
                credentials_provided: None,
            },
            Ticket::TicketGranting(t) => TicketFacets {
                service: None,
                authentication: Some(&t.authentication),
                credentials_provided: None,
            },
        }
    }
}

impl From<ServiceTicket> for Ticket {
    fn from(ticket: ServiceTicket) -> Self {
        Ticket::Service(ticket)
    }
}

impl From<ProxyTicket> for Ticket {
    fn from(ticket: ProxyTicket) -> Self {
        Ticket::Proxy(ticket)
    }
}

impl From<ProxyGrantingTicket> for Ticket {
    fn from(ticket: ProxyGrantingTicket) -> Self {
        Ticket::ProxyGranting(ticket)
    }
}

impl From<TransientSessionTicket> for Ticket {
    fn from(ticket: TransientSessionTicket) -> Self {
        Ticket::TransientSession(ticket)
    }
}

impl From<TicketGrantingTicket> for Ticket {
    fn from(ticket: TicketGrantingTicket) -> Self {
        Ticket::TicketGranting(ticket)
    }
}
