//! Factories that materialize domain objects during expansion.
//!
//! All factories are stateless and safe to share across threads. They exist
//! so the codecs can rebuild the same object chain that exists at issuance
//! time (authentication, then service ticket, then proxy-granting ticket,
//! then proxy ticket) from decoded primitive values.

use crate::authentication::Authentication;
use crate::kind::TicketKind;
use crate::principal::Principal;
use crate::service::Service;
use crate::ticket::{
    ProxyGrantingTicket, ProxyTicket, PropertyValue, ServiceTicket, TransientSessionTicket,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Generates an id for a synthetic intermediate ticket.
///
/// Expansion sometimes has to rebuild tickets that are never returned to the
/// caller (the service ticket behind a proxy ticket, for instance); those get
/// generated ids since their real ids were never captured.
#[must_use]
pub fn generated_id(kind: TicketKind) -> String {
    format!("{}-{}", kind.prefix(), Uuid::new_v4().simple())
}

/// Creates [`Principal`] instances from decoded ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrincipalFactory;

impl PrincipalFactory {
    /// Creates a principal with the given id and no attributes.
    #[must_use]
    pub fn create(&self, id: &str) -> Principal {
        Principal::new(id)
    }
}

/// Creates [`Service`] instances from decoded identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceFactory;

impl ServiceFactory {
    /// Creates a service from its urn/URL identifier.
    #[must_use]
    pub fn create(&self, id: &str) -> Service {
        Service::new(id)
    }
}

/// Creates [`ServiceTicket`] instances.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceTicketFactory;

impl ServiceTicketFactory {
    /// Creates a service ticket from decoded values.
    #[must_use]
    pub fn create(
        &self,
        id: String,
        service: Option<Service>,
        authentication: Option<Authentication>,
        credentials_provided: bool,
        creation_time: DateTime<Utc>,
    ) -> ServiceTicket {
        ServiceTicket::new(id, service, authentication, credentials_provided, creation_time)
    }
}

/// Creates [`ProxyGrantingTicket`] instances from the service ticket that
/// grants them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProxyGrantingTicketFactory;

impl ProxyGrantingTicketFactory {
    /// Creates a proxy-granting ticket derived from the given service ticket.
    #[must_use]
    pub fn create(
        &self,
        id: String,
        service_ticket: &ServiceTicket,
        authentication: Authentication,
        proxied_by: Option<String>,
        creation_time: DateTime<Utc>,
    ) -> ProxyGrantingTicket {
        ProxyGrantingTicket::new(
            id,
            service_ticket.service().cloned(),
            authentication,
            proxied_by,
            creation_time,
        )
    }
}

/// Creates [`ProxyTicket`] instances from the proxy-granting ticket that
/// issues them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProxyTicketFactory;

impl ProxyTicketFactory {
    /// Creates a proxy ticket for the target service.
    #[must_use]
    pub fn create(
        &self,
        id: String,
        proxy_granting_ticket: &ProxyGrantingTicket,
        service: Service,
        creation_time: DateTime<Utc>,
    ) -> ProxyTicket {
        ProxyTicket::new(
            id,
            service,
            proxy_granting_ticket.authentication().clone(),
            proxy_granting_ticket.id().to_string(),
            creation_time,
        )
    }
}

/// Creates [`TransientSessionTicket`] instances.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransientSessionTicketFactory;

impl TransientSessionTicketFactory {
    /// Creates a transient-session ticket carrying the given properties.
    #[must_use]
    pub fn create(
        &self,
        id: String,
        service: Option<Service>,
        properties: BTreeMap<String, PropertyValue>,
        creation_time: DateTime<Utc>,
    ) -> TransientSessionTicket {
        TransientSessionTicket::new(id, service, properties, creation_time)
    }
}
