//! Compactor for proxy tickets.
//!
//! Trailer grammar, after the common header:
//! `,<service>,<attempt>,<rememberMe:0|1>` with the principal id inside the
//! attempt element wrapped in URL-safe base64.
//!
//! A proxy ticket is always backed by a completed authentication, so
//! compaction asserts at least one successful handler; expansion rebuilds the
//! issuance chain (service ticket, then proxy-granting ticket, then the proxy
//! ticket itself) because the factories require that chain even though only
//! the leaf is returned.

use crate::attempt::{self, PrincipalIdEncoding};
use crate::compactor::{
    build_header, check_element, enforce_maximum_length, parse_for_kind, push_element,
    require_element, CompactionConfig, TicketCompactor,
};
use crate::error::{CompactionError, ExpansionError};
use crate::indexes;
use portico_tickets::{
    factory, ExpirationPolicy, PrincipalFactory, ProxyGrantingTicketFactory, ProxyTicketFactory,
    ServiceFactory, ServiceTicketFactory, Ticket, TicketKind,
};

/// Compacts and expands [`portico_tickets::ProxyTicket`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProxyTicketCompactor {
    config: CompactionConfig,
    service_factory: ServiceFactory,
    principal_factory: PrincipalFactory,
    service_ticket_factory: ServiceTicketFactory,
    proxy_granting_ticket_factory: ProxyGrantingTicketFactory,
    proxy_ticket_factory: ProxyTicketFactory,
}

impl ProxyTicketCompactor {
    /// Creates a compactor with the given configuration.
    #[must_use]
    pub fn new(config: CompactionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }
}

impl TicketCompactor for ProxyTicketCompactor {
    fn ticket_kind(&self) -> TicketKind {
        TicketKind::ProxyTicket
    }

    fn compact(&self, ticket: &Ticket) -> Result<String, CompactionError> {
        let Ticket::Proxy(proxy_ticket) = ticket else {
            return Err(CompactionError::UnsupportedTicketType {
                expected: self.ticket_kind(),
                actual: ticket.kind(),
            });
        };

        let authentication = proxy_ticket.authentication();
        if authentication.successes().is_empty() {
            return Err(CompactionError::MissingSuccessfulHandlers);
        }

        check_element("service", proxy_ticket.service().id())?;

        let mut id = build_header(ticket);
        push_element(&mut id, proxy_ticket.service().id());
        push_element(
            &mut id,
            &attempt::encode_attempt(authentication, PrincipalIdEncoding::UrlSafeBase64)?,
        );
        push_element(&mut id, attempt::encode_flag(authentication.is_remember_me()));

        let id = enforce_maximum_length(id, &self.config)?;
        tracing::debug!(length = id.len(), "compacted proxy ticket");
        Ok(id)
    }

    fn expand(&self, id: &str) -> Result<Ticket, ExpansionError> {
        let compact = parse_for_kind(id, self.ticket_kind())?;

        let service = self
            .service_factory
            .create(require_element(&compact, indexes::SERVICE, "service")?);
        let remember_me = attempt::decode_flag(require_element(
            &compact,
            indexes::proxy_ticket::REMEMBER_ME,
            "remember_me",
        )?)?;
        let authentication = attempt::decode_attempt(
            require_element(&compact, indexes::proxy_ticket::AUTHENTICATION, "authentication")?,
            remember_me,
            PrincipalIdEncoding::UrlSafeBase64,
            &self.principal_factory,
        )?;

        // Mirror the chain that exists at issuance time.
        let service_ticket = self.service_ticket_factory.create(
            factory::generated_id(TicketKind::ServiceTicket),
            Some(service.clone()),
            Some(authentication.clone()),
            false,
            compact.creation_time,
        );
        let proxy_granting_ticket = self.proxy_granting_ticket_factory.create(
            factory::generated_id(TicketKind::ProxyGrantingTicket),
            &service_ticket,
            authentication,
            None,
            compact.creation_time,
        );
        let proxy_ticket = self.proxy_ticket_factory.create(
            id.to_string(),
            &proxy_granting_ticket,
            service,
            compact.creation_time,
        );

        let mut ticket: Ticket = proxy_ticket.into();
        ticket.set_expiration_policy(ExpirationPolicy::fixed_instant(compact.expiration_time));
        ticket.set_creation_time(compact.creation_time);
        tracing::trace!("expanded proxy ticket");
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use portico_tickets::{Authentication, Principal, ProxyTicket, Service};

    fn compactor() -> ProxyTicketCompactor {
        ProxyTicketCompactor::default()
    }

    fn authentication() -> Authentication {
        Authentication::builder(Principal::new("alice"))
            .successful_handler("LdapAuthenticationHandler")
            .credential_type("UsernamePasswordCredential")
            .build()
    }

    fn ticket() -> Ticket {
        let created = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let mut ticket: Ticket = ProxyTicket::new(
            "PT-original".to_string(),
            Service::new("https://backend.example.org"),
            authentication(),
            "PGT-parent".to_string(),
            created,
        )
        .into();
        ticket.set_expiration_policy(ExpirationPolicy::fixed_instant(
            created + Duration::minutes(10),
        ));
        ticket
    }

    #[test]
    fn test_principal_id_is_base64_wrapped() {
        let id = compactor().compact(&ticket()).unwrap();
        assert!(!id.contains("alice"));
        assert!(id.contains("YWxpY2U"));
    }

    #[test]
    fn test_round_trip_rebuilds_the_chain() {
        let original = ticket();
        let id = compactor().compact(&original).unwrap();
        let expanded = compactor().expand(&id).unwrap();

        assert_eq!(expanded.creation_time(), original.creation_time());
        assert_eq!(
            expanded.expiration_policy().expiration_time(),
            original.expiration_policy().expiration_time()
        );

        let Ticket::Proxy(expanded) = expanded else {
            panic!("expected a proxy ticket");
        };
        assert_eq!(expanded.id(), id);
        assert_eq!(expanded.service().id(), "https://backend.example.org");
        assert_eq!(expanded.authentication().principal().id(), "alice");
        assert_eq!(expanded.authentication().successes().len(), 1);
        // The synthetic proxy-granting ticket gets a generated id.
        assert!(expanded.proxy_granting_ticket_id().starts_with("PGT-"));
    }

    #[test]
    fn test_service_with_element_delimiter_fails_compaction() {
        let created = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let ticket: Ticket = ProxyTicket::new(
            "PT-1".to_string(),
            Service::new("https://backend.example.org/?ids=1,2"),
            authentication(),
            "PGT-parent".to_string(),
            created,
        )
        .into();

        let err = compactor().compact(&ticket).unwrap_err();
        assert!(matches!(
            err,
            CompactionError::ReservedDelimiter { ref field, .. } if field == "service"
        ));
    }

    #[test]
    fn test_principal_with_delimiters_round_trips_via_base64() {
        let created = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let authentication = Authentication::builder(Principal::new("urn:alice"))
            .successful_handler("LdapAuthenticationHandler")
            .build();
        let ticket: Ticket = ProxyTicket::new(
            "PT-1".to_string(),
            Service::new("https://backend.example.org"),
            authentication,
            "PGT-parent".to_string(),
            created,
        )
        .into();

        let id = compactor().compact(&ticket).unwrap();
        let Ticket::Proxy(expanded) = compactor().expand(&id).unwrap() else {
            panic!("expected a proxy ticket");
        };
        assert_eq!(expanded.authentication().principal().id(), "urn:alice");
    }

    #[test]
    fn test_no_successful_handlers_is_a_precondition_failure() {
        let created = Utc::now();
        let bare = Authentication::builder(Principal::new("alice")).build();
        let ticket: Ticket = ProxyTicket::new(
            "PT-1".to_string(),
            Service::new("https://backend.example.org"),
            bare,
            "PGT-parent".to_string(),
            created,
        )
        .into();

        let err = compactor().compact(&ticket).unwrap_err();
        assert!(matches!(err, CompactionError::MissingSuccessfulHandlers));
    }

    #[test]
    fn test_wrong_kind_prefix_fails_expansion() {
        let created = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let service_ticket: Ticket = portico_tickets::ServiceTicket::new(
            "ST-1".to_string(),
            None,
            None,
            false,
            created,
        )
        .into();
        let id = crate::service_ticket::ServiceTicketCompactor::default()
            .compact(&service_ticket)
            .unwrap();

        let err = compactor().expand(&id).unwrap_err();
        assert!(matches!(err, ExpansionError::KindMismatch { .. }));
    }
}
