//! Compactor for proxy-granting tickets.
//!
//! Trailer grammar, after the common header:
//! `,<service|*>,<attempt>,<rememberMe:0|1>,<proxiedBy|*>` with the principal
//! id inside the attempt element wrapped in URL-safe base64.
//!
//! The trailing `proxiedBy` field is the id of the immediate predecessor in
//! the proxy chain; it is captured and restored as an opaque string, never
//! re-resolved against any registry.

use crate::attempt::{self, PrincipalIdEncoding};
use crate::compactor::{
    build_header, check_element, enforce_maximum_length, parse_for_kind, push_element,
    require_element, CompactionConfig, TicketCompactor, ABSENT_SENTINEL,
};
use crate::error::{CompactionError, ExpansionError};
use crate::indexes;
use portico_tickets::{
    factory, ExpirationPolicy, PrincipalFactory, ProxyGrantingTicketFactory, ServiceFactory,
    ServiceTicketFactory, Ticket, TicketKind,
};

/// Compacts and expands [`portico_tickets::ProxyGrantingTicket`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProxyGrantingTicketCompactor {
    config: CompactionConfig,
    service_factory: ServiceFactory,
    principal_factory: PrincipalFactory,
    service_ticket_factory: ServiceTicketFactory,
    proxy_granting_ticket_factory: ProxyGrantingTicketFactory,
}

impl ProxyGrantingTicketCompactor {
    /// Creates a compactor with the given configuration.
    #[must_use]
    pub fn new(config: CompactionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }
}

impl TicketCompactor for ProxyGrantingTicketCompactor {
    fn ticket_kind(&self) -> TicketKind {
        TicketKind::ProxyGrantingTicket
    }

    fn compact(&self, ticket: &Ticket) -> Result<String, CompactionError> {
        let Ticket::ProxyGranting(proxy_granting_ticket) = ticket else {
            return Err(CompactionError::UnsupportedTicketType {
                expected: self.ticket_kind(),
                actual: ticket.kind(),
            });
        };

        let authentication = proxy_granting_ticket.authentication();
        if authentication.successes().is_empty() {
            return Err(CompactionError::MissingSuccessfulHandlers);
        }

        let mut id = build_header(ticket);
        match proxy_granting_ticket.service() {
            Some(service) => {
                check_element("service", service.id())?;
                push_element(&mut id, service.id());
            }
            None => push_element(&mut id, ABSENT_SENTINEL),
        }
        push_element(
            &mut id,
            &attempt::encode_attempt(authentication, PrincipalIdEncoding::UrlSafeBase64)?,
        );
        push_element(&mut id, attempt::encode_flag(authentication.is_remember_me()));
        let proxied_by = proxy_granting_ticket.proxied_by().unwrap_or(ABSENT_SENTINEL);
        check_element("proxied_by", proxied_by)?;
        push_element(&mut id, proxied_by);

        let id = enforce_maximum_length(id, &self.config)?;
        tracing::debug!(length = id.len(), "compacted proxy-granting ticket");
        Ok(id)
    }

    fn expand(&self, id: &str) -> Result<Ticket, ExpansionError> {
        let compact = parse_for_kind(id, self.ticket_kind())?;

        let service_element = require_element(&compact, indexes::SERVICE, "service")?;
        let service = if service_element == ABSENT_SENTINEL {
            None
        } else {
            Some(self.service_factory.create(service_element))
        };

        let remember_me = attempt::decode_flag(require_element(
            &compact,
            indexes::proxy_granting_ticket::REMEMBER_ME,
            "remember_me",
        )?)?;
        let authentication = attempt::decode_attempt(
            require_element(
                &compact,
                indexes::proxy_granting_ticket::AUTHENTICATION,
                "authentication",
            )?,
            remember_me,
            PrincipalIdEncoding::UrlSafeBase64,
            &self.principal_factory,
        )?;

        let proxied_by_element = require_element(
            &compact,
            indexes::proxy_granting_ticket::PROXIED_BY,
            "proxied_by",
        )?;
        let proxied_by = if proxied_by_element == ABSENT_SENTINEL {
            None
        } else {
            Some(proxied_by_element.to_string())
        };

        // The factory takes the granting service ticket, so rebuild one.
        let service_ticket = self.service_ticket_factory.create(
            factory::generated_id(TicketKind::ServiceTicket),
            service,
            Some(authentication.clone()),
            false,
            compact.creation_time,
        );
        let proxy_granting_ticket = self.proxy_granting_ticket_factory.create(
            id.to_string(),
            &service_ticket,
            authentication,
            proxied_by,
            compact.creation_time,
        );

        let mut ticket: Ticket = proxy_granting_ticket.into();
        ticket.set_expiration_policy(ExpirationPolicy::fixed_instant(compact.expiration_time));
        ticket.set_creation_time(compact.creation_time);
        tracing::trace!("expanded proxy-granting ticket");
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use portico_tickets::{Authentication, Principal, ProxyGrantingTicket, Service};

    fn compactor() -> ProxyGrantingTicketCompactor {
        ProxyGrantingTicketCompactor::default()
    }

    fn authentication() -> Authentication {
        Authentication::builder(Principal::new("alice"))
            .successful_handler("LdapAuthenticationHandler")
            .credential_type("HttpBasedServiceCredential")
            .remember_me(true)
            .build()
    }

    fn ticket() -> Ticket {
        let created = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let mut ticket: Ticket = ProxyGrantingTicket::new(
            "PGT-original".to_string(),
            Some(Service::new("https://app.example.org")),
            authentication(),
            Some("ST-predecessor".to_string()),
            created,
        )
        .into();
        ticket.set_expiration_policy(ExpirationPolicy::fixed_instant(
            created + Duration::hours(1),
        ));
        ticket
    }

    #[test]
    fn test_proxied_by_rides_at_the_end() {
        let id = compactor().compact(&ticket()).unwrap();
        assert!(id.ends_with(",ST-predecessor"));
    }

    #[test]
    fn test_round_trip() {
        let original = ticket();
        let id = compactor().compact(&original).unwrap();
        let expanded = compactor().expand(&id).unwrap();

        assert_eq!(expanded.creation_time(), original.creation_time());
        assert_eq!(
            expanded.expiration_policy().expiration_time(),
            original.expiration_policy().expiration_time()
        );

        let Ticket::ProxyGranting(expanded) = expanded else {
            panic!("expected a proxy-granting ticket");
        };
        assert_eq!(expanded.id(), id);
        assert_eq!(expanded.service().unwrap().id(), "https://app.example.org");
        assert_eq!(expanded.proxied_by(), Some("ST-predecessor"));
        assert_eq!(expanded.authentication().principal().id(), "alice");
        assert!(expanded.authentication().is_remember_me());
    }

    #[test]
    fn test_absent_proxied_by_round_trips_as_none() {
        let created = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let ticket: Ticket = ProxyGrantingTicket::new(
            "PGT-root".to_string(),
            None,
            authentication(),
            None,
            created,
        )
        .into();

        let id = compactor().compact(&ticket).unwrap();
        let Ticket::ProxyGranting(expanded) = compactor().expand(&id).unwrap() else {
            panic!("expected a proxy-granting ticket");
        };
        assert!(expanded.proxied_by().is_none());
        assert!(expanded.service().is_none());
    }

    #[test]
    fn test_service_with_element_delimiter_fails_compaction() {
        let created = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let ticket: Ticket = ProxyGrantingTicket::new(
            "PGT-1".to_string(),
            Some(Service::new("https://app.example.org/?ids=1,2")),
            authentication(),
            None,
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
    fn test_proxied_by_with_element_delimiter_fails_compaction() {
        let created = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let ticket: Ticket = ProxyGrantingTicket::new(
            "PGT-1".to_string(),
            None,
            authentication(),
            Some("ST-x,0,0".to_string()),
            created,
        )
        .into();

        let err = compactor().compact(&ticket).unwrap_err();
        assert!(matches!(
            err,
            CompactionError::ReservedDelimiter { ref field, .. } if field == "proxied_by"
        ));
    }

    #[test]
    fn test_no_successful_handlers_is_a_precondition_failure() {
        let created = Utc::now();
        let bare = Authentication::builder(Principal::new("alice")).build();
        let ticket: Ticket =
            ProxyGrantingTicket::new("PGT-1".to_string(), None, bare, None, created).into();

        let err = compactor().compact(&ticket).unwrap_err();
        assert!(matches!(err, CompactionError::MissingSuccessfulHandlers));
    }
}
