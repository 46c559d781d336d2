//! Compactor for service tickets.
//!
//! Trailer grammar, after the common header:
//! `,<service|*>,<renewable:0|1>,<attempt|*>,<rememberMe:0|1>`.
//!
//! Every facet is independently optional so degraded variants (anonymous or
//! stub tickets) flow through the same path: an absent service or
//! authentication becomes the `*` sentinel, an absent renewable facet
//! becomes `0`.

use crate::attempt::{self, PrincipalIdEncoding};
use crate::compactor::{
    build_header, check_element, enforce_maximum_length, expect_kind, parse_for_kind,
    push_element, require_element, CompactionConfig, TicketCompactor, ABSENT_SENTINEL,
};
use crate::error::{CompactionError, ExpansionError};
use crate::indexes;
use portico_tickets::{
    ExpirationPolicy, PrincipalFactory, ServiceFactory, ServiceTicketFactory, Ticket, TicketKind,
};

/// Compacts and expands [`portico_tickets::ServiceTicket`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceTicketCompactor {
    config: CompactionConfig,
    service_factory: ServiceFactory,
    principal_factory: PrincipalFactory,
    ticket_factory: ServiceTicketFactory,
}

impl ServiceTicketCompactor {
    /// Creates a compactor with the given configuration.
    #[must_use]
    pub fn new(config: CompactionConfig) -> Self {
        Self {
            config,
            service_factory: ServiceFactory,
            principal_factory: PrincipalFactory,
            ticket_factory: ServiceTicketFactory,
        }
    }
}

impl TicketCompactor for ServiceTicketCompactor {
    fn ticket_kind(&self) -> TicketKind {
        TicketKind::ServiceTicket
    }

    fn compact(&self, ticket: &Ticket) -> Result<String, CompactionError> {
        expect_kind(ticket, self.ticket_kind())?;
        let facets = ticket.facets();

        let mut id = build_header(ticket);

        match facets.service {
            Some(service) => {
                check_element("service", service.id())?;
                push_element(&mut id, service.id());
            }
            None => push_element(&mut id, ABSENT_SENTINEL),
        }

        push_element(
            &mut id,
            attempt::encode_flag(facets.credentials_provided.unwrap_or(false)),
        );

        match facets.authentication {
            Some(authentication) => {
                push_element(
                    &mut id,
                    &attempt::encode_attempt(authentication, PrincipalIdEncoding::Raw)?,
                );
                push_element(&mut id, attempt::encode_flag(authentication.is_remember_me()));
            }
            None => {
                push_element(&mut id, ABSENT_SENTINEL);
                push_element(&mut id, attempt::encode_flag(false));
            }
        }

        let id = enforce_maximum_length(id, &self.config)?;
        tracing::debug!(length = id.len(), "compacted service ticket");
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

        let renewable = attempt::decode_flag(require_element(
            &compact,
            indexes::service_ticket::RENEWABLE,
            "renewable",
        )?)?;

        let attempt_element = require_element(
            &compact,
            indexes::service_ticket::AUTHENTICATION,
            "authentication",
        )?;
        let remember_me = attempt::decode_flag(require_element(
            &compact,
            indexes::service_ticket::REMEMBER_ME,
            "remember_me",
        )?)?;
        let authentication = if attempt_element == ABSENT_SENTINEL {
            None
        } else {
            Some(attempt::decode_attempt(
                attempt_element,
                remember_me,
                PrincipalIdEncoding::Raw,
                &self.principal_factory,
            )?)
        };

        let service_ticket = self.ticket_factory.create(
            id.to_string(),
            service,
            authentication,
            renewable,
            compact.creation_time,
        );
        let mut ticket: Ticket = service_ticket.into();
        ticket.set_expiration_policy(ExpirationPolicy::fixed_instant(compact.expiration_time));
        ticket.set_creation_time(compact.creation_time);
        tracing::trace!("expanded service ticket");
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use portico_tickets::{Authentication, Principal, Service, ServiceTicket};

    fn compactor() -> ServiceTicketCompactor {
        ServiceTicketCompactor::default()
    }

    fn authentication() -> Authentication {
        Authentication::builder(Principal::new("alice"))
            .successful_handler("LdapAuthenticationHandler")
            .credential_type("UsernamePasswordCredential")
            .remember_me(true)
            .build()
    }

    fn ticket() -> Ticket {
        let created = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let mut ticket: Ticket = ServiceTicket::new(
            "ST-original".to_string(),
            Some(Service::new("https://app.example.org")),
            Some(authentication()),
            true,
            created,
        )
        .into();
        ticket.set_expiration_policy(ExpirationPolicy::fixed_instant(
            created + Duration::minutes(5),
        ));
        ticket
    }

    #[test]
    fn test_trailer_layout() {
        let id = compactor().compact(&ticket()).unwrap();
        assert!(id.starts_with("ST-"));
        assert!(id.ends_with(
            ",https://app.example.org,1,alice:LdapAuthenticationHandler:UsernamePasswordCredential,1"
        ));
    }

    #[test]
    fn test_round_trip() {
        let original = ticket();
        let id = compactor().compact(&original).unwrap();
        let expanded = compactor().expand(&id).unwrap();

        assert_eq!(expanded.id(), id);
        assert_eq!(expanded.creation_time(), original.creation_time());
        assert_eq!(
            expanded.expiration_policy().expiration_time(),
            original.expiration_policy().expiration_time()
        );

        let Ticket::Service(expanded) = expanded else {
            panic!("expected a service ticket");
        };
        assert_eq!(expanded.service().unwrap().id(), "https://app.example.org");
        assert!(expanded.is_credentials_provided());
        let restored = expanded.authentication().unwrap();
        assert_eq!(restored.principal().id(), "alice");
        assert_eq!(restored.successes().len(), 1);
        assert!(restored.successes().contains_key("LdapAuthenticationHandler"));
        assert!(restored.is_remember_me());
    }

    #[test]
    fn test_degraded_ticket_uses_sentinels() {
        let created = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let ticket: Ticket =
            ServiceTicket::new("ST-stub".to_string(), None, None, false, created).into();

        let id = compactor().compact(&ticket).unwrap();
        assert!(id.ends_with(",*,0,*,0"));

        let Ticket::Service(expanded) = compactor().expand(&id).unwrap() else {
            panic!("expected a service ticket");
        };
        assert!(expanded.service().is_none());
        assert!(expanded.authentication().is_none());
        assert!(!expanded.is_credentials_provided());
    }

    #[test]
    fn test_wrong_kind_is_rejected() {
        let created = Utc::now();
        let tgt: Ticket = portico_tickets::TicketGrantingTicket::new(
            "TGT-1".to_string(),
            authentication(),
            created,
        )
        .into();
        let err = compactor().compact(&tgt).unwrap_err();
        assert!(matches!(
            err,
            CompactionError::UnsupportedTicketType { .. }
        ));
    }

    #[test]
    fn test_service_with_element_delimiter_fails_compaction() {
        let created = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let ticket: Ticket = ServiceTicket::new(
            "ST-1".to_string(),
            Some(Service::new("https://app.example.org/?ids=1,2")),
            Some(authentication()),
            true,
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
    fn test_raw_principal_with_segment_delimiter_fails_compaction() {
        let created = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let authentication = Authentication::builder(Principal::new("urn:alice"))
            .successful_handler("LdapAuthenticationHandler")
            .build();
        let ticket: Ticket = ServiceTicket::new(
            "ST-1".to_string(),
            Some(Service::new("https://app.example.org")),
            Some(authentication),
            true,
            created,
        )
        .into();

        let err = compactor().compact(&ticket).unwrap_err();
        assert!(matches!(
            err,
            CompactionError::ReservedDelimiter { ref field, .. } if field == "principal_id"
        ));
    }

    #[test]
    fn test_oversized_output_fails() {
        let small = ServiceTicketCompactor::new(CompactionConfig {
            maximum_ticket_length: 40,
        });
        let err = small.compact(&ticket()).unwrap_err();
        assert!(matches!(err, CompactionError::ExceedsMaximumLength { .. }));
    }

    #[test]
    fn test_missing_trailer_element_fails_expansion() {
        let id = compactor().compact(&ticket()).unwrap();
        let truncated = id.rsplit_once(',').unwrap().0;
        let err = compactor().expand(truncated).unwrap_err();
        assert!(matches!(err, ExpansionError::MissingElement { .. }));
    }

    #[test]
    fn test_corrupted_flag_fails_expansion() {
        let id = compactor().compact(&ticket()).unwrap();
        let corrupted = format!("{},x", id.rsplit_once(',').unwrap().0);
        let err = compactor().expand(&corrupted).unwrap_err();
        assert!(matches!(err, ExpansionError::InvalidFlag(_)));
    }
}
