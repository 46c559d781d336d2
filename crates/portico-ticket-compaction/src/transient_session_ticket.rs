//! Compactor for transient-session tickets.
//!
//! Trailer grammar, after the common header: `,<service|"">,<properties>`
//! where the properties bag is a three-level delimited structure: entries
//! joined by `|`, key and values joined by `=`, multiple values for one key
//! joined by `;`. A key holding one value decodes back to a scalar, several
//! values decode back to a list.
//!
//! The nested delimiters are not escaped. Rather than emit a token that
//! would corrupt on decode, compaction rejects keys and values containing a
//! reserved delimiter.

use crate::compactor::{
    build_header, check_element, enforce_maximum_length, parse_for_kind, push_element,
    require_element, CompactionConfig, TicketCompactor,
};
use crate::error::{CompactionError, ExpansionError};
use crate::indexes;
use portico_tickets::{
    ExpirationPolicy, PropertyValue, ServiceFactory, Ticket, TicketKind,
    TransientSessionTicketFactory,
};
use std::collections::BTreeMap;

/// Joins entries of the properties bag.
pub const ENTRY_DELIMITER: char = '|';

/// Joins a key with its values.
pub const KEY_VALUE_DELIMITER: char = '=';

/// Joins multiple values for one key.
pub const VALUE_DELIMITER: char = ';';

/// Characters that cannot appear inside a property key or value.
const RESERVED: [char; 4] = [ENTRY_DELIMITER, KEY_VALUE_DELIMITER, VALUE_DELIMITER, ','];

/// Compacts and expands [`portico_tickets::TransientSessionTicket`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransientSessionTicketCompactor {
    config: CompactionConfig,
    service_factory: ServiceFactory,
    ticket_factory: TransientSessionTicketFactory,
}

impl TransientSessionTicketCompactor {
    /// Creates a compactor with the given configuration.
    #[must_use]
    pub fn new(config: CompactionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }
}

impl TicketCompactor for TransientSessionTicketCompactor {
    fn ticket_kind(&self) -> TicketKind {
        TicketKind::TransientSessionTicket
    }

    fn compact(&self, ticket: &Ticket) -> Result<String, CompactionError> {
        let Ticket::TransientSession(transient) = ticket else {
            return Err(CompactionError::UnsupportedTicketType {
                expected: self.ticket_kind(),
                actual: ticket.kind(),
            });
        };

        let service_id = transient.service().map(|s| s.id()).unwrap_or_default();
        check_element("service", service_id)?;

        let mut id = build_header(ticket);
        push_element(&mut id, service_id);
        push_element(&mut id, &encode_properties(transient.properties())?);

        let id = enforce_maximum_length(id, &self.config)?;
        tracing::debug!(
            length = id.len(),
            properties = transient.properties().len(),
            "compacted transient-session ticket"
        );
        Ok(id)
    }

    fn expand(&self, id: &str) -> Result<Ticket, ExpansionError> {
        let compact = parse_for_kind(id, self.ticket_kind())?;

        let service_element = require_element(&compact, indexes::SERVICE, "service")?;
        let service = if service_element.is_empty() {
            None
        } else {
            Some(self.service_factory.create(service_element))
        };

        let properties = decode_properties(require_element(
            &compact,
            indexes::transient_session_ticket::PROPERTIES,
            "properties",
        )?)?;

        let transient =
            self.ticket_factory
                .create(id.to_string(), service, properties, compact.creation_time);
        let mut ticket: Ticket = transient.into();
        ticket.set_expiration_policy(ExpirationPolicy::fixed_instant(compact.expiration_time));
        ticket.set_creation_time(compact.creation_time);
        tracing::trace!("expanded transient-session ticket");
        Ok(ticket)
    }
}

/// Encodes the properties bag into its delimited element.
fn encode_properties(
    properties: &BTreeMap<String, PropertyValue>,
) -> Result<String, CompactionError> {
    let mut entries = Vec::with_capacity(properties.len());
    for (key, value) in properties {
        check_reserved(key, key)?;
        for v in value.values() {
            check_reserved(key, v)?;
        }
        entries.push(format!(
            "{key}{KEY_VALUE_DELIMITER}{}",
            value.values().join(&VALUE_DELIMITER.to_string())
        ));
    }
    Ok(entries.join(&ENTRY_DELIMITER.to_string()))
}

/// Decodes the delimited properties element, preserving arity.
fn decode_properties(
    element: &str,
) -> Result<BTreeMap<String, PropertyValue>, ExpansionError> {
    let mut properties = BTreeMap::new();
    if element.is_empty() {
        return Ok(properties);
    }
    for entry in element.split(ENTRY_DELIMITER) {
        let (key, values) = entry.split_once(KEY_VALUE_DELIMITER).ok_or_else(|| {
            ExpansionError::MalformedProperties(format!("entry without '=': {entry}"))
        })?;
        let values: Vec<String> = values.split(VALUE_DELIMITER).map(str::to_string).collect();
        let value = if values.len() == 1 {
            PropertyValue::Single(values.into_iter().next().unwrap_or_default())
        } else {
            PropertyValue::Many(values)
        };
        properties.insert(key.to_string(), value);
    }
    Ok(properties)
}

fn check_reserved(key: &str, value: &str) -> Result<(), CompactionError> {
    if value.contains(RESERVED) {
        return Err(CompactionError::ReservedDelimiter {
            field: key.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use portico_tickets::{Service, TransientSessionTicket};

    fn compactor() -> TransientSessionTicketCompactor {
        TransientSessionTicketCompactor::default()
    }

    fn properties() -> BTreeMap<String, PropertyValue> {
        BTreeMap::from([
            (
                "redirect".to_string(),
                PropertyValue::Single("https://sp.example.org/cb".to_string()),
            ),
            (
                "scopes".to_string(),
                PropertyValue::Many(vec!["openid".to_string(), "profile".to_string()]),
            ),
        ])
    }

    fn ticket() -> Ticket {
        let created = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let mut ticket: Ticket = TransientSessionTicket::new(
            "TST-original".to_string(),
            Some(Service::new("https://sp.example.org")),
            properties(),
            created,
        )
        .into();
        ticket.set_expiration_policy(ExpirationPolicy::fixed_instant(
            created + Duration::minutes(1),
        ));
        ticket
    }

    #[test]
    fn test_properties_wire_shape() {
        let id = compactor().compact(&ticket()).unwrap();
        assert!(id.ends_with(",redirect=https://sp.example.org/cb|scopes=openid;profile"));
    }

    #[test]
    fn test_round_trip_preserves_arity() {
        let id = compactor().compact(&ticket()).unwrap();
        let Ticket::TransientSession(expanded) = compactor().expand(&id).unwrap() else {
            panic!("expected a transient-session ticket");
        };

        assert_eq!(expanded.id(), id);
        assert_eq!(expanded.service().unwrap().id(), "https://sp.example.org");
        assert_eq!(expanded.properties(), &properties());
        assert!(matches!(
            expanded.properties()["redirect"],
            PropertyValue::Single(_)
        ));
        assert!(matches!(
            expanded.properties()["scopes"],
            PropertyValue::Many(_)
        ));
    }

    #[test]
    fn test_absent_service_encodes_as_empty_string() {
        let created = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let ticket: Ticket = TransientSessionTicket::new(
            "TST-1".to_string(),
            None,
            BTreeMap::new(),
            created,
        )
        .into();

        let id = compactor().compact(&ticket).unwrap();
        assert!(id.ends_with(",,"));

        let Ticket::TransientSession(expanded) = compactor().expand(&id).unwrap() else {
            panic!("expected a transient-session ticket");
        };
        assert!(expanded.service().is_none());
        assert!(expanded.properties().is_empty());
    }

    #[test]
    fn test_reserved_delimiter_in_value_fails_compaction() {
        let created = Utc::now();
        let bad = BTreeMap::from([(
            "state".to_string(),
            PropertyValue::Single("a|b".to_string()),
        )]);
        let ticket: Ticket =
            TransientSessionTicket::new("TST-1".to_string(), None, bad, created).into();

        let err = compactor().compact(&ticket).unwrap_err();
        assert!(matches!(err, CompactionError::ReservedDelimiter { .. }));
    }

    #[test]
    fn test_service_with_element_delimiter_fails_compaction() {
        let created = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let ticket: Ticket = TransientSessionTicket::new(
            "TST-1".to_string(),
            Some(Service::new("https://sp.example.org/?ids=1,2")),
            BTreeMap::new(),
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
    fn test_entry_without_separator_fails_expansion() {
        let id = compactor().compact(&ticket()).unwrap();
        let corrupted = format!("{},garbage", id.rsplit_once(',').unwrap().0);
        let err = compactor().expand(&corrupted).unwrap_err();
        assert!(matches!(err, ExpansionError::MalformedProperties(_)));
    }
}
