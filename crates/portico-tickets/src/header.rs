//! The common compacted-id header.
//!
//! Every compacted ticket id has the shape
//! `{PREFIX}-{securityToken}-{creationMillis},{expirationMillis}[,trailer...]`:
//! a kind prefix, a random security token, then a comma-delimited body whose
//! first two elements are the creation and expiration timestamps in epoch
//! milliseconds. Type-specific codecs only append trailer elements after the
//! timestamps and read them back by position; they never reinterpret the
//! header itself.

use crate::error::TicketError;
use crate::kind::TicketKind;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

/// Delimiter between body elements.
pub const ELEMENT_DELIMITER: char = ',';

/// Length of the random security token embedded in the header.
const SECURITY_TOKEN_LENGTH: usize = 10;

/// A compacted ticket id split into its ordered elements.
///
/// `elements` is the full body split on [`ELEMENT_DELIMITER`]; the
/// timestamps occupy positions 0 and 1 and are also exposed pre-parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactTicket {
    /// The ticket kind recovered from the id prefix.
    pub kind: TicketKind,
    /// Every body element in wire order, timestamps included.
    pub elements: Vec<String>,
    /// Creation time parsed from element 0.
    pub creation_time: DateTime<Utc>,
    /// Expiration time parsed from element 1.
    pub expiration_time: DateTime<Utc>,
}

impl CompactTicket {
    /// The element at the given position, if present.
    #[must_use]
    pub fn element(&self, index: usize) -> Option<&str> {
        self.elements.get(index).map(String::as_str)
    }
}

/// Builder/parser for the common header.
pub struct CompactTicketHeader;

impl CompactTicketHeader {
    /// Builds the header for a ticket of the given kind and timestamps.
    ///
    /// The result ends with the expiration timestamp; codecs append their
    /// trailer elements directly after it.
    #[must_use]
    pub fn build(
        kind: TicketKind,
        creation_time: DateTime<Utc>,
        expiration_time: DateTime<Utc>,
    ) -> String {
        let token = security_token();
        format!(
            "{}-{}-{}{}{}",
            kind.prefix(),
            token,
            creation_time.timestamp_millis(),
            ELEMENT_DELIMITER,
            expiration_time.timestamp_millis()
        )
    }

    /// Parses a compacted id back into its kind, elements, and timestamps.
    ///
    /// Cost is linear in the id length; no element is interpreted beyond the
    /// two timestamps.
    pub fn parse(id: &str) -> Result<CompactTicket, TicketError> {
        let mut sections = id.splitn(3, '-');
        let prefix = sections
            .next()
            .ok_or_else(|| TicketError::MalformedId(id.to_string()))?;
        let kind: TicketKind = prefix.parse()?;

        let token = sections
            .next()
            .ok_or_else(|| TicketError::MalformedId("missing security token".to_string()))?;
        if token.len() != SECURITY_TOKEN_LENGTH || !token.bytes().all(|b| b.is_ascii_alphanumeric())
        {
            return Err(TicketError::MalformedId(
                "invalid security token".to_string(),
            ));
        }

        let body = sections
            .next()
            .ok_or_else(|| TicketError::MalformedId("missing ticket body".to_string()))?;
        let elements: Vec<String> = body
            .split(ELEMENT_DELIMITER)
            .map(str::to_string)
            .collect();
        if elements.len() < 2 {
            return Err(TicketError::MalformedId(
                "missing header timestamps".to_string(),
            ));
        }

        let creation_time = parse_millis(&elements[0])?;
        let expiration_time = parse_millis(&elements[1])?;

        Ok(CompactTicket {
            kind,
            elements,
            creation_time,
            expiration_time,
        })
    }
}

fn security_token() -> String {
    let mut token = Uuid::new_v4().simple().to_string();
    token.truncate(SECURITY_TOKEN_LENGTH);
    token
}

fn parse_millis(value: &str) -> Result<DateTime<Utc>, TicketError> {
    let millis: i64 = value
        .parse()
        .map_err(|_| TicketError::InvalidTimestamp(value.to_string()))?;
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| TicketError::InvalidTimestamp(value.to_string()))
}
