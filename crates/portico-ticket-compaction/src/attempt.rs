//! The authentication attempt codec.
//!
//! Encodes an [`Authentication`] summary into one trailer element of the form
//! `<principalId>:<handler>#<handler>:<credType>#<credType>`, with the
//! remember-me flag carried in a separate `0|1` element. `#` is reserved
//! inside names; handler and credential type names are programmatic
//! identifiers, so the grammar relies on that rather than escaping.
//!
//! Principal-id treatment is deliberately per-caller: the service-ticket path
//! embeds it raw while the proxy paths wrap it in URL-safe base64. Decoding
//! must use whichever convention the calling codec uses.

use crate::error::{CompactionError, ExpansionError};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use portico_tickets::header::ELEMENT_DELIMITER;
use portico_tickets::{Authentication, PrincipalFactory};

/// Separates the principal, handler, and credential-type segments.
pub const SEGMENT_DELIMITER: char = ':';

/// Separates names within the handler and credential-type segments.
pub const NAME_DELIMITER: char = '#';

/// How a codec embeds the principal id inside the attempt element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrincipalIdEncoding {
    /// The principal id is embedded as-is.
    Raw,
    /// The principal id is wrapped in URL-safe base64 without padding.
    UrlSafeBase64,
}

/// Encodes an authentication summary into its attempt element.
///
/// Handler and credential-type names are emitted in their set order, so the
/// output is deterministic for a given summary. On the raw path a principal
/// id containing the segment or element delimiter is rejected: it would
/// produce an element that can never be decoded. The base64 path has no such
/// restriction, since the wrapping removes the collision.
pub fn encode_attempt(
    authentication: &Authentication,
    encoding: PrincipalIdEncoding,
) -> Result<String, CompactionError> {
    let principal_id = match encoding {
        PrincipalIdEncoding::Raw => {
            let id = authentication.principal().id();
            if id.contains([SEGMENT_DELIMITER, ELEMENT_DELIMITER]) {
                return Err(CompactionError::ReservedDelimiter {
                    field: "principal_id".to_string(),
                    value: id.to_string(),
                });
            }
            id.to_string()
        }
        PrincipalIdEncoding::UrlSafeBase64 => {
            URL_SAFE_NO_PAD.encode(authentication.principal().id())
        }
    };
    let handlers: Vec<String> = authentication.handler_names().into_iter().collect();
    let credential_types: Vec<String> =
        authentication.credential_type_names().into_iter().collect();
    Ok(format!(
        "{principal_id}{SEGMENT_DELIMITER}{}{SEGMENT_DELIMITER}{}",
        handlers.join(&NAME_DELIMITER.to_string()),
        credential_types.join(&NAME_DELIMITER.to_string())
    ))
}

/// Decodes an attempt element back into an authentication summary.
///
/// Empty handler or credential-type segments decode to empty sets; callers
/// with a non-empty-handlers precondition enforce it at compaction time, not
/// here. The remember-me flag comes from its own element and is folded into
/// the rebuilt summary's attributes.
pub fn decode_attempt(
    element: &str,
    remember_me: bool,
    encoding: PrincipalIdEncoding,
    principal_factory: &PrincipalFactory,
) -> Result<Authentication, ExpansionError> {
    let segments: Vec<&str> = element.split(SEGMENT_DELIMITER).collect();
    if segments.len() != 3 {
        return Err(ExpansionError::MalformedAuthenticationAttempt(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    }

    let principal_id = match encoding {
        PrincipalIdEncoding::Raw => segments[0].to_string(),
        PrincipalIdEncoding::UrlSafeBase64 => {
            let bytes = URL_SAFE_NO_PAD.decode(segments[0]).map_err(|e| {
                ExpansionError::MalformedAuthenticationAttempt(format!(
                    "principal id is not valid base64: {e}"
                ))
            })?;
            String::from_utf8(bytes).map_err(|_| {
                ExpansionError::MalformedAuthenticationAttempt(
                    "principal id is not valid UTF-8".to_string(),
                )
            })?
        }
    };

    let principal = principal_factory.create(&principal_id);
    Ok(Authentication::builder(principal)
        .successful_handlers(split_names(segments[1]))
        .credential_types(split_names(segments[2]))
        .remember_me(remember_me)
        .build())
}

/// Encodes a boolean trailer flag.
#[must_use]
pub fn encode_flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Decodes a boolean trailer flag; anything but `0` or `1` is malformed.
pub fn decode_flag(element: &str) -> Result<bool, ExpansionError> {
    match element {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(ExpansionError::InvalidFlag(other.to_string())),
    }
}

fn split_names(segment: &str) -> Vec<String> {
    if segment.is_empty() {
        Vec::new()
    } else {
        segment.split(NAME_DELIMITER).map(str::to_string).collect()
    }
}
