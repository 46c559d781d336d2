//! Expiration policies carried by tickets.
//!
//! Tickets carry their policy so a validator can decide expiry; nothing in
//! this crate makes that decision. Expanded tickets always receive a
//! [`ExpirationPolicy::FixedInstant`] built from the expiration timestamp
//! recovered out of the compacted id header.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// When a ticket stops being honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpirationPolicy {
    /// The ticket never expires on its own.
    Never,
    /// The ticket expires at a fixed instant.
    FixedInstant(DateTime<Utc>),
}

impl ExpirationPolicy {
    /// Builds a policy expiring at the given instant.
    #[must_use]
    pub fn fixed_instant(at: DateTime<Utc>) -> Self {
        ExpirationPolicy::FixedInstant(at)
    }

    /// The instant this policy expires at, if it has one.
    #[must_use]
    pub fn expiration_time(&self) -> Option<DateTime<Utc>> {
        match self {
            ExpirationPolicy::Never => None,
            ExpirationPolicy::FixedInstant(at) => Some(*at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_instant_exposes_its_instant() {
        let at = Utc::now();
        assert_eq!(ExpirationPolicy::fixed_instant(at).expiration_time(), Some(at));
    }

    #[test]
    fn test_never_has_no_instant() {
        assert_eq!(ExpirationPolicy::Never.expiration_time(), None);
    }
}
