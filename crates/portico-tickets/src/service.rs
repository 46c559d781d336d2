//! The `Service` a ticket is bound to.
//!
//! A service is identified by an opaque urn/URL string. The newtype keeps
//! service identifiers from being confused with principal ids or ticket ids
//! at compile time.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A registered service, identified by its urn or URL.
///
/// # Example
///
/// ```
/// use portico_tickets::Service;
///
/// let service = Service::new("https://app.example.org");
/// assert_eq!(service.id(), "https://app.example.org");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Service(String);

impl Service {
    /// Creates a service from its identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the service identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl Display for Service {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Service {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_id() {
        let service = Service::new("urn:example:sp");
        assert_eq!(service.id(), "urn:example:sp");
        assert_eq!(service.to_string(), "urn:example:sp");
    }

    #[test]
    fn test_equality_is_by_identifier() {
        assert_eq!(Service::new("a"), Service::from("a"));
        assert_ne!(Service::new("a"), Service::new("b"));
    }
}
