//! Authenticated principals.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// An authenticated principal: an id plus multi-valued attributes.
///
/// # Example
///
/// ```
/// use portico_tickets::Principal;
///
/// let principal = Principal::new("alice")
///     .with_attribute("mail", vec!["alice@example.org".to_string()]);
/// assert_eq!(principal.id(), "alice");
/// assert_eq!(principal.attribute("mail").unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, Vec<String>>,
}

impl Principal {
    /// Creates a principal with the given id and no attributes.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Adds a multi-valued attribute, replacing any existing values.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.attributes.insert(name.into(), values);
        self
    }

    /// Returns the principal id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the values of the named attribute, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&[String]> {
        self.attributes.get(name).map(Vec::as_slice)
    }

    /// Returns all attributes.
    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, Vec<String>> {
        &self.attributes
    }
}

impl Display for Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
