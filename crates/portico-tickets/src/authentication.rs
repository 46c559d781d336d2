//! The authentication summary carried by tickets.
//!
//! This is a reduced form of a completed authentication attempt, not the full
//! handler-chain output: the principal, one success record per handler that
//! accepted the credentials, and a small multi-valued attribute map. It is
//! the unit the compaction layer embeds into ticket ids, so everything here
//! must survive a string round trip.

use crate::principal::Principal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Well-known authentication attribute names.
pub mod attribute_names {
    /// Names of the handlers that successfully authenticated the credentials.
    pub const SUCCESSFUL_HANDLERS: &str = "successful_authentication_handlers";
    /// Type names of the credentials that were presented.
    pub const CREDENTIAL_TYPE: &str = "credential_type";
    /// Whether the authentication requested a long-lived session.
    pub const REMEMBER_ME: &str = "remember_me";
}

/// The outcome of one authentication handler accepting the credentials.
///
/// Reconstructed summaries carry one synthetic result per handler name; the
/// original handler output beyond its name is not preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerResult {
    handler_name: String,
    principal_id: String,
}

impl HandlerResult {
    /// Creates a success record for the given handler and principal.
    #[must_use]
    pub fn new(handler_name: impl Into<String>, principal_id: impl Into<String>) -> Self {
        Self {
            handler_name: handler_name.into(),
            principal_id: principal_id.into(),
        }
    }

    /// The name of the handler that produced this result.
    #[must_use]
    pub fn handler_name(&self) -> &str {
        &self.handler_name
    }

    /// The id of the principal the handler resolved.
    #[must_use]
    pub fn principal_id(&self) -> &str {
        &self.principal_id
    }
}

/// A completed authentication attempt in summary form.
///
/// Handler names and credential type names are kept as ordered sets: the
/// compaction round trip guarantees set equality, not ordering.
///
/// # Example
///
/// ```
/// use portico_tickets::{Authentication, Principal};
///
/// let authentication = Authentication::builder(Principal::new("alice"))
///     .successful_handler("LdapAuthenticationHandler")
///     .credential_type("UsernamePasswordCredential")
///     .remember_me(true)
///     .build();
///
/// assert!(authentication.is_remember_me());
/// assert_eq!(authentication.successes().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authentication {
    principal: Principal,
    successes: BTreeMap<String, HandlerResult>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, Vec<String>>,
}

impl Authentication {
    /// Starts building an authentication for the given principal.
    #[must_use]
    pub fn builder(principal: Principal) -> AuthenticationBuilder {
        AuthenticationBuilder {
            principal,
            handler_names: BTreeSet::new(),
            credential_types: BTreeSet::new(),
            remember_me: false,
            attributes: BTreeMap::new(),
        }
    }

    /// The authenticated principal.
    #[must_use]
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// The per-handler success records, keyed by handler name.
    #[must_use]
    pub fn successes(&self) -> &BTreeMap<String, HandlerResult> {
        &self.successes
    }

    /// All authentication attributes.
    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, Vec<String>> {
        &self.attributes
    }

    /// Names of the handlers that accepted the credentials, as a set.
    #[must_use]
    pub fn handler_names(&self) -> BTreeSet<String> {
        self.successes.keys().cloned().collect()
    }

    /// Type names of the credentials that were presented, as a set.
    #[must_use]
    pub fn credential_type_names(&self) -> BTreeSet<String> {
        self.attributes
            .get(attribute_names::CREDENTIAL_TYPE)
            .map(|values| values.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Whether the attempt requested a long-lived session.
    #[must_use]
    pub fn is_remember_me(&self) -> bool {
        self.attributes
            .get(attribute_names::REMEMBER_ME)
            .is_some_and(|values| values.iter().any(|v| v == "true"))
    }
}

/// Builder for [`Authentication`].
#[derive(Debug, Clone)]
pub struct AuthenticationBuilder {
    principal: Principal,
    handler_names: BTreeSet<String>,
    credential_types: BTreeSet<String>,
    remember_me: bool,
    attributes: BTreeMap<String, Vec<String>>,
}

impl AuthenticationBuilder {
    /// Records a handler that successfully authenticated the credentials.
    #[must_use]
    pub fn successful_handler(mut self, name: impl Into<String>) -> Self {
        self.handler_names.insert(name.into());
        self
    }

    /// Records every handler name in the given collection.
    #[must_use]
    pub fn successful_handlers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.handler_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Records the type name of a presented credential.
    #[must_use]
    pub fn credential_type(mut self, name: impl Into<String>) -> Self {
        self.credential_types.insert(name.into());
        self
    }

    /// Records every credential type name in the given collection.
    #[must_use]
    pub fn credential_types<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.credential_types
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Sets the remember-me flag.
    #[must_use]
    pub fn remember_me(mut self, remember_me: bool) -> Self {
        self.remember_me = remember_me;
        self
    }

    /// Adds an arbitrary multi-valued attribute.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.attributes.insert(name.into(), values);
        self
    }

    /// Builds the authentication, materializing one synthetic success per
    /// handler name and the three well-known attributes.
    #[must_use]
    pub fn build(mut self) -> Authentication {
        let successes = self
            .handler_names
            .iter()
            .map(|name| {
                (
                    name.clone(),
                    HandlerResult::new(name.clone(), self.principal.id()),
                )
            })
            .collect();

        self.attributes.insert(
            attribute_names::SUCCESSFUL_HANDLERS.to_string(),
            self.handler_names.iter().cloned().collect(),
        );
        self.attributes.insert(
            attribute_names::CREDENTIAL_TYPE.to_string(),
            self.credential_types.iter().cloned().collect(),
        );
        self.attributes.insert(
            attribute_names::REMEMBER_ME.to_string(),
            vec![self.remember_me.to_string()],
        );

        Authentication {
            principal: self.principal,
            successes,
            attributes: self.attributes,
        }
    }
}
