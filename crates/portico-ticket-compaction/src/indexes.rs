//! Positional field registry for compacted ticket bodies.
//!
//! The header parser hands back an ordered element list; everything below
//! maps semantic field names onto positions in that list. The first three
//! positions are shared by every delimited kind, the per-kind modules cover
//! the kind-specific trailer. Plain constants, no state.

/// Creation timestamp in epoch milliseconds.
pub const CREATION_TIME: usize = 0;

/// Expiration timestamp in epoch milliseconds.
pub const EXPIRATION_TIME: usize = 1;

/// The associated service identifier (or a kind-specific sentinel).
pub const SERVICE: usize = 2;

/// Trailer positions for service tickets.
pub mod service_ticket {
    /// Renewable-from-new-login flag, `0` or `1`.
    pub const RENEWABLE: usize = 3;
    /// Authentication attempt segment, or `*` when absent.
    pub const AUTHENTICATION: usize = 4;
    /// Remember-me flag, `0` or `1`.
    pub const REMEMBER_ME: usize = 5;
}

/// Trailer positions for proxy tickets.
pub mod proxy_ticket {
    /// Authentication attempt segment (principal id base64-encoded).
    pub const AUTHENTICATION: usize = 3;
    /// Remember-me flag, `0` or `1`.
    pub const REMEMBER_ME: usize = 4;
}

/// Trailer positions for proxy-granting tickets.
pub mod proxy_granting_ticket {
    /// Authentication attempt segment (principal id base64-encoded).
    pub const AUTHENTICATION: usize = 3;
    /// Remember-me flag, `0` or `1`.
    pub const REMEMBER_ME: usize = 4;
    /// Id of the immediate predecessor in the proxy chain, or `*`.
    pub const PROXIED_BY: usize = 5;
}

/// Trailer positions for transient-session tickets.
pub mod transient_session_ticket {
    /// The encoded properties bag (possibly empty).
    pub const PROPERTIES: usize = 3;
}
