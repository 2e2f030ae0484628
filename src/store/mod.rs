//! Session store adapter
//!
//! This module wraps the external identity provider behind the
//! [`SessionStore`] trait. The provider owns session issuance, validation and
//! storage; the adapter only asks it "what session does this credential map
//! to" and "revoke this token". Credential material stays opaque throughout.

pub mod http;

pub use http::HttpSessionStore;

use crate::models::Session;
use async_trait::async_trait;
use thiserror::Error;

/// Opaque credential material extracted from an inbound request.
///
/// The internal structure of the value is entirely the identity provider's
/// business; this crate only shuttles it back to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Value of the session cookie
    SessionCookie(String),
    /// Bearer token from the `Authorization` header
    Bearer(String),
}

impl Credential {
    /// The raw secret carried by this credential.
    #[must_use]
    pub fn secret(&self) -> &str {
        match self {
            Credential::SessionCookie(value) | Credential::Bearer(value) => value,
        }
    }
}

/// Errors surfaced by the session store adapter.
///
/// Note that "no session" is deliberately not represented here: an absent,
/// expired or unknown credential resolves to `Ok(None)` from
/// [`SessionStore::fetch_session`]. Conflating provider outages with
/// unauthenticated callers would mask an outage as a logout.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The identity provider could not be reached or answered with a
    /// server-side failure. Callers must treat this as an error state,
    /// never as "unauthenticated".
    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider answered, but with a response this crate cannot
    /// interpret.
    #[error("unexpected identity provider response: {0}")]
    Protocol(String),
}

/// Adapter over the external session/identity provider.
///
/// Implementations must uphold two contracts:
/// - `fetch_session` never errors on "no session"; that is a normal
///   `Ok(None)` result.
/// - `revoke` is idempotent; revoking an already-revoked or unknown token is
///   a no-op, not an error.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Resolve the current valid session for the given credential.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProviderUnavailable`] only when the provider
    /// cannot be reached, and [`StoreError::Protocol`] for malformed
    /// provider responses.
    async fn fetch_session(&self, credential: &Credential) -> Result<Option<Session>, StoreError>;

    /// Revoke the session identified by `token`. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error only when the provider cannot be reached.
    async fn revoke(&self, token: &str) -> Result<(), StoreError>;

    /// Forward an OAuth callback authorization code to the provider's
    /// exchange endpoint. The provider mints the session; this crate never
    /// does.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the code or cannot be
    /// reached.
    async fn complete_exchange(&self, code: &str) -> Result<Session, StoreError>;
}
