//! Session gate - per-request session resolution and sign-out
//!
//! The `SessionGate` is the central coordination point between the HTTP
//! layer and the session store adapter. It extracts credentials from inbound
//! requests, hands out fresh request-scoped [`SessionQuery`] instances, and
//! runs the sign-out sequence.
//!
//! One gate is shared across the worker pool, but it holds no session state
//! of its own: every request gets its own `SessionQuery`, so concurrent
//! requests can never observe each other's session.

use actix_web::HttpRequest;
use log::{debug, info};
use std::sync::Arc;

use crate::session::cache::SessionQuery;
use crate::session::cookie::{CookieFactory, SESSION_COOKIE};
use crate::store::{Credential, SessionStore, StoreError};

#[derive(Clone)]
pub struct SessionGate {
    store: Arc<dyn SessionStore>,
    cookie_factory: CookieFactory,
}

impl SessionGate {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, cookie_secure: bool) -> Self {
        Self {
            store,
            cookie_factory: CookieFactory::new(cookie_secure),
        }
    }

    #[must_use]
    pub fn cookie_factory(&self) -> &CookieFactory {
        &self.cookie_factory
    }

    #[must_use]
    pub fn store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.store)
    }

    /// Extract the opaque credential from a request: the session cookie if
    /// present, otherwise a bearer token from the `Authorization` header.
    #[must_use]
    pub fn credential_from_request(req: &HttpRequest) -> Option<Credential> {
        if let Some(cookie) = req.cookie(SESSION_COOKIE) {
            if !cookie.value().is_empty() {
                return Some(Credential::SessionCookie(cookie.value().to_string()));
            }
        }

        req.headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .filter(|token| !token.is_empty())
            .map(|token| Credential::Bearer(token.to_string()))
    }

    /// Build a fresh request-scoped session query for this request.
    #[must_use]
    pub fn session_query(&self, req: &HttpRequest) -> SessionQuery {
        let credential = Self::credential_from_request(req);
        debug!(
            "building session query for {} (credential present: {})",
            req.path(),
            credential.is_some()
        );
        SessionQuery::new(Arc::clone(&self.store), credential)
    }

    /// Sign out the caller behind `query`: revoke the current token at the
    /// provider first, then invalidate the query cache, in that order, so
    /// any read after this call observes "no session" even before the
    /// browser finishes navigating.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be reached for revocation.
    /// The cache is left untouched in that case so the outage is not
    /// masked as a completed sign-out.
    pub async fn sign_out(&self, query: &SessionQuery) -> Result<(), StoreError> {
        if let Some(credential) = query.credential() {
            self.store.revoke(credential.secret()).await?;
            info!("session token revoked at provider");
        } else {
            debug!("sign-out without credential is a no-op at the provider");
        }

        query.invalidate().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mock::MockSessionStore;
    use crate::testing::TestSessionBuilder;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;

    #[test]
    fn test_credential_prefers_session_cookie() {
        let req = TestRequest::get()
            .cookie(Cookie::new(SESSION_COOKIE, "tok_cookie"))
            .insert_header(("Authorization", "Bearer tok_bearer"))
            .to_http_request();

        assert_eq!(
            SessionGate::credential_from_request(&req),
            Some(Credential::SessionCookie("tok_cookie".to_string()))
        );
    }

    #[test]
    fn test_credential_falls_back_to_bearer_header() {
        let req = TestRequest::get()
            .insert_header(("Authorization", "Bearer tok_bearer"))
            .to_http_request();

        assert_eq!(
            SessionGate::credential_from_request(&req),
            Some(Credential::Bearer("tok_bearer".to_string()))
        );
    }

    #[test]
    fn test_no_credential_on_bare_request() {
        let req = TestRequest::get().to_http_request();
        assert!(SessionGate::credential_from_request(&req).is_none());

        // An emptied cookie (post sign-out) also counts as no credential
        let req = TestRequest::get()
            .cookie(Cookie::new(SESSION_COOKIE, ""))
            .to_http_request();
        assert!(SessionGate::credential_from_request(&req).is_none());
    }

    #[tokio::test]
    async fn test_sign_out_revokes_then_invalidates() {
        let store = Arc::new(MockSessionStore::new());
        store.insert(TestSessionBuilder::new().with_token("tok_out").build());
        let gate = SessionGate::new(Arc::clone(&store) as Arc<dyn SessionStore>, true);

        let req = TestRequest::get()
            .cookie(Cookie::new(SESSION_COOKIE, "tok_out"))
            .to_http_request();
        let query = gate.session_query(&req);

        // Resolve once so the cache holds the session
        assert!(query.get().await.unwrap().is_some());

        gate.sign_out(&query).await.unwrap();

        // The very next read through the same cache reflects "no session"
        assert!(query.get().await.unwrap().is_none());
        assert_eq!(store.revoke_count(), 1);
    }

    #[tokio::test]
    async fn test_sign_out_provider_outage_keeps_cache() {
        let store = Arc::new(MockSessionStore::new());
        store.insert(TestSessionBuilder::new().with_token("tok_keep").build());
        let gate = SessionGate::new(Arc::clone(&store) as Arc<dyn SessionStore>, true);

        let req = TestRequest::get()
            .cookie(Cookie::new(SESSION_COOKIE, "tok_keep"))
            .to_http_request();
        let query = gate.session_query(&req);
        assert!(query.get().await.unwrap().is_some());

        store.set_unavailable(true);
        assert!(gate.sign_out(&query).await.is_err());

        // Revocation never happened, so the cached view is still accurate
        assert_eq!(query.generation().await, 0);
        assert!(query.get().await.unwrap().is_some());
    }
}
