//! Mock session store for tests
//!
//! In-memory stand-in for the identity provider. Tokens map to sessions,
//! authorization codes map to sessions-to-be, and the whole provider can be
//! switched into an "unreachable" mode to exercise outage handling. Call
//! counters allow tests to assert the memoization contract.

use crate::models::Session;
use crate::store::{Credential, SessionStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct MockSessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    exchanges: Mutex<HashMap<String, Session>>,
    unavailable: AtomicBool,
    fetch_count: AtomicUsize,
    revoke_count: AtomicUsize,
}

impl MockSessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session, keyed by its token.
    pub fn insert(&self, session: Session) {
        self.sessions
            .lock()
            .expect("mock store lock poisoned")
            .insert(session.token.clone(), session);
    }

    /// Drop a session, simulating provider-side revocation or expiry.
    pub fn remove(&self, token: &str) {
        self.sessions
            .lock()
            .expect("mock store lock poisoned")
            .remove(token);
    }

    /// Register an authorization code that will exchange into `session`.
    pub fn register_exchange(&self, code: &str, session: Session) {
        self.exchanges
            .lock()
            .expect("mock store lock poisoned")
            .insert(code.to_string(), session);
    }

    /// Toggle the simulated provider outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn revoke_count(&self) -> usize {
        self.revoke_count.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.sessions
            .lock()
            .expect("mock store lock poisoned")
            .contains_key(token)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::ProviderUnavailable(
                "mock provider is offline".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn fetch_session(&self, credential: &Credential) -> Result<Option<Session>, StoreError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        Ok(self
            .sessions
            .lock()
            .expect("mock store lock poisoned")
            .get(credential.secret())
            .cloned())
    }

    async fn revoke(&self, token: &str) -> Result<(), StoreError> {
        self.revoke_count.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        // Unknown tokens are a no-op, keeping revocation idempotent
        self.remove(token);
        Ok(())
    }

    async fn complete_exchange(&self, code: &str) -> Result<Session, StoreError> {
        self.check_available()?;

        let session = self
            .exchanges
            .lock()
            .expect("mock store lock poisoned")
            .remove(code)
            .ok_or_else(|| StoreError::Protocol(format!("unknown authorization code: {code}")))?;

        // The provider owns the session; make it fetchable on the next request
        self.insert(session.clone());
        Ok(session)
    }
}
