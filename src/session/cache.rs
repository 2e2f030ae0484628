//! Request-scoped session query cache
//!
//! Memoizes the session lookup so that multiple consumers within one request
//! or navigation cycle resolve the same value from a single provider call.
//! A [`SessionQuery`] is constructed fresh for every request and dropped with
//! it; it is never shared across requests, which is what keeps one caller's
//! identity from leaking into another's in a multi-tenant server process.

use crate::models::Session;
use crate::store::{Credential, SessionStore, StoreError};
use std::sync::Arc;
use tokio::sync::Mutex;

enum Slot {
    Unresolved,
    Resolved(Option<Session>),
}

struct Inner {
    generation: u64,
    slot: Slot,
}

/// Per-request memoized session resolver.
///
/// Holding the internal lock across the provider fetch guarantees at most one
/// in-flight lookup per request, even when several consumers ask for the
/// session concurrently.
pub struct SessionQuery {
    store: Arc<dyn SessionStore>,
    credential: Option<Credential>,
    inner: Mutex<Inner>,
}

impl SessionQuery {
    /// Create a query for one request's credential. `None` means the request
    /// carried no credential at all; the query then resolves to no session
    /// without consulting the provider.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, credential: Option<Credential>) -> Self {
        Self {
            store,
            credential,
            inner: Mutex::new(Inner {
                generation: 0,
                slot: Slot::Unresolved,
            }),
        }
    }

    /// Resolve the current session, memoized for the lifetime of this query.
    ///
    /// Expired sessions are normalized to `None` here so every consumer
    /// observes the same "expired equals absent" view. Provider failures are
    /// not memoized; a later call retries the lookup.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProviderUnavailable`] when the identity provider
    /// cannot be reached. This is distinct from an unauthenticated result.
    pub async fn get(&self) -> Result<Option<Session>, StoreError> {
        let mut inner = self.inner.lock().await;

        if let Slot::Resolved(value) = &inner.slot {
            return Ok(value.clone());
        }

        let resolved = match &self.credential {
            None => None,
            Some(credential) => self
                .store
                .fetch_session(credential)
                .await?
                .filter(|session| !session.is_expired()),
        };

        inner.slot = Slot::Resolved(resolved.clone());
        Ok(resolved)
    }

    /// Drop the memoized value so the next read re-fetches from the
    /// provider. Must be called after sign-in or sign-out so subsequent
    /// reads reflect the new state.
    pub async fn invalidate(&self) {
        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        inner.slot = Slot::Unresolved;
    }

    /// Invalidation counter, starting at zero for a fresh query.
    pub async fn generation(&self) -> u64 {
        self.inner.lock().await.generation
    }

    /// The credential this query was built from, if any.
    #[must_use]
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mock::MockSessionStore;
    use crate::testing::TestSessionBuilder;

    fn query_for(store: &Arc<MockSessionStore>, token: &str) -> SessionQuery {
        SessionQuery::new(
            Arc::clone(store) as Arc<dyn SessionStore>,
            Some(Credential::SessionCookie(token.to_string())),
        )
    }

    #[tokio::test]
    async fn test_memoizes_single_fetch_across_consumers() {
        let store = Arc::new(MockSessionStore::new());
        let session = TestSessionBuilder::new().with_token("tok_1").build();
        store.insert(session);

        let query = query_for(&store, "tok_1");
        let first = query.get().await.unwrap();
        let second = query.get().await.unwrap();

        assert!(first.is_some());
        assert_eq!(first.unwrap().token, second.unwrap().token);
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_credential_resolves_without_provider_call() {
        let store = Arc::new(MockSessionStore::new());
        let query = SessionQuery::new(Arc::clone(&store) as Arc<dyn SessionStore>, None);

        assert!(query.get().await.unwrap().is_none());
        assert_eq!(store.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_expired_session_normalized_to_none() {
        let store = Arc::new(MockSessionStore::new());
        let session = TestSessionBuilder::new()
            .with_token("tok_expired")
            .expires_in_hours(-1)
            .build();
        store.insert(session);

        let query = query_for(&store, "tok_expired");
        assert!(query.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let store = Arc::new(MockSessionStore::new());
        let session = TestSessionBuilder::new().with_token("tok_2").build();
        store.insert(session);

        let query = query_for(&store, "tok_2");
        assert!(query.get().await.unwrap().is_some());

        store.remove("tok_2");
        // Still memoized until invalidated
        assert!(query.get().await.unwrap().is_some());

        query.invalidate().await;
        assert!(query.get().await.unwrap().is_none());
        assert_eq!(query.generation().await, 1);
        assert_eq!(store.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_provider_failure_is_not_memoized() {
        let store = Arc::new(MockSessionStore::new());
        let session = TestSessionBuilder::new().with_token("tok_3").build();
        store.insert(session);
        store.set_unavailable(true);

        let query = query_for(&store, "tok_3");
        assert!(matches!(
            query.get().await,
            Err(StoreError::ProviderUnavailable(_))
        ));

        // Provider recovers; the same query resolves without invalidation
        store.set_unavailable(false);
        assert!(query.get().await.unwrap().is_some());
    }
}
