//! Route guard - per-navigation access decision for protected paths
//!
//! The guard is a two-state machine: it starts `Unresolved` while the session
//! lookup is pending and becomes `Resolved` once the value is known. Nothing
//! is rendered or redirected before resolution; a premature redirect on a
//! slow-but-successful lookup would bounce an authenticated user to login.
//!
//! The decision is an explicit resolution value, never a thrown error:
//! unauthenticated callers resolve to `RedirectToLogin` with the originally
//! requested path preserved, while provider outages surface as a distinct
//! [`GuardError`] so an outage is never mistaken for a logout.

use thiserror::Error;

use crate::models::Session;
use crate::session::SessionQuery;
use crate::store::StoreError;

/// Login entry route that unauthenticated callers are sent to.
pub const LOGIN_PATH: &str = "/login";

/// Query parameter carrying the preserved return path.
pub const RETURN_PARAM: &str = "next";

/// Outcome of guarding one navigation.
#[derive(Debug, Clone)]
pub enum GuardResolution {
    /// Caller holds a valid, unexpired session; render protected content.
    Allow(Session),
    /// No usable session; send the caller to the login entry point with the
    /// original path preserved.
    RedirectToLogin { next: String },
}

impl GuardResolution {
    /// Redirect target for this resolution, if it is a redirect.
    #[must_use]
    pub fn redirect_target(&self) -> Option<String> {
        match self {
            GuardResolution::Allow(_) => None,
            GuardResolution::RedirectToLogin { next } => Some(login_redirect_target(next)),
        }
    }
}

/// Guard lifecycle for one navigation.
#[derive(Debug)]
pub enum GuardState {
    /// Session lookup pending; protected content must not be rendered and no
    /// redirect may be issued yet.
    Unresolved,
    /// Lookup complete, decision known.
    Resolved(GuardResolution),
}

/// Failures distinct from "unauthenticated".
#[derive(Debug, Error)]
pub enum GuardError {
    /// The identity provider could not answer. Must surface as an error
    /// state with content withheld, never as a silent login redirect.
    #[error(transparent)]
    Provider(#[from] StoreError),
}

/// Per-navigation decision context. Constructed fresh for every navigation
/// and discarded after the decision is applied; never persisted.
#[derive(Debug)]
pub struct RouteGuard {
    path: String,
    state: GuardState,
}

impl RouteGuard {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            state: GuardState::Unresolved,
        }
    }

    #[must_use]
    pub fn state(&self) -> &GuardState {
        &self.state
    }

    /// Resolve the guard against the request's session query.
    ///
    /// Re-evaluating is allowed and re-consults the query: a session that
    /// disappeared since the last evaluation (sign-out in another tab)
    /// transitions the guard to a redirect instead of continuing to show
    /// stale protected content.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Provider`] when the session lookup itself
    /// failed; the guard stays `Unresolved` in that case.
    pub async fn resolve(&mut self, query: &SessionQuery) -> Result<&GuardResolution, GuardError> {
        let resolution = match query.get().await? {
            // The cache already normalizes expired sessions to None, but a
            // session can cross its expiry between memoization and re-check
            Some(session) if !session.is_expired() => GuardResolution::Allow(session),
            _ => GuardResolution::RedirectToLogin {
                next: self.path.clone(),
            },
        };

        self.state = GuardState::Resolved(resolution);
        match &self.state {
            GuardState::Resolved(resolution) => Ok(resolution),
            GuardState::Unresolved => unreachable!("state was just resolved"),
        }
    }
}

/// Login URL with the original path preserved as the return parameter, e.g.
/// `/login?next=%2Fdashboard`.
#[must_use]
pub fn login_redirect_target(next: &str) -> String {
    format!("{LOGIN_PATH}?{RETURN_PARAM}={}", urlencoding::encode(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Credential, SessionStore};
    use crate::testing::mock::MockSessionStore;
    use crate::testing::TestSessionBuilder;
    use std::sync::Arc;

    fn query_with(store: &Arc<MockSessionStore>, token: Option<&str>) -> SessionQuery {
        SessionQuery::new(
            Arc::clone(store) as Arc<dyn SessionStore>,
            token.map(|t| Credential::SessionCookie(t.to_string())),
        )
    }

    #[tokio::test]
    async fn test_valid_session_resolves_to_allow() {
        let store = Arc::new(MockSessionStore::new());
        store.insert(TestSessionBuilder::new().with_token("tok_ok").build());

        let query = query_with(&store, Some("tok_ok"));
        let mut guard = RouteGuard::new("/dashboard");
        assert!(matches!(guard.state(), GuardState::Unresolved));

        let resolution = guard.resolve(&query).await.unwrap();
        assert!(matches!(resolution, GuardResolution::Allow(_)));
    }

    #[tokio::test]
    async fn test_no_session_redirects_with_return_path() {
        let store = Arc::new(MockSessionStore::new());
        let query = query_with(&store, None);

        let mut guard = RouteGuard::new("/dashboard");
        let resolution = guard.resolve(&query).await.unwrap();

        match resolution {
            GuardResolution::RedirectToLogin { next } => assert_eq!(next, "/dashboard"),
            GuardResolution::Allow(_) => panic!("expected redirect"),
        }
        assert_eq!(
            resolution.redirect_target().as_deref(),
            Some("/login?next=%2Fdashboard")
        );
    }

    #[tokio::test]
    async fn test_expired_session_treated_as_absent_not_error() {
        let store = Arc::new(MockSessionStore::new());
        store.insert(
            TestSessionBuilder::new()
                .with_token("tok_old")
                .expires_in_hours(-2)
                .build(),
        );

        let query = query_with(&store, Some("tok_old"));
        let mut guard = RouteGuard::new("/portal/reports");
        let resolution = guard.resolve(&query).await.unwrap();
        assert!(matches!(
            resolution,
            GuardResolution::RedirectToLogin { .. }
        ));
    }

    #[tokio::test]
    async fn test_provider_outage_is_not_a_redirect() {
        let store = Arc::new(MockSessionStore::new());
        store.set_unavailable(true);

        let query = query_with(&store, Some("tok_any"));
        let mut guard = RouteGuard::new("/dashboard");

        let err = guard.resolve(&query).await.unwrap_err();
        assert!(matches!(
            err,
            GuardError::Provider(StoreError::ProviderUnavailable(_))
        ));
        // Guard must not pretend the lookup resolved
        assert!(matches!(guard.state(), GuardState::Unresolved));
    }

    #[tokio::test]
    async fn test_reevaluation_after_concurrent_sign_out() {
        let store = Arc::new(MockSessionStore::new());
        store.insert(TestSessionBuilder::new().with_token("tok_gone").build());

        let query = query_with(&store, Some("tok_gone"));
        let mut guard = RouteGuard::new("/dashboard");
        assert!(matches!(
            guard.resolve(&query).await.unwrap(),
            GuardResolution::Allow(_)
        ));

        // Session revoked elsewhere (another tab); cache invalidated
        store.remove("tok_gone");
        query.invalidate().await;

        assert!(matches!(
            guard.resolve(&query).await.unwrap(),
            GuardResolution::RedirectToLogin { .. }
        ));
    }

    #[test]
    fn test_return_path_encoding() {
        assert_eq!(
            login_redirect_target("/portal/a b?x=1"),
            "/login?next=%2Fportal%2Fa%20b%3Fx%3D1"
        );
    }
}
