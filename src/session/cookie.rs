//! Cookie handling for the session gate
//!
//! Two cookies are involved: the session cookie, which carries the provider's
//! opaque session token verbatim (never parsed, never re-encoded), and a
//! short-lived state cookie that pins the CSRF state and return path across
//! the provider round-trip.

use actix_web::{cookie::Cookie, HttpRequest};
use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};
use log::warn;

use crate::auth::AuthState;
use crate::models::Session;

/// Common cookie names used across the application
pub const SESSION_COOKIE: &str = "wardrs_session";
pub const STATE_COOKIE: &str = "wardrs_auth_state";

/// Lifetime of the state cookie; the provider round-trip should finish well
/// within this window.
const STATE_COOKIE_MINUTES: i64 = 10;

/// Options for cookie creation
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: actix_web::cookie::SameSite,
    pub path: String,
    pub max_age: actix_web::cookie::time::Duration,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            http_only: true,
            secure: true,
            same_site: actix_web::cookie::SameSite::Lax,
            path: "/".to_string(),
            max_age: actix_web::cookie::time::Duration::hours(24),
        }
    }
}

/// Factory for the gate's cookies with consistent security attributes.
#[derive(Clone)]
pub struct CookieFactory {
    cookie_secure: bool,
}

impl CookieFactory {
    #[must_use]
    pub fn new(cookie_secure: bool) -> Self {
        Self { cookie_secure }
    }

    fn build(&self, name: &str, value: String, options: CookieOptions) -> Cookie<'static> {
        Cookie::build(name.to_owned(), value)
            .http_only(options.http_only)
            .secure(self.cookie_secure && options.secure)
            .same_site(options.same_site)
            .path(options.path)
            .max_age(options.max_age)
            .finish()
    }

    /// Session cookie holding the provider's opaque token. The cookie
    /// lifetime tracks the session expiry so the browser drops it when the
    /// provider would reject it anyway.
    #[must_use]
    pub fn create_session_cookie(&self, session: &Session) -> Cookie<'static> {
        let max_age =
            actix_web::cookie::time::Duration::seconds(session.remaining().num_seconds());

        self.build(
            SESSION_COOKIE,
            session.token.clone(),
            CookieOptions {
                max_age,
                ..Default::default()
            },
        )
    }

    /// Short-lived cookie carrying CSRF state and the preserved return path
    /// across the provider redirect, base64-encoded JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the state fails to serialize.
    pub fn create_state_cookie(&self, state: &AuthState) -> Result<Cookie<'static>> {
        let json = serde_json::to_vec(state).context("failed to serialize auth state")?;
        let value = general_purpose::URL_SAFE_NO_PAD.encode(json);

        Ok(self.build(
            STATE_COOKIE,
            value,
            CookieOptions {
                max_age: actix_web::cookie::time::Duration::minutes(STATE_COOKIE_MINUTES),
                ..Default::default()
            },
        ))
    }

    /// Expired cookie used to clear a previously set cookie.
    #[must_use]
    pub fn create_expired_cookie(&self, name: &str) -> Cookie<'static> {
        self.build(
            name,
            String::new(),
            CookieOptions {
                max_age: actix_web::cookie::time::Duration::seconds(0),
                ..Default::default()
            },
        )
    }
}

/// Read and decode the auth state cookie from a request, if present.
/// Malformed cookies are logged and treated as absent.
#[must_use]
pub fn read_state_cookie(req: &HttpRequest) -> Option<AuthState> {
    let cookie = req.cookie(STATE_COOKIE)?;
    let bytes = match general_purpose::URL_SAFE_NO_PAD.decode(cookie.value()) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("discarding undecodable auth state cookie: {e}");
            return None;
        }
    };

    match serde_json::from_slice::<AuthState>(&bytes) {
        Ok(state) => Some(state),
        Err(e) => {
            warn!("discarding unparsable auth state cookie: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn sample_session() -> Session {
        Session {
            token: "tok_cookie_test".to_string(),
            user_id: "user-1".to_string(),
            email: "test@example.com".to_string(),
            name: None,
            issued_at: Utc::now(),
            expires_at: Utc::now() + Duration::hours(2),
            client_ip: None,
            user_agent: None,
        }
    }

    #[test]
    fn test_session_cookie_carries_opaque_token_verbatim() {
        let factory = CookieFactory::new(true);
        let cookie = factory.create_session_cookie(&sample_session());

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "tok_cookie_test");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_insecure_factory_downgrades_secure_flag() {
        let factory = CookieFactory::new(false);
        let cookie = factory.create_session_cookie(&sample_session());
        assert_eq!(cookie.secure(), Some(false));
    }

    #[test]
    fn test_expired_cookie_clears_value() {
        let factory = CookieFactory::new(true);
        let cookie = factory.create_expired_cookie(SESSION_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(
            cookie.max_age(),
            Some(actix_web::cookie::time::Duration::seconds(0))
        );
    }

    #[test]
    fn test_state_cookie_roundtrip() {
        let factory = CookieFactory::new(true);
        let state = AuthState {
            state: "csrf_token".to_string(),
            next: Some("/dashboard".to_string()),
        };
        let cookie = factory.create_state_cookie(&state).unwrap();

        let req = actix_web::test::TestRequest::get()
            .cookie(cookie)
            .to_http_request();
        let decoded = read_state_cookie(&req).unwrap();
        assert_eq!(decoded.state, "csrf_token");
        assert_eq!(decoded.next.as_deref(), Some("/dashboard"));
    }

    #[test]
    fn test_garbage_state_cookie_treated_as_absent() {
        let req = actix_web::test::TestRequest::get()
            .cookie(Cookie::new(STATE_COOKIE, "%%%not-base64%%%"))
            .to_http_request();
        assert!(read_state_cookie(&req).is_none());
    }
}
