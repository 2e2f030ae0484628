use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Authenticated session as issued by the external identity provider.
///
/// The provider exclusively owns and mints sessions; this crate only holds a
/// read-only, time-bounded view of one. The `token` is opaque credential
/// material and is never parsed or validated locally.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Session {
    /// Opaque session token issued by the provider
    pub token: String,
    /// Provider-side user identifier
    pub user_id: String,
    pub email: String,
    pub name: Option<String>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    // Optional client metadata recorded by the provider
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
}

impl Session {
    /// A session is valid only while the current time is before its expiry.
    ///
    /// Expired sessions must be treated identically to "no session" by every
    /// consumer; they are never an error condition.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Remaining validity window, clamped to zero for expired sessions.
    #[must_use]
    pub fn remaining(&self) -> chrono::Duration {
        (self.expires_at - Utc::now()).max(chrono::Duration::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session_expiring_in(hours: i64) -> Session {
        let now = Utc::now();
        Session {
            token: "tok_abc123".to_string(),
            user_id: "user-1".to_string(),
            email: "test@example.com".to_string(),
            name: Some("Test User".to_string()),
            issued_at: now - Duration::hours(1),
            expires_at: now + Duration::hours(hours),
            client_ip: None,
            user_agent: None,
        }
    }

    #[test]
    fn test_unexpired_session_is_valid() {
        let session = session_expiring_in(2);
        assert!(!session.is_expired());
        assert!(session.remaining() > Duration::zero());
    }

    #[test]
    fn test_expired_session_is_expired() {
        let session = session_expiring_in(-1);
        assert!(session.is_expired());
        assert_eq!(session.remaining(), Duration::zero());
    }

    #[test]
    fn test_session_roundtrips_through_json() {
        let session = session_expiring_in(1);
        let json = serde_json::to_string(&session).unwrap();
        let parsed: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.token, session.token);
        assert_eq!(parsed.email, session.email);
        assert_eq!(parsed.expires_at, session.expires_at);
    }
}
