//! Fluent builders for creating test objects

use crate::models::Session;
use chrono::{Duration, Utc};
use uuid::Uuid;

/// Builder for test sessions with sensible defaults.
pub struct TestSessionBuilder {
    token: String,
    user_id: String,
    email: String,
    name: Option<String>,
    expires_in_hours: i64,
    client_ip: Option<String>,
    user_agent: Option<String>,
}

impl Default for TestSessionBuilder {
    fn default() -> Self {
        Self {
            token: format!("tok_{}", Uuid::new_v4().simple()),
            user_id: format!("user_{}", Uuid::new_v4().simple()),
            email: super::constants::TEST_EMAIL.to_string(),
            name: Some(super::constants::TEST_USER_NAME.to_string()),
            expires_in_hours: 1,
            client_ip: None,
            user_agent: None,
        }
    }
}

impl TestSessionBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = token.to_string();
        self
    }

    #[must_use]
    pub fn with_user_id(mut self, user_id: &str) -> Self {
        self.user_id = user_id.to_string();
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: &str) -> Self {
        self.email = email.to_string();
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: Option<&str>) -> Self {
        self.name = name.map(ToString::to_string);
        self
    }

    /// Negative values produce an already-expired session.
    #[must_use]
    pub fn expires_in_hours(mut self, hours: i64) -> Self {
        self.expires_in_hours = hours;
        self
    }

    #[must_use]
    pub fn with_client_ip(mut self, ip: &str) -> Self {
        self.client_ip = Some(ip.to_string());
        self
    }

    #[must_use]
    pub fn build(self) -> Session {
        let now = Utc::now();
        Session {
            token: self.token,
            user_id: self.user_id,
            email: self.email,
            name: self.name,
            issued_at: now - Duration::minutes(5),
            expires_at: now + Duration::hours(self.expires_in_hours),
            client_ip: self.client_ip,
            user_agent: self.user_agent,
        }
    }
}
