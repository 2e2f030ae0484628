//! Pre-built test data: sessions, stores, gates and settings

use crate::models::Session;
use crate::session::SessionGate;
use crate::settings::WardrsSettings;
use crate::store::SessionStore;
use crate::testing::builders::TestSessionBuilder;
use crate::testing::mock::MockSessionStore;
use std::sync::Arc;

pub struct TestFixtures;

impl TestFixtures {
    /// A valid session expiring one hour from now.
    #[must_use]
    pub fn session() -> Session {
        TestSessionBuilder::new().build()
    }

    /// A session whose expiry is already in the past.
    #[must_use]
    pub fn expired_session() -> Session {
        TestSessionBuilder::new().expires_in_hours(-1).build()
    }

    /// An empty mock store.
    #[must_use]
    pub fn store() -> Arc<MockSessionStore> {
        Arc::new(MockSessionStore::new())
    }

    /// A gate over the given mock store, with insecure cookies so test
    /// requests over plain HTTP round-trip them.
    #[must_use]
    pub fn gate(store: &Arc<MockSessionStore>) -> SessionGate {
        SessionGate::new(Arc::clone(store) as Arc<dyn SessionStore>, false)
    }

    /// Settings that pass validation, pointed at placeholder endpoints.
    #[must_use]
    pub fn settings() -> WardrsSettings {
        let mut settings = WardrsSettings::default();
        settings.provider.tenant_id = "test-tenant".to_string();
        settings.provider.client_id = "test-client".to_string();
        settings.provider.client_secret = "test-secret".to_string();
        settings.provider.session_api_url = "http://127.0.0.1:9/api/auth/".to_string();
        settings.application.redirect_base_url = "http://localhost:8080".to_string();
        settings.cookies.secure = false;
        settings
    }
}
