//! Unified testing utilities for wardrs
//!
//! Consolidates test fixtures, builders and the mock session store used by
//! both the in-crate unit tests and the integration tests (behind the
//! `testing` feature).
//!
//! - [`fixtures`] - Pre-built test data (sessions, stores, gates, settings)
//! - [`builders`] - Fluent builders for creating test objects
//! - [`mock`] - Mock session store standing in for the identity provider

pub mod builders;
pub mod fixtures;
pub mod mock;

// Re-export commonly used items for convenience
pub use builders::TestSessionBuilder;
pub use fixtures::TestFixtures;
pub use mock::MockSessionStore;

/// Common test constants
pub mod constants {
    /// Default test email address
    pub const TEST_EMAIL: &str = "test@example.com";

    /// Default test user name
    pub const TEST_USER_NAME: &str = "Test User";

    /// Default test client IP
    pub const TEST_CLIENT_IP: &str = "192.168.1.1";
}
