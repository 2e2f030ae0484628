#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the wardrs application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod auth;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod session;
pub mod settings;
pub mod store;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use guard::{GuardResolution, GuardState, RouteGuard};
pub use handlers::{auth_callback, health, login_page, protected, sign_in, sign_out};
pub use models::Session;
pub use session::{SessionGate, SessionQuery};
pub use settings::WardrsSettings;
pub use store::{HttpSessionStore, SessionStore, StoreError};
