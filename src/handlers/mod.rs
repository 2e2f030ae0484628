//! HTTP handlers for the session gate's routes.

pub mod auth;
pub mod callback;
pub mod guarded;

pub use auth::{login_page, sign_in, sign_out};
pub use callback::auth_callback;
pub use guarded::{health, protected};
