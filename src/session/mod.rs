//! Session resolution: request-scoped caching, cookies and the gate itself.

pub mod cache;
pub mod cookie;
pub mod gate;

pub use cache::SessionQuery;
pub use cookie::{CookieFactory, SESSION_COOKIE, STATE_COOKIE};
pub use gate::SessionGate;
