//! HTTP response handling
//!
//! Unified helpers for the gate's small response surface: login redirects,
//! JSON error bodies and cookie-carrying redirects. Common error bodies are
//! pre-serialized once at startup and reused.

use actix_web::{cookie::Cookie, http::header, HttpResponse};
use serde_json::json;

/// Global instance of pre-serialized common responses
static CACHED_RESPONSES: std::sync::LazyLock<CachedResponses> =
    std::sync::LazyLock::new(CachedResponses::new);

struct CachedResponses {
    unauthorized: String,
    provider_unavailable: String,
    invalid_request: String,
    server_error: String,
}

impl CachedResponses {
    fn new() -> Self {
        Self {
            unauthorized: Self::create_json(
                "unauthorized",
                "Authentication is required to access this resource",
            ),
            provider_unavailable: Self::create_json(
                "provider_unavailable",
                "The identity provider is currently unreachable. Please retry.",
            ),
            invalid_request: Self::create_json(
                "invalid_request",
                "The request is malformed or invalid",
            ),
            server_error: Self::create_json("server_error", "An internal server error occurred"),
        }
    }

    fn create_json(error: &str, description: &str) -> String {
        let body = json!({
            "error": error,
            "error_description": description
        });
        serde_json::to_string(&body).expect("Failed to serialize JSON")
    }
}

/// Unified response builder for the gate's HTTP surface.
pub struct ResponseBuilder;

impl ResponseBuilder {
    /// `401 Unauthorized` JSON response for non-browser callers.
    #[must_use]
    pub fn unauthorized() -> HttpResponse {
        HttpResponse::Unauthorized()
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .body(CACHED_RESPONSES.unauthorized.clone())
    }

    /// `503 Service Unavailable` for identity provider outages. Used instead
    /// of a login redirect so an outage is never presented as a logout.
    #[must_use]
    pub fn provider_unavailable() -> HttpResponse {
        HttpResponse::ServiceUnavailable()
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .insert_header((header::RETRY_AFTER, "5"))
            .body(CACHED_RESPONSES.provider_unavailable.clone())
    }

    /// `400 Bad Request` JSON response.
    #[must_use]
    pub fn invalid_request() -> HttpResponse {
        HttpResponse::BadRequest()
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .body(CACHED_RESPONSES.invalid_request.clone())
    }

    /// `500 Internal Server Error` JSON response.
    #[must_use]
    pub fn internal_server_error() -> HttpResponse {
        HttpResponse::InternalServerError()
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .body(CACHED_RESPONSES.server_error.clone())
    }

    /// `302 Found` redirect.
    #[must_use]
    pub fn redirect(location: &str) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((header::LOCATION, location.to_string()))
            .finish()
    }

    /// `302 Found` redirect carrying one or more cookies.
    #[must_use]
    pub fn redirect_with_cookies(location: &str, cookies: Vec<Cookie<'static>>) -> HttpResponse {
        let mut builder = HttpResponse::Found();
        for cookie in cookies {
            builder.cookie(cookie);
        }
        builder
            .insert_header((header::LOCATION, location.to_string()))
            .finish()
    }
}
