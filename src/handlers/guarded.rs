// Protected route collection: every path outside /auth, /login and /ping
use crate::guard::{GuardError, GuardResolution, RouteGuard};
use crate::models::HealthResponse;
use crate::session::SessionGate;
use crate::utils::{is_browser_request, ResponseBuilder};
use actix_web::{web, HttpRequest, HttpResponse, Result};
use log::{debug, error};

/// Health check endpoint
pub async fn health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        message: "wardrs is running".to_string(),
    }))
}

/// Guarded handler for the protected route collection.
///
/// Builds a fresh request-scoped session query and a fresh guard for this
/// navigation, then applies the resolution:
/// - `Allow` renders protected content with identity echoed in
///   `X-Auth-Request-*` headers
/// - `RedirectToLogin` becomes a `302` to `/login?next=<original path>` for
///   browsers, a JSON `401` for API callers
/// - a provider outage becomes a `503` with content withheld; it is never
///   presented as a logout
///
/// # Errors
///
/// Returns an error if response construction fails
pub async fn protected(req: HttpRequest, gate: web::Data<SessionGate>) -> Result<HttpResponse> {
    let requested = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.path().to_string(), |pq| pq.as_str().to_string());

    let query = gate.session_query(&req);
    let mut guard = RouteGuard::new(requested.clone());

    match guard.resolve(&query).await {
        Ok(GuardResolution::Allow(session)) => {
            debug!("guard allowed {} for {}", requested, session.user_id);
            let name = session.name.as_deref().unwrap_or(&session.email);
            let body = format!(
                "<!DOCTYPE html>\n<html><head><title>wardrs</title></head>\n\
                 <body><h1>Signed in as {name}</h1>\n\
                 <form method=\"post\" action=\"/auth/sign_out\">\
                 <button type=\"submit\">Sign out</button></form></body></html>"
            );
            Ok(HttpResponse::Ok()
                .insert_header(("X-Auth-Request-User", session.user_id.clone()))
                .insert_header(("X-Auth-Request-Email", session.email.clone()))
                .content_type("text/html")
                .body(body))
        }
        Ok(resolution @ GuardResolution::RedirectToLogin { .. }) => {
            if is_browser_request(&req) || !wants_json(&req) {
                let target = resolution
                    .redirect_target()
                    .unwrap_or_else(|| crate::guard::LOGIN_PATH.to_string());
                debug!("guard redirected {requested} to {target}");
                Ok(ResponseBuilder::redirect(&target))
            } else {
                Ok(ResponseBuilder::unauthorized())
            }
        }
        Err(GuardError::Provider(e)) => {
            error!("session resolution failed for {requested}: {e}");
            Ok(ResponseBuilder::provider_unavailable())
        }
    }
}

fn wants_json(req: &HttpRequest) -> bool {
    req.headers()
        .get(actix_web::http::header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}
