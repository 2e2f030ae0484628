// Authentication handlers: login page, sign-in and sign-out
use crate::auth::{authorize_url, AuthState};
use crate::session::cookie::{SESSION_COOKIE, STATE_COOKIE};
use crate::session::SessionGate;
use crate::settings::WardrsSettings;
use crate::store::StoreError;
use crate::utils::crypto::generate_csrf_token;
use crate::utils::{sanitize_return_path, ResponseBuilder};
use actix_web::{web, HttpRequest, HttpResponse, Result};
use log::{debug, error, info};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
    pub error: Option<String>,
}

/// Login entry route: renders the sign-in trigger, forwarding the preserved
/// return path into the sign-in link.
pub async fn login_page(query: web::Query<LoginQuery>) -> Result<HttpResponse> {
    let sign_in_href = match sanitize_return_path(query.next.as_deref()) {
        Some(next) => format!("/auth/sign_in?next={}", urlencoding::encode(&next)),
        None => "/auth/sign_in".to_string(),
    };

    let notice = match query.error.as_deref() {
        Some("auth_failed") => "<p>Sign-in failed. Please try again.</p>",
        Some("state_mismatch") => "<p>Your sign-in attempt expired. Please try again.</p>",
        Some(_) => "<p>Something went wrong. Please try again.</p>",
        None => "",
    };

    let body = format!(
        "<!DOCTYPE html>\n<html><head><title>Sign in</title></head>\n\
         <body>{notice}<a href=\"{sign_in_href}\">Sign in with Microsoft</a>\n\
         <a href=\"/\">Go to homepage</a></body></html>"
    );

    Ok(HttpResponse::Ok().content_type("text/html").body(body))
}

/// Sign-in handler: begins the external provider's social-login redirect.
///
/// Clears any existing session cookie, pins the CSRF state and return path
/// in the state cookie, and redirects to the provider authorize endpoint
/// with the fixed scope set.
///
/// # Errors
/// Returns an error if the redirect URL cannot be generated
pub async fn sign_in(
    query: web::Query<LoginQuery>,
    _req: HttpRequest,
    settings: web::Data<WardrsSettings>,
    gate: web::Data<SessionGate>,
) -> Result<HttpResponse> {
    let factory = gate.cookie_factory();

    // Clear any existing session by setting an expired cookie
    let clear_session = factory.create_expired_cookie(SESSION_COOKIE);

    let csrf_state = generate_csrf_token();
    let auth_state = AuthState {
        state: csrf_state.clone(),
        next: sanitize_return_path(query.next.as_deref()),
    };

    let state_cookie = match factory.create_state_cookie(&auth_state) {
        Ok(cookie) => cookie,
        Err(e) => {
            error!("Failed to create auth state cookie: {e}");
            return Ok(ResponseBuilder::internal_server_error());
        }
    };

    match authorize_url(
        &settings.provider,
        &settings.application.redirect_base_url,
        &csrf_state,
    ) {
        Ok(url) => {
            info!("Redirecting to provider authorize endpoint");
            debug!(
                "authorize redirect carries {} scopes, return path: {:?}",
                settings.provider.scopes.len(),
                auth_state.next
            );
            Ok(ResponseBuilder::redirect_with_cookies(
                &url,
                vec![clear_session, state_cookie],
            ))
        }
        Err(e) => {
            error!("Failed to build authorize URL: {e}");
            Ok(ResponseBuilder::redirect_with_cookies(
                "/login?error=auth_config",
                vec![clear_session],
            ))
        }
    }
}

/// Sign-out handler: revokes the current token at the provider, then
/// invalidates the request's session cache, in that order, so any
/// subsequent read observes "no session". Finishes by clearing the session
/// cookie and redirecting to the login page.
///
/// # Errors
/// Returns an error if response construction fails
pub async fn sign_out(req: HttpRequest, gate: web::Data<SessionGate>) -> Result<HttpResponse> {
    let query = gate.session_query(&req);

    match gate.sign_out(&query).await {
        Ok(()) => {
            info!("User signed out; session revoked and cache invalidated");
            let factory = gate.cookie_factory();
            Ok(ResponseBuilder::redirect_with_cookies(
                "/login",
                vec![
                    factory.create_expired_cookie(SESSION_COOKIE),
                    factory.create_expired_cookie(STATE_COOKIE),
                ],
            ))
        }
        Err(StoreError::ProviderUnavailable(e)) => {
            // Revocation did not happen; do not pretend the sign-out
            // completed by clearing the cookie
            error!("Sign-out failed, identity provider unavailable: {e}");
            Ok(ResponseBuilder::provider_unavailable())
        }
        Err(e) => {
            error!("Sign-out failed: {e}");
            Ok(ResponseBuilder::internal_server_error())
        }
    }
}
