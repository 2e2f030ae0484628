// OAuth callback handler: provider redirect target
use crate::auth::AuthCallback;
use crate::session::cookie::{read_state_cookie, STATE_COOKIE};
use crate::session::SessionGate;
use crate::store::StoreError;
use crate::utils::{sanitize_return_path, ResponseBuilder};
use actix_web::{web, HttpRequest, HttpResponse, Result};
use log::{debug, error, info, warn};

/// OAuth callback handler.
///
/// Validates the CSRF state against the state cookie, forwards the
/// authorization code to the provider's exchange endpoint, and on success
/// sets the session cookie and redirects to the preserved return path. The
/// provider mints the session; by the time the redirect lands, the session
/// is fetchable through the store on the very next request.
///
/// # Errors
///
/// Returns an error if response construction fails
pub async fn auth_callback(
    query: web::Query<AuthCallback>,
    form: Option<web::Form<AuthCallback>>,
    req: HttpRequest,
    gate: web::Data<SessionGate>,
) -> Result<HttpResponse> {
    // Some providers deliver the callback as a form POST
    let callback = form.map_or_else(|| query.into_inner(), web::Form::into_inner);
    debug!("auth callback received via {}", req.method());

    let factory = gate.cookie_factory();
    let clear_state = factory.create_expired_cookie(STATE_COOKIE);

    if let Some(provider_error) = &callback.error {
        warn!("provider reported sign-in failure: {provider_error}");
        return Ok(ResponseBuilder::redirect_with_cookies(
            "/login?error=auth_failed",
            vec![clear_state],
        ));
    }

    let (Some(code), Some(received_state)) = (&callback.code, &callback.state) else {
        warn!("callback missing code or state parameter");
        return Ok(ResponseBuilder::redirect_with_cookies(
            "/login?error=auth_failed",
            vec![clear_state],
        ));
    };

    // The state cookie pins the CSRF token and return path from sign-in
    let Some(auth_state) = read_state_cookie(&req) else {
        warn!("callback without a usable state cookie");
        return Ok(ResponseBuilder::redirect_with_cookies(
            "/login?error=state_mismatch",
            vec![clear_state],
        ));
    };

    if auth_state.state != *received_state {
        warn!("callback state does not match stored CSRF token");
        return Ok(ResponseBuilder::redirect_with_cookies(
            "/login?error=state_mismatch",
            vec![clear_state],
        ));
    }

    match gate.store().complete_exchange(code).await {
        Ok(session) => {
            info!("sign-in completed for user {}", session.user_id);
            let destination = sanitize_return_path(auth_state.next.as_deref())
                .unwrap_or_else(|| "/".to_string());
            let session_cookie = factory.create_session_cookie(&session);
            Ok(ResponseBuilder::redirect_with_cookies(
                &destination,
                vec![session_cookie, clear_state],
            ))
        }
        Err(StoreError::ProviderUnavailable(e)) => {
            error!("code exchange failed, identity provider unavailable: {e}");
            Ok(ResponseBuilder::provider_unavailable())
        }
        Err(e) => {
            error!("provider rejected authorization code: {e}");
            Ok(ResponseBuilder::redirect_with_cookies(
                "/login?error=auth_failed",
                vec![clear_state],
            ))
        }
    }
}
