//! Sign-in initiation
//!
//! Builds the external provider's social-login redirect. The provider does
//! the actual credential exchange and session minting; this module only
//! produces the authorize URL and the CSRF state that survives the
//! round-trip. Sign-out lives on [`crate::session::SessionGate`] because it
//! needs the request's session query.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::settings::ProviderSettings;

/// Scope set requested on every sign-in: identity claims plus basic profile
/// read. `User.Read` is the Microsoft Graph profile scope.
pub const DEFAULT_SCOPES: [&str; 4] = ["openid", "profile", "email", "User.Read"];

/// Path on this service that the provider redirects back to.
pub const CALLBACK_PATH: &str = "/auth/callback";

/// CSRF state and preserved return path pinned in the state cookie across
/// the provider round-trip.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthState {
    pub state: String,
    pub next: Option<String>,
}

/// Query/form payload the provider sends to the callback route.
#[derive(Deserialize, Debug)]
pub struct AuthCallback {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Build the provider authorize URL for a sign-in redirect, e.g.
/// `https://login.microsoftonline.com/{tenant}/oauth2/v2.0/authorize?...`.
///
/// # Errors
///
/// Returns an error if the configured authority or redirect base URL cannot
/// be parsed.
pub fn authorize_url(
    provider: &ProviderSettings,
    redirect_base_url: &str,
    state: &str,
) -> Result<String> {
    let authority = Url::parse(&provider.authority)
        .with_context(|| format!("invalid provider authority: {}", provider.authority))?;

    let mut url = authority
        .join(&format!("{}/oauth2/v2.0/authorize", provider.tenant_id))
        .context("failed to build authorize endpoint")?;

    let redirect_uri = format!("{}{CALLBACK_PATH}", redirect_base_url.trim_end_matches('/'));
    let scope = provider.scopes.join(" ");

    url.query_pairs_mut()
        .append_pair("client_id", &provider.client_id)
        .append_pair("response_type", "code")
        .append_pair("response_mode", "query")
        .append_pair("redirect_uri", &redirect_uri)
        .append_pair("scope", &scope)
        .append_pair("state", state)
        // Forces account selection
        .append_pair("prompt", "select_account");

    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> ProviderSettings {
        ProviderSettings {
            authority: "https://login.microsoftonline.com".to_string(),
            tenant_id: "tenant-123".to_string(),
            client_id: "client-abc".to_string(),
            client_secret: "secret".to_string(),
            session_api_url: "https://id.example.com/api/auth/".to_string(),
            scopes: DEFAULT_SCOPES.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_authorize_url_targets_tenant_endpoint() {
        let url = authorize_url(&provider(), "https://gate.example.com", "csrf123").unwrap();
        assert!(url.starts_with(
            "https://login.microsoftonline.com/tenant-123/oauth2/v2.0/authorize?"
        ));
    }

    #[test]
    fn test_authorize_url_carries_fixed_scope_set() {
        let url = authorize_url(&provider(), "https://gate.example.com", "csrf123").unwrap();
        assert!(url.contains("scope=openid+profile+email+User.Read"));
        assert!(url.contains("state=csrf123"));
        assert!(url.contains("prompt=select_account"));
    }

    #[test]
    fn test_authorize_url_redirects_back_to_callback() {
        let url = authorize_url(&provider(), "https://gate.example.com/", "s").unwrap();
        assert!(url.contains("redirect_uri=https%3A%2F%2Fgate.example.com%2Fauth%2Fcallback"));
    }

    #[test]
    fn test_invalid_authority_is_rejected() {
        let mut bad = provider();
        bad.authority = "not a url".to_string();
        assert!(authorize_url(&bad, "https://gate.example.com", "s").is_err());
    }
}
