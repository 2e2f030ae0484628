//! HTTP implementation of the session store adapter
//!
//! Talks to the identity provider's session API:
//! - `GET  {base}/session`  with the credential as a bearer header
//! - `POST {base}/revoke`   with the token in a JSON body
//! - `POST {base}/exchange` with the OAuth callback code in a JSON body
//!
//! Transport failures and provider 5xx responses translate to
//! [`StoreError::ProviderUnavailable`]; 401/404 answers are the normal
//! "no session" outcome.

use crate::models::Session;
use crate::store::{Credential, SessionStore, StoreError};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde_json::json;
use url::Url;

/// Session store adapter backed by the provider's HTTP session API.
#[derive(Clone)]
pub struct HttpSessionStore {
    client: Client,
    base_url: Url,
}

impl HttpSessionStore {
    /// Create a store rooted at the provider's session API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid absolute URL.
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StoreError::Protocol(format!("invalid session API base URL: {e}")))?;

        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        self.base_url
            .join(path)
            .map_err(|e| StoreError::Protocol(format!("invalid session API path {path}: {e}")))
    }

    fn transport_error(context: &str, err: &reqwest::Error) -> StoreError {
        StoreError::ProviderUnavailable(format!("{context}: {err}"))
    }
}

#[async_trait]
impl SessionStore for HttpSessionStore {
    async fn fetch_session(&self, credential: &Credential) -> Result<Option<Session>, StoreError> {
        let url = self.endpoint("session")?;
        let response = self
            .client
            .get(url)
            .bearer_auth(credential.secret())
            .send()
            .await
            .map_err(|e| Self::transport_error("session lookup failed", &e))?;

        match response.status() {
            StatusCode::OK => {
                let session: Session = response.json().await.map_err(|e| {
                    StoreError::Protocol(format!("malformed session document: {e}"))
                })?;
                debug!("provider resolved session for user {}", session.user_id);
                Ok(Some(session))
            }
            // Absent, expired or unknown credentials are a normal null result
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => Ok(None),
            status if status.is_server_error() => Err(StoreError::ProviderUnavailable(format!(
                "session endpoint answered {status}"
            ))),
            status => Err(StoreError::Protocol(format!(
                "unexpected session endpoint status {status}"
            ))),
        }
    }

    async fn revoke(&self, token: &str) -> Result<(), StoreError> {
        let url = self.endpoint("revoke")?;
        let response = self
            .client
            .post(url)
            .json(&json!({ "token": token }))
            .send()
            .await
            .map_err(|e| Self::transport_error("session revocation failed", &e))?;

        match response.status() {
            // Unknown or already-revoked tokens keep revocation idempotent
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND | StatusCode::CONFLICT => {
                debug!("revoke was a no-op: token already gone");
                Ok(())
            }
            status if status.is_server_error() => Err(StoreError::ProviderUnavailable(format!(
                "revoke endpoint answered {status}"
            ))),
            status => Err(StoreError::Protocol(format!(
                "unexpected revoke endpoint status {status}"
            ))),
        }
    }

    async fn complete_exchange(&self, code: &str) -> Result<Session, StoreError> {
        let url = self.endpoint("exchange")?;
        let response = self
            .client
            .post(url)
            .json(&json!({ "code": code }))
            .send()
            .await
            .map_err(|e| Self::transport_error("code exchange failed", &e))?;

        match response.status() {
            status if status.is_success() => response
                .json()
                .await
                .map_err(|e| StoreError::Protocol(format!("malformed exchange response: {e}"))),
            status if status.is_server_error() => Err(StoreError::ProviderUnavailable(format!(
                "exchange endpoint answered {status}"
            ))),
            status => Err(StoreError::Protocol(format!(
                "provider rejected authorization code with status {status}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_base_url() {
        let result = HttpSessionStore::new("not a url");
        assert!(matches!(result, Err(StoreError::Protocol(_))));
    }

    #[test]
    fn test_endpoint_joins_against_base() {
        let store = HttpSessionStore::new("https://id.example.com/api/auth/").unwrap();
        let url = store.endpoint("session").unwrap();
        assert_eq!(url.as_str(), "https://id.example.com/api/auth/session");
    }
}
