use crate::{
    apis::auth::{AccessToken, Credentials},
    error::Error,
};
use parking_lot::RwLock;
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use std::{
    fmt::{Debug, Formatter},
    sync::Arc,
};
use tokio::sync::Mutex;

/// Manager for credentials and access tokens.
///
/// Cheap to clone: all clones share the same token cache.
#[derive(Debug, Clone)]
pub struct Authenticator {
    inner: Arc<AuthenticatorInner>,
    pub(crate) client_id: String,
}

struct AuthenticatorInner {
    client: ClientWithMiddleware,
    token_url: Url,
    credentials: Credentials,
    access_token: RwLock<Option<AccessToken>>,
    refresh_lock: Mutex<()>,
}

impl Debug for AuthenticatorInner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatorInner")
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    /// Creates a new authenticator requesting tokens from `token_url` with the given credentials.
    pub fn new(client: ClientWithMiddleware, token_url: Url, credentials: Credentials) -> Self {
        let client_id = credentials.client_id().to_string();

        Self {
            inner: Arc::new(AuthenticatorInner {
                client,
                token_url,
                credentials,
                access_token: RwLock::new(None),
                refresh_lock: Mutex::new(()),
            }),
            client_id,
        }
    }

    /// Returns the current access token used for authentication against the Blink Debit APIs.
    /// If there's no access token available, or the available one expires within the next
    /// 5 minutes, a new one is requested from the server using the configured credentials.
    ///
    /// Concurrent calls while the token needs refreshing result in one single request to the
    /// token endpoint, and all callers get the same token.
    ///
    /// If a valid token is cached, this does not perform any network call.
    pub async fn get_access_token(&self) -> Result<AccessToken, Error> {
        if let Some(token) = self.cached_access_token() {
            return Ok(token);
        }

        // Only one caller at a time gets to refresh the token
        let _guard = self.inner.refresh_lock.lock().await;

        // Someone else might have refreshed the token while we were waiting for the lock
        if let Some(token) = self.cached_access_token() {
            tracing::debug!("Access token refreshed by a concurrent request");
            return Ok(token);
        }

        let token = self
            .request_access_token()
            .await
            .map_err(|e| Error::AuthError(Box::new(e)))?;

        *self.inner.access_token.write() = Some(token.clone());

        Ok(token)
    }

    /// Returns the value of the `Authorization` header to attach to outgoing requests,
    /// in the form `Bearer <token>`.
    pub async fn get_auth_header(&self) -> Result<String, Error> {
        Ok(self.get_access_token().await?.auth_header())
    }

    /// Returns the cached token, if still valid.
    fn cached_access_token(&self) -> Option<AccessToken> {
        self.inner
            .access_token
            .read()
            .as_ref()
            .filter(|token| !token.needs_refresh(now()))
            .cloned()
    }

    #[tracing::instrument(name = "Get Access Token", level = "debug", skip(self), fields(client_id = %self.client_id))]
    async fn request_access_token(&self) -> Result<AccessToken, Error> {
        let issued_at = now();

        // Post to the token endpoint with the client credentials
        let res: RawAuthenticationResponse = self
            .inner
            .client
            .post(self.inner.token_url.clone())
            .json(&self.inner.credentials)
            .send()
            .await?
            .json()
            .await?;

        if !res.token_type.eq_ignore_ascii_case("Bearer") {
            return Err(Error::Other(anyhow::anyhow!(
                "Unsupported access token type: {}",
                res.token_type,
            )));
        }

        let token = AccessToken::new(res.access_token.into(), issued_at, res.expires_in);

        match token.expires_at() {
            Some(expires_at) => tracing::info!(%expires_at, "Got new access token"),
            None => tracing::warn!(
                "Got new access token with unknown expiration, it will be renewed on the next request"
            ),
        }

        Ok(token)
    }
}

// Select an implementation of `now()` depending on whether we are testing or not
#[cfg(not(test))]
fn now() -> chrono::DateTime<chrono::Utc> {
    chrono::Utc::now()
}
#[cfg(test)]
use tests::mocked_time::now;

/// Successful response of a token request.
#[derive(serde::Deserialize)]
struct RawAuthenticationResponse {
    access_token: String,
    token_type: String,
    expires_in: Option<i64>,
}
