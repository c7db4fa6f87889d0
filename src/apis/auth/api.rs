use crate::{
    apis::{auth::AccessToken, BlinkDebitClientInner},
    Error,
};
use std::sync::Arc;

/// Blink Debit authentication API client.
#[derive(Debug, Clone)]
pub struct AuthApi {
    inner: Arc<BlinkDebitClientInner>,
}

impl AuthApi {
    pub(crate) fn new(inner: Arc<BlinkDebitClientInner>) -> Self {
        Self { inner }
    }

    /// Returns the current [`AccessToken`](crate::apis::auth::AccessToken) used to authenticate to the Blink Debit APIs.
    /// If there is no token yet, or if it is about to expire, a new one
    /// is requested using the configured credentials.
    pub async fn get_access_token(&self) -> Result<AccessToken, Error> {
        // Just delegate to the authenticator
        self.inner.authenticator.get_access_token().await
    }

    /// Returns the value of the `Authorization` header for the current access token,
    /// in the form `Bearer <token>`.
    pub async fn get_auth_header(&self) -> Result<String, Error> {
        self.inner.authenticator.get_auth_header().await
    }
}
