//! Clients for the various Blink Debit APIs.

use crate::{
    authenticator::Authenticator, client::Environment, common::IDEMPOTENCY_KEY_HEADER,
    pollable::PollOptions, Error,
};
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fmt::{Debug, Formatter},
    time::Duration,
};
use uuid::Uuid;

pub mod auth;
pub mod consents;
pub mod meta;
pub mod payments;
pub mod quick_payments;
pub mod refunds;

pub(crate) struct BlinkDebitClientInner {
    /// Client used by every API call, retrying transient failures if configured to.
    pub(crate) client: ClientWithMiddleware,
    /// Same as `client`, without the retry layer.
    pub(crate) single_attempt_client: ClientWithMiddleware,
    pub(crate) authenticator: Authenticator,
    pub(crate) environment: Environment,
    pub(crate) payments_url: Url,
    pub(crate) poll_interval: Duration,
}

impl BlinkDebitClientInner {
    /// Resolves a path relative to `{debit_url}/payments/v1/`.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.payments_url
            .join(path)
            .map_err(|e| Error::Other(anyhow::anyhow!("Invalid endpoint {}: {}", path, e)))
    }

    pub(crate) fn poll_options(&self, max_wait_seconds: u32) -> PollOptions {
        PollOptions::new(max_wait_seconds).with_interval(self.poll_interval)
    }

    /// `POST`s a new resource, with a fresh idempotency key so that the request can be retried.
    pub(crate) async fn create<Req, Res>(&self, path: &str, body: &Req) -> Result<Res, Error>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let idempotency_key = Uuid::new_v4();

        let res = self
            .client
            .post(self.endpoint(path)?)
            .header(IDEMPOTENCY_KEY_HEADER, idempotency_key.to_string())
            .json(body)
            .send()
            .await?
            .json()
            .await?;

        Ok(res)
    }

    /// `GET`s an existing resource.
    ///
    /// A `404` response is reported as [`Error::NotFound`](crate::Error::NotFound).
    pub(crate) async fn get<Res: DeserializeOwned>(&self, path: &str) -> Result<Res, Error> {
        let res = self
            .client
            .get(self.endpoint(path)?)
            .send()
            .await
            .map_err(Error::from);

        match res {
            Ok(body) => Ok(body.json().await?),
            Err(Error::ApiError(api_error)) if api_error.status == 404 => {
                Err(Error::NotFound(api_error))
            }
            Err(e) => Err(e),
        }
    }

    /// `DELETE`s an existing resource.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        Self::delete_with(&self.client, self.endpoint(path)?).await
    }

    /// `DELETE`s an existing resource without retrying failures.
    pub(crate) async fn delete_once(&self, path: &str) -> Result<(), Error> {
        Self::delete_with(&self.single_attempt_client, self.endpoint(path)?).await
    }

    async fn delete_with(client: &ClientWithMiddleware, url: Url) -> Result<(), Error> {
        client.delete(url).send().await?;
        Ok(())
    }
}

impl Debug for BlinkDebitClientInner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlinkDebitClientInner")
            .field("environment", &self.environment)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}
