//! Module containing the main Blink Debit API client.

use crate::{
    apis::{
        auth::{AuthApi, Credentials, Token},
        consents::{EnduringConsentsApi, SingleConsentsApi},
        meta::MetaApi,
        payments::PaymentsApi,
        quick_payments::QuickPaymentsApi,
        refunds::RefundsApi,
        BlinkDebitClientInner,
    },
    authenticator::Authenticator,
    common::{
        DEFAULT_PRODUCTION_DEBIT_URL, DEFAULT_SANDBOX_DEBIT_URL, PAYMENTS_API_PATH, TOKEN_PATH,
    },
    middlewares::{
        authentication::AuthenticationMiddleware,
        error_handling::ErrorHandlingMiddleware,
        inject_headers::InjectHeadersMiddleware,
        retry_idempotent::{DynRetryPolicy, RetryIdempotentMiddleware},
    },
    pollable::DEFAULT_POLL_INTERVAL,
    Error,
};
use reqwest::{header::HeaderValue, Url};
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::{policies::ExponentialBackoff, RetryPolicy};
use reqwest_tracing::TracingMiddleware;
use serde::Deserialize;
use std::{sync::Arc, time::Duration};

/// Blink Debit environment to connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// `https://debit.blinkpay.co.nz`
    Production,
    /// `https://sandbox.debit.blinkpay.co.nz`
    Sandbox,
    /// Any other deployment, e.g. a local mock.
    Custom { debit_url: Url },
}

impl Environment {
    /// Uses a single base URL for both the token endpoint and the payments APIs.
    pub fn from_single_url(debit_url: Url) -> Self {
        Environment::Custom { debit_url }
    }

    /// Base URL of this environment.
    pub fn debit_url(&self) -> Result<Url, Error> {
        let url = match self {
            Environment::Production => parse_url(DEFAULT_PRODUCTION_DEBIT_URL)?,
            Environment::Sandbox => parse_url(DEFAULT_SANDBOX_DEBIT_URL)?,
            Environment::Custom { debit_url } => debit_url.clone(),
        };

        if url.cannot_be_a_base() {
            return Err(Error::Other(anyhow::anyhow!(
                "Invalid Blink Debit URL: {}",
                url
            )));
        }

        Ok(with_trailing_slash(url))
    }

    /// OAuth2 token endpoint of this environment.
    pub fn token_url(&self) -> Result<Url, Error> {
        join_url(&self.debit_url()?, TOKEN_PATH)
    }

    /// Base URL of the payments APIs of this environment.
    pub fn payments_url(&self) -> Result<Url, Error> {
        join_url(&self.debit_url()?, PAYMENTS_API_PATH)
    }
}

fn parse_url(url: &str) -> Result<Url, Error> {
    Url::parse(url).map_err(|e| Error::Other(anyhow::anyhow!("Invalid URL {}: {}", url, e)))
}

fn join_url(base: &Url, path: &str) -> Result<Url, Error> {
    base.join(path)
        .map_err(|e| Error::Other(anyhow::anyhow!("Invalid URL {}{}: {}", base, path, e)))
}

/// Paths are resolved relative to the debit URL, so a custom URL like
/// `http://localhost:8080/blink` must keep its last segment.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Settings to build a [`BlinkDebitClient`](crate::BlinkDebitClient) from, typically loaded
/// from a file or from environment variables.
///
/// ```rust
/// # use blink_debit_rust::BlinkDebitConfig;
/// let config: BlinkDebitConfig = serde_json::from_value(serde_json::json!({
///     "debit_url": "https://sandbox.debit.blinkpay.co.nz",
///     "client_id": "client-id",
///     "client_secret": "client-secret",
///     "timeout_seconds": 10
/// }))
/// .unwrap();
///
/// assert_eq!(config.retry_enabled, true);
/// ```
#[derive(Deserialize, Debug, Clone)]
pub struct BlinkDebitConfig {
    pub debit_url: String,
    pub client_id: String,
    pub client_secret: Token,
    /// Timeout of each HTTP request.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    /// Whether transient failures of idempotent requests are retried.
    #[serde(default = "default_retry_enabled")]
    pub retry_enabled: bool,
    /// Time between two polls while awaiting a resource. Defaults to one second.
    #[serde(default)]
    pub poll_interval_millis: Option<u64>,
}

fn default_retry_enabled() -> bool {
    true
}

/// Client for the Blink Debit APIs.
///
/// All requests are authenticated with an access token obtained with the configured
/// client credentials, and refreshed automatically before it expires.
///
/// Creation requests carry a fresh `idempotency-key`, which makes them safe to retry:
/// by default, transient failures (network errors, `408`, `429` and `5xx` responses) of
/// idempotent requests are retried with an exponential backoff, up to 3 times.
#[derive(Debug, Clone)]
pub struct BlinkDebitClient {
    /// Authentication APIs client.
    pub auth: AuthApi,
    /// Single consents APIs client.
    pub single_consents: SingleConsentsApi,
    /// Enduring consents APIs client.
    pub enduring_consents: EnduringConsentsApi,
    /// Quick payments APIs client.
    pub quick_payments: QuickPaymentsApi,
    /// Payments APIs client.
    pub payments: PaymentsApi,
    /// Refunds APIs client.
    pub refunds: RefundsApi,
    /// Metadata APIs client.
    pub meta: MetaApi,
    pub(crate) inner: Arc<BlinkDebitClientInner>,
}

impl BlinkDebitClient {
    /// Builds a new [`BlinkDebitClient`](crate::client::BlinkDebitClient) connected to
    /// the production environment, with the default configuration.
    pub fn new(credentials: Credentials) -> Result<BlinkDebitClient, Error> {
        BlinkDebitClientBuilder::new(credentials).build()
    }

    /// Returns a new builder to configure a new [`BlinkDebitClient`](crate::client::BlinkDebitClient).
    pub fn builder(credentials: Credentials) -> BlinkDebitClientBuilder {
        BlinkDebitClientBuilder::new(credentials)
    }

    /// Builds a new [`BlinkDebitClient`](crate::client::BlinkDebitClient) from the given settings.
    pub fn from_config(config: &BlinkDebitConfig) -> Result<BlinkDebitClient, Error> {
        let mut http_client = reqwest::Client::builder();
        if let Some(timeout_seconds) = config.timeout_seconds {
            http_client = http_client.timeout(Duration::from_secs(timeout_seconds));
        }

        let mut builder = BlinkDebitClientBuilder::new(Credentials::ClientCredentials {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
        .with_environment(Environment::from_single_url(parse_url(&config.debit_url)?))
        .with_http_client(http_client.build()?);

        if !config.retry_enabled {
            builder = builder.with_retry_policy(None);
        }

        if let Some(poll_interval_millis) = config.poll_interval_millis {
            builder = builder.with_poll_interval(Duration::from_millis(poll_interval_millis));
        }

        builder.build()
    }
}

/// Builder for a [`BlinkDebitClient`](crate::client::BlinkDebitClient).
#[derive(Debug)]
pub struct BlinkDebitClientBuilder {
    client: reqwest::Client,
    retry_policy: Option<DynRetryPolicy>,
    environment: Environment,
    credentials: Credentials,
    poll_interval: Duration,
    correlation_id: Option<String>,
}

impl BlinkDebitClientBuilder {
    /// Creates a new builder to configure a [`BlinkDebitClient`](crate::client::BlinkDebitClient).
    pub fn new(credentials: Credentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            retry_policy: Some(DynRetryPolicy(Arc::new(
                ExponentialBackoff::builder().build_with_max_retries(3),
            ))),
            environment: Environment::Production,
            credentials,
            poll_interval: DEFAULT_POLL_INTERVAL,
            correlation_id: None,
        }
    }

    /// Consumes the builder and builds a new [`BlinkDebitClient`](crate::client::BlinkDebitClient).
    pub fn build(self) -> Result<BlinkDebitClient, Error> {
        let correlation_id = self
            .correlation_id
            .as_deref()
            .map(HeaderValue::from_str)
            .transpose()
            .map_err(|e| Error::Other(anyhow::anyhow!("Invalid correlation id: {}", e)))?;

        // Build an authenticator
        let authenticator = Authenticator::new(
            build_client_with_middleware(
                self.client.clone(),
                self.retry_policy.clone(),
                correlation_id.clone(),
                None,
            ),
            self.environment.token_url()?,
            self.credentials,
        );

        // Prepare the middlewares
        let auth_middleware = || AuthenticationMiddleware {
            authenticator: authenticator.clone(),
        };

        // Build the actual Blink Debit client
        let inner = Arc::new(BlinkDebitClientInner {
            client: build_client_with_middleware(
                self.client.clone(),
                self.retry_policy,
                correlation_id.clone(),
                Some(auth_middleware()),
            ),
            single_attempt_client: build_client_with_middleware(
                self.client,
                None,
                correlation_id,
                Some(auth_middleware()),
            ),
            payments_url: self.environment.payments_url()?,
            authenticator,
            environment: self.environment,
            poll_interval: self.poll_interval,
        });

        Ok(BlinkDebitClient {
            auth: AuthApi::new(inner.clone()),
            single_consents: SingleConsentsApi::new(inner.clone()),
            enduring_consents: EnduringConsentsApi::new(inner.clone()),
            quick_payments: QuickPaymentsApi::new(inner.clone()),
            payments: PaymentsApi::new(inner.clone()),
            refunds: RefundsApi::new(inner.clone()),
            meta: MetaApi::new(inner.clone()),
            inner,
        })
    }

    /// Sets a specific reqwest [`Client`](reqwest::Client) to use.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Sets a specific [`RetryPolicy`](retry_policies::RetryPolicy) to use when retrying transient failures.
    ///
    /// To disable automatic retrying of failed requests, use `None`.
    pub fn with_retry_policy(
        mut self,
        retry_policy: impl Into<Option<Arc<dyn RetryPolicy + Send + Sync + 'static>>>,
    ) -> Self {
        self.retry_policy = retry_policy.into().map(DynRetryPolicy);
        self
    }

    /// Sets the environment to which this client should connect.
    ///
    /// Defaults to [`Environment::Production`].
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Sets the time between two polls while awaiting a resource.
    ///
    /// Defaults to one second.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Sends the given `x-correlation-id` header with every request.
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }
}

fn build_client_with_middleware(
    client: reqwest::Client,
    retry_policy: Option<DynRetryPolicy>,
    correlation_id: Option<HeaderValue>,
    auth_middleware: Option<AuthenticationMiddleware>,
) -> ClientWithMiddleware {
    let mut builder = reqwest_middleware::ClientBuilder::new(client)
        .with(TracingMiddleware::default())
        .with(ErrorHandlingMiddleware);

    if let Some(retry_policy) = retry_policy {
        builder = builder.with(RetryIdempotentMiddleware::new(retry_policy));
    }

    builder = builder.with(InjectHeadersMiddleware::new(correlation_id));

    if let Some(auth_middleware) = auth_middleware {
        builder = builder.with(auth_middleware);
    }

    builder.build()
}
