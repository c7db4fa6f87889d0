use crate::common::IDEMPOTENCY_KEY_HEADER;
use async_trait::async_trait;
use reqwest::{Method, Request, Response};
use reqwest_middleware::{Middleware, Next};
use reqwest_retry::RetryTransientMiddleware;
use retry_policies::{RetryDecision, RetryPolicy};
use std::{
    fmt::{Debug, Formatter},
    sync::Arc,
};
use task_local_extensions::Extensions;

/// Retries transient failures (network errors, `408`, `429` and `5xx` responses),
/// but only for requests that are safe to send twice.
///
/// A request is safe to retry if it has an idempotent method (`GET`, `HEAD`, `OPTIONS`,
/// `TRACE`, `PUT` or `DELETE`), or if it is a `POST`/`PATCH` carrying a non-empty
/// `idempotency-key` header. Creating a consent, a quick payment, a payment or a refund
/// always sends one.
///
/// Polling never relies on this middleware: a failed fetch while awaiting a resource
/// is surfaced to the caller as soon as the retries configured here are exhausted.
pub struct RetryIdempotentMiddleware {
    inner: RetryTransientMiddleware<DynRetryPolicy>,
}

impl RetryIdempotentMiddleware {
    pub fn new(retry_policy: DynRetryPolicy) -> Self {
        Self {
            inner: RetryTransientMiddleware::new_with_policy(retry_policy),
        }
    }
}

fn is_safe_to_retry(req: &Request) -> bool {
    match *req.method() {
        Method::GET
        | Method::HEAD
        | Method::OPTIONS
        | Method::TRACE
        | Method::PUT
        | Method::DELETE => true,
        Method::POST | Method::PATCH => req
            .headers()
            .get(IDEMPOTENCY_KEY_HEADER)
            .map_or(false, |v| !v.is_empty()),
        _ => false,
    }
}

#[async_trait]
impl Middleware for RetryIdempotentMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        if is_safe_to_retry(&req) {
            self.inner.handle(req, extensions, next).await
        } else {
            tracing::trace!(method = %req.method(), "Request is not idempotent, retries disabled");
            next.run(req, extensions).await
        }
    }
}

/// Wrapper type around a retry policy because `dyn RetryPolicy` does not implement `RetryPolicy`.
#[derive(Clone)]
pub struct DynRetryPolicy(pub Arc<dyn RetryPolicy + Send + Sync + 'static>);

impl RetryPolicy for DynRetryPolicy {
    fn should_retry(&self, n_past_retries: u32) -> RetryDecision {
        self.0.should_retry(n_past_retries)
    }
}

impl Debug for DynRetryPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynRetryPolicy").finish_non_exhaustive()
    }
}
