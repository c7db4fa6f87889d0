//! Common logic to wait for resources to reach a terminal state.
//!
//! Consents, quick payments and payments are created on the server and then move through a
//! set of statuses as the customer and their bank act on them. [`poll_until_terminal`] fetches
//! a resource once per poll interval, asks the resource to [`Classify`] itself, and stops as
//! soon as the resource succeeded or was rejected, or when the wait budget is exhausted.
//!
//! The poll interval is fixed (1 second by default), not exponential: the number of attempts
//! equals `max_wait_seconds`, so the observable timeout stays close to the requested budget.

use crate::{
    error::{RejectedError, TimeoutError},
    Error,
};
use std::{fmt, future::Future, time::Duration};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Default time between two consecutive polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// The kinds of resources that can be awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    SingleConsent,
    EnduringConsent,
    QuickPayment,
    Payment,
}

impl ResourceKind {
    /// Subject of the timeout message: consents and quick payments time out as a `Consent`,
    /// payments as a `Payment`.
    pub fn timeout_subject(&self) -> &'static str {
        match self {
            ResourceKind::SingleConsent
            | ResourceKind::EnduringConsent
            | ResourceKind::QuickPayment => "Consent",
            ResourceKind::Payment => "Payment",
        }
    }

    pub(crate) fn capitalized(&self) -> &'static str {
        match self {
            ResourceKind::SingleConsent => "Single consent",
            ResourceKind::EnduringConsent => "Enduring consent",
            ResourceKind::QuickPayment => "Quick payment",
            ResourceKind::Payment => "Payment",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::SingleConsent => "single consent",
            ResourceKind::EnduringConsent => "enduring consent",
            ResourceKind::QuickPayment => "quick payment",
            ResourceKind::Payment => "payment",
        })
    }
}

/// Why a resource ended up in a terminal failure state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// Rejected by the customer or their bank.
    Rejected,
    /// Revoked after having been authorised.
    Revoked,
    /// The upstream gateway gave up waiting for the customer.
    GatewayTimeout,
}

/// Outcome of inspecting the current state of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The resource reached a successful terminal state.
    Success,
    /// The resource reached a failed terminal state.
    Rejected(RejectionReason),
    /// The resource is still in progress.
    Retry,
}

/// A resource that can tell whether it reached a terminal state.
///
/// Anything not recognised as a terminal state must classify as [`Classification::Retry`].
pub trait Classify {
    fn classify(&self) -> Classification;
}

/// Options to configure the behaviour of [`poll_until_terminal`].
#[derive(Debug, Clone)]
pub struct PollOptions {
    max_wait_seconds: u32,
    interval: Duration,
    cancellation: Option<CancellationToken>,
}

impl PollOptions {
    /// Polls at most `max_wait_seconds` times, once per second.
    ///
    /// A budget of zero still performs a single attempt.
    pub fn new(max_wait_seconds: u32) -> Self {
        Self {
            max_wait_seconds,
            interval: DEFAULT_POLL_INTERVAL,
            cancellation: None,
        }
    }

    /// Sets the time between two consecutive polls.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets a token which aborts the wait as soon as it is cancelled.
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = Some(cancellation);
        self
    }

    pub fn max_wait_seconds(&self) -> u32 {
        self.max_wait_seconds
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn max_attempts(&self) -> u32 {
        self.max_wait_seconds.max(1)
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map_or(false, CancellationToken::is_cancelled)
    }

    /// Runs `fut` to completion, unless the wait is cancelled first.
    async fn unless_cancelled<O>(&self, fut: impl Future<Output = O>) -> Option<O> {
        match &self.cancellation {
            Some(token) => {
                tokio::select! {
                    _ = token.cancelled() => None,
                    out = fut => Some(out),
                }
            }
            None => Some(fut.await),
        }
    }
}

/// Continuously fetches a resource until it reaches a terminal state.
///
/// - Errors returned by `fetch` are propagated immediately, without further attempts.
/// - [`Classification::Success`] returns the fetched resource.
/// - [`Classification::Rejected`] returns [`Error::Rejected`].
/// - After `max_wait_seconds` attempts classified as [`Classification::Retry`],
///   returns [`Error::Timeout`].
#[tracing::instrument(
    name = "Poll until terminal state",
    skip(options, fetch),
    fields(max_wait_seconds = options.max_wait_seconds)
)]
pub async fn poll_until_terminal<T, F, Fut>(
    kind: ResourceKind,
    id: Uuid,
    options: &PollOptions,
    mut fetch: F,
) -> Result<T, Error>
where
    T: Classify,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let max_attempts = options.max_attempts();

    for attempt in 1..=max_attempts {
        if options.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let resource = options
            .unless_cancelled(fetch())
            .await
            .ok_or(Error::Cancelled)??;

        match resource.classify() {
            Classification::Success => {
                tracing::debug!(attempt, "Resource reached a successful terminal state");
                return Ok(resource);
            }
            Classification::Rejected(reason) => {
                tracing::debug!(attempt, ?reason, "Resource reached a failed terminal state");
                return Err(RejectedError { kind, id, reason }.into());
            }
            Classification::Retry => {}
        }

        if attempt < max_attempts {
            tracing::debug!(
                attempt,
                "Resource still in progress, waiting {} seconds before trying again",
                options.interval.as_secs_f64()
            );

            options
                .unless_cancelled(tokio::time::sleep(options.interval))
                .await
                .ok_or(Error::Cancelled)?;
        }
    }

    Err(TimeoutError { kind, id }.into())
}

/// Same as [`poll_until_terminal`], but revokes the resource when the wait budget is exhausted.
///
/// The revocation is attempted exactly once. If it succeeds, [`Error::Timeout`] is returned;
/// if it fails, [`Error::TimeoutRevokeFailed`] carries both the timeout and the revoke failure.
/// Rejections, cancellations and fetch errors never trigger a revocation.
pub async fn poll_until_terminal_or_revoke<T, F, Fut, R, RFut>(
    kind: ResourceKind,
    id: Uuid,
    options: &PollOptions,
    fetch: F,
    revoke: R,
) -> Result<T, Error>
where
    T: Classify,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
    R: FnOnce() -> RFut,
    RFut: Future<Output = Result<(), Error>>,
{
    match poll_until_terminal(kind, id, options, fetch).await {
        Err(Error::Timeout(timeout)) => {
            tracing::warn!(%kind, %id, "Wait budget exhausted, revoking");

            match revoke().await {
                Ok(()) => Err(Error::Timeout(timeout)),
                Err(revoke_error) => {
                    tracing::warn!(%kind, %id, "Revoking after timeout failed: {}", revoke_error);

                    Err(Error::TimeoutRevokeFailed {
                        timeout,
                        revoke: Box::new(revoke_error),
                    })
                }
            }
        }
        res => res,
    }
}
