//! Standard errors used by all functions in the crate.

use crate::pollable::{RejectionReason, ResourceKind};
use std::fmt;
use uuid::Uuid;

/// Error collecting all possible failures of the Blink Debit client.
///
/// Every failure is classified once, where it happens, and reaches the caller unchanged:
/// a rejected consent is always an [`Error::Rejected`], a wait budget running out is always
/// an [`Error::Timeout`] (or [`Error::TimeoutRevokeFailed`]), and so on.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Reqwest error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    /// Error returned by a Blink Debit API endpoint.
    #[error("{0}")]
    ApiError(#[from] ApiError),
    /// The requested resource does not exist.
    #[error("Resource not found: {0}")]
    NotFound(ApiError),
    /// The resource reached a terminal failure state decided by the customer, the bank or the gateway.
    #[error(transparent)]
    Rejected(#[from] RejectedError),
    /// The local wait budget was exhausted while the resource was still in progress.
    #[error(transparent)]
    Timeout(#[from] TimeoutError),
    /// The local wait budget was exhausted and revoking the abandoned resource failed as well.
    #[error("{timeout}; revoking the {} also failed: {revoke}", .timeout.kind)]
    TimeoutRevokeFailed {
        timeout: TimeoutError,
        #[source]
        revoke: Box<Error>,
    },
    /// The access token could not be obtained from the token endpoint.
    #[error("Authentication failed: {0}")]
    AuthError(#[source] Box<Error>),
    /// Waiting was cancelled by the caller.
    #[error("Operation cancelled")]
    Cancelled,
    /// Catch-all variant for unexpected errors.
    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<reqwest_middleware::Error> for Error {
    fn from(e: reqwest_middleware::Error) -> Self {
        match e {
            reqwest_middleware::Error::Reqwest(e) => Error::HttpError(e),
            reqwest_middleware::Error::Middleware(e) => {
                e.downcast::<Error>().unwrap_or_else(Error::Other)
            }
        }
    }
}

impl From<Error> for reqwest_middleware::Error {
    fn from(e: Error) -> Self {
        reqwest_middleware::Error::Middleware(e.into())
    }
}

/// Blink Debit HTTP APIs error.
#[derive(thiserror::Error, Debug)]
pub struct ApiError {
    /// HTTP status returned by the server.
    pub status: u16,
    /// Concise description of the error.
    pub title: String,
    /// A human readable explanation specific to this occurrence of the problem.
    pub detail: Option<String>,
    /// Blink specific error code, if any.
    pub code: Option<String>,
    /// Request path reported by the server.
    pub path: Option<String>,
    /// Correlation identifier of the failed request.
    pub correlation_id: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blink Debit HTTP error {}: {}", self.status, self.title)?;

        if let Some(ref code) = self.code {
            write!(f, " ({})", code)?;
        }

        if let Some(ref detail) = self.detail {
            write!(f, "\nAdditional details: {}", detail)?;
        }

        if let Some(ref path) = self.path {
            write!(f, "\nPath: {}", path)?;
        }

        if let Some(ref correlation_id) = self.correlation_id {
            write!(f, "\nCorrelation ID: {}", correlation_id)?;
        }

        Ok(())
    }
}

/// A resource was rejected, revoked or timed out at the gateway.
///
/// These are final decisions: retrying the wait will not change the outcome.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub struct RejectedError {
    pub kind: ResourceKind,
    pub id: Uuid,
    pub reason: RejectionReason,
}

impl fmt::Display for RejectedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            RejectionReason::GatewayTimeout => {
                write!(f, "Gateway timed out for {} {}", self.kind, self.id)
            }
            RejectionReason::Rejected => {
                write!(f, "{} {} has been rejected", self.kind.capitalized(), self.id)
            }
            RejectionReason::Revoked => {
                write!(f, "{} {} has been revoked", self.kind.capitalized(), self.id)
            }
        }
    }
}

/// The local wait budget was exhausted before the resource reached a terminal state.
///
/// Displays as `Consent timed out` for consents and quick payments, and as
/// `Payment timed out` for payments.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub struct TimeoutError {
    pub kind: ResourceKind,
    pub id: Uuid,
}

impl fmt::Display for TimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} timed out", self.kind.timeout_subject())
    }
}
