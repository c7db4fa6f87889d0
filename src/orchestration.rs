//! Waiting for consents, quick payments and payments to reach a terminal state.
//!
//! | Resource | Succeeds on | Revoked when the wait times out |
//! |---|---|---|
//! | Single consent | `Authorised`, `Consumed` | by `await_authorised_single_consent` |
//! | Enduring consent | `Authorised`, `Consumed` | by `await_authorised_enduring_consent` |
//! | Quick payment | consent `Authorised`, `Consumed` | always |
//! | Payment | `AcceptedSettlementCompleted` | never |
//!
//! A `Rejected`, `Revoked` or `GatewayTimeout` resource fails immediately with
//! [`Error::Rejected`](crate::Error::Rejected). When the wait budget runs out first,
//! the error is [`Error::Timeout`](crate::Error::Timeout), or
//! [`Error::TimeoutRevokeFailed`](crate::Error::TimeoutRevokeFailed) if the revocation failed too.

use crate::{
    apis::{consents::Consent, payments::Payment, quick_payments::QuickPayment},
    pollable::{poll_until_terminal, poll_until_terminal_or_revoke, PollOptions, ResourceKind},
    BlinkDebitClient, Error,
};
use uuid::Uuid;

impl BlinkDebitClient {
    /// Polling options with the given budget and the poll interval configured for this client.
    pub fn poll_options(&self, max_wait_seconds: u32) -> PollOptions {
        self.inner.poll_options(max_wait_seconds)
    }

    /// Waits until a single consent is authorised or consumed.
    ///
    /// The consent is left untouched if the wait times out.
    pub async fn await_successful_single_consent(
        &self,
        consent_id: Uuid,
        max_wait_seconds: u32,
    ) -> Result<Consent, Error> {
        self.await_successful_single_consent_with_options(
            consent_id,
            self.poll_options(max_wait_seconds),
        )
        .await
    }

    #[tracing::instrument(
        name = "Await Successful Single Consent",
        skip(self, options),
        fields(max_wait_seconds = options.max_wait_seconds())
    )]
    pub async fn await_successful_single_consent_with_options(
        &self,
        consent_id: Uuid,
        options: PollOptions,
    ) -> Result<Consent, Error> {
        poll_until_terminal(ResourceKind::SingleConsent, consent_id, &options, || {
            self.single_consents.get_by_id(&consent_id)
        })
        .await
    }

    /// Waits until a single consent is authorised or consumed,
    /// revoking it if the wait times out.
    pub async fn await_authorised_single_consent(
        &self,
        consent_id: Uuid,
        max_wait_seconds: u32,
    ) -> Result<Consent, Error> {
        self.await_authorised_single_consent_with_options(
            consent_id,
            self.poll_options(max_wait_seconds),
        )
        .await
    }

    #[tracing::instrument(
        name = "Await Authorised Single Consent",
        skip(self, options),
        fields(max_wait_seconds = options.max_wait_seconds())
    )]
    pub async fn await_authorised_single_consent_with_options(
        &self,
        consent_id: Uuid,
        options: PollOptions,
    ) -> Result<Consent, Error> {
        poll_until_terminal_or_revoke(
            ResourceKind::SingleConsent,
            consent_id,
            &options,
            || self.single_consents.get_by_id(&consent_id),
            || self.single_consents.revoke_once(&consent_id),
        )
        .await
    }

    /// Waits until an enduring consent is authorised or consumed.
    ///
    /// The consent is left untouched if the wait times out.
    pub async fn await_successful_enduring_consent(
        &self,
        consent_id: Uuid,
        max_wait_seconds: u32,
    ) -> Result<Consent, Error> {
        self.await_successful_enduring_consent_with_options(
            consent_id,
            self.poll_options(max_wait_seconds),
        )
        .await
    }

    #[tracing::instrument(
        name = "Await Successful Enduring Consent",
        skip(self, options),
        fields(max_wait_seconds = options.max_wait_seconds())
    )]
    pub async fn await_successful_enduring_consent_with_options(
        &self,
        consent_id: Uuid,
        options: PollOptions,
    ) -> Result<Consent, Error> {
        poll_until_terminal(ResourceKind::EnduringConsent, consent_id, &options, || {
            self.enduring_consents.get_by_id(&consent_id)
        })
        .await
    }

    /// Waits until an enduring consent is authorised or consumed,
    /// revoking it if the wait times out.
    pub async fn await_authorised_enduring_consent(
        &self,
        consent_id: Uuid,
        max_wait_seconds: u32,
    ) -> Result<Consent, Error> {
        self.await_authorised_enduring_consent_with_options(
            consent_id,
            self.poll_options(max_wait_seconds),
        )
        .await
    }

    #[tracing::instrument(
        name = "Await Authorised Enduring Consent",
        skip(self, options),
        fields(max_wait_seconds = options.max_wait_seconds())
    )]
    pub async fn await_authorised_enduring_consent_with_options(
        &self,
        consent_id: Uuid,
        options: PollOptions,
    ) -> Result<Consent, Error> {
        poll_until_terminal_or_revoke(
            ResourceKind::EnduringConsent,
            consent_id,
            &options,
            || self.enduring_consents.get_by_id(&consent_id),
            || self.enduring_consents.revoke_once(&consent_id),
        )
        .await
    }

    /// Waits until the consent of a quick payment is authorised or consumed,
    /// revoking the quick payment if the wait times out.
    pub async fn await_successful_quick_payment(
        &self,
        quick_payment_id: Uuid,
        max_wait_seconds: u32,
    ) -> Result<QuickPayment, Error> {
        self.await_successful_quick_payment_with_options(
            quick_payment_id,
            self.poll_options(max_wait_seconds),
        )
        .await
    }

    #[tracing::instrument(
        name = "Await Successful Quick Payment",
        skip(self, options),
        fields(max_wait_seconds = options.max_wait_seconds())
    )]
    pub async fn await_successful_quick_payment_with_options(
        &self,
        quick_payment_id: Uuid,
        options: PollOptions,
    ) -> Result<QuickPayment, Error> {
        poll_until_terminal_or_revoke(
            ResourceKind::QuickPayment,
            quick_payment_id,
            &options,
            || self.quick_payments.get_by_id(&quick_payment_id),
            || self.quick_payments.revoke_once(&quick_payment_id),
        )
        .await
    }

    /// Waits until a payment is settled.
    ///
    /// Payments cannot be revoked: nothing is done if the wait times out.
    pub async fn await_successful_payment(
        &self,
        payment_id: Uuid,
        max_wait_seconds: u32,
    ) -> Result<Payment, Error> {
        self.await_successful_payment_with_options(payment_id, self.poll_options(max_wait_seconds))
            .await
    }

    #[tracing::instrument(
        name = "Await Successful Payment",
        skip(self, options),
        fields(max_wait_seconds = options.max_wait_seconds())
    )]
    pub async fn await_successful_payment_with_options(
        &self,
        payment_id: Uuid,
        options: PollOptions,
    ) -> Result<Payment, Error> {
        poll_until_terminal(ResourceKind::Payment, payment_id, &options, || {
            self.payments.get_by_id(&payment_id)
        })
        .await
    }
}
